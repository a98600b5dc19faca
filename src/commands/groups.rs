// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{id_for_group, id_for_user, load_group, new_id, pretty_table};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", _)) => list(conn)?,
        Some(("show", sub)) => show(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    if name.is_empty() {
        bail!("Group name must not be empty");
    }

    let mut member_ids: Vec<String> = Vec::new();
    for key in sub.get_many::<String>("member").unwrap_or_default() {
        let id = id_for_user(conn, key.trim())?;
        if !member_ids.contains(&id) {
            member_ids.push(id);
        }
    }
    if member_ids.len() < 2 {
        bail!("A group needs at least 2 distinct members");
    }

    let id = new_id();
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO expense_groups(id, name) VALUES (?1, ?2)",
        params![&id, &name],
    )?;
    for (pos, user_id) in member_ids.iter().enumerate() {
        tx.execute(
            "INSERT INTO group_members(group_id, user_id, position) VALUES (?1, ?2, ?3)",
            params![&id, user_id, pos as i64],
        )?;
    }
    tx.commit()?;
    tracing::info!(group = %id, members = member_ids.len(), "group created");
    println!(
        "Created group '{}' with {} members ({})",
        name,
        member_ids.len(),
        id
    );
    Ok(())
}

fn list(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(
        "SELECT g.id, g.name,
                (SELECT COUNT(*) FROM group_members gm WHERE gm.group_id=g.id),
                (SELECT COUNT(*) FROM expenses e WHERE e.group_id=g.id)
         FROM expense_groups g ORDER BY g.name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, i64>(2)?,
            r.get::<_, i64>(3)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (id, name, members, expenses) = row?;
        data.push(vec![name, members.to_string(), expenses.to_string(), id]);
    }
    println!(
        "{}",
        pretty_table(&["Group", "Members", "Expenses", "ID"], data)
    );
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let key = sub.get_one::<String>("group").unwrap().trim();
    let group = load_group(conn, &id_for_group(conn, key)?)?;
    println!("{} ({} expenses)", group.name, group.expenses.len());
    let rows = group
        .members
        .iter()
        .map(|m| vec![m.name.clone(), m.email.clone(), m.id.clone()])
        .collect();
    println!("{}", pretty_table(&["Member", "Email", "ID"], rows));
    Ok(())
}
