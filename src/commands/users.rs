// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{is_valid_email, new_id, pretty_table};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let email = sub.get_one::<String>("email").unwrap().trim();
            if name.is_empty() {
                bail!("User name must not be empty");
            }
            if !is_valid_email(email) {
                bail!("Invalid email '{}'", email);
            }
            let id = new_id();
            conn.execute(
                "INSERT INTO users(id, name, email) VALUES (?1, ?2, ?3)",
                params![&id, name, email],
            )?;
            tracing::info!(user = %id, "user added");
            println!("Added user '{}' <{}> ({})", name, email, id);
        }
        Some(("list", _)) => {
            let mut stmt = conn.prepare("SELECT id, name, email FROM users ORDER BY name")?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (id, n, e) = row?;
                data.push(vec![n, e, id]);
            }
            println!("{}", pretty_table(&["Name", "Email", "ID"], data));
        }
        _ => {}
    }
    Ok(())
}
