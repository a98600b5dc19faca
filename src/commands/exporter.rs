// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{id_for_group, load_group};
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => export_expenses(conn, sub),
        _ => Ok(()),
    }
}

fn export_expenses(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    let group_key = sub.get_one::<String>("group").unwrap().trim();
    let group = load_group(conn, &id_for_group(conn, group_key)?)?;

    // one row per split
    let g = &group;
    let rows = g.expenses.iter().flat_map(move |e| {
        e.splits.iter().map(move |s| {
            (
                e.date.format("%Y-%m-%d").to_string(),
                e.description.clone(),
                e.amount.to_string(),
                g.member_name(&e.paid_by).to_string(),
                g.member_name(&s.user_id).to_string(),
                s.amount.to_string(),
                s.r#type.as_str(),
                s.value.to_string(),
            )
        })
    });

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "description",
                "amount",
                "paid_by",
                "member",
                "share",
                "type",
                "value",
            ])?;
            for (d, desc, amt, payer, member, share, typ, value) in rows {
                wtr.write_record([
                    d.as_str(),
                    desc.as_str(),
                    amt.as_str(),
                    payer.as_str(),
                    member.as_str(),
                    share.as_str(),
                    typ,
                    value.as_str(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rows
                .map(|(d, desc, amt, payer, member, share, typ, value)| {
                    json!({
                        "date": d, "description": desc, "amount": amt, "paid_by": payer,
                        "member": member, "share": share, "type": typ, "value": value
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    tracing::info!(group = %group.id, format = %fmt, path = %out, "expenses exported");
    println!("Exported expenses of '{}' to {}", group.name, out);
    Ok(())
}
