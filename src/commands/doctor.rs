// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::audit::{Issue, audit_group};
use crate::utils::{id_for_group, load_group, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Finding {
    pub group: String,
    #[serde(flatten)]
    pub issue: Issue,
}

/// Audit one group (by id or name) or every group when `group_key` is None.
pub fn collect(conn: &Connection, group_key: Option<&str>) -> Result<Vec<Finding>> {
    let group_ids = match group_key {
        Some(key) => vec![id_for_group(conn, key)?],
        None => {
            let mut stmt = conn.prepare("SELECT id FROM expense_groups ORDER BY name")?;
            let ids = stmt
                .query_map([], |r| r.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            ids
        }
    };

    let mut findings = Vec::new();
    for id in group_ids {
        let group = load_group(conn, &id)?;
        for issue in audit_group(&group) {
            tracing::warn!(group = %group.id, expense = %issue.expense_id(), code = issue.code(), "inconsistent expense");
            findings.push(Finding {
                group: group.name.clone(),
                issue,
            });
        }
    }
    Ok(findings)
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let group_key = sub.get_one::<String>("group").map(|s| s.trim());
    let findings = collect(conn, group_key)?;

    if maybe_print_json(json_flag, jsonl_flag, &findings)? {
        return Ok(());
    }
    if findings.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = findings
            .iter()
            .map(|f| vec![f.group.clone(), f.issue.code().to_string(), f.issue.detail()])
            .collect();
        println!("{}", pretty_table(&["Group", "Issue", "Detail"], rows));
    }
    Ok(())
}
