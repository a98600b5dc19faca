// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::balances::calculate_balances;
use crate::models::Group;
use crate::utils::{
    fmt_money, get_currency_symbol, id_for_group, load_group, maybe_print_json, pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Serialize)]
pub struct BalanceRow {
    pub user_id: String,
    pub member: String,
    pub amount: Decimal,
    pub status: &'static str,
}

pub fn balance_rows(group: &Group) -> Vec<BalanceRow> {
    calculate_balances(group)
        .into_iter()
        .map(|b| BalanceRow {
            member: group.member_name(&b.user_id).to_string(),
            status: if b.amount >= Decimal::ZERO {
                "Gets back"
            } else {
                "Owes"
            },
            amount: b.amount,
            user_id: b.user_id,
        })
        .collect()
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let group_key = sub.get_one::<String>("group").unwrap().trim();
    let group = load_group(conn, &id_for_group(conn, group_key)?)?;
    let data = balance_rows(&group);

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let symbol = get_currency_symbol(conn)?;
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    r.member,
                    r.status.to_string(),
                    fmt_money(&r.amount.abs(), &symbol),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Member", "Status", "Amount"], rows));
    }
    Ok(())
}
