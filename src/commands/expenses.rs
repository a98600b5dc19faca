// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use crate::error::ValidationError;
use crate::models::{Expense, Group, MemberId, Split, SplitType};
use crate::splits::{SplitStrategy, build_splits, parse_total};
use crate::utils::{
    date_to_utc, fmt_money, get_currency_symbol, id_for_group, insert_expense, load_group,
    maybe_print_json, member_in_group, new_id, parse_date, pretty_table,
};
use anyhow::{Context, Result, bail};
use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount_raw = sub.get_one::<String>("amount").unwrap();
    let total = parse_total(amount_raw)?;

    let group_key = sub.get_one::<String>("group").unwrap().trim();
    let group = load_group(conn, &id_for_group(conn, group_key)?)?;

    let description = sub
        .get_one::<String>("description")
        .unwrap()
        .trim()
        .to_string();
    if description.is_empty() {
        bail!("Expense description must not be empty");
    }
    let paid_by = member_in_group(&group, sub.get_one::<String>("paid_by").unwrap().trim())?;
    let split_type = sub.get_one::<String>("split").unwrap().parse::<SplitType>()?;

    let mut shares: Vec<(MemberId, String)> = Vec::new();
    for raw in sub.get_many::<String>("share").unwrap_or_default() {
        let (who, value) = raw
            .split_once('=')
            .with_context(|| format!("Invalid share '{}', expected MEMBER=VALUE", raw))?;
        let id = member_in_group(&group, who.trim())?;
        if shares.iter().any(|(seen, _)| *seen == id) {
            return Err(ValidationError::DuplicateMember(id).into());
        }
        shares.push((id, value.trim().to_string()));
    }
    let mut members: Vec<MemberId> = Vec::new();
    for key in sub.get_many::<String>("member").unwrap_or_default() {
        members.push(member_in_group(&group, key.trim())?);
    }
    if members.is_empty() && split_type != SplitType::Equal {
        members = shares.iter().map(|(id, _)| id.clone()).collect();
    }
    let inputs: HashMap<MemberId, String> = shares.into_iter().collect();

    let strategy = match split_type {
        SplitType::Equal => SplitStrategy::Equal { members },
        SplitType::Custom => SplitStrategy::Custom {
            members,
            amounts: inputs,
        },
        SplitType::Percentage => SplitStrategy::Percentage {
            members,
            percentages: inputs,
        },
    };
    let splits = build_splits(amount_raw, &strategy)?;

    let date = match sub.get_one::<String>("date") {
        Some(s) => date_to_utc(parse_date(s.trim())?)?,
        None => Utc::now(),
    };

    let expense = Expense {
        id: new_id(),
        group_id: group.id.clone(),
        description,
        amount: total,
        paid_by,
        date,
        splits,
    };
    insert_expense(conn, &expense)?;
    tracing::info!(
        group = %group.id,
        expense = %expense.id,
        split = %strategy.split_type(),
        "expense recorded"
    );

    let symbol = get_currency_symbol(conn)?;
    println!(
        "Recorded '{}' {} paid by {} ({} split, {} members)",
        expense.description,
        fmt_money(&expense.amount, &symbol),
        group.member_name(&expense.paid_by),
        split_type,
        expense.splits.len()
    );
    Ok(())
}

#[derive(Serialize)]
pub struct ExpenseRow {
    pub id: String,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub paid_by: String,
    pub split: String,
}

/// One `name amount` entry per split; percentage splits also show the rate.
pub fn describe_split(group: &Group, split: &Split, symbol: &str) -> String {
    let mut s = format!(
        "{} {}",
        group.member_name(&split.user_id),
        fmt_money(&split.amount, symbol)
    );
    if split.r#type == SplitType::Percentage {
        s.push_str(&format!(" ({}%)", split.value.normalize()));
    }
    s
}

pub fn expense_rows(group: &Group, symbol: &str) -> Vec<ExpenseRow> {
    group
        .expenses
        .iter()
        .map(|e| ExpenseRow {
            id: e.id.clone(),
            date: e.date.format("%Y-%m-%d").to_string(),
            description: e.description.clone(),
            amount: fmt_money(&e.amount, symbol),
            paid_by: group.member_name(&e.paid_by).to_string(),
            split: e
                .splits
                .iter()
                .map(|s| describe_split(group, s, symbol))
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect()
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let group_key = sub.get_one::<String>("group").unwrap().trim();
    let group = load_group(conn, &id_for_group(conn, group_key)?)?;
    let symbol = get_currency_symbol(conn)?;
    let data = expense_rows(&group, &symbol);

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        if data.is_empty() {
            println!("No expenses added yet");
            return Ok(());
        }
        let rows = data
            .into_iter()
            .map(|r| vec![r.date, r.description, r.amount, r.paid_by, r.split])
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Description", "Amount", "Paid by", "Split"], rows)
        );
    }
    Ok(())
}
