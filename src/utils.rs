// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, NaiveDate, Utc};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::models::{Expense, Group, MemberId, Split, SplitType, User};

pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn date_to_utc(date: NaiveDate) -> Result<DateTime<Utc>> {
    let dt = date
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("Invalid date '{}'", date))?;
    Ok(dt.and_utc())
}

pub fn fmt_money(d: &Decimal, symbol: &str) -> String {
    format!("{}{:.2}", symbol, d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

fn single_match(ids: Vec<String>, what: &str, key: &str) -> Result<String> {
    match ids.as_slice() {
        [] => bail!("{} '{}' not found", what, key),
        [id] => Ok(id.clone()),
        many => bail!("{} '{}' is ambiguous ({} matches)", what, key, many.len()),
    }
}

/// Resolve a user by id, email (case-insensitive), or exact name.
pub fn id_for_user(conn: &Connection, key: &str) -> Result<String> {
    let mut stmt =
        conn.prepare("SELECT id FROM users WHERE id=?1 OR lower(email)=lower(?1) OR name=?1")?;
    let ids = stmt
        .query_map(params![key], |r| r.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    single_match(ids, "User", key)
}

pub fn id_for_group(conn: &Connection, key: &str) -> Result<String> {
    let mut stmt = conn.prepare("SELECT id FROM expense_groups WHERE id=?1 OR name=?1")?;
    let ids = stmt
        .query_map(params![key], |r| r.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    single_match(ids, "Group", key)
}

/// Resolve a user key against a group's roster only.
pub fn member_in_group(group: &Group, key: &str) -> Result<MemberId> {
    let ids: Vec<String> = group
        .members
        .iter()
        .filter(|m| m.id == key || m.email.eq_ignore_ascii_case(key) || m.name == key)
        .map(|m| m.id.clone())
        .collect();
    match ids.as_slice() {
        [] => bail!("'{}' is not a member of group '{}'", key, group.name),
        [id] => Ok(id.clone()),
        many => bail!(
            "'{}' is ambiguous in group '{}' ({} matches)",
            key,
            group.name,
            many.len()
        ),
    }
}

pub fn get_currency_symbol(conn: &Connection) -> Result<String> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='currency_symbol'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v.unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string()))
}

pub fn set_currency_symbol(conn: &Connection, symbol: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('currency_symbol', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![symbol],
    )?;
    Ok(())
}

fn parse_stored_decimal(s: &str, what: &str, expense_id: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid {} '{}' in expense {}", what, s, expense_id))
}

/// Materialize a full snapshot of a group: roster in creation order,
/// expenses in insertion order, splits in selection order.
pub fn load_group(conn: &Connection, group_id: &str) -> Result<Group> {
    let (id, name): (String, String) = conn
        .query_row(
            "SELECT id, name FROM expense_groups WHERE id=?1",
            params![group_id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?
        .ok_or_else(|| anyhow!("Group '{}' not found", group_id))?;

    let mut stmt_m = conn.prepare(
        "SELECT u.id, u.name, u.email FROM group_members gm
         JOIN users u ON u.id=gm.user_id
         WHERE gm.group_id=?1 ORDER BY gm.position",
    )?;
    let members = stmt_m
        .query_map(params![&id], |r| {
            Ok(User {
                id: r.get(0)?,
                name: r.get(1)?,
                email: r.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut stmt_e = conn.prepare(
        "SELECT id, description, amount, paid_by, date FROM expenses
         WHERE group_id=?1 ORDER BY seq",
    )?;
    let mut rows = stmt_e.query(params![&id])?;
    let mut expenses = Vec::new();
    while let Some(r) = rows.next()? {
        let expense_id: String = r.get(0)?;
        let description: String = r.get(1)?;
        let amount_s: String = r.get(2)?;
        let paid_by: String = r.get(3)?;
        let date_s: String = r.get(4)?;
        let amount = parse_stored_decimal(&amount_s, "amount", &expense_id)?;
        let date = DateTime::parse_from_rfc3339(&date_s)
            .with_context(|| format!("Invalid date '{}' in expense {}", date_s, expense_id))?
            .with_timezone(&Utc);
        let splits = load_splits(conn, &expense_id)?;
        expenses.push(Expense {
            id: expense_id,
            group_id: id.clone(),
            description,
            amount,
            paid_by,
            date,
            splits,
        });
    }

    Ok(Group {
        id,
        name,
        members,
        expenses,
    })
}

fn load_splits(conn: &Connection, expense_id: &str) -> Result<Vec<Split>> {
    let mut stmt = conn.prepare_cached(
        "SELECT user_id, amount, type, value FROM splits WHERE expense_id=?1 ORDER BY position",
    )?;
    let mut rows = stmt.query(params![expense_id])?;
    let mut splits = Vec::new();
    while let Some(r) = rows.next()? {
        let user_id: String = r.get(0)?;
        let amount_s: String = r.get(1)?;
        let type_s: String = r.get(2)?;
        let value_s: String = r.get(3)?;
        splits.push(Split {
            user_id,
            amount: parse_stored_decimal(&amount_s, "split amount", expense_id)?,
            r#type: type_s.parse::<SplitType>()?,
            value: parse_stored_decimal(&value_s, "split value", expense_id)?,
        });
    }
    Ok(splits)
}

/// Append an expense and its splits to the group history atomically.
pub fn insert_expense(conn: &mut Connection, expense: &Expense) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO expenses(id, group_id, description, amount, paid_by, date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            &expense.id,
            &expense.group_id,
            &expense.description,
            expense.amount.to_string(),
            &expense.paid_by,
            expense.date.to_rfc3339(),
        ],
    )?;
    for (pos, split) in expense.splits.iter().enumerate() {
        tx.execute(
            "INSERT INTO splits(expense_id, position, user_id, amount, type, value)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &expense.id,
                pos as i64,
                &split.user_id,
                split.amount.to_string(),
                split.r#type.as_str(),
                split.value.to_string(),
            ],
        )?;
    }
    tx.commit()?;
    Ok(())
}
