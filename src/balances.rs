// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::{Balance, Group};

/// Net balance per roster member, in roster order.
///
/// The payer of each expense is credited the full amount and every split
/// member is debited their share. Splits are trusted to sum to the expense
/// amount; an expense that violates this skews the totals without notice
/// (see `audit::audit_group`). Split members missing from the roster are
/// accumulated but never emitted.
///
/// Accumulation saturates at `Decimal::MAX` / `Decimal::MIN`, so a history
/// whose running totals exceed the representable range still yields a
/// balance per member instead of failing.
pub fn calculate_balances(group: &Group) -> Vec<Balance> {
    let mut totals: HashMap<&str, Decimal> = group
        .members
        .iter()
        .map(|m| (m.id.as_str(), Decimal::ZERO))
        .collect();

    for expense in &group.expenses {
        let paid = totals.entry(expense.paid_by.as_str()).or_default();
        *paid = paid.saturating_add(expense.amount);
        for split in &expense.splits {
            let owed = totals.entry(split.user_id.as_str()).or_default();
            *owed = owed.saturating_sub(split.amount);
        }
    }

    group
        .members
        .iter()
        .map(|m| Balance {
            user_id: m.id.clone(),
            amount: totals.get(m.id.as_str()).copied().unwrap_or_default(),
        })
        .collect()
}
