// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Group, MemberId};
use crate::splits::within_tolerance;

/// Structural problem found in a stored expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum Issue {
    SplitTotalMismatch {
        expense_id: String,
        amount: Decimal,
        split_total: Decimal,
    },
    EmptySplits {
        expense_id: String,
    },
    UnknownPayer {
        expense_id: String,
        member: MemberId,
    },
    UnknownSplitMember {
        expense_id: String,
        member: MemberId,
    },
    DuplicateSplitMember {
        expense_id: String,
        member: MemberId,
    },
}

impl Issue {
    pub fn code(&self) -> &'static str {
        match self {
            Issue::SplitTotalMismatch { .. } => "split_total_mismatch",
            Issue::EmptySplits { .. } => "empty_splits",
            Issue::UnknownPayer { .. } => "unknown_payer",
            Issue::UnknownSplitMember { .. } => "unknown_split_member",
            Issue::DuplicateSplitMember { .. } => "duplicate_split_member",
        }
    }

    pub fn expense_id(&self) -> &str {
        match self {
            Issue::SplitTotalMismatch { expense_id, .. }
            | Issue::EmptySplits { expense_id }
            | Issue::UnknownPayer { expense_id, .. }
            | Issue::UnknownSplitMember { expense_id, .. }
            | Issue::DuplicateSplitMember { expense_id, .. } => expense_id,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Issue::SplitTotalMismatch {
                expense_id,
                amount,
                split_total,
            } => format!(
                "expense {} amount {} but splits sum to {}",
                expense_id, amount, split_total
            ),
            Issue::EmptySplits { expense_id } => format!("expense {} has no splits", expense_id),
            Issue::UnknownPayer { expense_id, member } => {
                format!("expense {} paid by non-member {}", expense_id, member)
            }
            Issue::UnknownSplitMember { expense_id, member } => {
                format!("expense {} splits to non-member {}", expense_id, member)
            }
            Issue::DuplicateSplitMember { expense_id, member } => {
                format!("expense {} lists {} more than once", expense_id, member)
            }
        }
    }
}

/// Check every expense of a group against the invariants the balance
/// engine relies on. Issues come out in expense order.
pub fn audit_group(group: &Group) -> Vec<Issue> {
    let roster: HashSet<&str> = group.members.iter().map(|m| m.id.as_str()).collect();
    let mut issues = Vec::new();

    for expense in &group.expenses {
        let expense_id = || expense.id.clone();

        if expense.splits.is_empty() {
            issues.push(Issue::EmptySplits {
                expense_id: expense_id(),
            });
        } else {
            let split_total = expense.split_total();
            if !within_tolerance(split_total, expense.amount) {
                issues.push(Issue::SplitTotalMismatch {
                    expense_id: expense_id(),
                    amount: expense.amount,
                    split_total,
                });
            }
        }

        if !roster.contains(expense.paid_by.as_str()) {
            issues.push(Issue::UnknownPayer {
                expense_id: expense_id(),
                member: expense.paid_by.clone(),
            });
        }

        let mut seen = HashSet::new();
        for split in &expense.splits {
            if !seen.insert(split.user_id.as_str()) {
                issues.push(Issue::DuplicateSplitMember {
                    expense_id: expense_id(),
                    member: split.user_id.clone(),
                });
            } else if !roster.contains(split.user_id.as_str()) {
                issues.push(Issue::UnknownSplitMember {
                    expense_id: expense_id(),
                    member: split.user_id.clone(),
                });
            }
        }
    }
    issues
}
