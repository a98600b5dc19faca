// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Split builder: turns a total and a strategy selection into per-member
//! shares, or rejects the selection.
//!
//! Sums are compared against a fixed absolute tolerance of 0.01. The
//! tolerance does not scale with the total, so very large expenses get no
//! extra slack.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::models::{MemberId, Split, SplitType};

/// Absolute tolerance (0.01) for "sums to total" and "sums to 100%" checks.
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Member selection for one expense. Member order is the order the shares
/// come out in.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitStrategy {
    Equal {
        members: Vec<MemberId>,
    },
    Custom {
        members: Vec<MemberId>,
        amounts: HashMap<MemberId, String>,
    },
    Percentage {
        members: Vec<MemberId>,
        percentages: HashMap<MemberId, String>,
    },
}

impl SplitStrategy {
    pub fn members(&self) -> &[MemberId] {
        match self {
            SplitStrategy::Equal { members }
            | SplitStrategy::Custom { members, .. }
            | SplitStrategy::Percentage { members, .. } => members,
        }
    }

    pub fn split_type(&self) -> SplitType {
        match self {
            SplitStrategy::Equal { .. } => SplitType::Equal,
            SplitStrategy::Custom { .. } => SplitType::Custom,
            SplitStrategy::Percentage { .. } => SplitType::Percentage,
        }
    }
}

pub fn build_splits(total: &str, strategy: &SplitStrategy) -> Result<Vec<Split>, ValidationError> {
    let total = parse_total(total)?;
    ensure_unique(strategy.members())?;
    match strategy {
        SplitStrategy::Equal { members } => equal(total, members),
        SplitStrategy::Custom { members, amounts } => custom(total, members, amounts),
        SplitStrategy::Percentage {
            members,
            percentages,
        } => percentage(total, members, percentages),
    }
}

/// Parse an expense total. Anything that is not a number greater than zero
/// is rejected.
pub fn parse_total(raw: &str) -> Result<Decimal, ValidationError> {
    match parse_number(raw.trim()) {
        Some(total) if total > Decimal::ZERO => Ok(total),
        _ => Err(ValidationError::InvalidAmount(raw.to_string())),
    }
}

/// Parse a per-member share input; missing or unparseable input counts as 0.
pub fn parse_share(raw: Option<&str>) -> Decimal {
    raw.and_then(|s| parse_number(s.trim()))
        .unwrap_or(Decimal::ZERO)
}

pub fn within_tolerance(a: Decimal, b: Decimal) -> bool {
    a.checked_sub(b)
        .is_some_and(|diff| diff.abs() <= TOLERANCE)
}

fn parse_number(s: &str) -> Option<Decimal> {
    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

fn ensure_unique(members: &[MemberId]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(members.len());
    for m in members {
        if !seen.insert(m.as_str()) {
            return Err(ValidationError::DuplicateMember(m.clone()));
        }
    }
    Ok(())
}

fn equal(total: Decimal, members: &[MemberId]) -> Result<Vec<Split>, ValidationError> {
    if members.is_empty() {
        return Err(ValidationError::EmptySelection);
    }
    let count = Decimal::from(members.len());
    let amount = total
        .checked_div(count)
        .ok_or(ValidationError::AmountOverflow)?;
    let value = Decimal::ONE / count;
    Ok(members
        .iter()
        .map(|m| Split {
            user_id: m.clone(),
            amount,
            r#type: SplitType::Equal,
            value,
        })
        .collect())
}

fn custom(
    total: Decimal,
    members: &[MemberId],
    amounts: &HashMap<MemberId, String>,
) -> Result<Vec<Split>, ValidationError> {
    let shares = collect_shares(members, amounts)?;
    let sum = sum_shares(&shares)?;
    if !within_tolerance(sum, total) {
        return Err(ValidationError::SplitSumMismatch {
            expected: total,
            actual: sum,
        });
    }
    Ok(shares
        .into_iter()
        .map(|(m, value)| Split {
            user_id: m.clone(),
            amount: value,
            r#type: SplitType::Custom,
            value,
        })
        .collect())
}

fn percentage(
    total: Decimal,
    members: &[MemberId],
    percentages: &HashMap<MemberId, String>,
) -> Result<Vec<Split>, ValidationError> {
    let shares = collect_shares(members, percentages)?;
    let sum = sum_shares(&shares)?;
    if !within_tolerance(sum, Decimal::ONE_HUNDRED) {
        return Err(ValidationError::PercentageSumMismatch { actual: sum });
    }
    shares
        .into_iter()
        .map(|(m, pct)| {
            // multiply first for precision; divide first when the product overflows
            let amount = total
                .checked_mul(pct)
                .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
                .or_else(|| {
                    total
                        .checked_div(Decimal::ONE_HUNDRED)
                        .and_then(|v| v.checked_mul(pct))
                })
                .ok_or(ValidationError::AmountOverflow)?;
            Ok(Split {
                user_id: m.clone(),
                amount,
                r#type: SplitType::Percentage,
                value: pct,
            })
        })
        .collect()
}

fn collect_shares<'a>(
    members: &'a [MemberId],
    inputs: &HashMap<MemberId, String>,
) -> Result<Vec<(&'a MemberId, Decimal)>, ValidationError> {
    members
        .iter()
        .map(|m| {
            let value = parse_share(inputs.get(m).map(String::as_str));
            if value < Decimal::ZERO {
                return Err(ValidationError::NegativeShare {
                    member: m.clone(),
                    value,
                });
            }
            Ok((m, value))
        })
        .collect()
}

fn sum_shares(shares: &[(&MemberId, Decimal)]) -> Result<Decimal, ValidationError> {
    shares
        .iter()
        .try_fold(Decimal::ZERO, |acc, (_, v)| acc.checked_add(*v))
        .ok_or(ValidationError::AmountOverflow)
}
