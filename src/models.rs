// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type MemberId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: MemberId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub members: Vec<User>,
    pub expenses: Vec<Expense>,
}

impl Group {
    pub fn member(&self, id: &str) -> Option<&User> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Display name for a member id, falling back to the raw id for
    /// references that are no longer on the roster.
    pub fn member_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.member(id).map(|m| m.name.as_str()).unwrap_or(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub group_id: String,
    pub description: String,
    pub amount: Decimal,
    pub paid_by: MemberId,
    pub date: DateTime<Utc>,
    pub splits: Vec<Split>,
}

impl Expense {
    pub fn split_total(&self) -> Decimal {
        self.splits.iter().map(|s| s.amount).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    Equal,
    Custom,
    Percentage,
}

impl SplitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitType::Equal => "equal",
            SplitType::Custom => "custom",
            SplitType::Percentage => "percentage",
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equal" => Ok(SplitType::Equal),
            "custom" => Ok(SplitType::Custom),
            "percentage" => Ok(SplitType::Percentage),
            other => Err(anyhow!(
                "Unknown split type '{}' (use equal|custom|percentage)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub user_id: MemberId,
    pub amount: Decimal,
    pub r#type: SplitType,
    // equal: 1/n, custom: the amount, percentage: 0-100
    pub value: Decimal,
}

/// Net position of one member across a group's history.
/// Positive means the group owes them, negative means they owe the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub user_id: MemberId,
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_type_parses_case_insensitively() {
        assert_eq!(" Percentage ".parse::<SplitType>().unwrap(), SplitType::Percentage);
        assert_eq!("EQUAL".parse::<SplitType>().unwrap(), SplitType::Equal);
        assert!("shares".parse::<SplitType>().is_err());
    }

    #[test]
    fn split_type_serializes_lowercase() {
        let v = serde_json::to_string(&SplitType::Custom).unwrap();
        assert_eq!(v, "\"custom\"");
    }
}
