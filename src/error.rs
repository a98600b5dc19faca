// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::MemberId;

/// Reasons a proposed split is rejected before it reaches a group's history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid amount '{0}': expected a positive number")]
    InvalidAmount(String),

    #[error("Select at least one member to split between")]
    EmptySelection,

    #[error(
        "Custom amounts must sum up to the total expense amount (expected {expected}, got {actual})"
    )]
    SplitSumMismatch { expected: Decimal, actual: Decimal },

    #[error("Percentages must sum up to 100% (got {actual})")]
    PercentageSumMismatch { actual: Decimal },

    #[error("Member '{0}' is selected more than once")]
    DuplicateMember(MemberId),

    #[error("Share for member '{member}' must not be negative (got {value})")]
    NegativeShare { member: MemberId, value: Decimal },

    #[error("Amount is too large to split")]
    AmountOverflow,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn sum_mismatch_reports_both_sides() {
        let err = ValidationError::SplitSumMismatch {
            expected: dec!(100),
            actual: dec!(90),
        };
        let msg = err.to_string();
        assert!(msg.contains("expected 100"));
        assert!(msg.contains("got 90"));
    }

    #[test]
    fn percentage_mismatch_mentions_hundred() {
        let err = ValidationError::PercentageSumMismatch { actual: dec!(90) };
        assert_eq!(err.to_string(), "Percentages must sum up to 100% (got 90)");
    }
}
