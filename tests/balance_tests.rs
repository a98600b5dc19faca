// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billbuddy::audit::{Issue, audit_group};
use billbuddy::models::{Balance, Expense, Group, Split, SplitType, User};
use billbuddy::splits::{SplitStrategy, build_splits};
use billbuddy::calculate_balances;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn user(id: &str) -> User {
    User {
        id: id.into(),
        name: format!("User {}", id),
        email: format!("{}@example.com", id.to_lowercase()),
    }
}

fn equal_expense(id: &str, amount: &str, paid_by: &str, members: &[&str]) -> Expense {
    let strategy = SplitStrategy::Equal {
        members: members.iter().map(|m| m.to_string()).collect(),
    };
    Expense {
        id: id.into(),
        group_id: "g1".into(),
        description: format!("expense {}", id),
        amount: amount.parse().unwrap(),
        paid_by: paid_by.into(),
        date: Utc::now(),
        splits: build_splits(amount, &strategy).unwrap(),
    }
}

fn group(members: &[&str], expenses: Vec<Expense>) -> Group {
    Group {
        id: "g1".into(),
        name: "Trip".into(),
        members: members.iter().map(|m| user(m)).collect(),
        expenses,
    }
}

fn amounts(balances: &[Balance]) -> Vec<(&str, Decimal)> {
    balances
        .iter()
        .map(|b| (b.user_id.as_str(), b.amount))
        .collect()
}

#[test]
fn single_expense_is_zero_sum() {
    let g = group(&["A", "B"], vec![equal_expense("e1", "100", "A", &["A", "B"])]);
    let balances = calculate_balances(&g);
    assert_eq!(amounts(&balances), vec![("A", dec!(50)), ("B", dec!(-50))]);
    let total: Decimal = balances.iter().map(|b| b.amount).sum();
    assert!(total.is_zero());
}

#[test]
fn balances_accumulate_across_expenses() {
    let g = group(
        &["A", "B"],
        vec![
            equal_expense("e1", "100", "A", &["A", "B"]),
            equal_expense("e2", "60", "B", &["A", "B"]),
        ],
    );
    assert_eq!(
        amounts(&calculate_balances(&g)),
        vec![("A", dec!(20)), ("B", dec!(-20))]
    );
}

#[test]
fn no_expenses_means_all_zero() {
    let g = group(&["A", "B", "C"], vec![]);
    let balances = calculate_balances(&g);
    assert_eq!(balances.len(), 3);
    assert!(balances.iter().all(|b| b.amount.is_zero()));
}

#[test]
fn recomputation_is_idempotent() {
    let g = group(
        &["A", "B", "C"],
        vec![
            equal_expense("e1", "100", "A", &["A", "B", "C"]),
            equal_expense("e2", "45", "C", &["B", "C"]),
        ],
    );
    assert_eq!(calculate_balances(&g), calculate_balances(&g));
}

#[test]
fn output_follows_roster_order() {
    let forward = group(
        &["B", "C", "A"],
        vec![
            equal_expense("e1", "30", "A", &["A", "B", "C"]),
            equal_expense("e2", "12", "C", &["C", "A"]),
        ],
    );
    let mut reversed = forward.clone();
    reversed.expenses.reverse();

    let order = |g: &Group| -> Vec<String> {
        calculate_balances(g)
            .into_iter()
            .map(|b| b.user_id)
            .collect()
    };
    assert_eq!(order(&forward), vec!["B", "C", "A"]);
    assert_eq!(order(&reversed), vec!["B", "C", "A"]);
    assert_eq!(calculate_balances(&forward), calculate_balances(&reversed));
}

#[test]
fn payer_outside_split_gets_full_credit() {
    let g = group(&["A", "B", "C"], vec![equal_expense("e1", "60", "A", &["B", "C"])]);
    assert_eq!(
        amounts(&calculate_balances(&g)),
        vec![("A", dec!(60)), ("B", dec!(-30)), ("C", dec!(-30))]
    );
}

#[test]
fn uneven_equal_split_stays_within_tolerance() {
    let g = group(&["A", "B", "C"], vec![equal_expense("e1", "100", "A", &["A", "B", "C"])]);
    let total: Decimal = calculate_balances(&g).iter().map(|b| b.amount).sum();
    assert!(total.abs() <= dec!(0.01));
    assert!(audit_group(&g).is_empty());
}

#[test]
fn malformed_expense_breaks_zero_sum_silently() {
    // splits cover only 80 of 100, bypassing the split builder
    let bad = Expense {
        id: "bad".into(),
        group_id: "g1".into(),
        description: "hand-built".into(),
        amount: dec!(100),
        paid_by: "A".into(),
        date: Utc::now(),
        splits: vec![
            Split {
                user_id: "A".into(),
                amount: dec!(50),
                r#type: SplitType::Custom,
                value: dec!(50),
            },
            Split {
                user_id: "B".into(),
                amount: dec!(30),
                r#type: SplitType::Custom,
                value: dec!(30),
            },
        ],
    };
    let g = group(&["A", "B"], vec![bad]);
    let balances = calculate_balances(&g);
    assert_eq!(amounts(&balances), vec![("A", dec!(50)), ("B", dec!(-30))]);
    let total: Decimal = balances.iter().map(|b| b.amount).sum();
    assert_eq!(total, dec!(20));

    assert_eq!(
        audit_group(&g),
        vec![Issue::SplitTotalMismatch {
            expense_id: "bad".into(),
            amount: dec!(100),
            split_total: dec!(80),
        }]
    );
}

#[test]
fn dangling_split_member_is_not_reported() {
    let g = group(&["A", "B"], vec![equal_expense("e1", "90", "A", &["A", "B", "Z"])]);
    let balances = calculate_balances(&g);
    assert_eq!(amounts(&balances), vec![("A", dec!(60)), ("B", dec!(-30))]);

    let issues = audit_group(&g);
    assert_eq!(
        issues,
        vec![Issue::UnknownSplitMember {
            expense_id: "e1".into(),
            member: "Z".into(),
        }]
    );
    assert_eq!(issues[0].code(), "unknown_split_member");
}

#[test]
fn audit_flags_unknown_payer_and_duplicates() {
    let mut e = equal_expense("e1", "20", "X", &["A", "B"]);
    let dup = e.splits[0].clone();
    e.splits.push(dup);
    let g = group(&["A", "B"], vec![e]);

    let codes: Vec<_> = audit_group(&g).iter().map(|i| i.code()).collect();
    assert_eq!(
        codes,
        vec!["split_total_mismatch", "unknown_payer", "duplicate_split_member"]
    );
}

#[test]
fn huge_history_saturates_instead_of_failing() {
    let total = "50000000000000000000000000000";
    let strategy = SplitStrategy::Custom {
        members: vec!["B".into()],
        amounts: [("B".to_string(), "5e28".to_string())].into_iter().collect(),
    };
    let expense = |id: &str| Expense {
        id: id.into(),
        group_id: "g1".into(),
        description: "deposit".into(),
        amount: total.parse().unwrap(),
        paid_by: "A".into(),
        date: Utc::now(),
        splits: build_splits(total, &strategy).unwrap(),
    };
    let g = group(&["A", "B"], vec![expense("e1"), expense("e2")]);

    assert_eq!(
        amounts(&calculate_balances(&g)),
        vec![("A", Decimal::MAX), ("B", Decimal::MIN)]
    );
}

#[test]
fn audit_flags_expense_without_splits() {
    let mut e = equal_expense("e1", "10", "A", &["A", "B"]);
    e.splits.clear();
    let g = group(&["A", "B"], vec![e]);

    assert_eq!(
        amounts(&calculate_balances(&g)),
        vec![("A", dec!(10)), ("B", dec!(0))]
    );
    let issues = audit_group(&g);
    assert_eq!(
        issues,
        vec![Issue::EmptySplits {
            expense_id: "e1".into(),
        }]
    );
    assert_eq!(issues[0].detail(), "expense e1 has no splits");
}
