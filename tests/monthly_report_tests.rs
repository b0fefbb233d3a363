// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{dec, BrokenStore, MemoryStore};
use ledgerlens::error::ReportError;
use ledgerlens::models::{OwnerScope, TransactionKind};
use ledgerlens::report::ReportBuilder;

const ME: OwnerScope = OwnerScope::Scoped(1);

#[test]
fn first_month_with_data_has_no_infinite_growth() {
    let store = MemoryStore::new()
        .income("2025-03-01", "Gaji", "15000000")
        .expense("2025-03-10", "Sewa", "2000000");
    let report = ReportBuilder::new(&store).monthly(ME, 2025, 3).unwrap();

    assert_eq!(report.totals.total_income, dec("15000000"));
    assert_eq!(report.totals.total_expense, dec("2000000"));
    assert_eq!(report.totals.balance, dec("13000000"));
    assert_eq!(report.changes.income_change_pct, 0.0);
    assert_eq!(report.changes.expense_change_pct, 0.0);
    assert_eq!(report.changes.balance_change_pct, 0.0);
    assert!(report.changes.income_change_pct.is_finite());

    // no previous month, so neither comparison paragraph is written
    assert!(!report.analysis.contains("Income:"));
    assert!(!report.analysis.contains("Spending:"));
    assert!(report.analysis.contains("Status: this month closed with a surplus of Rp 13,000,000.00"));
    assert!(report.analysis.contains("Expense ratio: excellent! Only 13.3%"));

    assert_eq!(report.recommendations.len(), 3);
    assert!(report.recommendations[0].starts_with("Category \"Sewa\" takes 100.0%"));
    assert!(report.recommendations[1].starts_with("Excellent savings rate!"));
    assert!(report.recommendations[2].starts_with("Strong surplus!"));
}

#[test]
fn categories_are_split_by_kind() {
    let store = MemoryStore::new()
        .income("2025-05-01", "Gaji", "800")
        .income("2025-05-15", "Freelance", "200")
        .expense("2025-05-02", "Makan", "100")
        .expense("2025-05-03", "Makan", "50")
        .expense("2025-05-04", "Transport", "350");
    let report = ReportBuilder::new(&store).monthly(ME, 2025, 5).unwrap();

    let income: Vec<_> = report
        .income_by_category
        .iter()
        .map(|c| (c.category.as_str(), c.percentage))
        .collect();
    assert_eq!(income, [("Gaji", 80.0), ("Freelance", 20.0)]);

    let expense: Vec<_> = report
        .expense_by_category
        .iter()
        .map(|c| (c.category.as_str(), c.amount, c.count))
        .collect();
    assert_eq!(
        expense,
        [("Transport", dec("350"), 1), ("Makan", dec("150"), 2)]
    );
}

#[test]
fn daily_series_covers_every_day_of_the_month() {
    let store = MemoryStore::new();
    let builder = ReportBuilder::new(&store);
    for (year, month, days) in [(2025, 1, 31), (2025, 2, 28), (2024, 2, 29), (2025, 4, 30)] {
        let report = builder.monthly(ME, year, month).unwrap();
        assert_eq!(report.daily_series.len(), days, "{}-{:02}", year, month);
        assert_eq!(report.daily_series.first().unwrap().day, 1);
        assert_eq!(report.daily_series.last().unwrap().day, days as u32);
    }
}

#[test]
fn daily_series_sums_same_day_entries() {
    let store = MemoryStore::new()
        .income("2025-06-30", "Gaji", "1000")
        .expense("2025-06-30", "Makan", "40")
        .expense("2025-06-30", "Makan", "60")
        .expense("2025-06-02", "Kopi", "5");
    let report = ReportBuilder::new(&store).monthly(ME, 2025, 6).unwrap();

    let last = &report.daily_series[29];
    assert_eq!((last.day, last.income, last.expense), (30, dec("1000"), dec("100")));
    assert_eq!(report.daily_series[1].expense, dec("5"));
    assert!(report.daily_series[0].income.is_zero());
}

#[test]
fn invalid_month_is_rejected_before_any_read() {
    let store = MemoryStore::new();
    let builder = ReportBuilder::new(&store);
    for month in [0, 13] {
        let err = builder.monthly(ME, 2025, month).unwrap_err();
        assert!(matches!(err, ReportError::InvalidArgument(_)));
    }
    assert_eq!(store.queries.get(), 0);
}

#[test]
fn empty_month_falls_back_to_general_advice() {
    let store = MemoryStore::new();
    let report = ReportBuilder::new(&store).monthly(ME, 2025, 8).unwrap();

    assert!(report.totals.balance.is_zero());
    assert!(report.income_by_category.is_empty());
    assert!(report.expense_by_category.is_empty());
    assert!(report.analysis.contains("break-even"));
    assert!(report.analysis.contains("no income or spending was recorded"));
    assert_eq!(report.recommendations.len(), 2);
    assert!(report.recommendations[1].contains("emergency fund"));
}

#[test]
fn deficit_month_asks_to_cut_and_defer() {
    let store = MemoryStore::new()
        .income("2025-02-01", "Gaji", "1000")
        .expense("2025-02-01", "Sewa", "1000")
        .income("2025-03-01", "Gaji", "1000000")
        .expense("2025-03-05", "Sewa", "900000")
        .expense("2025-03-20", "Liburan", "600000");
    let report = ReportBuilder::new(&store).monthly(ME, 2025, 3).unwrap();

    assert_eq!(report.totals.balance, dec("-500000"));
    assert!(report.analysis.contains("deficit of Rp 500,000.00"));
    assert!(report.analysis.contains("Spending exceeded income"));
    assert!(report.analysis.contains("critical! Spending reached 150.0%"));
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.starts_with("Cut non-essential spending")));
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.starts_with("Defer large purchases")));
    assert!(!report
        .recommendations
        .iter()
        .any(|r| r.contains("savings rate")));
}

#[test]
fn january_compares_against_previous_december() {
    let store = MemoryStore::new()
        .income("2024-12-31", "Gaji", "1000")
        .income("2025-01-01", "Gaji", "1200");
    let report = ReportBuilder::new(&store).monthly(ME, 2025, 1).unwrap();
    assert_eq!(report.previous.total_income, dec("1000"));
    assert_eq!(report.changes.income_change_pct, 20.0);
    assert!(report.analysis.contains("Income: up 20.0%"));
}

#[test]
fn scope_limits_what_is_aggregated() {
    let mut store = MemoryStore::new().income("2025-04-01", "Gaji", "100");
    store.push(2, "2025-04-02", TransactionKind::Income, "Gaji", "900");

    let builder = ReportBuilder::new(&store);
    let mine = builder.monthly(ME, 2025, 4).unwrap();
    let all = builder.monthly(OwnerScope::Unscoped, 2025, 4).unwrap();
    assert_eq!(mine.totals.total_income, dec("100"));
    assert_eq!(all.totals.total_income, dec("1000"));
    assert_eq!(all.income_by_category[0].count, 2);
}

#[test]
fn currency_symbol_flows_into_narrative() {
    let store = MemoryStore::new().income("2025-04-01", "Salary", "2500");
    let report = ReportBuilder::new(&store)
        .with_currency("$")
        .monthly(ME, 2025, 4)
        .unwrap();
    assert!(report.analysis.contains("surplus of $ 2,500.00"));
}

#[test]
fn storage_failure_is_reported() {
    let err = ReportBuilder::new(BrokenStore).monthly(ME, 2025, 3).unwrap_err();
    assert!(matches!(err, ReportError::StorageUnavailable(_)));
}

#[test]
fn totals_near_the_decimal_limit_stay_finite() {
    let store = MemoryStore::new()
        .income("2025-03-01", "Gaji", "2000000000000000000000000000")
        .expense("2025-03-02", "Sewa", "1000000000000000000000000000")
        .income("2025-02-01", "Gaji", "1000000000000000000000000000");
    let report = ReportBuilder::new(&store).monthly(ME, 2025, 3).unwrap();

    assert_eq!(report.totals.balance, dec("1000000000000000000000000000"));
    assert_eq!(report.income_by_category[0].percentage, 100.0);
    assert_eq!(report.expense_by_category[0].percentage, 100.0);
    assert_eq!(report.totals.savings_rate(), 50.0);
    assert_eq!(report.changes.income_change_pct, 100.0);
    assert!(report.analysis.contains("Expense ratio"));

    let yearly = ReportBuilder::new(&store).yearly(ME, 2025).unwrap();
    assert!(yearly.recommendations.iter().any(|r| r.starts_with("- Income target:")));
}

#[test]
fn overflowing_totals_are_rejected() {
    let store = MemoryStore::new()
        .income("2025-03-01", "Gaji", "30000000000000000000000000000")
        .income("2025-03-02", "Gaji", "30000000000000000000000000000")
        .income("2025-03-03", "Gaji", "30000000000000000000000000000");
    let err = ReportBuilder::new(&store).monthly(ME, 2025, 3).unwrap_err();
    assert!(matches!(err, ReportError::InvalidArgument(ref msg) if msg.contains("overflows")));

    let err = ReportBuilder::new(&store).yearly(ME, 2025).unwrap_err();
    assert!(matches!(err, ReportError::InvalidArgument(_)));
}
