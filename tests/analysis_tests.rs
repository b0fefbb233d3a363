// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{date, dec};
use ledgerlens::models::{CategorySummary, MonthlyPoint, PeriodTotals, Transaction, TransactionKind};
use ledgerlens::report::analysis::{
    monthly_analysis, monthly_recommendations, yearly_analysis, yearly_recommendations,
    AnalysisInput,
};
use ledgerlens::report::summarize_by_category;
use ledgerlens::utils::month_name;

fn totals(income: &str, expense: &str) -> PeriodTotals {
    PeriodTotals::new(dec(income), dec(expense))
}

fn input<'a>(
    current: PeriodTotals,
    previous: PeriodTotals,
    expenses: &'a [CategorySummary],
) -> AnalysisInput<'a> {
    AnalysisInput {
        current,
        previous,
        income_by_category: &[],
        expense_by_category: expenses,
    }
}

fn analysis(current: PeriodTotals, previous: PeriodTotals) -> String {
    monthly_analysis(&input(current, previous, &[]), 2025, 4, "Rp")
}

fn recs(current: PeriodTotals, previous: PeriodTotals) -> Vec<String> {
    monthly_recommendations(&input(current, previous, &[]))
}

#[test]
fn thirty_percent_savings_is_praised_not_nudged() {
    let r = recs(totals("1000", "700"), PeriodTotals::default());
    assert_eq!(r.len(), 1);
    assert!(r[0].starts_with("Excellent savings rate!"));
    // 300 is not strictly above 30% of 1000
    assert!(!r.iter().any(|s| s.starts_with("Strong surplus!")));
}

#[test]
fn savings_between_twenty_and_thirty_suggests_investing() {
    let r = recs(totals("1000", "750"), PeriodTotals::default());
    assert_eq!(
        r,
        [
            "Tighten spending control toward an ideal 50-70% expense ratio with a per-category budget.",
            "Savings are in good shape. Consider moving part of the surplus into long-term investments.",
        ]
    );
}

#[test]
fn savings_between_ten_and_twenty_stays_quiet() {
    // ratio 85% still fires, the savings band itself has no advice
    let r = recs(totals("1000", "850"), PeriodTotals::default());
    assert_eq!(r.len(), 1);
    assert!(r[0].starts_with("Tighten spending control"));
}

#[test]
fn low_savings_rate_is_nudged() {
    let r = recs(totals("1000", "950"), PeriodTotals::default());
    assert!(r[0].starts_with("Spending is too high."));
    assert!(r[1].starts_with("Raise savings to at least 20%"));
}

#[test]
fn income_change_boundaries() {
    let prev = totals("100", "0");
    let r = recs(totals("90", "0"), prev);
    assert!(r[0].starts_with("Income dipped slightly."));
    let r = recs(totals("89", "0"), prev);
    assert!(r[0].starts_with("Focus on growing your income"));

    assert!(analysis(totals("105", "0"), prev).contains("Income: stable, changing 5.0%"));
    assert!(analysis(totals("106", "0"), prev).contains("Income: up 6.0%"));
    assert!(analysis(totals("95", "0"), prev).contains("Income: stable, changing -5.0%"));
    assert!(analysis(totals("94", "0"), prev).contains("Income: down 6.0%"));
}

#[test]
fn expense_change_boundaries() {
    let prev = totals("1000", "100");
    assert!(analysis(totals("1000", "110"), prev).contains("Spending: consistent, changing 10.0%"));
    assert!(analysis(totals("1000", "111"), prev).contains("Spending: jumped 11.0%"));
    assert!(analysis(totals("1000", "89"), prev).contains("Spending: cut by 11.0%"));

    let r = recs(totals("1000", "115"), prev);
    assert!(!r.iter().any(|s| s.starts_with("Spending rose sharply.")));
    let r = recs(totals("1000", "116"), prev);
    assert!(r.iter().any(|s| s.starts_with("Spending rose sharply.")));
}

#[test]
fn expense_ratio_bands() {
    let none = PeriodTotals::default();
    assert!(analysis(totals("100", "49"), none).contains("excellent! Only 49.0%"));
    assert!(analysis(totals("100", "50"), none).contains("good, 50.0%"));
    assert!(analysis(totals("100", "80"), none).contains("caution! 80.0%"));
    assert!(analysis(totals("100", "100"), none).contains("critical! Spending reached 100.0%"));
    assert!(analysis(totals("0", "25"), none)
        .contains("critical! Rp 25.00 was spent with no income recorded"));
}

#[test]
fn rules_accumulate_in_order() {
    let txs: Vec<Transaction> = [("Sewa", "900"), ("Makan", "300")]
        .iter()
        .enumerate()
        .map(|(i, (category, amount))| Transaction {
            id: i as i64 + 1,
            date: date("2025-04-01"),
            category: category.to_string(),
            amount: dec(amount),
            kind: TransactionKind::Expense,
            description: None,
            owner_id: 1,
        })
        .collect();
    let expenses = summarize_by_category(&txs, dec("1200"));
    let r = monthly_recommendations(&input(
        totals("1000", "1200"),
        totals("2000", "500"),
        &expenses,
    ));
    assert_eq!(r.len(), 5);
    assert!(r[0].starts_with("Focus on growing your income"));
    assert!(r[1].starts_with("Cut non-essential spending"));
    assert!(r[2].starts_with("Defer large purchases"));
    assert!(r[3].starts_with("Spending rose sharply."));
    assert_eq!(
        r[4],
        "Category \"Sewa\" takes 75.0% of spending. Look for ways to optimise or reduce it."
    );
}

#[test]
fn top_three_categories_are_listed() {
    let txs: Vec<Transaction> = ["A", "B", "C", "D"]
        .iter()
        .zip([400, 300, 200, 100])
        .map(|(category, amount)| Transaction {
            id: amount,
            date: date("2025-04-01"),
            category: category.to_string(),
            amount: amount.into(),
            kind: TransactionKind::Expense,
            description: None,
            owner_id: 1,
        })
        .collect();
    let expenses = summarize_by_category(&txs, dec("1000"));
    let text = monthly_analysis(
        &input(totals("2000", "1000"), PeriodTotals::default(), &expenses),
        2025,
        4,
        "Rp",
    );
    assert!(text.contains("Largest expense categories:\n1. A: Rp 400.00 (40.0%)\n2. B"));
    assert!(text.contains("3. C: Rp 200.00 (20.0%)"));
    assert!(!text.contains("4. D"));
    assert!(text.starts_with("Financial analysis for April 2025"));
}

/// Twelve months: the first six at `(inc_a, exp_a)`, the rest at `(inc_b, exp_b)`.
fn halves(inc_a: &str, exp_a: &str, inc_b: &str, exp_b: &str) -> Vec<MonthlyPoint> {
    (1..=12)
        .map(|month| {
            let (income, expense) = if month <= 6 {
                (dec(inc_a), dec(exp_a))
            } else {
                (dec(inc_b), dec(exp_b))
            };
            MonthlyPoint {
                month,
                month_name: month_name(month),
                income,
                expense,
                balance: income - expense,
            }
        })
        .collect()
}

fn year_text(current: PeriodTotals, monthly: &[MonthlyPoint]) -> String {
    yearly_analysis(&input(current, PeriodTotals::default(), &[]), monthly, 2025, "Rp")
}

fn year_recs(current: PeriodTotals, previous: PeriodTotals) -> Vec<String> {
    yearly_recommendations(&input(current, previous, &[]), "Rp")
}

#[test]
fn half_year_income_bands() {
    let flat = ("100", "0");
    for (second, expected) in [
        ("106", "Second-half income was 6.0% higher than the first half. Positive trend!"),
        ("105", "Income was fairly stable across the year."),
        ("95", "Income was fairly stable across the year."),
        ("94", "Second-half income was 6.0% lower than the first half."),
    ] {
        let text = year_text(totals("1200", "0"), &halves(flat.0, flat.1, second, "0"));
        assert!(text.contains(expected), "{}: {}", second, text);
    }
}

#[test]
fn half_year_spending_bands() {
    for (second, expected) in [
        ("111", "Second-half spending rose 11.0% over the first half."),
        ("110", "Spending was consistent across the year."),
        ("90", "Spending was consistent across the year."),
        ("89", "Second-half spending was cut 11.0% from the first half."),
    ] {
        let text = year_text(totals("12000", "1200"), &halves("1000", "100", "1000", second));
        assert!(text.contains(expected), "{}: {}", second, text);
    }
}

#[test]
fn half_year_section_needs_six_months() {
    let monthly = halves("100", "50", "100", "50");
    let text = year_text(totals("500", "250"), &monthly[..5]);
    assert!(!text.contains("HALF-YEAR TREND"));
    let text = year_text(totals("600", "300"), &monthly[..6]);
    assert!(text.contains("=== HALF-YEAR TREND ==="));
}

#[test]
fn health_score_band_edges() {
    for (expense, expected) in [
        ("700", "EXCELLENT (30.0%) - outstanding money management!"),
        ("701", "GOOD (29.9%) - finances are healthy."),
        ("800", "GOOD (20.0%) - finances are healthy."),
        ("801", "FAIR (19.9%) - there is room for improvement."),
        ("900", "FAIR (10.0%) - there is room for improvement."),
        ("901", "NEEDS IMPROVEMENT (9.9%) - tighten your money management."),
        ("999", "NEEDS IMPROVEMENT (0.1%) - tighten your money management."),
        ("1000", "CRITICAL - spending exceeds income, act now."),
    ] {
        let text = year_text(totals("1000", expense), &[]);
        assert!(text.contains(expected), "{}: {}", expense, text);
    }
}

#[test]
fn falling_income_suggests_diversifying() {
    let r = year_recs(totals("999", "500"), totals("1000", "500"));
    assert_eq!(r[0], "GROWTH STRATEGY:");
    assert_eq!(
        r[1],
        "- Diversify income to reduce risk; aim for 2-3 different income streams."
    );
    assert_eq!(r[2], "- Invest in skills that raise your market value.");
}

#[test]
fn growth_momentum_starts_above_twenty_percent() {
    let r = year_recs(totals("1200", "600"), totals("1000", "500"));
    assert_eq!(r[1], "- Target 15-25% income growth next year with a measurable plan.");
    let r = year_recs(totals("1210", "600"), totals("1000", "500"));
    assert!(r[1].starts_with("- Keep the income growth momentum;"), "{:?}", r);
    assert!(r[2].starts_with("- Document the strategies"));
}

#[test]
fn savings_items_follow_the_rate() {
    let savings_items = |expense: &str| -> Vec<String> {
        let r = year_recs(totals("1000", expense), PeriodTotals::default());
        let start = r.iter().position(|s| s == "INVESTMENT & SAVINGS:").unwrap();
        let end = r.iter().position(|s| s == "FINANCIAL PLANNING:").unwrap();
        r[start + 1..end].to_vec()
    };

    let rich = savings_items("800");
    assert_eq!(rich.len(), 2);
    assert_eq!(
        rich[0],
        "- Allocate the surplus to a balanced portfolio: 40% deposits/bonds, 40% equities/funds, 20% high risk."
    );
    assert!(savings_items("801").is_empty());
    assert!(savings_items("850").is_empty());
    let poor = savings_items("851");
    assert!(poor[0].starts_with("- TOP PRIORITY:"), "{:?}", poor);
    assert!(poor[1].starts_with("- Build an emergency fund of at least 6 months"));
}
