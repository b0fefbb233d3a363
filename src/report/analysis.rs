// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Rule-based narrative for reports.
//!
//! Every rule is evaluated in a fixed order and all matching rules contribute
//! text; nothing here is first-match-wins unless written as `else if`. The
//! functions are pure and total: zero totals never divide.

use super::totals::{monthly_average, pct_change};
use crate::models::{CategorySummary, MonthlyPoint, PeriodTotals};
use crate::utils::{fmt_money, month_name};
use rust_decimal::Decimal;
use std::fmt::Write as _;

/// Summary bundle the narrative is derived from.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInput<'a> {
    pub current: PeriodTotals,
    pub previous: PeriodTotals,
    pub income_by_category: &'a [CategorySummary],
    pub expense_by_category: &'a [CategorySummary],
}

impl AnalysisInput<'_> {
    fn income_change(&self) -> f64 {
        pct_change(self.current.total_income, self.previous.total_income)
    }

    fn expense_change(&self) -> f64 {
        pct_change(self.current.total_expense, self.previous.total_expense)
    }
}

pub fn monthly_analysis(input: &AnalysisInput<'_>, year: i32, month: u32, ccy: &str) -> String {
    let cur = &input.current;
    let mut out = String::new();

    let _ = write!(out, "Financial analysis for {} {}\n\n", month_name(month), year);

    let status = if cur.balance > Decimal::ZERO {
        "surplus"
    } else if cur.balance < Decimal::ZERO {
        "deficit"
    } else {
        "break-even"
    };
    let _ = write!(
        out,
        "Status: this month closed with a {} of {}. ",
        status,
        fmt_money(&cur.balance.abs(), ccy)
    );
    if cur.balance > Decimal::ZERO {
        let _ = write!(
            out,
            "Your savings rate reached {:.1}% of total income.\n\n",
            cur.savings_rate()
        );
    } else if cur.balance < Decimal::ZERO {
        out.push_str("Spending exceeded income and needs close attention.\n\n");
    } else {
        out.push_str("Income and spending are in balance.\n\n");
    }

    if input.previous.total_income > Decimal::ZERO {
        let change = input.income_change();
        if change > 5.0 {
            let _ = write!(
                out,
                "Income: up {:.1}% on the previous month, a positive trend in earnings.\n\n",
                change
            );
        } else if change < -5.0 {
            let _ = write!(
                out,
                "Income: down {:.1}% on the previous month. Review your income sources.\n\n",
                change.abs()
            );
        } else {
            let _ = write!(
                out,
                "Income: stable, changing {:.1}% from the previous month.\n\n",
                change
            );
        }
    }

    if input.previous.total_expense > Decimal::ZERO {
        let change = input.expense_change();
        if change > 10.0 {
            let _ = write!(
                out,
                "Spending: jumped {:.1}% on the previous month. Review your expense categories.\n\n",
                change
            );
        } else if change < -10.0 {
            let _ = write!(
                out,
                "Spending: cut by {:.1}% from the previous month. Well managed!\n\n",
                change.abs()
            );
        } else {
            let _ = write!(
                out,
                "Spending: consistent, changing {:.1}% from the previous month.\n\n",
                change
            );
        }
    }

    if !input.expense_by_category.is_empty() {
        out.push_str("Largest expense categories:\n");
        push_ranked(&mut out, input.expense_by_category, 3, ccy);
        out.push('\n');
    }

    match cur.expense_ratio() {
        Some(ratio) if ratio < 50.0 => {
            let _ = writeln!(
                out,
                "Expense ratio: excellent! Only {:.1}% of income went to spending.",
                ratio
            );
        }
        Some(ratio) if ratio < 80.0 => {
            let _ = writeln!(
                out,
                "Expense ratio: good, {:.1}% of income went to spending.",
                ratio
            );
        }
        Some(ratio) if ratio < 100.0 => {
            let _ = writeln!(
                out,
                "Expense ratio: caution! {:.1}% of income was spent.",
                ratio
            );
        }
        Some(ratio) => {
            let _ = writeln!(
                out,
                "Expense ratio: critical! Spending reached {:.1}% of income.",
                ratio
            );
        }
        None if cur.total_expense > Decimal::ZERO => {
            let _ = writeln!(
                out,
                "Expense ratio: critical! {} was spent with no income recorded.",
                fmt_money(&cur.total_expense, ccy)
            );
        }
        None => out.push_str("Expense ratio: no income or spending was recorded.\n"),
    }

    out
}

pub fn monthly_recommendations(input: &AnalysisInput<'_>) -> Vec<String> {
    let cur = &input.current;
    let mut recs: Vec<String> = Vec::new();
    let ratio = cur.expense_ratio().unwrap_or(0.0);
    let income_change = input.income_change();
    let expense_change = input.expense_change();

    if income_change < -10.0 {
        recs.push("Focus on growing your income: look for extra streams such as freelance work or passive income.".into());
    } else if income_change < 0.0 {
        recs.push("Income dipped slightly. Evaluate your business or career strategy to hold your income level.".into());
    }

    if cur.balance < Decimal::ZERO {
        recs.push("Cut non-essential spending now and set a strict budget for next month. Prioritise basic needs.".into());
        recs.push("Defer large purchases and focus on stabilising your finances first.".into());
    } else if ratio > 90.0 {
        recs.push("Spending is too high. Find discretionary categories you can cut by at least 20% to raise savings.".into());
    } else if ratio > 70.0 {
        recs.push("Tighten spending control toward an ideal 50-70% expense ratio with a per-category budget.".into());
    }

    if expense_change > 15.0 {
        recs.push("Spending rose sharply. Audit every expense category and drop what you don't need.".into());
    }

    if let Some(top) = input.expense_by_category.first() {
        if top.percentage > 40.0 {
            recs.push(format!(
                "Category \"{}\" takes {:.1}% of spending. Look for ways to optimise or reduce it.",
                top.category, top.percentage
            ));
        }
    }

    if cur.balance > Decimal::ZERO {
        let savings_rate = cur.savings_rate();
        if savings_rate < 10.0 {
            recs.push("Raise savings to at least 20% of income by automating a transfer whenever income arrives.".into());
        } else if (20.0..30.0).contains(&savings_rate) {
            recs.push("Savings are in good shape. Consider moving part of the surplus into long-term investments.".into());
        } else if savings_rate >= 30.0 {
            recs.push("Excellent savings rate! Diversify into investment instruments for long-term growth.".into());
        }
    }

    if cur.balance > cur.total_income.saturating_mul(Decimal::new(3, 1)) {
        recs.push("Strong surplus! A good time to start or grow your investment portfolio.".into());
    }

    if recs.is_empty() {
        recs.push("Keep up your healthy financial habits and review your budget regularly.".into());
        recs.push("Build an emergency fund covering 3-6 months of expenses.".into());
    }

    recs
}

pub fn yearly_analysis(
    input: &AnalysisInput<'_>,
    monthly: &[MonthlyPoint],
    year: i32,
    ccy: &str,
) -> String {
    let cur = &input.current;
    let prev = &input.previous;
    let mut out = String::new();

    let _ = write!(out, "Annual financial analysis {}\n\n", year);

    out.push_str("=== ANNUAL PERFORMANCE SUMMARY ===\n\n");
    let _ = writeln!(out, "Total income: {}", fmt_money(&cur.total_income, ccy));
    let _ = writeln!(out, "Total spending: {}", fmt_money(&cur.total_expense, ccy));
    let _ = writeln!(out, "Surplus/deficit: {}", fmt_money(&cur.balance, ccy));
    let _ = write!(
        out,
        "Monthly average: {} (income) / {} (spending)\n\n",
        fmt_money(&monthly_average(cur.total_income), ccy),
        fmt_money(&monthly_average(cur.total_expense), ccy)
    );

    if prev.total_income > Decimal::ZERO {
        out.push_str("=== YEAR OVER YEAR ===\n\n");
        let income_change = input.income_change();
        if income_change > 0.0 {
            let _ = writeln!(
                out,
                "Income up {:.1}% on the previous year (+{})",
                income_change,
                fmt_money(&(cur.total_income - prev.total_income), ccy)
            );
        } else if income_change < 0.0 {
            let _ = writeln!(
                out,
                "Income down {:.1}% on the previous year (-{})",
                income_change.abs(),
                fmt_money(&(prev.total_income - cur.total_income), ccy)
            );
        }
        let expense_change = input.expense_change();
        if expense_change > 0.0 {
            let _ = writeln!(
                out,
                "Spending up {:.1}% on the previous year (+{})",
                expense_change,
                fmt_money(&(cur.total_expense - prev.total_expense), ccy)
            );
        } else if expense_change < 0.0 {
            let _ = writeln!(
                out,
                "Spending down {:.1}% on the previous year (-{})",
                expense_change.abs(),
                fmt_money(&(prev.total_expense - cur.total_expense), ccy)
            );
        }
        out.push('\n');
    }

    if monthly.len() >= 6 {
        let (first, second) = monthly.split_at(6);
        let sum = |points: &[MonthlyPoint], f: fn(&MonthlyPoint) -> Decimal| -> Decimal {
            points.iter().map(f).sum()
        };
        let income_growth = pct_change(sum(second, |m| m.income), sum(first, |m| m.income));
        let expense_growth = pct_change(sum(second, |m| m.expense), sum(first, |m| m.expense));

        out.push_str("=== HALF-YEAR TREND ===\n\n");
        if income_growth > 5.0 {
            let _ = writeln!(
                out,
                "Second-half income was {:.1}% higher than the first half. Positive trend!",
                income_growth
            );
        } else if income_growth < -5.0 {
            let _ = writeln!(
                out,
                "Second-half income was {:.1}% lower than the first half.",
                income_growth.abs()
            );
        } else {
            out.push_str("Income was fairly stable across the year.\n");
        }
        if expense_growth > 10.0 {
            let _ = writeln!(
                out,
                "Second-half spending rose {:.1}% over the first half.",
                expense_growth
            );
        } else if expense_growth < -10.0 {
            let _ = writeln!(
                out,
                "Second-half spending was cut {:.1}% from the first half.",
                expense_growth.abs()
            );
        } else {
            out.push_str("Spending was consistent across the year.\n");
        }
        out.push('\n');
    }

    if !input.income_by_category.is_empty() {
        out.push_str("=== MAIN INCOME SOURCES ===\n\n");
        push_ranked(&mut out, input.income_by_category, 5, ccy);
        out.push('\n');
    }

    if !input.expense_by_category.is_empty() {
        out.push_str("=== LARGEST EXPENSE CATEGORIES ===\n\n");
        push_ranked(&mut out, input.expense_by_category, 5, ccy);
        out.push('\n');
    }

    let savings_rate = cur.savings_rate();
    out.push_str("=== FINANCIAL HEALTH SCORE ===\n\n");
    if savings_rate >= 30.0 {
        let _ = writeln!(out, "EXCELLENT ({:.1}%) - outstanding money management!", savings_rate);
    } else if savings_rate >= 20.0 {
        let _ = writeln!(out, "GOOD ({:.1}%) - finances are healthy.", savings_rate);
    } else if savings_rate >= 10.0 {
        let _ = writeln!(out, "FAIR ({:.1}%) - there is room for improvement.", savings_rate);
    } else if savings_rate > 0.0 {
        let _ = writeln!(
            out,
            "NEEDS IMPROVEMENT ({:.1}%) - tighten your money management.",
            savings_rate
        );
    } else {
        out.push_str("CRITICAL - spending exceeds income, act now.\n");
    }

    out
}

pub const YEARLY_GROUPS: [&str; 5] = [
    "GROWTH STRATEGY:",
    "EXPENSE OPTIMIZATION:",
    "INVESTMENT & SAVINGS:",
    "FINANCIAL PLANNING:",
    "NEXT-YEAR TARGETS:",
];

pub fn yearly_recommendations(input: &AnalysisInput<'_>, ccy: &str) -> Vec<String> {
    let cur = &input.current;
    let savings_rate = cur.savings_rate();
    let income_change = input.income_change();
    let mut recs: Vec<String> = Vec::new();

    recs.push(YEARLY_GROUPS[0].into());
    if income_change < 0.0 {
        recs.push("- Diversify income to reduce risk; aim for 2-3 different income streams.".into());
        recs.push("- Invest in skills that raise your market value.".into());
    } else if income_change > 20.0 {
        recs.push("- Keep the income growth momentum; reinvest part of the gains to expand further.".into());
        recs.push("- Document the strategies that worked so you can repeat them next year.".into());
    } else {
        recs.push("- Target 15-25% income growth next year with a measurable plan.".into());
        recs.push("- Explore passive income for long-term stability.".into());
    }

    recs.push(YEARLY_GROUPS[1].into());
    if let Some(top) = input.expense_by_category.first() {
        recs.push(format!(
            "- Review category \"{}\" closely; it makes up {:.1}% of annual spending.",
            top.category, top.percentage
        ));
    }
    recs.push("- Run an annual audit to cancel unused subscriptions and recurring charges.".into());
    recs.push("- Apply the 50/30/20 rule: 50% needs, 30% wants, 20% savings and investment.".into());

    recs.push(YEARLY_GROUPS[2].into());
    if savings_rate < 15.0 {
        recs.push("- TOP PRIORITY: raise your savings rate to at least 20% with automatic saving on payday.".into());
        recs.push("- Build an emergency fund of at least 6 months of expenses before investing aggressively.".into());
    } else if savings_rate >= 20.0 {
        recs.push("- Allocate the surplus to a balanced portfolio: 40% deposits/bonds, 40% equities/funds, 20% high risk.".into());
        recs.push("- Consider property or other instruments that generate passive income.".into());
    }

    recs.push(YEARLY_GROUPS[3].into());
    recs.push("- Consult a financial planner on tax optimisation and wealth building.".into());
    recs.push("- Draft a 5-year financial plan with specific, measurable, realistic targets.".into());
    recs.push("- Review and update your insurance (health, life) to match your current situation.".into());

    let target_income = cur.total_income.saturating_mul(Decimal::new(115, 2));
    let target_savings = target_income.saturating_mul(Decimal::new(25, 2));
    recs.push(YEARLY_GROUPS[4].into());
    recs.push(format!("- Income target: {} (15% growth)", fmt_money(&target_income, ccy)));
    recs.push(format!("- Savings target: {} (25% of income)", fmt_money(&target_savings, ccy)));
    recs.push("- Check progress every quarter and adjust the strategy as you go.".into());

    recs
}

fn push_ranked(out: &mut String, categories: &[CategorySummary], n: usize, ccy: &str) {
    for (idx, cat) in categories.iter().take(n).enumerate() {
        let _ = writeln!(
            out,
            "{}. {}: {} ({:.1}%)",
            idx + 1,
            cat.category,
            fmt_money(&cat.amount, ccy),
            cat.percentage
        );
    }
}
