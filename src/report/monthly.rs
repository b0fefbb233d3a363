// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::analysis::{monthly_analysis, monthly_recommendations, AnalysisInput};
use super::{month_range, summarize_by_category, ReportBuilder};
use crate::error::ReportError;
use crate::models::{
    ChangeMetrics, DailyPoint, MonthlyReport, OwnerScope, PeriodTotals, Transaction,
    TransactionKind,
};
use crate::store::TransactionStore;
use chrono::Datelike;
use rust_decimal::Decimal;
use tracing::info;

/// The month before `(year, month)`, rolling January back to December.
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

impl<S: TransactionStore> ReportBuilder<S> {
    pub fn monthly(
        &self,
        scope: OwnerScope,
        year: i32,
        month: u32,
    ) -> Result<MonthlyReport, ReportError> {
        let range = month_range(year, month)?;
        let (prev_year, prev_month) = previous_month(year, month);
        let prev_range = month_range(prev_year, prev_month)?;

        let transactions = self.store.query(scope, range)?;
        let previous_transactions = self.store.query(scope, prev_range)?;

        let totals = PeriodTotals::from_transactions(&transactions)?;
        let previous = PeriodTotals::from_transactions(&previous_transactions)?;
        let changes = ChangeMetrics::between(&totals, &previous);

        let income_by_category = summarize_by_category(
            transactions.iter().filter(|t| t.kind == TransactionKind::Income),
            totals.total_income,
        );
        let expense_by_category = summarize_by_category(
            transactions.iter().filter(|t| t.kind == TransactionKind::Expense),
            totals.total_expense,
        );

        let days = range.end.day();
        let daily_series = daily_series(&transactions, days);

        let input = AnalysisInput {
            current: totals,
            previous,
            income_by_category: &income_by_category,
            expense_by_category: &expense_by_category,
        };
        let analysis = monthly_analysis(&input, year, month, self.currency());
        let recommendations = monthly_recommendations(&input);

        info!(
            year,
            month,
            ?scope,
            transactions = transactions.len(),
            "built monthly report"
        );

        Ok(MonthlyReport {
            year,
            month,
            totals,
            previous,
            changes,
            income_by_category,
            expense_by_category,
            analysis,
            recommendations,
            daily_series,
        })
    }
}

/// One point per calendar day `1..=days`; days without activity are zero.
///
/// Days are read straight from the stored calendar date.
pub fn daily_series(transactions: &[Transaction], days: u32) -> Vec<DailyPoint> {
    let mut series: Vec<DailyPoint> = (1..=days)
        .map(|day| DailyPoint {
            day,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
        })
        .collect();
    for t in transactions {
        let Some(point) = series.get_mut(t.date.day() as usize - 1) else {
            continue;
        };
        match t.kind {
            TransactionKind::Income => point.income = point.income.saturating_add(t.amount),
            TransactionKind::Expense => point.expense = point.expense.saturating_add(t.amount),
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn january_rolls_back_a_year() {
        assert_eq!(previous_month(2025, 1), (2024, 12));
        assert_eq!(previous_month(2025, 7), (2025, 6));
    }
}
