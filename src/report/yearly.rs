// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::analysis::{yearly_analysis, yearly_recommendations, AnalysisInput};
use super::totals::monthly_average;
use super::{summarize_by_category, year_range, ReportBuilder};
use crate::error::ReportError;
use crate::models::{
    ChangeMetrics, MonthlyPoint, OwnerScope, PeriodTotals, Transaction, TransactionKind,
    YearlyReport,
};
use crate::store::TransactionStore;
use crate::utils::month_name;
use chrono::Datelike;
use tracing::info;

impl<S: TransactionStore> ReportBuilder<S> {
    pub fn yearly(&self, scope: OwnerScope, year: i32) -> Result<YearlyReport, ReportError> {
        let range = year_range(year)?;
        let prev_range = year_range(year - 1)?;

        let transactions = self.store.query(scope, range)?;
        let previous_transactions = self.store.query(scope, prev_range)?;

        let totals = PeriodTotals::from_transactions(&transactions)?;
        let previous = PeriodTotals::from_transactions(&previous_transactions)?;
        let changes = ChangeMetrics::between(&totals, &previous);

        let monthly_series = monthly_series(&transactions)?;

        let income_by_category = summarize_by_category(
            transactions.iter().filter(|t| t.kind == TransactionKind::Income),
            totals.total_income,
        );
        let expense_by_category = summarize_by_category(
            transactions.iter().filter(|t| t.kind == TransactionKind::Expense),
            totals.total_expense,
        );

        let input = AnalysisInput {
            current: totals,
            previous,
            income_by_category: &income_by_category,
            expense_by_category: &expense_by_category,
        };
        let analysis = yearly_analysis(&input, &monthly_series, year, self.currency());
        let recommendations = yearly_recommendations(&input, self.currency());

        info!(
            year,
            ?scope,
            transactions = transactions.len(),
            "built yearly report"
        );

        Ok(YearlyReport {
            year,
            totals,
            previous,
            changes,
            average_monthly_income: monthly_average(totals.total_income),
            average_monthly_expense: monthly_average(totals.total_expense),
            income_by_category,
            expense_by_category,
            monthly_series,
            analysis,
            recommendations,
        })
    }
}

/// Exactly twelve points, January first, regardless of data sparsity.
pub fn monthly_series(transactions: &[Transaction]) -> Result<Vec<MonthlyPoint>, ReportError> {
    (1..=12)
        .map(|month| {
            let t = PeriodTotals::from_transactions(
                transactions.iter().filter(|t| t.date.month() == month),
            )?;
            Ok(MonthlyPoint {
                month,
                month_name: month_name(month),
                income: t.total_income,
                expense: t.total_expense,
                balance: t.balance,
            })
        })
        .collect()
}
