// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::ReportError;
use crate::models::{ChangeMetrics, PeriodTotals, Transaction, TransactionKind};
use rust_decimal::Decimal;

impl PeriodTotals {
    /// Sums by kind; fails when a total leaves the representable range.
    pub fn from_transactions<'a, I>(transactions: I) -> Result<Self, ReportError>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut total_income = Decimal::ZERO;
        let mut total_expense = Decimal::ZERO;
        for t in transactions {
            let total = match t.kind {
                TransactionKind::Income => &mut total_income,
                TransactionKind::Expense => &mut total_expense,
            };
            *total = total.checked_add(t.amount).ok_or_else(|| {
                ReportError::InvalidArgument(format!(
                    "{} total overflows at transaction {}",
                    t.kind.as_str().to_lowercase(),
                    t.id
                ))
            })?;
        }
        Ok(Self::new(total_income, total_expense))
    }

    pub fn new(total_income: Decimal, total_expense: Decimal) -> Self {
        Self {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        }
    }

    /// Balance as a share of income; 0 without income.
    pub fn savings_rate(&self) -> f64 {
        crate::utils::percent_of(self.balance, self.total_income)
    }

    /// Expense as a share of income; `None` without income.
    pub fn expense_ratio(&self) -> Option<f64> {
        if self.total_income > Decimal::ZERO {
            Some(crate::utils::percent_of(self.total_expense, self.total_income))
        } else {
            None
        }
    }
}

/// Percentage change from `prev` to `cur`, 0 when `prev` is not positive.
pub fn pct_change(cur: Decimal, prev: Decimal) -> f64 {
    if prev <= Decimal::ZERO {
        return 0.0;
    }
    match cur.checked_sub(prev) {
        Some(delta) => ratio_pct(delta, prev),
        None => 0.0,
    }
}

/// Like [`pct_change`] but measured against `|prev|`, so a balance that
/// flips sign still reports growth with a meaningful sign.
pub fn balance_change(cur: Decimal, prev: Decimal) -> f64 {
    if prev.is_zero() {
        return 0.0;
    }
    match cur.checked_sub(prev) {
        Some(delta) => ratio_pct(delta, prev.abs()),
        None => 0.0,
    }
}

/// Full-year monthly average: always divides by 12, whatever the number of
/// months that carried data. Unrounded; display rounds.
pub fn monthly_average(total: Decimal) -> Decimal {
    total / Decimal::from(12)
}

fn ratio_pct(delta: Decimal, base: Decimal) -> f64 {
    crate::utils::percent_of(delta, base)
}

impl ChangeMetrics {
    pub fn between(current: &PeriodTotals, previous: &PeriodTotals) -> Self {
        Self {
            income_change_pct: pct_change(current.total_income, previous.total_income),
            expense_change_pct: pct_change(current.total_expense, previous.total_expense),
            balance_change_pct: balance_change(current.balance, previous.balance),
        }
    }
}
