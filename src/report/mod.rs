// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Report aggregation: totals, category breakdowns, period deltas and the
//! narrative built on top of them.

pub mod analysis;
pub mod category;
pub mod monthly;
pub mod totals;
pub mod yearly;

pub use category::summarize_by_category;
pub use totals::{balance_change, monthly_average, pct_change};

use crate::error::ReportError;
use crate::store::{DateRange, TransactionStore};
use crate::utils::DEFAULT_CURRENCY;

/// Builds monthly and yearly reports from an injected transaction store.
///
/// Each report issues two reads, one for the requested period and one for
/// the period before it, and is otherwise pure computation.
pub struct ReportBuilder<S> {
    store: S,
    currency: String,
}

impl<S: TransactionStore> ReportBuilder<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    /// Symbol used for money inside the narrative text.
    pub fn with_currency(mut self, ccy: impl Into<String>) -> Self {
        self.currency = ccy.into();
        self
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

fn month_range(year: i32, month: u32) -> Result<DateRange, ReportError> {
    if !(1..=12).contains(&month) {
        return Err(ReportError::InvalidArgument(format!(
            "month {} is outside 1-12",
            month
        )));
    }
    DateRange::month(year, month)
        .ok_or_else(|| ReportError::InvalidArgument(format!("year {} is out of range", year)))
}

fn year_range(year: i32) -> Result<DateRange, ReportError> {
    DateRange::year(year)
        .ok_or_else(|| ReportError::InvalidArgument(format!("year {} is out of range", year)))
}
