// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{CategorySummary, Transaction};
use crate::utils::percent_of;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Groups transactions by their exact category label.
///
/// `total` is the percentage denominator and is taken as given, so callers
/// must pass the total of the same kind and period. Output is sorted by
/// amount, largest first; equal amounts keep the order in which their
/// category was first seen.
pub fn summarize_by_category<'a, I>(transactions: I, total: Decimal) -> Vec<CategorySummary>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, Decimal, usize)> = Vec::new();

    for t in transactions {
        match index.get(t.category.as_str()) {
            Some(&i) => {
                groups[i].1 = groups[i].1.saturating_add(t.amount);
                groups[i].2 += 1;
            }
            None => {
                index.insert(t.category.as_str(), groups.len());
                groups.push((t.category.as_str(), t.amount, 1));
            }
        }
    }

    let mut out: Vec<CategorySummary> = groups
        .into_iter()
        .map(|(category, amount, count)| CategorySummary {
            category: category.to_string(),
            amount,
            percentage: percent_of(amount, total),
            count,
        })
        .collect();
    // sort_by is stable
    out.sort_by(|a, b| b.amount.cmp(&a.amount));
    out
}
