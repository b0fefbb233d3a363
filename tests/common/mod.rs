// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use chrono::NaiveDate;
use ledgerlens::error::StoreError;
use ledgerlens::models::{OwnerScope, Transaction, TransactionKind};
use ledgerlens::store::{DateRange, TransactionStore};
use rust_decimal::Decimal;
use std::cell::Cell;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// In-memory store that counts reads.
#[derive(Default)]
pub struct MemoryStore {
    rows: Vec<Transaction>,
    pub queries: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, owner_id: i64, day: &str, kind: TransactionKind, category: &str, amount: &str) {
        let id = self.rows.len() as i64 + 1;
        self.rows.push(Transaction {
            id,
            date: date(day),
            category: category.to_string(),
            amount: dec(amount),
            kind,
            description: None,
            owner_id,
        });
    }

    pub fn income(mut self, day: &str, category: &str, amount: &str) -> Self {
        self.push(1, day, TransactionKind::Income, category, amount);
        self
    }

    pub fn expense(mut self, day: &str, category: &str, amount: &str) -> Self {
        self.push(1, day, TransactionKind::Expense, category, amount);
        self
    }
}

impl TransactionStore for MemoryStore {
    fn query(&self, scope: OwnerScope, range: DateRange) -> Result<Vec<Transaction>, StoreError> {
        self.queries.set(self.queries.get() + 1);
        let mut out: Vec<Transaction> = self
            .rows
            .iter()
            .filter(|t| range.contains(t.date))
            .filter(|t| match scope {
                OwnerScope::Scoped(id) => t.owner_id == id,
                OwnerScope::Unscoped => true,
            })
            .cloned()
            .collect();
        out.sort_by_key(|t| (t.date, t.id));
        Ok(out)
    }
}

/// Every read fails as if the database were gone.
pub struct BrokenStore;

impl TransactionStore for BrokenStore {
    fn query(&self, _scope: OwnerScope, _range: DateRange) -> Result<Vec<Transaction>, StoreError> {
        Err(StoreError::CorruptRow {
            id: 0,
            reason: "store offline".into(),
        })
    }
}
