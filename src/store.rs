// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transaction persistence.
//!
//! Report builders only ever see the [`TransactionStore`] trait; the SQLite
//! implementation below also carries the CRUD used by the `tx` commands.

use crate::error::StoreError;
use crate::models::{OwnerScope, Transaction, TransactionKind};
use crate::utils::month_end;
use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, ToSql};
use rust_decimal::Decimal;
use tracing::debug;

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// First through last day of `month`; `None` for months outside 1..=12.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = month_end(year, month)?;
        Some(Self { start, end })
    }

    pub fn year(year: i32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
        Some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Read access to transaction snapshots, ordered by date ascending.
pub trait TransactionStore {
    fn query(&self, scope: OwnerScope, range: DateRange) -> Result<Vec<Transaction>, StoreError>;
}

impl<S: TransactionStore + ?Sized> TransactionStore for &S {
    fn query(&self, scope: OwnerScope, range: DateRange) -> Result<Vec<Transaction>, StoreError> {
        (**self).query(scope, range)
    }
}

/// Fields a caller supplies when recording or editing a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub category: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub range: Option<DateRange>,
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

const SELECT_COLUMNS: &str =
    "SELECT id, date, category, amount, kind, description, owner_id FROM transactions";

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, owner_id: i64, tx: &NewTransaction) -> Result<Transaction, StoreError> {
        self.conn.execute(
            "INSERT INTO transactions(date, category, amount, kind, description, owner_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                tx.date.to_string(),
                tx.category,
                tx.amount.to_string(),
                tx.kind.as_str(),
                tx.description,
                owner_id
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, owner_id, "transaction inserted");
        Ok(Transaction {
            id,
            date: tx.date,
            category: tx.category.clone(),
            amount: tx.amount,
            kind: tx.kind,
            description: tx.description.clone(),
            owner_id,
        })
    }

    pub fn find(&self, id: i64) -> Result<Option<Transaction>, StoreError> {
        let sql = format!("{} WHERE id=?1", SELECT_COLUMNS);
        let raw = self
            .conn
            .query_row(&sql, params![id], RawRow::read)
            .optional()?;
        raw.map(RawRow::decode).transpose()
    }

    pub fn update(&self, id: i64, tx: &NewTransaction) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE transactions
             SET date=?1, category=?2, amount=?3, kind=?4, description=?5, updated_at=datetime('now')
             WHERE id=?6",
            params![
                tx.date.to_string(),
                tx.category,
                tx.amount.to_string(),
                tx.kind.as_str(),
                tx.description,
                id
            ],
        )?;
        Ok(())
    }

    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM transactions WHERE id=?1", params![id])?;
        Ok(())
    }

    /// Newest-first listing used by `tx list`.
    pub fn list(
        &self,
        scope: OwnerScope,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, StoreError> {
        let mut sql = format!("{} WHERE 1=1", SELECT_COLUMNS);
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();
        push_scope(&mut sql, &mut args, scope);
        if let Some(range) = filter.range {
            push_range(&mut sql, &mut args, range);
        }
        if let Some(kind) = filter.kind {
            sql.push_str(" AND kind=?");
            args.push(Box::new(kind.as_str()));
        }
        if let Some(cat) = &filter.category {
            sql.push_str(" AND category=?");
            args.push(Box::new(cat.clone()));
        }
        sql.push_str(" ORDER BY date DESC, id DESC");
        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            args.push(Box::new(limit as i64));
        }
        self.fetch(&sql, &args)
    }

    fn fetch(&self, sql: &str, args: &[Box<dyn ToSql>]) -> Result<Vec<Transaction>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), RawRow::read)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?.decode()?);
        }
        Ok(out)
    }
}

impl TransactionStore for SqliteStore<'_> {
    fn query(&self, scope: OwnerScope, range: DateRange) -> Result<Vec<Transaction>, StoreError> {
        let mut sql = format!("{} WHERE 1=1", SELECT_COLUMNS);
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();
        push_scope(&mut sql, &mut args, scope);
        push_range(&mut sql, &mut args, range);
        sql.push_str(" ORDER BY date ASC, id ASC");
        let out = self.fetch(&sql, &args)?;
        debug!(?scope, start = %range.start, end = %range.end, rows = out.len(), "queried transactions");
        Ok(out)
    }
}

fn push_scope(sql: &mut String, args: &mut Vec<Box<dyn ToSql>>, scope: OwnerScope) {
    if let OwnerScope::Scoped(owner) = scope {
        sql.push_str(" AND owner_id=?");
        args.push(Box::new(owner));
    }
}

fn push_range(sql: &mut String, args: &mut Vec<Box<dyn ToSql>>, range: DateRange) {
    sql.push_str(" AND date>=? AND date<=?");
    args.push(Box::new(range.start.to_string()));
    args.push(Box::new(range.end.to_string()));
}

// Columns as stored; decoding happens outside the rusqlite closure so a bad
// value surfaces as a StoreError naming the row.
struct RawRow {
    id: i64,
    date: String,
    category: String,
    amount: String,
    kind: String,
    description: Option<String>,
    owner_id: i64,
}

impl RawRow {
    fn read(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: r.get(0)?,
            date: r.get(1)?,
            category: r.get(2)?,
            amount: r.get(3)?,
            kind: r.get(4)?,
            description: r.get(5)?,
            owner_id: r.get(6)?,
        })
    }

    fn decode(self) -> Result<Transaction, StoreError> {
        let id = self.id;
        let corrupt = |reason: String| StoreError::CorruptRow { id, reason };
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|e| corrupt(format!("date '{}': {}", self.date, e)))?;
        let amount = self
            .amount
            .parse::<Decimal>()
            .map_err(|e| corrupt(format!("amount '{}': {}", self.amount, e)))?;
        let kind = self.kind.parse::<TransactionKind>().map_err(corrupt)?;
        Ok(Transaction {
            id,
            date,
            category: self.category,
            amount,
            kind,
            description: self.description,
            owner_id: self.owner_id,
        })
    }
}
