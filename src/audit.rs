// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Append-only change history for mutable entities.

use crate::models::{AuditAction, AuditEntry, Transaction};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, params_from_iter, Connection, ToSql};
use serde_json::{json, Value};
use tracing::warn;

pub const TRANSACTION_ENTITY: &str = "Transaction";
const DEFAULT_LIMIT: usize = 50;

/// Before/after snapshot stored alongside an audit entry.
pub fn snapshot(tx: &Transaction) -> Value {
    json!({
        "date": tx.date.to_string(),
        "category": tx.category,
        "amount": tx.amount.to_string(),
        "kind": tx.kind.as_str(),
        "description": tx.description,
    })
}

pub fn try_record(
    conn: &Connection,
    user_id: i64,
    action: AuditAction,
    entity_type: &str,
    entity_id: &str,
    old_data: Option<&Value>,
    new_data: Option<&Value>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO audit_log(user_id, action, entity_type, entity_id, old_data, new_data, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user_id,
            action.as_str(),
            entity_type,
            entity_id,
            old_data.map(Value::to_string),
            new_data.map(Value::to_string),
            Utc::now()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Records an entry; a failing audit write is logged and never fails the
/// operation being audited.
pub fn record(
    conn: &Connection,
    user_id: i64,
    action: AuditAction,
    entity_type: &str,
    entity_id: &str,
    old_data: Option<&Value>,
    new_data: Option<&Value>,
) -> Option<i64> {
    match try_record(conn, user_id, action, entity_type, entity_id, old_data, new_data) {
        Ok(id) => Some(id),
        Err(err) => {
            warn!(%err, entity_type, entity_id, action = action.as_str(), "audit write failed");
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub action: Option<AuditAction>,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    /// Inclusive bounds on the UTC calendar day of `created_at`.
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Newest first.
pub fn list(conn: &Connection, filter: &AuditFilter) -> Result<Vec<AuditEntry>> {
    let mut sql = String::from(
        "SELECT l.id, l.user_id, u.name, l.action, l.entity_type, l.entity_id, l.old_data, l.new_data, l.created_at
         FROM audit_log l LEFT JOIN users u ON l.user_id=u.id WHERE 1=1",
    );
    let mut args: Vec<Box<dyn ToSql>> = Vec::new();
    if let Some(action) = filter.action {
        sql.push_str(" AND l.action=?");
        args.push(Box::new(action.as_str()));
    }
    if let Some(et) = &filter.entity_type {
        sql.push_str(" AND l.entity_type=?");
        args.push(Box::new(et.clone()));
    }
    if let Some(eid) = &filter.entity_id {
        sql.push_str(" AND l.entity_id=?");
        args.push(Box::new(eid.clone()));
    }
    if let Some(from) = filter.from {
        sql.push_str(" AND substr(l.created_at, 1, 10) >= ?");
        args.push(Box::new(from.to_string()));
    }
    if let Some(to) = filter.to {
        sql.push_str(" AND substr(l.created_at, 1, 10) <= ?");
        args.push(Box::new(to.to_string()));
    }
    sql.push_str(" ORDER BY l.created_at DESC, l.id DESC LIMIT ? OFFSET ?");
    args.push(Box::new(filter.limit.unwrap_or(DEFAULT_LIMIT) as i64));
    args.push(Box::new(filter.offset.unwrap_or(0) as i64));

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(args.iter()))?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let action: String = r.get(3)?;
        let old_data: Option<String> = r.get(6)?;
        let new_data: Option<String> = r.get(7)?;
        let created_at: DateTime<Utc> = r.get(8)?;
        out.push(AuditEntry {
            id,
            user_id: r.get(1)?,
            user_name: r.get::<_, Option<String>>(2)?.unwrap_or_default(),
            action: action.parse::<AuditAction>().map_err(anyhow::Error::msg)?,
            entity_type: r.get(4)?,
            entity_id: r.get(5)?,
            old_data: parse_json(id, old_data)?,
            new_data: parse_json(id, new_data)?,
            created_at,
        });
    }
    Ok(out)
}

fn parse_json(id: i64, raw: Option<String>) -> Result<Option<Value>> {
    raw.map(|s| {
        serde_json::from_str(&s).with_context(|| format!("Corrupt audit payload in entry {}", id))
    })
    .transpose()
}
