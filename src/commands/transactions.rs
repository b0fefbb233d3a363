// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::access::Permission;
use crate::audit::{self, snapshot, TRANSACTION_ENTITY};
use crate::models::{AuditAction, OwnerScope, Transaction, TransactionKind, User};
use crate::store::{DateRange, NewTransaction, SqliteStore, TransactionFilter};
use crate::utils::{
    fmt_money, get_currency, maybe_print_json, parse_amount, parse_date, pretty_table,
};
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &Connection, who: &User, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let tx = add(conn, who, sub)?;
            println!(
                "Recorded #{} {} {} '{}' on {}",
                tx.id,
                tx.kind,
                fmt_money(&tx.amount, &get_currency(conn)?),
                tx.category,
                tx.date
            );
        }
        Some(("list", sub)) => list(conn, who, sub)?,
        Some(("edit", sub)) => {
            let tx = edit(conn, who, sub)?;
            println!("Updated transaction #{}", tx.id);
        }
        Some(("rm", sub)) => {
            let id = remove(conn, who, sub)?;
            println!("Removed transaction #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn parse_kind(s: &str) -> Result<TransactionKind> {
    s.parse::<TransactionKind>().map_err(anyhow::Error::msg)
}

fn non_empty(s: &str, field: &str) -> Result<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Missing required field '{}'", field));
    }
    Ok(s.to_string())
}

pub fn add(conn: &Connection, who: &User, sub: &clap::ArgMatches) -> Result<Transaction> {
    who.require(Permission::Create)?;
    let new = NewTransaction {
        date: parse_date(sub.get_one::<String>("date").unwrap())?,
        category: non_empty(sub.get_one::<String>("category").unwrap(), "category")?,
        amount: parse_amount(sub.get_one::<String>("amount").unwrap())?,
        kind: parse_kind(sub.get_one::<String>("kind").unwrap())?,
        description: sub.get_one::<String>("description").cloned(),
    };
    let tx = SqliteStore::new(conn).insert(who.id, &new)?;
    audit::record(
        conn,
        who.id,
        AuditAction::Create,
        TRANSACTION_ENTITY,
        &tx.id.to_string(),
        None,
        Some(&snapshot(&tx)),
    );
    info!(id = tx.id, user = %who.name, "transaction created");
    Ok(tx)
}

/// Loads a transaction the caller is allowed to change.
fn owned(store: &SqliteStore<'_>, who: &User, id: i64) -> Result<Transaction> {
    let tx = store
        .find(id)?
        .ok_or_else(|| anyhow!("Transaction #{} not found", id))?;
    if tx.owner_id != who.id {
        // other owners' rows read as missing
        return Err(anyhow!("Transaction #{} not found", id));
    }
    Ok(tx)
}

pub fn edit(conn: &Connection, who: &User, sub: &clap::ArgMatches) -> Result<Transaction> {
    who.require(Permission::Update)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let store = SqliteStore::new(conn);
    let before = owned(&store, who, id)?;

    let mut next = NewTransaction {
        date: before.date,
        category: before.category.clone(),
        amount: before.amount,
        kind: before.kind,
        description: before.description.clone(),
    };
    if let Some(d) = sub.get_one::<String>("date") {
        next.date = parse_date(d)?;
    }
    if let Some(c) = sub.get_one::<String>("category") {
        next.category = non_empty(c, "category")?;
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        next.amount = parse_amount(a)?;
    }
    if let Some(k) = sub.get_one::<String>("kind") {
        next.kind = parse_kind(k)?;
    }
    if let Some(d) = sub.get_one::<String>("description") {
        next.description = Some(d.clone()).filter(|d| !d.is_empty());
    }

    store.update(id, &next)?;
    let after = Transaction {
        id,
        date: next.date,
        category: next.category,
        amount: next.amount,
        kind: next.kind,
        description: next.description,
        owner_id: before.owner_id,
    };
    audit::record(
        conn,
        who.id,
        AuditAction::Update,
        TRANSACTION_ENTITY,
        &id.to_string(),
        Some(&snapshot(&before)),
        Some(&snapshot(&after)),
    );
    Ok(after)
}

pub fn remove(conn: &Connection, who: &User, sub: &clap::ArgMatches) -> Result<i64> {
    who.require(Permission::Delete)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let store = SqliteStore::new(conn);
    let before = owned(&store, who, id)?;
    store.delete(id)?;
    audit::record(
        conn,
        who.id,
        AuditAction::Delete,
        TRANSACTION_ENTITY,
        &id.to_string(),
        Some(&snapshot(&before)),
        None,
    );
    Ok(id)
}

fn list(conn: &Connection, who: &User, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, who, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let ccy = get_currency(conn)?;
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.kind.to_string(),
                    t.category.clone(),
                    fmt_money(&t.amount, &ccy),
                    t.description.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Kind", "Category", "Amount", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

pub fn query_rows(
    conn: &Connection,
    who: &User,
    sub: &clap::ArgMatches,
) -> Result<Vec<Transaction>> {
    who.require(Permission::Read)?;
    let from = sub.get_one::<String>("from").map(|s| parse_date(s)).transpose()?;
    let to = sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?;
    let range = match (from, to) {
        (None, None) => None,
        // stored dates compare as YYYY-MM-DD text, so open ends stay four-digit
        (f, t) => Some(DateRange::new(
            f.or_else(|| NaiveDate::from_ymd_opt(1, 1, 1)).unwrap_or(NaiveDate::MIN),
            t.or_else(|| NaiveDate::from_ymd_opt(9999, 12, 31)).unwrap_or(NaiveDate::MAX),
        )),
    };
    let filter = TransactionFilter {
        range,
        kind: sub.get_one::<String>("kind").map(|k| parse_kind(k)).transpose()?,
        category: sub.get_one::<String>("category").cloned(),
        limit: sub.get_one::<usize>("limit").copied(),
    };
    let scope: OwnerScope = who.scope();
    Ok(SqliteStore::new(conn).list(scope, &filter)?)
}
