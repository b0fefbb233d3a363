// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::access::Permission;
use crate::models::{ChangeMetrics, OwnerScope, PeriodTotals, User};
use crate::report::monthly::previous_month;
use crate::store::{DateRange, SqliteStore, TransactionStore};
use crate::utils::{fmt_money, get_currency, maybe_print_json, month_name, parse_date, pretty_table};
use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub year: i32,
    pub month: u32,
    pub current: PeriodTotals,
    pub previous: PeriodTotals,
    pub changes: ChangeMetrics,
    pub year_to_date: PeriodTotals,
}

pub fn handle(conn: &Connection, who: &User, m: &clap::ArgMatches) -> Result<()> {
    let today = match m.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => chrono::Local::now().date_naive(),
    };
    let stats = stats(conn, who, today)?;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &stats)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    println!("{} {}", month_name(stats.month), stats.year);
    let rows = vec![
        vec![
            "Income".to_string(),
            fmt_money(&stats.current.total_income, &ccy),
            fmt_money(&stats.previous.total_income, &ccy),
            format!("{:+.1}%", stats.changes.income_change_pct),
            fmt_money(&stats.year_to_date.total_income, &ccy),
        ],
        vec![
            "Expense".to_string(),
            fmt_money(&stats.current.total_expense, &ccy),
            fmt_money(&stats.previous.total_expense, &ccy),
            format!("{:+.1}%", stats.changes.expense_change_pct),
            fmt_money(&stats.year_to_date.total_expense, &ccy),
        ],
        vec![
            "Balance".to_string(),
            fmt_money(&stats.current.balance, &ccy),
            fmt_money(&stats.previous.balance, &ccy),
            format!("{:+.1}%", stats.changes.balance_change_pct),
            fmt_money(&stats.year_to_date.balance, &ccy),
        ],
    ];
    println!(
        "{}",
        pretty_table(&["", "This month", "Last month", "Change", "Year to date"], rows)
    );
    Ok(())
}

/// Figures for the month containing `today`.
pub fn stats(conn: &Connection, who: &User, today: NaiveDate) -> Result<DashboardStats> {
    who.require(Permission::Read)?;
    compute(&SqliteStore::new(conn), who.scope(), today)
}

pub fn compute<S: TransactionStore>(
    store: &S,
    scope: OwnerScope,
    today: NaiveDate,
) -> Result<DashboardStats> {
    let (year, month) = (today.year(), today.month());
    let (py, pm) = previous_month(year, month);
    let out_of_range = || anyhow!("Date {} is out of range", today);

    let current_range = DateRange::month(year, month).ok_or_else(out_of_range)?;
    let previous_range = DateRange::month(py, pm).ok_or_else(out_of_range)?;
    let ytd_start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(out_of_range)?;
    let ytd_range = DateRange::new(ytd_start, current_range.end);

    let current = PeriodTotals::from_transactions(&store.query(scope, current_range)?)?;
    let previous = PeriodTotals::from_transactions(&store.query(scope, previous_range)?)?;
    let year_to_date = PeriodTotals::from_transactions(&store.query(scope, ytd_range)?)?;

    Ok(DashboardStats {
        year,
        month,
        current,
        previous,
        changes: ChangeMetrics::between(&current, &previous),
        year_to_date,
    })
}
