// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::access::Permission;
use crate::models::{
    CategorySummary, ChangeMetrics, MonthlyReport, PeriodTotals, User, YearlyReport,
};
use crate::report::ReportBuilder;
use crate::store::SqliteStore;
use crate::utils::{fmt_money, get_currency, maybe_print_json, month_name, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, who: &User, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("monthly", sub)) => monthly(conn, who, sub)?,
        Some(("yearly", sub)) => yearly(conn, who, sub)?,
        _ => {}
    }
    Ok(())
}

fn builder(conn: &Connection) -> Result<ReportBuilder<SqliteStore<'_>>> {
    let ccy = get_currency(conn)?;
    Ok(ReportBuilder::new(SqliteStore::new(conn)).with_currency(ccy))
}

pub fn monthly_report(
    conn: &Connection,
    who: &User,
    year: i32,
    month: u32,
) -> Result<MonthlyReport> {
    who.require(Permission::Read)?;
    builder(conn)?
        .monthly(who.scope(), year, month)
        .with_context(|| format!("Failed to build monthly report for {}-{:02}", year, month))
}

pub fn yearly_report(conn: &Connection, who: &User, year: i32) -> Result<YearlyReport> {
    who.require(Permission::Read)?;
    builder(conn)?
        .yearly(who.scope(), year)
        .with_context(|| format!("Failed to build yearly report for {}", year))
}

fn monthly(conn: &Connection, who: &User, sub: &clap::ArgMatches) -> Result<()> {
    let year = *sub.get_one::<i32>("year").unwrap();
    let month = *sub.get_one::<u32>("month").unwrap();
    let report = monthly_report(conn, who, year, month)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;

    println!("{} {}", month_name(month), year);
    println!("{}", summary_table(&report.totals, &report.previous, &report.changes, &ccy));
    print_categories("Income", &report.income_by_category, &ccy);
    print_categories("Expense", &report.expense_by_category, &ccy);

    let active: Vec<Vec<String>> = report
        .daily_series
        .iter()
        .filter(|d| !d.income.is_zero() || !d.expense.is_zero())
        .map(|d| {
            vec![
                d.day.to_string(),
                fmt_money(&d.income, &ccy),
                fmt_money(&d.expense, &ccy),
            ]
        })
        .collect();
    if !active.is_empty() {
        println!("{}", pretty_table(&["Day", "Income", "Expense"], active));
    }

    print_narrative(&report.analysis, &report.recommendations, true);
    Ok(())
}

fn yearly(conn: &Connection, who: &User, sub: &clap::ArgMatches) -> Result<()> {
    let year = *sub.get_one::<i32>("year").unwrap();
    let report = yearly_report(conn, who, year)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;

    println!("{}", year);
    println!("{}", summary_table(&report.totals, &report.previous, &report.changes, &ccy));
    println!(
        "Monthly average: {} income / {} expense",
        fmt_money(&report.average_monthly_income, &ccy),
        fmt_money(&report.average_monthly_expense, &ccy)
    );
    print_categories("Income", &report.income_by_category, &ccy);
    print_categories("Expense", &report.expense_by_category, &ccy);

    let rows: Vec<Vec<String>> = report
        .monthly_series
        .iter()
        .map(|m| {
            vec![
                m.month_name.clone(),
                fmt_money(&m.income, &ccy),
                fmt_money(&m.expense, &ccy),
                fmt_money(&m.balance, &ccy),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expense", "Balance"], rows)
    );

    // yearly recommendations carry their own group headers
    print_narrative(&report.analysis, &report.recommendations, false);
    Ok(())
}

fn summary_table(
    cur: &PeriodTotals,
    prev: &PeriodTotals,
    changes: &ChangeMetrics,
    ccy: &str,
) -> comfy_table::Table {
    let row = |label: &str, c: Decimal, p: Decimal, pct: f64| {
        vec![
            label.to_string(),
            fmt_money(&c, ccy),
            fmt_money(&p, ccy),
            format!("{:+.1}%", pct),
        ]
    };
    pretty_table(
        &["", "Current", "Previous", "Change"],
        vec![
            row(
                "Income",
                cur.total_income,
                prev.total_income,
                changes.income_change_pct,
            ),
            row(
                "Expense",
                cur.total_expense,
                prev.total_expense,
                changes.expense_change_pct,
            ),
            row("Balance", cur.balance, prev.balance, changes.balance_change_pct),
        ],
    )
}

fn print_categories(label: &str, categories: &[CategorySummary], ccy: &str) {
    if categories.is_empty() {
        return;
    }
    let rows: Vec<Vec<String>> = categories
        .iter()
        .map(|c| {
            vec![
                c.category.clone(),
                fmt_money(&c.amount, ccy),
                format!("{:.1}%", c.percentage),
                c.count.to_string(),
            ]
        })
        .collect();
    let header = format!("{} category", label);
    println!(
        "{}",
        pretty_table(&[header.as_str(), "Amount", "Share", "Count"], rows)
    );
}

fn print_narrative(analysis: &str, recommendations: &[String], numbered: bool) {
    println!("\n{}", analysis);
    println!("Recommendations:");
    for (i, r) in recommendations.iter().enumerate() {
        if numbered {
            println!("{:>2}. {}", i + 1, r);
        } else {
            println!("{}", r);
        }
    }
}
