// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::reports::{monthly_report, yearly_report};
use crate::models::{CategorySummary, ChangeMetrics, MonthlyReport, PeriodTotals, User, YearlyReport};
use anyhow::{bail, Result};
use csv::Writer;
use rusqlite::Connection;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => bail!("Unknown format: {} (use csv|json)", other),
        }
    }
}

pub fn handle(conn: &Connection, who: &User, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("monthly", sub)) => {
            // validate before building so a bad format never touches the output path
            let fmt = ExportFormat::parse(sub.get_one::<String>("format").unwrap())?;
            let out = sub.get_one::<String>("out").unwrap();
            let year = *sub.get_one::<i32>("year").unwrap();
            let month = *sub.get_one::<u32>("month").unwrap();
            let report = monthly_report(conn, who, year, month)?;
            write_monthly(&report, fmt, Path::new(out))?;
            println!("Exported monthly report {}-{:02} to {}", year, month, out);
        }
        Some(("yearly", sub)) => {
            let fmt = ExportFormat::parse(sub.get_one::<String>("format").unwrap())?;
            let out = sub.get_one::<String>("out").unwrap();
            let year = *sub.get_one::<i32>("year").unwrap();
            let report = yearly_report(conn, who, year)?;
            write_yearly(&report, fmt, Path::new(out))?;
            println!("Exported yearly report {} to {}", year, out);
        }
        _ => {}
    }
    Ok(())
}

pub fn write_monthly(report: &MonthlyReport, fmt: ExportFormat, out: &Path) -> Result<()> {
    match fmt {
        ExportFormat::Json => write_json(report, out)?,
        ExportFormat::Csv => {
            let mut wtr = csv_writer(out)?;
            wtr.write_record(["report", "monthly"])?;
            wtr.write_record(["year", report.year.to_string().as_str()])?;
            wtr.write_record(["month", report.month.to_string().as_str()])?;
            write_summary(&mut wtr, &report.totals, &report.previous, &report.changes)?;
            write_categories(&mut wtr, "income_by_category", &report.income_by_category)?;
            write_categories(&mut wtr, "expense_by_category", &report.expense_by_category)?;

            wtr.write_record([""])?;
            wtr.write_record(["daily_series"])?;
            wtr.write_record(["day", "income", "expense"])?;
            for d in &report.daily_series {
                wtr.write_record([
                    d.day.to_string(),
                    d.income.to_string(),
                    d.expense.to_string(),
                ])?;
            }
            write_narrative(&mut wtr, &report.analysis, &report.recommendations)?;
            wtr.flush()?;
        }
    }
    info!(path = %out.display(), "monthly report exported");
    Ok(())
}

pub fn write_yearly(report: &YearlyReport, fmt: ExportFormat, out: &Path) -> Result<()> {
    match fmt {
        ExportFormat::Json => write_json(report, out)?,
        ExportFormat::Csv => {
            let mut wtr = csv_writer(out)?;
            wtr.write_record(["report", "yearly"])?;
            wtr.write_record(["year", report.year.to_string().as_str()])?;
            write_summary(&mut wtr, &report.totals, &report.previous, &report.changes)?;
            wtr.write_record([
                "average_monthly_income",
                report.average_monthly_income.to_string().as_str(),
            ])?;
            wtr.write_record([
                "average_monthly_expense",
                report.average_monthly_expense.to_string().as_str(),
            ])?;
            write_categories(&mut wtr, "income_by_category", &report.income_by_category)?;
            write_categories(&mut wtr, "expense_by_category", &report.expense_by_category)?;

            wtr.write_record([""])?;
            wtr.write_record(["monthly_series"])?;
            wtr.write_record(["month", "month_name", "income", "expense", "balance"])?;
            for m in &report.monthly_series {
                wtr.write_record([
                    m.month.to_string(),
                    m.month_name.clone(),
                    m.income.to_string(),
                    m.expense.to_string(),
                    m.balance.to_string(),
                ])?;
            }
            write_narrative(&mut wtr, &report.analysis, &report.recommendations)?;
            wtr.flush()?;
        }
    }
    info!(path = %out.display(), "yearly report exported");
    Ok(())
}

fn csv_writer(out: &Path) -> Result<Writer<File>> {
    // sections have different widths
    Ok(csv::WriterBuilder::new().flexible(true).from_path(out)?)
}

fn write_json<T: Serialize>(report: &T, out: &Path) -> Result<()> {
    std::fs::write(out, serde_json::to_string_pretty(report)?)?;
    Ok(())
}

fn write_summary(
    wtr: &mut Writer<File>,
    cur: &PeriodTotals,
    prev: &PeriodTotals,
    changes: &ChangeMetrics,
) -> Result<()> {
    wtr.write_record([""])?;
    wtr.write_record(["summary"])?;
    wtr.write_record(["metric", "current", "previous", "change_pct"])?;
    wtr.write_record([
        "income".to_string(),
        cur.total_income.to_string(),
        prev.total_income.to_string(),
        format!("{:.2}", changes.income_change_pct),
    ])?;
    wtr.write_record([
        "expense".to_string(),
        cur.total_expense.to_string(),
        prev.total_expense.to_string(),
        format!("{:.2}", changes.expense_change_pct),
    ])?;
    wtr.write_record([
        "balance".to_string(),
        cur.balance.to_string(),
        prev.balance.to_string(),
        format!("{:.2}", changes.balance_change_pct),
    ])?;
    Ok(())
}

fn write_categories(
    wtr: &mut Writer<File>,
    section: &str,
    categories: &[CategorySummary],
) -> Result<()> {
    wtr.write_record([""])?;
    wtr.write_record([section])?;
    wtr.write_record(["category", "amount", "percentage", "count"])?;
    for c in categories {
        wtr.write_record([
            c.category.clone(),
            c.amount.to_string(),
            format!("{:.2}", c.percentage),
            c.count.to_string(),
        ])?;
    }
    Ok(())
}

fn write_narrative(
    wtr: &mut Writer<File>,
    analysis: &str,
    recommendations: &[String],
) -> Result<()> {
    wtr.write_record([""])?;
    wtr.write_record(["analysis"])?;
    for line in analysis.lines().filter(|l| !l.trim().is_empty()) {
        wtr.write_record([line])?;
    }
    wtr.write_record([""])?;
    wtr.write_record(["recommendations"])?;
    for r in recommendations {
        wtr.write_record([r.as_str()])?;
    }
    Ok(())
}
