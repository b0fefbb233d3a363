// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::access::Permission;
use crate::audit::{self, AuditFilter};
use crate::models::{AuditAction, AuditEntry, User};
use crate::utils::{maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, who: &User, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let entries = list(conn, who, sub)?;
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &entries)? {
            let rows: Vec<Vec<String>> = entries
                .iter()
                .map(|e| {
                    vec![
                        e.id.to_string(),
                        e.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                        e.user_name.clone(),
                        e.action.as_str().to_string(),
                        format!("{} #{}", e.entity_type, e.entity_id),
                        change_summary(e),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["ID", "When", "User", "Action", "Entity", "Change"], rows)
            );
        }
    }
    Ok(())
}

pub fn list(conn: &Connection, who: &User, sub: &clap::ArgMatches) -> Result<Vec<AuditEntry>> {
    who.require(Permission::AccessAudit)?;
    let action = sub
        .get_one::<String>("action")
        .map(|a| a.parse::<AuditAction>().map_err(anyhow::Error::msg))
        .transpose()?;
    let date = |name: &str| sub.get_one::<String>(name).map(|s| parse_date(s)).transpose();
    let filter = AuditFilter {
        action,
        entity_type: sub.get_one::<String>("entity-type").cloned(),
        entity_id: sub.get_one::<String>("entity-id").cloned(),
        from: date("from")?,
        to: date("to")?,
        limit: sub.get_one::<usize>("limit").copied(),
        offset: sub.get_one::<usize>("offset").copied(),
    };
    audit::list(conn, &filter)
}

fn change_summary(e: &AuditEntry) -> String {
    let field = |v: &Option<serde_json::Value>, key: &str| {
        v.as_ref()
            .and_then(|v| v.get(key))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };
    match e.action {
        AuditAction::Create | AuditAction::Delete => {
            let data = if e.action == AuditAction::Create { &e.new_data } else { &e.old_data };
            format!(
                "{} {}",
                field(data, "category").unwrap_or_default(),
                field(data, "amount").unwrap_or_default()
            )
        }
        AuditAction::Update => format!(
            "{} -> {}",
            field(&e.old_data, "amount").unwrap_or_default(),
            field(&e.new_data, "amount").unwrap_or_default()
        ),
    }
}
