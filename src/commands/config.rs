// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::access::{resolve_identity, Permission};
use crate::db::db_path;
use crate::models::User;
use crate::utils::{get_currency, get_setting, pretty_table, set_setting};
use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// `show` needs no identity; `set` resolves the caller first.
pub fn handle(conn: &Connection, caller: Option<&str>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let rows = vec![
                vec!["database".to_string(), db_path()?.display().to_string()],
                vec!["currency".to_string(), get_currency(conn)?],
                vec![
                    "default_user".to_string(),
                    get_setting(conn, "default_user")?.unwrap_or_else(|| "-".to_string()),
                ],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap();
            let value = sub.get_one::<String>("value").unwrap();
            let who = resolve_identity(conn, caller)?;
            set(conn, &who, key, value)?;
            println!("{} = {}", key, value);
        }
        _ => {}
    }
    Ok(())
}

pub fn set(conn: &Connection, who: &User, key: &str, value: &str) -> Result<()> {
    who.require(Permission::ManageSettings)?;
    set_setting(conn, key, value)?;
    info!(key, value, by = %who.name, "setting changed");
    Ok(())
}
