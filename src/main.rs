// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use ledgerlens::{access, cli, commands, db};

const LOG_ENV: &str = "LEDGERLENS_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;
    let caller = matches.get_one::<String>("user").map(String::as_str);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("user", sub)) => commands::users::handle(&conn, caller, sub)?,
        Some(("config", sub)) => commands::config::handle(&conn, caller, sub)?,
        Some((name, sub)) => {
            let who = access::resolve_identity(&conn, caller)?;
            match name {
                "tx" => commands::transactions::handle(&conn, &who, sub)?,
                "report" => commands::reports::handle(&conn, &who, sub)?,
                "export" => commands::exporter::handle(&conn, &who, sub)?,
                "dashboard" => commands::dashboard::handle(&conn, &who, sub)?,
                "audit" => commands::audit::handle(&conn, &who, sub)?,
                _ => unreachable!("clap rejects unknown subcommands"),
            }
        }
        None => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
