// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print JSON instead of a table"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    ]
}

fn year_arg() -> Arg {
    Arg::new("year")
        .long("year")
        .required(true)
        .value_parser(value_parser!(i32))
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .required(true)
        .value_parser(value_parser!(u32))
        .help("Month number, 1-12")
}

fn export_args() -> [Arg; 2] {
    [
        Arg::new("format")
            .long("format")
            .default_value("csv")
            .help("csv | json"),
        Arg::new("out").long("out").required(true).value_name("PATH"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("ledgerlens")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Shared income/expense tracker with monthly and yearly financial reports")
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .value_name("NAME")
                .help("Act as this user (defaults to the default_user setting)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("user")
                .about("Manage users and roles")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("role")
                                .long("role")
                                .default_value("user")
                                .help("viewer | user | admin"),
                        ),
                )
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("role")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("role").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and inspect transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("income | expense"),
                        )
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("from").long("from").help("YYYY-MM-DD"))
                        .arg(Arg::new("to").long("to").help("YYYY-MM-DD"))
                        .arg(Arg::new("kind").long("kind"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("kind").long("kind"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Financial reports with analysis and recommendations")
                .subcommand(
                    Command::new("monthly")
                        .arg(year_arg())
                        .arg(month_arg())
                        .args(json_args()),
                )
                .subcommand(Command::new("yearly").arg(year_arg()).args(json_args())),
        )
        .subcommand(
            Command::new("export")
                .about("Write a report to a file")
                .subcommand(
                    Command::new("monthly")
                        .arg(year_arg())
                        .arg(month_arg())
                        .args(export_args()),
                )
                .subcommand(Command::new("yearly").arg(year_arg()).args(export_args())),
        )
        .subcommand(
            Command::new("dashboard")
                .about("Current month at a glance")
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("Reference date, YYYY-MM-DD (defaults to today)"),
                )
                .args(json_args()),
        )
        .subcommand(
            Command::new("audit")
                .about("Change history (admin only)")
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("entity-type").long("entity-type").help("e.g. Transaction"))
                        .arg(Arg::new("entity-id").long("entity-id"))
                        .arg(Arg::new("action").long("action").help("create | update | delete"))
                        .arg(Arg::new("from").long("from").help("YYYY-MM-DD"))
                        .arg(Arg::new("to").long("to").help("YYYY-MM-DD"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(
                            Arg::new("offset")
                                .long("offset")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
}
