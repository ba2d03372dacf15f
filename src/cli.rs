// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn tx_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("date")
            .long("date")
            .help("YYYY-MM-DD (defaults to today on add)"),
    )
    .arg(Arg::new("amount").long("amount").required(required))
    .arg(
        Arg::new("kind")
            .long("kind")
            .required(required)
            .help("income|expense"),
    )
    .arg(Arg::new("category").long("category").required(required))
    .arg(Arg::new("description").long("description"))
    .arg(
        Arg::new("every")
            .long("every")
            .help("Recurrence: daily|weekly|biweekly|monthly|bimonthly|quarterly|semiannual|annual"),
    )
}

fn reminder_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(Arg::new("title").long("title").required(required))
        .arg(Arg::new("date").long("date").required(required))
        .arg(Arg::new("description").long("description"))
        .arg(Arg::new("amount").long("amount"))
        .arg(Arg::new("kind").long("kind").help("income|expense"))
}

pub fn build_cli() -> Command {
    Command::new("tallybook")
        .about("Personal income/expense ledger with dashboards and reminders")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(tx_fields(Command::new("add"), true))
                .subcommand(
                    tx_fields(Command::new("edit").arg(id_arg()), false).arg(
                        Arg::new("once")
                            .long("once")
                            .action(ArgAction::SetTrue)
                            .conflicts_with("every")
                            .help("Clear the recurrence"),
                    ),
                )
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(json_args(
                    Command::new("list")
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(Arg::new("kind").long("kind"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("category")
                .about("Categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("scope")
                                .long("scope")
                                .default_value("both")
                                .help("income|expense|both"),
                        ),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("scope").long("scope")),
                )
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(json_args(Command::new("list"))),
        )
        .subcommand(
            Command::new("reminder")
                .about("Dated reminders")
                .subcommand(
                    reminder_fields(Command::new("add"), true).arg(
                        Arg::new("notify")
                            .long("notify")
                            .action(ArgAction::SetTrue),
                    ),
                )
                .subcommand(
                    reminder_fields(Command::new("edit").arg(id_arg()), false)
                        .arg(
                            Arg::new("notify")
                                .long("notify")
                                .value_parser(value_parser!(bool)),
                        )
                        .arg(
                            Arg::new("clear-amount")
                                .long("clear-amount")
                                .action(ArgAction::SetTrue)
                                .conflicts_with_all(["amount", "kind"]),
                        ),
                )
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(json_args(
                    Command::new("list").arg(
                        Arg::new("upcoming")
                            .long("upcoming")
                            .action(ArgAction::SetTrue)
                            .help("Hide past reminders"),
                    ),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Dashboards")
                .subcommand(json_args(Command::new("summary")))
                .subcommand(json_args(
                    Command::new("cashflow").arg(
                        Arg::new("months")
                            .long("months")
                            .value_parser(value_parser!(usize)),
                    ),
                ))
                .subcommand(json_args(
                    Command::new("spend-by-category")
                        .arg(Arg::new("month").long("month").help("YYYY-MM")),
                )),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("snapshot")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .required(true)
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("import").about("Import data").subcommand(
                Command::new("transactions").arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(
            Command::new("config").about("Settings").subcommand(
                Command::new("currency").arg(Arg::new("set").long("set").help("e.g. EUR")),
            ),
        )
        .subcommand(Command::new("doctor").about("Check ledger consistency"))
}
