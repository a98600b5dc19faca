// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn group_arg() -> Arg {
    Arg::new("group")
        .long("group")
        .required(true)
        .help("Group id or name")
}

pub fn build_cli() -> Command {
    Command::new("billbuddy")
        .version(crate_version!())
        .about("Split group expenses and track who owes whom")
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("email").long("email").required(true)),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("group")
                .about("Manage groups")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("member")
                                .long("member")
                                .action(ArgAction::Append)
                                .required(true)
                                .help("User id, email, or name; repeat for each member"),
                        ),
                )
                .subcommand(Command::new("list"))
                .subcommand(Command::new("show").arg(group_arg())),
        )
        .subcommand(
            Command::new("expense")
                .about("Record and list expenses")
                .subcommand(
                    Command::new("add")
                        .arg(group_arg())
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true),
                        )
                        .arg(Arg::new("paid_by").long("paid-by").required(true))
                        .arg(
                            Arg::new("split")
                                .long("split")
                                .value_parser(["equal", "custom", "percentage"])
                                .default_value("equal"),
                        )
                        .arg(
                            Arg::new("member")
                                .long("member")
                                .action(ArgAction::Append)
                                .help("Member to split between, in order"),
                        )
                        .arg(
                            Arg::new("share")
                                .long("share")
                                .action(ArgAction::Append)
                                .allow_hyphen_values(true)
                                .help("MEMBER=VALUE amount or percentage for custom/percentage splits"),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("YYYY-MM-DD, defaults to now"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").arg(group_arg()))),
        )
        .subcommand(json_flags(
            Command::new("balance")
                .about("Net balance per group member")
                .arg(group_arg()),
        ))
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("expenses")
                        .arg(group_arg())
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_parser(["csv", "json"])
                                .default_value("csv"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(json_flags(
            Command::new("doctor")
                .about("Check stored expenses for inconsistent splits")
                .arg(Arg::new("group").long("group").help("Limit to one group")),
        ))
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set").arg(
                        Arg::new("symbol")
                            .long("symbol")
                            .required(true)
                            .help("Currency symbol used when printing amounts"),
                    ),
                ),
        )
}
