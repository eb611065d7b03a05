use clap::{crate_version, Arg, Command};

pub const LOG_LEVELS: [&str; 6] = ["off", "trace", "debug", "info", "warn", "error"];

pub fn command() -> Command {
    Command::new("secretcheck")
        .version(crate_version!())
        .about("Make sure the secrets a workflow needs are set, not empty and match a pattern")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log")
                .long("log")
                .help("Set the level of diagnostic logs on stderr; check results are always printed")
                .value_name("LEVEL")
                .value_parser(LOG_LEVELS)
                .default_value("info")
                .ignore_case(true)
                .global(true),
        )
}
