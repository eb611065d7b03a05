use std::collections::HashMap;

use clap::{Arg, ArgMatches, Command};
use secretcheck::{env::RealEnvironment, error::Result, WorkflowReporter};
use secretcheck_core::inputs::{
    INPUT_ALLOW_EMPTY, INPUT_CHECK, INPUT_PATTERN, INPUT_SECRETS, INPUT_THROW_IF_FAIL,
    INPUT_THROW_IF_SUCCESS,
};

/// CLI flag id paired with the input it overrides.
const INPUT_FLAGS: [(&str, &str); 6] = [
    ("secrets", INPUT_SECRETS),
    ("check", INPUT_CHECK),
    ("allow-empty", INPUT_ALLOW_EMPTY),
    ("pattern", INPUT_PATTERN),
    ("throw-if-fail", INPUT_THROW_IF_FAIL),
    ("throw-if-success", INPUT_THROW_IF_SUCCESS),
];

pub fn command() -> Command {
    Command::new("run")
        .about("Check the secrets given as action inputs")
        .long_about(
            "Check the secrets given as action inputs.\n\n\
            Inputs are read from INPUT_SECRETS, INPUT_CHECK, INPUT_ALLOWEMPTY, INPUT_PATTERN, \
            INPUT_THROWIFFAIL and INPUT_THROWIFSUCCESS. Flags override the matching variable; both are trimmed. \
            The verdict is written as the `success` output.",
        )
        .arg(
            Arg::new("secrets")
                .long("secrets")
                .value_name("JSON")
                .help("JSON object mapping secret names to values"),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .value_name("NAMES")
                .help("Newline separated secret names to check"),
        )
        .arg(
            Arg::new("allow-empty")
                .long("allow-empty")
                .value_name("BOOL")
                .help("Treat empty values as set"),
        )
        .arg(
            Arg::new("pattern")
                .long("pattern")
                .value_name("/REGEX/FLAGS")
                .help("Pattern every checked value must match"),
        )
        .arg(
            Arg::new("throw-if-fail")
                .long("throw-if-fail")
                .value_name("BOOL")
                .help("Exit with an error when a secret is not valid"),
        )
        .arg(
            Arg::new("throw-if-success")
                .long("throw-if-success")
                .value_name("BOOL")
                .help("Exit with an error when all secrets are valid"),
        )
}

pub fn run(matches: &ArgMatches) -> Result<secretcheck::CmdExit> {
    let env = RealEnvironment;
    secretcheck::run(&env, overrides(matches), &WorkflowReporter::new(&env))?;

    Ok(secretcheck::CmdExit {
        code: exitcode::OK,
        message: None,
    })
}

/// Input values given as flags, keyed by input name.
fn overrides(matches: &ArgMatches) -> HashMap<String, String> {
    INPUT_FLAGS
        .iter()
        .filter_map(|(flag, input)| {
            matches
                .get_one::<String>(flag)
                .map(|value| ((*input).to_string(), value.clone()))
        })
        .collect()
}
