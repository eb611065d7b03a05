//! Action plumbing around the check pipeline.
//!
//! Inputs arrive as `INPUT_<NAME>` environment variables, optionally
//! overridden from the command line, and the verdict is published as the
//! `success` output.

use std::{collections::HashMap, path::Path};

use secretcheck_core::{
    inputs::{INPUT_CHECK, INPUT_SECRETS},
    parse_inputs, parse_secrets, InputSource,
};
use tracing::{debug, Level};

use crate::{
    env::Environment,
    error::{Error, Result},
    outcome::{handle_checker_output, Reporter},
};

/// Name of the output holding `"true"` or `"false"`.
pub const SUCCESS_OUTPUT: &str = "success";

/// Env var naming the file outputs are appended to.
const GITHUB_OUTPUT_VAR: &str = "GITHUB_OUTPUT";

/// Inputs that must be non-empty before parsing starts.
const REQUIRED_INPUTS: [&str; 2] = [INPUT_SECRETS, INPUT_CHECK];

/// [`InputSource`] reading action inputs from the environment.
pub struct ActionInputs<'a, E: Environment> {
    env: &'a E,
    overrides: HashMap<String, String>,
}

impl<'a, E: Environment> ActionInputs<'a, E> {
    #[must_use]
    pub fn new(env: &'a E) -> Self {
        Self {
            env,
            overrides: HashMap::new(),
        }
    }

    /// Values that win over the environment, keyed by input name. They are
    /// trimmed like the environment values.
    #[must_use]
    pub fn with_overrides(mut self, overrides: HashMap<String, String>) -> Self {
        self.overrides = overrides;
        self
    }
}

impl<E: Environment> InputSource for ActionInputs<'_, E> {
    fn get_input(&self, name: &str) -> String {
        self.overrides
            .get(name)
            .cloned()
            .or_else(|| self.env.var(&input_var_name(name)))
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }
}

/// Env var carrying the input `name`: `INPUT_` followed by the upper-cased
/// name with spaces replaced by underscores.
#[must_use]
pub fn input_var_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Fail when one of the mandatory inputs is empty.
///
/// # Errors
/// Returns [`Error::MissingInput`] naming the first missing input.
pub fn ensure_required(lookup: &impl InputSource) -> Result<()> {
    match REQUIRED_INPUTS
        .iter()
        .find(|name| lookup.get_input(name).is_empty())
    {
        Some(name) => Err(Error::MissingInput {
            name: (*name).to_string(),
        }),
        None => Ok(()),
    }
}

/// Publish an output value.
///
/// Appends `name=value` to the file named by `GITHUB_OUTPUT`, or falls back
/// to the `::set-output` workflow command on standard output.
///
/// # Errors
/// Returns an error if the output file cannot be written.
pub fn set_output(env: &impl Environment, name: &str, value: &str) -> Result<()> {
    match env.var(GITHUB_OUTPUT_VAR).filter(|path| !path.is_empty()) {
        Some(path) => env.append_to_file(Path::new(&path), &format!("{name}={value}\n")),
        None => {
            env.print_line(&format!("::set-output name={name}::{value}"));
            Ok(())
        }
    }
}

/// Run the whole check: read inputs, evaluate, report and publish
/// `success`.
///
/// # Errors
/// Returns an error on invalid inputs, on a result escalated by
/// `throwIfFail`/`throwIfSuccess`, or when the output cannot be written.
pub fn run(
    env: &impl Environment,
    overrides: HashMap<String, String>,
    reporter: &impl Reporter,
) -> Result<bool> {
    let lookup = ActionInputs::new(env).with_overrides(overrides);
    ensure_required(&lookup)?;

    let inputs = parse_inputs(&lookup)?;
    debug!(
        check = ?inputs.check(),
        secrets = inputs.secrets().len(),
        allow_empty = inputs.allow_empty(),
        pattern = ?inputs.pattern().map(ToString::to_string),
        "parsed inputs"
    );

    let outputs = parse_secrets(&inputs);
    if tracing::enabled!(Level::DEBUG) {
        let json = serde_json::to_string(&outputs)?;
        debug!(outputs = %json, "evaluated secrets");
    }

    let success = handle_checker_output(&inputs, &outputs, reporter)?;
    set_output(env, SUCCESS_OUTPUT, if success { "true" } else { "false" })?;
    Ok(success)
}
