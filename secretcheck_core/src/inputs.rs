//! Turn raw string inputs into a validated [`ParsedInputs`]
//!
//! Inputs are read in a fixed order (`secrets`, `check`, `allowEmpty`,
//! `pattern`, `throwIfFail`, `throwIfSuccess`) so that the first problem
//! found is always the one reported.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::pattern::SecretPattern;
use crate::{Error, Result};

pub const INPUT_SECRETS: &str = "secrets";
pub const INPUT_CHECK: &str = "check";
pub const INPUT_ALLOW_EMPTY: &str = "allowEmpty";
pub const INPUT_PATTERN: &str = "pattern";
pub const INPUT_THROW_IF_FAIL: &str = "throwIfFail";
pub const INPUT_THROW_IF_SUCCESS: &str = "throwIfSuccess";

/// Every input name, in the order they are read.
pub const ALL_INPUTS: [&str; 6] = [
    INPUT_SECRETS,
    INPUT_CHECK,
    INPUT_ALLOW_EMPTY,
    INPUT_PATTERN,
    INPUT_THROW_IF_FAIL,
    INPUT_THROW_IF_SUCCESS,
];

/// Source of raw input values.
///
/// An unset input is reported as the empty string, never as an error.
pub trait InputSource {
    fn get_input(&self, name: &str) -> String;
}

impl InputSource for HashMap<String, String> {
    fn get_input(&self, name: &str) -> String {
        self.get(name).cloned().unwrap_or_default()
    }
}

impl InputSource for BTreeMap<String, String> {
    fn get_input(&self, name: &str) -> String {
        self.get(name).cloned().unwrap_or_default()
    }
}

impl<F> InputSource for F
where
    F: Fn(&str) -> String,
{
    fn get_input(&self, name: &str) -> String {
        self(name)
    }
}

/// Fully validated run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInputs {
    secrets: HashMap<String, String>,
    check: Vec<String>,
    allow_empty: bool,
    pattern: Option<SecretPattern>,
    throw_if_fail: bool,
    throw_if_success: bool,
}

impl ParsedInputs {
    /// Secret name to value. Values may be empty.
    #[must_use]
    pub const fn secrets(&self) -> &HashMap<String, String> {
        &self.secrets
    }

    /// Secret names to validate, in input order. Never empty.
    #[must_use]
    pub fn check(&self) -> &[String] {
        &self.check
    }

    #[must_use]
    pub const fn allow_empty(&self) -> bool {
        self.allow_empty
    }

    #[must_use]
    pub const fn pattern(&self) -> Option<&SecretPattern> {
        self.pattern.as_ref()
    }

    #[must_use]
    pub const fn throw_if_fail(&self) -> bool {
        self.throw_if_fail
    }

    #[must_use]
    pub const fn throw_if_success(&self) -> bool {
        self.throw_if_success
    }
}

/// Read and validate all inputs.
///
/// # Errors
/// Returns the first validation error found, see [`Error`] for the messages.
pub fn parse_inputs(lookup: &impl InputSource) -> Result<ParsedInputs> {
    let secrets = parse_secrets_input(&lookup.get_input(INPUT_SECRETS))?;
    let check = parse_check_input(&lookup.get_input(INPUT_CHECK))?;
    let allow_empty = get_input_boolean(lookup, INPUT_ALLOW_EMPTY, false)?;
    let pattern = parse_pattern_input(&lookup.get_input(INPUT_PATTERN))?;
    let throw_if_fail = get_input_boolean(lookup, INPUT_THROW_IF_FAIL, false)?;
    let throw_if_success = get_input_boolean(lookup, INPUT_THROW_IF_SUCCESS, false)?;

    Ok(ParsedInputs {
        secrets,
        check,
        allow_empty,
        pattern,
        throw_if_fail,
        throw_if_success,
    })
}

/// Read a boolean input. Empty means `default`; otherwise `true` or `false`
/// in any letter case.
///
/// # Errors
/// Returns [`Error::InvalidBoolean`] for any other value.
pub fn get_input_boolean(lookup: &impl InputSource, key: &str, default: bool) -> Result<bool> {
    let raw = lookup.get_input(key);
    if raw.is_empty() {
        return Ok(default);
    }
    if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(Error::InvalidBoolean {
            raw,
            key: key.to_string(),
        })
    }
}

fn parse_secrets_input(raw: &str) -> Result<HashMap<String, String>> {
    let value: Value =
        serde_json::from_str(raw).map_err(|source| Error::InvalidSecretsJson { source })?;

    let Value::Object(object) = value else {
        return Err(Error::SecretsSchema);
    };

    object
        .into_iter()
        .map(|(name, value)| match value {
            Value::String(value) => Ok((name, value)),
            _ => Err(Error::SecretsSchema),
        })
        .collect()
}

fn parse_check_input(raw: &str) -> Result<Vec<String>> {
    let check: Vec<&str> = raw.split('\n').map(str::trim).collect();

    if check.iter().any(|name| name.is_empty()) {
        return Err(Error::EmptyCheck);
    }
    if check.iter().any(|name| name.contains(' ')) {
        return Err(Error::CheckContainsSpaces);
    }

    Ok(check.into_iter().map(String::from).collect())
}

fn parse_pattern_input(raw: &str) -> Result<Option<SecretPattern>> {
    if raw.is_empty() {
        return Ok(None);
    }
    SecretPattern::parse(raw).map(Some)
}
