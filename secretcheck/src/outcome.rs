//! Turn an evaluation into log lines and a final verdict.
//!
//! This is the only place that reports anything or escalates a result into
//! an error; parsing and evaluation stay side-effect free.

use std::cell::RefCell;

use secretcheck_core::{ParsedInputs, SecretCheckerOutput};

use crate::{
    env::Environment,
    error::{Error, Result},
};

/// Reported when every checked secret passed.
pub const ALL_SECRETS_VALID_TEXT: &str = "All secrets are set and have valid values.";

/// Sink for diagnostic lines.
pub trait Reporter {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
}

/// [`Reporter`] that prints lines as workflow commands.
///
/// Info lines are printed as-is and warnings become `::warning::`
/// annotations. Both are always written, whatever the log level.
pub struct WorkflowReporter<'a, E: Environment> {
    env: &'a E,
}

impl<'a, E: Environment> WorkflowReporter<'a, E> {
    #[must_use]
    pub const fn new(env: &'a E) -> Self {
        Self { env }
    }
}

impl<E: Environment> Reporter for WorkflowReporter<'_, E> {
    fn info(&self, message: &str) {
        self.env.print_line(message);
    }

    fn warning(&self, message: &str) {
        self.env
            .print_line(&format!("::warning::{}", escape_data(message)));
    }
}

/// Escape a workflow command message so it stays on one line.
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// [`Reporter`] that captures lines for assertions.
#[derive(Debug, Default)]
pub struct MockReporter {
    pub infos: RefCell<Vec<String>>,
    pub warnings: RefCell<Vec<String>>,
}

impl Reporter for MockReporter {
    fn info(&self, message: &str) {
        self.infos.borrow_mut().push(message.to_string());
    }

    fn warning(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
}

/// Report the evaluation and return its verdict.
///
/// # Errors
/// [`Error::AllSecretsValid`] when the check passed and `throwIfSuccess` is
/// set, [`Error::SecretsInvalid`] when it failed and `throwIfFail` is set.
pub fn handle_checker_output(
    inputs: &ParsedInputs,
    outputs: &SecretCheckerOutput,
    reporter: &impl Reporter,
) -> Result<bool> {
    if outputs.result {
        if inputs.throw_if_success() {
            return Err(Error::AllSecretsValid);
        }
        reporter.info(ALL_SECRETS_VALID_TEXT);
        return Ok(true);
    }

    report_group(reporter, "Secrets not set:", outputs.missing_keys());
    if !inputs.allow_empty() {
        report_group(reporter, "Secrets with empty values:", outputs.empty_keys());
    }
    if let Some(pattern) = inputs.pattern() {
        report_group(
            reporter,
            &format!("Secrets that failed to match pattern {pattern}:"),
            outputs.unmatched_keys(),
        );
    }

    if inputs.throw_if_fail() {
        return Err(Error::SecretsInvalid);
    }
    Ok(false)
}

fn report_group<'a>(reporter: &impl Reporter, label: &str, keys: impl Iterator<Item = &'a str>) {
    let keys: Vec<&str> = keys.collect();
    if !keys.is_empty() {
        reporter.warning(&format!("{label} {}", keys.join(", ")));
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use insta::assert_snapshot;
    use secretcheck_core::{parse_inputs, parse_secrets};

    use super::*;
    use crate::env::MockEnvironment;

    const SECRETS: &str = r#"{"secret1":"val1\nval2","secret2":"","secret3":"{\"n\":\"v\"}","hello":"hello"}"#;

    fn handle(pairs: &[(&str, &str)]) -> (Result<bool>, MockReporter) {
        let mut raw: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        raw.entry("secrets".to_string())
            .or_insert_with(|| SECRETS.to_string());
        let inputs = parse_inputs(&raw).unwrap();
        let outputs = parse_secrets(&inputs);
        let reporter = MockReporter::default();
        let verdict = handle_checker_output(&inputs, &outputs, &reporter);
        (verdict, reporter)
    }

    #[test]
    fn success_is_reported_as_info() {
        let (verdict, reporter) = handle(&[("check", "secret1\nsecret3")]);
        assert!(verdict.unwrap());
        assert_eq!(
            *reporter.infos.borrow(),
            ["All secrets are set and have valid values."]
        );
        assert!(reporter.warnings.borrow().is_empty());
    }

    #[test]
    fn success_can_be_fatal() {
        let (verdict, reporter) = handle(&[("check", "secret1"), ("throwIfSuccess", "true")]);
        let err = verdict.unwrap_err();
        assert!(matches!(err, Error::AllSecretsValid));
        assert_eq!(err.to_string(), "All secrets are set and have valid values.");
        assert!(reporter.infos.borrow().is_empty());
    }

    #[test]
    fn throw_if_fail_is_ignored_on_success() {
        let (verdict, _) = handle(&[("check", "secret1"), ("throwIfFail", "true")]);
        assert!(verdict.unwrap());
    }

    #[test]
    fn failure_groups_are_reported_in_check_order() {
        let (verdict, reporter) = handle(&[
            ("check", "secret4\nsecret2\nhello\nsecret1\nsecret5\nsecret2"),
            ("pattern", "/^val/m"),
        ]);
        assert!(!verdict.unwrap());
        assert!(reporter.infos.borrow().is_empty());
        assert_snapshot!(reporter.warnings.borrow().join("\n"), @r"
        Secrets not set: secret4, secret5
        Secrets with empty values: secret2, secret2
        Secrets that failed to match pattern /^val/m: hello
        ");
    }

    #[test]
    fn only_non_empty_groups_are_reported() {
        let (verdict, reporter) = handle(&[("check", "secret1\nsecret4")]);
        assert!(!verdict.unwrap());
        assert_eq!(*reporter.warnings.borrow(), ["Secrets not set: secret4"]);
    }

    #[test]
    fn empty_values_are_not_reported_when_allowed() {
        let (verdict, reporter) = handle(&[
            ("check", "secret2\nsecret3"),
            ("allowEmpty", "true"),
            ("pattern", "/^val/"),
        ]);
        assert!(!verdict.unwrap());
        assert_eq!(
            *reporter.warnings.borrow(),
            ["Secrets that failed to match pattern /^val/: secret2, secret3"]
        );
    }

    #[test]
    fn failure_can_be_fatal_after_reporting() {
        let (verdict, reporter) = handle(&[("check", "secret2"), ("throwIfFail", "TRUE")]);
        let err = verdict.unwrap_err();
        assert!(matches!(err, Error::SecretsInvalid));
        assert_eq!(
            err.to_string(),
            "Necessary secrets not set or do not have valid values. See above."
        );
        assert_eq!(
            *reporter.warnings.borrow(),
            ["Secrets with empty values: secret2"]
        );
    }

    #[test]
    fn workflow_reporter_always_prints_lines() {
        let env = MockEnvironment::default();
        let reporter = WorkflowReporter::new(&env);
        reporter.info(ALL_SECRETS_VALID_TEXT);
        reporter.warning("Secrets not set: secret4");
        reporter.warning("Secrets that failed to match pattern /100%\\n/: a");
        assert_eq!(
            *env.stdout.borrow(),
            [
                "All secrets are set and have valid values.",
                "::warning::Secrets not set: secret4",
                "::warning::Secrets that failed to match pattern /100%25\\n/: a",
            ]
        );
    }

    #[test]
    fn workflow_reporter_escapes_line_breaks() {
        assert_eq!(escape_data("a\r\nb"), "a%0D%0Ab");
    }

    #[test]
    fn throw_if_success_is_ignored_on_failure() {
        let (verdict, _) = handle(&[("check", "secret4"), ("throwIfSuccess", "true")]);
        assert!(!verdict.unwrap());
    }
}
