//! Evaluate parsed inputs against the secrets they carry
//!
//! Evaluation is a narrowing pipeline: existence, then emptiness for the
//! keys that exist, then the pattern for the keys that are not empty. Every
//! stage keeps the order of the `check` input, duplicates included.

use serde::Serialize;

use crate::inputs::ParsedInputs;

/// A secret name paired with the outcome of one stage.
pub type KeyResult = (String, bool);

/// Result of evaluating a [`ParsedInputs`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretCheckerOutput {
    /// Whether every checked key passed every stage.
    pub result: bool,
    /// One entry per `check` entry.
    pub key_exists: Vec<KeyResult>,
    /// Only keys that exist.
    pub not_empty: Vec<KeyResult>,
    /// Only keys that exist and are not empty.
    pub matches_pattern: Vec<KeyResult>,
}

impl SecretCheckerOutput {
    /// Keys from `key_exists` that are missing.
    pub fn missing_keys(&self) -> impl Iterator<Item = &str> {
        failed(&self.key_exists)
    }

    /// Keys from `not_empty` holding an empty value.
    pub fn empty_keys(&self) -> impl Iterator<Item = &str> {
        failed(&self.not_empty)
    }

    /// Keys from `matches_pattern` whose value did not match.
    pub fn unmatched_keys(&self) -> impl Iterator<Item = &str> {
        failed(&self.matches_pattern)
    }
}

fn failed(results: &[KeyResult]) -> impl Iterator<Item = &str> {
    results
        .iter()
        .filter(|(_, ok)| !ok)
        .map(|(key, _)| key.as_str())
}

fn passed(results: &[KeyResult]) -> impl Iterator<Item = &str> {
    results
        .iter()
        .filter(|(_, ok)| *ok)
        .map(|(key, _)| key.as_str())
}

/// Evaluate all checked secrets.
#[must_use]
pub fn parse_secrets(inputs: &ParsedInputs) -> SecretCheckerOutput {
    let secrets = inputs.secrets();

    let key_exists: Vec<KeyResult> = inputs
        .check()
        .iter()
        .map(|key| (key.clone(), secrets.contains_key(key)))
        .collect();

    let not_empty: Vec<KeyResult> = passed(&key_exists)
        .map(|key| {
            let ok = inputs.allow_empty() || secrets.get(key).is_some_and(|v| !v.is_empty());
            (key.to_string(), ok)
        })
        .collect();

    let matches_pattern: Vec<KeyResult> = passed(&not_empty)
        .map(|key| {
            let ok = inputs.pattern().map_or(true, |pattern| {
                secrets.get(key).is_some_and(|v| pattern.is_match(v))
            });
            (key.to_string(), ok)
        })
        .collect();

    let result = passed(&matches_pattern).count() == inputs.check().len();

    SecretCheckerOutput {
        result,
        key_exists,
        not_empty,
        matches_pattern,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::inputs::{parse_inputs, INPUT_ALLOW_EMPTY, INPUT_CHECK, INPUT_PATTERN, INPUT_SECRETS};

    const SECRETS: &str = r#"{"secret1":"val1\nval2","secret2":"","secret3":"{\"n\":\"v\"}"}"#;

    fn evaluate(pairs: &[(&str, &str)]) -> SecretCheckerOutput {
        let raw: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        parse_secrets(&parse_inputs(&raw).expect("inputs should be valid"))
    }

    fn results(pairs: &[(&str, bool)]) -> Vec<KeyResult> {
        pairs.iter().map(|(k, ok)| ((*k).to_string(), *ok)).collect()
    }

    #[test]
    fn all_checked_secrets_set() {
        let output = evaluate(&[(INPUT_SECRETS, SECRETS), (INPUT_CHECK, "secret1\nsecret3")]);

        assert!(output.result);
        let expected = results(&[("secret1", true), ("secret3", true)]);
        assert_eq!(output.key_exists, expected);
        assert_eq!(output.not_empty, expected);
        assert_eq!(output.matches_pattern, expected);
    }

    #[test]
    fn empty_value_fails_unless_allowed() {
        let output = evaluate(&[
            (INPUT_SECRETS, SECRETS),
            (INPUT_CHECK, "secret1\nsecret2\nsecret3"),
            (INPUT_ALLOW_EMPTY, "false"),
        ]);
        assert!(!output.result);
        assert_eq!(
            output.not_empty,
            results(&[("secret1", true), ("secret2", false), ("secret3", true)])
        );
        assert_eq!(
            output.matches_pattern,
            results(&[("secret1", true), ("secret3", true)])
        );
        assert_eq!(output.empty_keys().collect::<Vec<_>>(), ["secret2"]);

        let output = evaluate(&[
            (INPUT_SECRETS, SECRETS),
            (INPUT_CHECK, "secret1\nsecret2\nsecret3"),
            (INPUT_ALLOW_EMPTY, "true"),
        ]);
        assert!(output.result);
        assert_eq!(
            output.not_empty,
            results(&[("secret1", true), ("secret2", true), ("secret3", true)])
        );
        assert_eq!(output.matches_pattern.len(), 3);
    }

    #[test]
    fn missing_key_is_excluded_from_later_stages() {
        let output = evaluate(&[
            (INPUT_SECRETS, SECRETS),
            (INPUT_CHECK, "secret1\nsecret4\nsecret3"),
        ]);
        assert!(!output.result);
        assert_eq!(
            output.key_exists,
            results(&[("secret1", true), ("secret4", false), ("secret3", true)])
        );
        assert_eq!(
            output.not_empty,
            results(&[("secret1", true), ("secret3", true)])
        );
        assert_eq!(
            output.matches_pattern,
            results(&[("secret1", true), ("secret3", true)])
        );
        assert_eq!(output.missing_keys().collect::<Vec<_>>(), ["secret4"]);
    }

    #[test]
    fn pattern_is_tested_on_non_empty_values() {
        let secrets = r#"{"a":"hello world","b":"hello","c":"","d":"hello a"}"#;
        let output = evaluate(&[
            (INPUT_SECRETS, secrets),
            (INPUT_CHECK, "a\nb\nc\nd"),
            (INPUT_PATTERN, r"/^hello\s.+$/"),
        ]);
        assert!(!output.result);
        assert_eq!(
            output.matches_pattern,
            results(&[("a", true), ("b", false), ("d", true)])
        );
        assert_eq!(output.unmatched_keys().collect::<Vec<_>>(), ["b"]);
        assert_eq!(output.empty_keys().collect::<Vec<_>>(), ["c"]);
    }

    #[test]
    fn empty_value_allowed_is_tested_against_pattern() {
        let output = evaluate(&[
            (INPUT_SECRETS, r#"{"a":""}"#),
            (INPUT_CHECK, "a"),
            (INPUT_ALLOW_EMPTY, "true"),
            (INPUT_PATTERN, "/.+/"),
        ]);
        assert!(!output.result);
        assert_eq!(output.matches_pattern, results(&[("a", false)]));
    }

    #[test]
    fn duplicates_are_evaluated_per_occurrence() {
        let output = evaluate(&[
            (INPUT_SECRETS, SECRETS),
            (INPUT_CHECK, "secret2\nsecret1\nsecret2"),
        ]);
        assert!(!output.result);
        assert_eq!(
            output.key_exists,
            results(&[("secret2", true), ("secret1", true), ("secret2", true)])
        );
        assert_eq!(
            output.not_empty,
            results(&[("secret2", false), ("secret1", true), ("secret2", false)])
        );
        assert_eq!(output.matches_pattern, results(&[("secret1", true)]));

        let output = evaluate(&[(INPUT_SECRETS, SECRETS), (INPUT_CHECK, "secret1\nsecret1")]);
        assert!(output.result);
        assert_eq!(output.matches_pattern.len(), 2);
    }

    #[test]
    fn output_serializes_as_pairs() {
        let output = evaluate(&[(INPUT_SECRETS, SECRETS), (INPUT_CHECK, "secret4")]);
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "result": false,
                "key_exists": [["secret4", false]],
                "not_empty": [],
                "matches_pattern": [],
            })
        );
    }
}
