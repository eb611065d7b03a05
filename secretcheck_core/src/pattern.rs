//! Delimited regex notation used by the `pattern` input
//!
//! Patterns are written as `/body/flags`. Flag letters that have a meaning
//! for a single stateless test are mapped onto inline regex flags, the rest
//! are dropped without complaint so that a pattern copied from another regex
//! dialect still compiles as long as its body does.
//!
//! Bodies are compiled with [`fancy_regex`], so look-around and
//! backreferences are available. `\d`, `\w` and `\b` are rewritten to their
//! ASCII forms before compiling; only `.`, `\s` and case folding stay
//! Unicode-aware.

use std::collections::BTreeSet;
use std::str::FromStr;

use fancy_regex::{Regex, RegexBuilder};
use strum::{Display, EnumString};

use crate::{Error, Result};

/// A recognized flag letter.
///
/// Declaration order is the canonical order used when the pattern is
/// displayed back (`d g i m s u y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString)]
pub enum PatternFlag {
    /// Accepted for compatibility, no effect on a boolean test.
    #[strum(serialize = "d")]
    Indices,
    /// Accepted for compatibility, no effect on a boolean test.
    #[strum(serialize = "g")]
    Global,
    #[strum(serialize = "i")]
    IgnoreCase,
    /// `^` and `$` match at line boundaries.
    #[strum(serialize = "m")]
    Multiline,
    /// `.` also matches `\n`.
    #[strum(serialize = "s")]
    DotAll,
    /// Accepted for compatibility, bodies are always matched on `char`s.
    #[strum(serialize = "u")]
    Unicode,
    /// The match must start at the beginning of the value.
    #[strum(serialize = "y")]
    Sticky,
}

impl PatternFlag {
    /// Parse a single flag letter, `None` for letters that are not supported.
    #[must_use]
    pub fn from_char(letter: char) -> Option<Self> {
        let mut buf = [0; 4];
        Self::from_str(letter.encode_utf8(&mut buf)).ok()
    }
}

/// A compiled secret value pattern.
#[derive(Debug, Clone)]
pub struct SecretPattern {
    regex: Regex,
    body: String,
    flags: BTreeSet<PatternFlag>,
}

impl SecretPattern {
    /// Compile a pattern written as `/body/flags`.
    ///
    /// Input that is not delimited (no leading `/`, or a trailing segment
    /// that is not made of letters) is taken as a bare body without flags.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPattern`] when the body is not a valid regex.
    pub fn parse(raw: &str) -> Result<Self> {
        let (body, flag_letters) = split_delimited(raw).unwrap_or((raw, ""));
        let flags: BTreeSet<PatternFlag> =
            flag_letters.chars().filter_map(PatternFlag::from_char).collect();

        let regex = build(body, &flags)?;
        let regex = if flags.contains(&PatternFlag::Sticky) {
            build(&format!(r"\A(?:{body})"), &flags)?
        } else {
            regex
        };

        Ok(Self {
            regex,
            body: body.to_string(),
            flags,
        })
    }

    /// Test the pattern against a secret value.
    ///
    /// A value that exhausts the backtracking limit does not match.
    #[must_use]
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value).unwrap_or(false)
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Flags kept after dropping unsupported letters.
    pub fn flags(&self) -> impl Iterator<Item = PatternFlag> + '_ {
        self.flags.iter().copied()
    }
}

impl PartialEq for SecretPattern {
    fn eq(&self, other: &Self) -> bool {
        self.body == other.body && self.flags == other.flags
    }
}

impl Eq for SecretPattern {}

impl std::fmt::Display for SecretPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}/", self.body)?;
        for flag in &self.flags {
            write!(f, "{flag}")?;
        }
        Ok(())
    }
}

fn split_delimited(raw: &str) -> Option<(&str, &str)> {
    let rest = raw.strip_prefix('/')?;
    let close = rest.rfind('/')?;
    let (body, flags) = (&rest[..close], &rest[close + 1..]);
    flags
        .chars()
        .all(|c| c.is_ascii_alphabetic())
        .then_some((body, flags))
}

/// ASCII word characters, as a class body.
const WORD: &str = "0-9A-Za-z_";
/// Everything but ASCII digits, as a class body.
const NOT_DIGIT: &str = r"\x{0}-\x{2F}\x{3A}-\x{10FFFF}";
/// Everything but ASCII word characters, as a class body.
const NOT_WORD: &str = r"\x{0}-\x{2F}\x{3A}-\x{40}\x{5B}-\x{5E}\x{60}\x{7B}-\x{10FFFF}";
const WORD_BOUNDARY: &str =
    r"(?:(?<=[0-9A-Za-z_])(?![0-9A-Za-z_])|(?<![0-9A-Za-z_])(?=[0-9A-Za-z_]))";
const NOT_WORD_BOUNDARY: &str =
    r"(?:(?<=[0-9A-Za-z_])(?=[0-9A-Za-z_])|(?<![0-9A-Za-z_])(?![0-9A-Za-z_]))";

fn build(body: &str, flags: &BTreeSet<PatternFlag>) -> Result<Regex> {
    let inline: String = [
        (PatternFlag::IgnoreCase, 'i'),
        (PatternFlag::Multiline, 'm'),
        (PatternFlag::DotAll, 's'),
    ]
    .iter()
    .filter(|(flag, _)| flags.contains(flag))
    .map(|(_, letter)| *letter)
    .collect();

    let mut pattern = String::new();
    if !inline.is_empty() {
        pattern.push_str(&format!("(?{inline})"));
    }
    pattern.push_str(&ascii_classes(body));

    RegexBuilder::new(&pattern)
        .build()
        .map_err(|source| Error::InvalidPattern { source })
}

/// Rewrite `\d`, `\D`, `\w`, `\W`, `\b` and `\B` so they only consider
/// ASCII characters. Other escapes are copied through.
fn ascii_classes(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let Some(escaped) = chars.next() else {
                    out.push(c);
                    break;
                };
                let replacement = match (escaped, in_class) {
                    ('d', false) => "[0-9]".to_string(),
                    ('D', false) => format!("[{NOT_DIGIT}]"),
                    ('w', false) => format!("[{WORD}]"),
                    ('W', false) => format!("[{NOT_WORD}]"),
                    ('b', false) => WORD_BOUNDARY.to_string(),
                    ('B', false) => NOT_WORD_BOUNDARY.to_string(),
                    ('d', true) => "0-9".to_string(),
                    ('D', true) => NOT_DIGIT.to_string(),
                    ('w', true) => WORD.to_string(),
                    ('W', true) => NOT_WORD.to_string(),
                    _ => format!("\\{escaped}"),
                };
                out.push_str(&replacement);
            }
            '[' if !in_class => {
                in_class = true;
                out.push(c);
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
