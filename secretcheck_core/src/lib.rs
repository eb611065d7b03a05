//! Secretcheck Core - input parsing and secret validation engine
//!
//! This crate turns raw string inputs into a validated [`ParsedInputs`] and
//! evaluates it into a [`SecretCheckerOutput`]. It performs no I/O and never
//! logs; reporting is left to the caller.

pub mod errors;
pub mod inputs;
pub mod pattern;
pub mod secrets;

pub use errors::{Error, Result};
pub use inputs::{get_input_boolean, parse_inputs, InputSource, ParsedInputs};
pub use pattern::{PatternFlag, SecretPattern};
pub use secrets::{parse_secrets, KeyResult, SecretCheckerOutput};
