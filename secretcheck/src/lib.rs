pub mod action;
mod data;
pub mod env;
pub mod error;
pub mod outcome;

pub use action::{run, ActionInputs};
pub use data::CmdExit;
pub use outcome::{handle_checker_output, MockReporter, Reporter, WorkflowReporter};
pub use secretcheck_core::{
    parse_inputs, parse_secrets, InputSource, ParsedInputs, SecretCheckerOutput,
};
