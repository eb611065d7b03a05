/// Exit code and optional message of a finished CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdExit {
    pub code: exitcode::ExitCode,
    pub message: Option<String>,
}
