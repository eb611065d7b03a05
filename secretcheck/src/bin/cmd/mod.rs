pub mod default;
pub mod run_cmd;
