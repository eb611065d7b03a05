use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid JSON for input 'secrets'.")]
    InvalidSecretsJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("Input 'secrets' does not fit schema: string -> string.")]
    SecretsSchema,

    #[error("Input 'check' should not be empty, or contain empty lines.")]
    EmptyCheck,

    #[error("Input 'check' should not contain spaces in lines. Secret keys do not contain spaces.")]
    CheckContainsSpaces,

    #[error("Invalid input boolean value '{raw}' for input key '{key}'. Excepted: 'true' or 'false' (case insensitive).")]
    InvalidBoolean { raw: String, key: String },

    #[error("Invalid regex for input 'pattern'.")]
    InvalidPattern {
        #[source]
        source: fancy_regex::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
