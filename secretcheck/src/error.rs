//! Typed error types for secretcheck.

/// All errors produced by the secretcheck library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Inputs(#[from] secretcheck_core::Error),

    #[error("Input required and not supplied: {name}")]
    MissingInput { name: String },

    #[error("All secrets are set and have valid values.")]
    AllSecretsValid,

    #[error("Necessary secrets not set or do not have valid values. See above.")]
    SecretsInvalid,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A `Result` alias where the error type is [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
