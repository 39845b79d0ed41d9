//! Unified error types for `FarmGuard`.
//!
//! Every fallible operation in the crate returns [`Result`]. Calculator guard
//! failures are deliberately not errors: the calculator simply produces no result.

use thiserror::Error;

/// All errors that can occur in `FarmGuard`.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// A catalog record violates a load-time invariant
    #[error("Invalid product '{id}': {reason}")]
    InvalidProduct {
        /// Id of the offending product
        id: String,
        /// Which invariant was violated
        reason: String,
    },

    /// No product with the given id or name exists in the catalog
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// The id or name that was looked up
        id: String,
    },

    /// No resource guide with the given id exists
    #[error("Guide not found: {id}")]
    GuideNotFound {
        /// The guide id that was looked up
        id: String,
    },

    /// A contact inquiry is missing a required field or has a malformed email
    #[error("Invalid inquiry: {field} is required")]
    InvalidInquiry {
        /// Name of the field that failed validation
        field: &'static str,
    },

    /// The AI backend answered with something we could not use
    #[error("Agronomist backend error: {message}")]
    Agronomist {
        /// Description of the failure, including HTTP status where available
        message: String,
    },

    /// The AI backend did not answer within the configured bound
    #[error("Agronomist backend timed out after {seconds}s")]
    Timeout {
        /// The bound that was exceeded
        seconds: u64,
    },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
