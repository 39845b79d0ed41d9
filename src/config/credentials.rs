//! Credentials read from the environment (or `.env`).
//!
//! Tokens are loaded directly before use and are never stored in [`super::Settings`].

use crate::errors::{Error, Result};

/// Discord bot token variable.
pub const DISCORD_TOKEN_VAR: &str = "DISCORD_BOT_TOKEN";

/// Preferred Gemini API key variable.
pub const GEMINI_KEY_VAR: &str = "GEMINI_API_KEY";

/// Generic fallback API key variable.
pub const FALLBACK_KEY_VAR: &str = "API_KEY";

/// Reads the Discord bot token.
///
/// # Errors
/// Returns [`Error::EnvVar`] if `DISCORD_BOT_TOKEN` is unset.
pub fn discord_token() -> Result<String> {
    std::env::var(DISCORD_TOKEN_VAR).map_err(Error::EnvVar)
}

/// Reads the Gemini API key from `GEMINI_API_KEY`, falling back to `API_KEY`.
///
/// # Errors
/// Returns [`Error::Config`] if neither is set to a non-empty value.
pub fn gemini_api_key() -> Result<String> {
    pick_api_key(
        std::env::var(GEMINI_KEY_VAR).ok(),
        std::env::var(FALLBACK_KEY_VAR).ok(),
    )
}

fn pick_api_key(primary: Option<String>, fallback: Option<String>) -> Result<String> {
    [primary, fallback]
        .into_iter()
        .flatten()
        .find(|key| !key.trim().is_empty())
        .ok_or_else(|| Error::Config {
            message: format!("Neither {GEMINI_KEY_VAR} nor {FALLBACK_KEY_VAR} is set"),
        })
}
