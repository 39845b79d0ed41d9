/// Discord token and AI backend credentials from environment variables
pub mod credentials;

/// Application settings loaded from config.toml
pub mod settings;

pub use settings::{Settings, load_default_settings};
