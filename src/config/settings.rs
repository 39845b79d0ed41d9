//! Application settings loaded from config.toml
//!
//! Every field has a default, so the file is optional and may be partial.
//! Secrets never live here; see [`super::credentials`].

use crate::{
    ai::gemini::GEMINI_API_BASE,
    core::{
        calculator::DEFAULT_LABOR_COST_PER_ACRE, chat::DEFAULT_HISTORY_TURNS,
        contact::DEFAULT_SUBMIT_DELAY,
    },
    errors::{Error, Result},
};
use serde::Deserialize;
use std::{path::Path, time::Duration};

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_VAR: &str = "FARMGUARD_CONFIG";

/// Default config file location.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are an expert Agronomist and agricultural consultant for FarmGuard. Your goal is to help farmers understand pesticide usage, safety, organic alternatives, and cost-efficiency. Be practical, safety-conscious, and data-driven. Keep answers concise (under 150 words) unless asked for details. Use the search tool to find the most recent prices, regulations, and research.";

/// Top-level structure of config.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// AI agronomist backend
    pub agronomist: AgronomistSettings,
    /// Cost calculator defaults
    pub calculator: CalculatorSettings,
    /// Contact form behavior
    pub contact: ContactSettings,
}

/// `[agronomist]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgronomistSettings {
    /// Gemini model name
    pub model: String,
    /// Gemini REST base URL
    pub base_url: String,
    /// System instruction fixed for every conversation
    pub system_instruction: String,
    /// Whether answers may use Google Search grounding
    pub search_enabled: bool,
    /// Upper bound on a single backend call, in seconds
    pub timeout_secs: u64,
    /// Most chat turns kept per conversation (a question and its answer are two)
    pub max_history_turns: usize,
}

impl Default for AgronomistSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            base_url: GEMINI_API_BASE.to_string(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            search_enabled: true,
            timeout_secs: 60,
            max_history_turns: DEFAULT_HISTORY_TURNS,
        }
    }
}

impl AgronomistSettings {
    /// Backend call bound as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `[calculator]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CalculatorSettings {
    /// Labor charge pre-filled for new calculator sessions, in $/acre
    pub default_labor_cost_per_acre: f64,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        Self {
            default_labor_cost_per_acre: DEFAULT_LABOR_COST_PER_ACRE,
        }
    }
}

/// `[contact]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContactSettings {
    /// Artificial delay before a simulated submission succeeds, in milliseconds
    pub simulated_delay_ms: u64,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            simulated_delay_ms: u64::try_from(DEFAULT_SUBMIT_DELAY.as_millis()).unwrap_or(1500),
        }
    }
}

impl ContactSettings {
    /// Submission delay as a [`Duration`].
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }
}

impl Settings {
    fn validate(self) -> Result<Self> {
        let labor = self.calculator.default_labor_cost_per_acre;
        if !labor.is_finite() || labor < 0.0 {
            return Err(Error::Config {
                message: format!("calculator.default_labor_cost_per_acre must be >= 0, got {labor}"),
            });
        }
        if self.agronomist.timeout_secs == 0 {
            return Err(Error::Config {
                message: "agronomist.timeout_secs must be at least 1".to_string(),
            });
        }
        if self.agronomist.max_history_turns < 2 {
            return Err(Error::Config {
                message: format!(
                    "agronomist.max_history_turns must be at least 2, got {}",
                    self.agronomist.max_history_turns
                ),
            });
        }
        if self.agronomist.model.trim().is_empty() {
            return Err(Error::Config {
                message: "agronomist.model cannot be empty".to_string(),
            });
        }
        Ok(self)
    }
}

/// Parses settings from TOML text.
///
/// # Errors
/// Returns [`Error::Config`] for invalid TOML or out-of-range values.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    settings.validate()
}

/// Loads settings from a TOML file. A missing file yields the defaults.
///
/// # Errors
/// Returns [`Error::Config`] if the file exists but cannot be read or parsed.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);

    if !path_ref.exists() {
        tracing::info!("No config file at {:?}, using defaults", path_ref);
        return Ok(Settings::default());
    }

    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    parse_settings(&contents)
}

/// Loads settings from `$FARMGUARD_CONFIG`, or ./config.toml when unset.
///
/// # Errors
/// See [`load_settings`].
pub fn load_default_settings() -> Result<Settings> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_settings(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = parse_settings("").unwrap();
        assert_eq!(settings.agronomist.model, "gemini-2.5-flash");
        assert!(settings.agronomist.search_enabled);
        assert_eq!(settings.agronomist.timeout(), Duration::from_secs(60));
        assert_eq!(settings.calculator.default_labor_cost_per_acre, 10.0);
        assert_eq!(settings.contact.delay(), Duration::from_millis(1500));
        assert!(settings.agronomist.system_instruction.contains("Agronomist"));
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let settings = parse_settings(
            r#"
            [agronomist]
            model = "gemini-2.5-pro"
            timeout_secs = 30

            [calculator]
            default_labor_cost_per_acre = 12.5
            "#,
        )
        .unwrap();
        assert_eq!(settings.agronomist.model, "gemini-2.5-pro");
        assert_eq!(settings.agronomist.timeout_secs, 30);
        assert_eq!(settings.agronomist.base_url, GEMINI_API_BASE);
        assert_eq!(settings.calculator.default_labor_cost_per_acre, 12.5);
        assert_eq!(settings.contact.simulated_delay_ms, 1500);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(parse_settings("[calculator]\ndefault_labor_cost_per_acre = -1.0").is_err());
        assert!(parse_settings("[agronomist]\ntimeout_secs = 0").is_err());
        assert!(parse_settings("[agronomist]\nmodel = \"\"").is_err());
        assert!(parse_settings("[agronomist]\nmax_history_turns = 1").is_err());
    }

    #[test]
    fn test_history_limit_defaults_and_overrides() {
        assert_eq!(
            parse_settings("").unwrap().agronomist.max_history_turns,
            DEFAULT_HISTORY_TURNS
        );
        let settings = parse_settings("[agronomist]\nmax_history_turns = 6").unwrap();
        assert_eq!(settings.agronomist.max_history_turns, 6);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = parse_settings("[agronomist\nmodel = 1").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = load_settings("definitely/not/here/config.toml").unwrap();
        assert_eq!(settings.agronomist.timeout_secs, 60);
    }
}
