//! # Engine Settings
//!
//! Layered runtime settings loaded with the `config` crate.
//!
//! # Sources
//!
//! ```text
//! defaults  <-  config file (optional)  <-  QUOTE_ENGINE__* environment
//! ```
//!
//! A `.env` file is loaded into the process environment first when present.
//! Nested keys use `__` as separator, e.g.
//! `QUOTE_ENGINE__CONFIG_SERVICE__BASE_URL=https://configs.example.com/api`.

use crate::domain::entities::effective_config::DEFAULT_CONTRACT_MONTHS;
use crate::domain::entities::quote::BillingTerms;
use crate::domain::value_objects::Frequency;
use crate::infrastructure::config_source::http::DEFAULT_TIMEOUT_MS;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "QUOTE_ENGINE";

/// Config file looked up when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config/quote-engine";

/// Error type for loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or deserialized.
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    /// A value is out of range.
    #[error("invalid setting {key}: {message}")]
    Invalid {
        /// Setting key.
        key: &'static str,
        /// Reason.
        message: String,
    },

    /// The global subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl SettingsError {
    /// Creates an invalid setting error.
    #[must_use]
    pub fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            message: message.into(),
        }
    }
}

/// Config service connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigServiceSettings {
    /// Base URL of the config service; `None` runs offline.
    pub base_url: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ConfigServiceSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Defaults applied to new quote forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotingSettings {
    /// Frequency preselected on new forms.
    pub default_frequency: Frequency,
    /// Contract length preselected on new forms.
    pub default_contract_months: u32,
}

impl Default for QuotingSettings {
    fn default() -> Self {
        Self {
            default_frequency: Frequency::Monthly,
            default_contract_months: DEFAULT_CONTRACT_MONTHS,
        }
    }
}

impl QuotingSettings {
    /// Billing terms preselected on new forms.
    #[must_use]
    pub fn default_terms(&self) -> BillingTerms {
        BillingTerms::new(self.default_frequency, self.default_contract_months)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Compact,
    /// One JSON object per line.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Compact,
            filter: "service_quote=info".to_string(),
        }
    }
}

/// Root settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Config service connection.
    pub config_service: ConfigServiceSettings,
    /// Quote form defaults.
    pub quoting: QuotingSettings,
    /// Logging.
    pub logging: LoggingSettings,
}

impl EngineSettings {
    /// Loads settings from `.env`, an optional file and the environment.
    ///
    /// Without `path`, `config/quote-engine.{toml,json,yaml}` is used if it
    /// exists. An explicit path must exist.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Load` if a source cannot be parsed and
    /// `SettingsError::Invalid` if a value is out of range.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Self = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses settings from a TOML document, without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Load` if the document cannot be parsed and
    /// `SettingsError::Invalid` if a value is out of range.
    pub fn from_toml_str(toml: &str) -> Result<Self, SettingsError> {
        let settings: Self = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Invalid` for the first out-of-range value.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.config_service.timeout_ms == 0 {
            return Err(SettingsError::invalid(
                "config_service.timeout_ms",
                "must be greater than zero",
            ));
        }
        if let Some(url) = &self.config_service.base_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(SettingsError::invalid(
                "config_service.base_url",
                format!("expected an http(s) URL, got {url}"),
            ));
        }
        if self.quoting.default_contract_months == 0 {
            return Err(SettingsError::invalid(
                "quoting.default_contract_months",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}
