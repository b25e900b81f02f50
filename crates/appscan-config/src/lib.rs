//! # appscan-config
//!
//! Layered configuration loading for appscan using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`APPSCAN_*` prefix, `__` as separator)
//! 2. Project-level `.appscan.toml`, or the file passed with `--config`
//! 3. User-level `~/.config/appscan/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `APPSCAN_DISCOVERY__KEEPER_SUFFIX` -> `discovery.keeper_suffix`,
//! `APPSCAN_GENERAL__TIMEOUT_SECS` -> `general.timeout_secs`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use appscan_config::AppScanConfig;
//!
//! let config = AppScanConfig::load_with_dotenv(None).expect("config");
//! println!("keeper suffix: {}", config.discovery.keeper_suffix);
//! ```

mod error;
mod general;

pub use error::ConfigError;
pub use general::GeneralConfig;

use appscan_discovery::DiscoveryOptions;
use appscan_discovery::options::split_qualified;
use appscan_parser::WalkOptions;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local config file, looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".appscan.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppScanConfig {
    #[serde(default)]
    pub walk: WalkOptions,
    #[serde(default)]
    pub discovery: DiscoveryOptions,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl AppScanConfig {
    /// Load configuration from the default sources (TOML files + environment).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when extraction fails or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, with `explicit` replacing the project-local file.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when `explicit` does not exist, extraction
    /// fails, or a value is invalid.
    pub fn load_from(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit
            && !path.is_file()
        {
            return Err(ConfigError::invalid(
                "config",
                format!("{} is not a file", path.display()),
            ));
        }
        let config: Self = Self::figment(explicit).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the working directory.
    ///
    /// # Errors
    /// See [`Self::load_from`].
    pub fn load_with_dotenv(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        // A missing .env is not an error.
        let _ = dotenvy::dotenv();
        Self::load_from(explicit)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or add providers on top.
    #[must_use]
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        match explicit {
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => {
                let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
                if local_path.exists() {
                    figment = figment.merge(Toml::file(local_path));
                }
            }
        }

        figment.merge(Env::prefixed("APPSCAN_").split("__"))
    }

    /// Reject values discovery cannot work with.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.walk
            .validate()
            .map_err(|e| ConfigError::invalid("walk", e.to_string()))?;

        let discovery = &self.discovery;
        if discovery.capabilities.is_empty() {
            return Err(ConfigError::invalid(
                "discovery.capabilities",
                "at least one capability is required",
            ));
        }
        if let Some(method) = discovery.capabilities.iter().find(|m| m.name.is_empty()) {
            return Err(ConfigError::invalid(
                "discovery.capabilities",
                format!("capability with empty name ({method:?})"),
            ));
        }
        if discovery.registry_constructors.is_empty() {
            return Err(ConfigError::invalid(
                "discovery.registry_constructors",
                "at least one constructor is required",
            ));
        }
        for ctor in &discovery.registry_constructors {
            if split_qualified(ctor).is_none() {
                return Err(ConfigError::invalid(
                    "discovery.registry_constructors",
                    format!("`{ctor}` is not of the form import/path.Function"),
                ));
            }
        }
        for external in &discovery.external_types {
            for name in std::iter::once(&external.name).chain(&external.embeds) {
                if split_qualified(name).is_none() {
                    return Err(ConfigError::invalid(
                        "discovery.external_types",
                        format!("`{name}` is not of the form import/path.Type"),
                    ));
                }
            }
        }
        if discovery.keeper_suffix.is_empty() {
            return Err(ConfigError::invalid(
                "discovery.keeper_suffix",
                "must not be empty",
            ));
        }
        if discovery.max_embed_depth == 0 {
            return Err(ConfigError::invalid(
                "discovery.max_embed_depth",
                "must be at least 1",
            ));
        }
        if discovery.max_eval_depth == 0 {
            return Err(ConfigError::invalid(
                "discovery.max_eval_depth",
                "must be at least 1",
            ));
        }
        if self.general.timeout_secs == Some(0) {
            return Err(ConfigError::invalid(
                "general.timeout_secs",
                "must be at least 1 when set",
            ));
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("appscan").join("config.toml"))
    }
}
