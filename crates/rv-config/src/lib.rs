//! # rv-config
//!
//! Layered configuration loading for rvlake using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`RVL_*` prefix, `__` as separator)
//! 2. Working-directory `rvlake.toml`
//! 3. User-level `~/.config/rvlake/config.toml`
//! 4. Built-in defaults
//!
//! Command-line flags are applied on top by the binary.
//!
//! # Environment Variable Mapping
//!
//! Figment maps `RVL_STORE__PATH` -> `store.path`, `RVL_OUTPUT__PRETTY` -> `output.pretty`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use rv_config::RvConfig;
//!
//! let config = RvConfig::load_with_dotenv().expect("config");
//!
//! if config.store.is_in_memory() {
//!     println!("analytical store lives in memory for this run");
//! }
//! ```

mod error;
mod ingest;
mod output;
mod store;

pub use error::ConfigError;
pub use ingest::IngestConfig;
pub use output::OutputConfig;
pub use store::StoreConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project-local config file name, looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "rvlake.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "RVL_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RvConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl RvConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed, or
    /// [`ConfigError::InvalidValue`] if a value fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Loads `.env` from the current directory (if present) before building
    /// the figment. This is the typical entry point for the CLI.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Working-directory config
        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values that would only fail later in the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ingest.min_tables == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ingest.min_tables".into(),
                reason: "must be at least 1".into(),
            });
        }
        if let Some(repo) = &self.store.extension_repository
            && repo.trim().is_empty()
        {
            return Err(ConfigError::InvalidValue {
                field: "store.extension_repository".into(),
                reason: "must not be blank when set".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rvlake").join("config.toml"))
    }
}
