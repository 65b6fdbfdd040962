//! # pulse-config
//!
//! Layered configuration loading for Pulse using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PULSE_*` prefix, `__` as separator)
//! 2. Project-level `.pulse/config.toml`
//! 3. User-level `~/.config/pulse/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `PULSE_TURSO__URL` -> `turso.url`,
//! `PULSE_ACCESS__LOAD_FAILURE_POLICY` -> `access.load_failure_policy`, etc.
//!
//! ```no_run
//! use pulse_config::PulseConfig;
//!
//! let config = PulseConfig::load_with_dotenv().expect("config");
//! if config.turso.is_configured() {
//!     println!("Turso URL: {}", config.turso.url);
//! }
//! ```

mod access;
mod error;
mod general;
mod turso;

pub use access::{AccessConfig, LoadFailurePolicy};
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use turso::TursoConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PulseConfig {
    #[serde(default)]
    pub turso: TursoConfig,
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl PulseConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed or a value
    /// has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration after loading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".pulse/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("PULSE_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pulse").join("config.toml"))
    }
}
