//! Layered configuration loading.
//!
//! A TOML file provides the base, `SONGBOOK_`-prefixed environment
//! variables override it. Nested keys are joined with `__`, so
//! `SONGBOOK_METADATA__URL` sets `metadata.url`.

use std::path::Path;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};

use super::{types::Config, ConfigError};

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "SONGBOOK_";

/// The provider stack used by [`load_config`].
pub fn config_figment(path: &Path) -> Figment {
    Figment::from(Toml::file(path)).merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load configuration from a file, applying environment overrides.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(config_figment(path))
}

/// Load configuration from a TOML string, without environment overrides.
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    extract(Figment::from(Toml::string(toml_str)))
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}
