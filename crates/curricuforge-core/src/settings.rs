//! Layered configuration for CurricuForge applications.
//!
//! `defaults/curricuforge.default.toml` is embedded so every binary starts from
//! the same values. [`Loader`] layers user files, `CURRICUFORGE__*` environment
//! variables and explicit overrides on top before deserializing into [`Settings`].

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, ValueKind};
use curricuforge_client::ClientConfig;
use serde::Deserialize;

const DEFAULT_TOML: &str = include_str!("../defaults/curricuforge.default.toml");
pub const ENV_PREFIX: &str = "CURRICUFORGE";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
}

/// Where and how to reach the generation service.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl From<&ApiSettings> for ClientConfig {
    fn from(api: &ApiSettings) -> Self {
        ClientConfig {
            base_url: api.base_url.clone(),
            timeout: Duration::from_secs(api.timeout_secs),
            user_agent: api.user_agent.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer `CURRICUFORGE__API__BASE_URL` style variables from the process environment.
    pub fn with_env(mut self) -> Self {
        self.builder = self.builder.add_source(environment());
        self
    }

    /// Same as [`Loader::with_env`] but reads from the given variables.
    pub fn with_env_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.builder = self.builder.add_source(environment().source(Some(vars)));
        self
    }

    /// Apply a single key/value override (CLI flags land here).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Settings, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

pub fn load_defaults() -> Result<Settings, ConfigError> {
    Loader::new().build()
}
