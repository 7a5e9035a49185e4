//! Server configuration
//!
//! Read from the environment at startup. Every key is optional:
//!
//! | Variable | Default |
//! |---|---|
//! | `BEAM_HOST` | `0.0.0.0` |
//! | `BEAM_PORT` | `5000` |
//! | `BEAM_MODELS_DIR` | `saved_models` |
//! | `BEAM_STEP_PERCENT` | `0.01` |
//! | `BEAM_MAX_STEP_PERCENT` | `0.20` |

use std::path::PathBuf;
use std::str::FromStr;

use beam_core::corrector::SearchConfig;
use beam_core::errors::{DesignError, DesignResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MODELS_DIR: &str = "saved_models";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory of model files loaded at startup
    pub models_dir: PathBuf,
    /// Correction search parameters applied to every request
    pub search: SearchConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            models_dir: PathBuf::from(DEFAULT_MODELS_DIR),
            search: SearchConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load from process environment variables.
    pub fn from_env() -> DesignResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Unset keys keep their defaults;
    /// set but unparseable keys are errors.
    pub fn from_lookup<F>(lookup: F) -> DesignResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();

        if let Some(host) = lookup("BEAM_HOST") {
            config.host = host;
        }
        if let Some(port) = parse_var(&lookup, "BEAM_PORT")? {
            config.port = port;
        }
        if let Some(dir) = lookup("BEAM_MODELS_DIR") {
            config.models_dir = PathBuf::from(dir);
        }
        if let Some(step) = parse_var(&lookup, "BEAM_STEP_PERCENT")? {
            config.search.step_percent = step;
        }
        if let Some(max_step) = parse_var(&lookup, "BEAM_MAX_STEP_PERCENT")? {
            config.search.max_step_percent = max_step;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the search parameters, reporting failures under their env keys.
    pub fn validate(&self) -> DesignResult<()> {
        self.search.validate().map_err(|e| match e {
            DesignError::Config { key, reason } => {
                let env_key = match key.as_str() {
                    "step_percent" => "BEAM_STEP_PERCENT",
                    "max_step_percent" => "BEAM_MAX_STEP_PERCENT",
                    _ => key.as_str(),
                };
                DesignError::config(env_key, reason)
            }
            other => other,
        })
    }

    /// `host:port` for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> DesignResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| DesignError::config(key, format!("'{}': {}", raw, e))),
    }
}
