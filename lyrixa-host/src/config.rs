//! Configuration loading for the Lyrixa host.
//!
//! All fields are required unless explicitly marked optional. No defaults.

use lyrixa_core::{LyrixaConfig, LyrixaError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    /// `EnvFilter` directives; `RUST_LOG` wins when set
    pub log_filter: String,
    pub log_format: LogFormat,
    /// Stop after this many ticks; run until interrupted when absent
    pub max_ticks: Option<u64>,
    pub lyrixa: LyrixaConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or LYRIXA_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error(transparent)]
    Lyrixa(#[from] LyrixaError),
}

impl HostConfig {
    /// Load from `--config <path>` or `LYRIXA_CONFIG`, apply `--ticks N`, and
    /// validate.
    pub fn load() -> Result<Self, ConfigError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let path = config_path_from_args(&args).or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let mut config = Self::from_path(&path)?;
        if let Some(ticks) = ticks_from_args(&args)? {
            config.max_ticks = Some(ticks);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: HostConfig = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_filter",
                reason: "must not be empty".to_string(),
            });
        }
        if self.max_ticks == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "max_ticks",
                reason: "must be > 0 when set".to_string(),
            });
        }
        self.lyrixa.validate()?;
        Ok(())
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var("LYRIXA_CONFIG").ok().map(PathBuf::from)
}

fn config_path_from_args(args: &[String]) -> Option<PathBuf> {
    let mut args = args.iter();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

fn ticks_from_args(args: &[String]) -> Result<Option<u64>, ConfigError> {
    let mut args = args.iter();
    while let Some(arg) = args.next() {
        if arg == "--ticks" {
            let value = args.next().ok_or_else(|| ConfigError::InvalidValue {
                field: "--ticks",
                reason: "missing value".to_string(),
            })?;
            let ticks = value.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                field: "--ticks",
                reason: format!("{}: {}", value, e),
            })?;
            return Ok(Some(ticks));
        }
    }
    Ok(None)
}
