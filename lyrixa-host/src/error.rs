//! Error types for the host.

use crate::config::ConfigError;
use lyrixa_core::LyrixaError;

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Lyrixa(#[from] LyrixaError),
    #[error("Failed to serialize summaries: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to init tracing: {0}")]
    Telemetry(String),
}
