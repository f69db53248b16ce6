//! Error types for Lyrixa operations

use crate::{AgentName, MessageId, MessageType};
use thiserror::Error;

/// Agent coordination errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentError {
    #[error("Unknown agent: {agent}")]
    UnknownAgent { agent: AgentName },

    #[error("Unknown message: {message_id}")]
    UnknownMessage { message_id: MessageId },

    #[error("Handler for {message_type} message {message_id} failed: {reason}")]
    HandlerFailed {
        message_id: MessageId,
        message_type: MessageType,
        reason: String,
    },
}

impl AgentError {
    pub fn unknown_agent(agent: &str) -> Self {
        AgentError::UnknownAgent {
            agent: agent.to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Duplicate agent in registry: {agent}")]
    DuplicateAgent { agent: AgentName },
}

/// Master error type for all Lyrixa errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LyrixaError {
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for Lyrixa operations.
pub type LyrixaResult<T> = Result<T, LyrixaError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_agent_display() {
        let err = AgentError::unknown_agent("GhostAgent");
        assert_eq!(format!("{}", err), "Unknown agent: GhostAgent");
    }

    #[test]
    fn test_handler_failed_display() {
        let err = AgentError::HandlerFailed {
            message_id: 4,
            message_type: MessageType::Insight,
            reason: "boom".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("insight"));
        assert!(msg.contains("4"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn test_config_error_wraps_into_master() {
        let err: LyrixaError = ConfigError::MissingRequired {
            field: "agents".to_string(),
        }
        .into();
        assert!(matches!(err, LyrixaError::Config(_)));
        assert!(format!("{}", err).starts_with("Config error:"));
    }
}
