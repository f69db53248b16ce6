//! Enum types for Lyrixa messages and knowledge records

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// MESSAGE ENUMS
// ============================================================================

/// Type of inter-agent message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Ask another agent for help
    Request,
    /// Answer to an earlier request
    Response,
    /// Share something learned
    Insight,
    /// Something needs attention
    Alert,
    /// Joint work between two agents
    Collaboration,
}

impl MessageType {
    /// All message types, in declaration order.
    pub const ALL: [MessageType; 5] = [
        MessageType::Request,
        MessageType::Response,
        MessageType::Insight,
        MessageType::Alert,
        MessageType::Collaboration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Request => "request",
            MessageType::Response => "response",
            MessageType::Insight => "insight",
            MessageType::Alert => "alert",
            MessageType::Collaboration => "collaboration",
        }
    }
}

/// Priority level for messages. Ordered from lowest to highest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MessagePriority {
    /// Can be delayed
    Low,
    /// Default priority
    #[default]
    Normal,
    /// Should be processed soon
    High,
    /// Must be processed immediately
    Critical,
}

impl MessagePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessagePriority::Low => "low",
            MessagePriority::Normal => "normal",
            MessagePriority::High => "high",
            MessagePriority::Critical => "critical",
        }
    }
}

/// Processing status of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    /// Waiting for the next tick
    Pending,
    /// Handler ran to completion
    Processed,
    /// Handler failed; the error text is kept on the message
    Error,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Pending => "pending",
            MessageStatus::Processed => "processed",
            MessageStatus::Error => "error",
        }
    }

    /// Whether the message has been handled, successfully or not.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MessageStatus::Pending)
    }
}

/// Where a learned pattern came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternSource {
    /// Produced by `share_insight`
    Insight,
    /// Produced by `record_interaction`
    Interaction,
}

// ============================================================================
// DISPLAY
// ============================================================================

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for MessagePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
