//! Lyrixa Core - Entity Types
//!
//! Plain data records shared by every Lyrixa crate: identifiers, message
//! enums, per-agent knowledge records, errors and configuration.
//! Behavior that mutates these records lives in `lyrixa-agents`.

pub mod config;
pub mod entities;
pub mod enums;
pub mod error;
pub mod identity;

pub use config::{AgentSeed, LyrixaConfig};
pub use entities::{
    AgentKnowledge, CollaborationRecord, InsightRecord, KnowledgeSummary, LearningSession,
    Message, MessageDraft, Thought,
};
pub use enums::{MessagePriority, MessageStatus, MessageType, PatternSource};
pub use error::{AgentError, ConfigError, LyrixaError, LyrixaResult};
pub use identity::{clamp_unit, AgentName, MessageId, Timestamp};
