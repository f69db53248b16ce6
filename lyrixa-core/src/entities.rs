//! Core entity records: messages, knowledge, collaboration history, thoughts

use crate::{
    clamp_unit, AgentName, AgentSeed, MessageId, MessagePriority, MessageStatus, MessageType,
    PatternSource, Timestamp,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Lowest expertise level an agent can hold.
pub const MIN_EXPERTISE: f64 = 1.0;
/// Highest expertise level an agent can reach.
pub const MAX_EXPERTISE: f64 = 2.0;

// ============================================================================
// MESSAGES
// ============================================================================

/// A message before the bus has assigned id, timestamp and status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDraft {
    pub sender: AgentName,
    pub recipient: AgentName,
    pub message_type: MessageType,
    pub content: String,
    pub priority: MessagePriority,
    pub response_expected: bool,
    pub in_reply_to: Option<MessageId>,
}

impl MessageDraft {
    /// Create a normal-priority draft that expects no response.
    pub fn new(sender: &str, recipient: &str, message_type: MessageType, content: &str) -> Self {
        Self {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            message_type,
            content: content.to_string(),
            priority: MessagePriority::Normal,
            response_expected: false,
            in_reply_to: None,
        }
    }

    /// Set priority.
    pub fn with_priority(mut self, priority: MessagePriority) -> Self {
        self.priority = priority;
        self
    }

    /// Ask the recipient to answer with a `Response`.
    pub fn expecting_response(mut self) -> Self {
        self.response_expected = true;
        self
    }

    /// Link this draft to the message it answers.
    pub fn in_reply_to(mut self, message_id: MessageId) -> Self {
        self.in_reply_to = Some(message_id);
        self
    }
}

/// A message recorded on the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Monotonic identifier assigned by the bus
    pub id: MessageId,
    pub sender: AgentName,
    /// May be a broadcast target such as "System" or "all agents"
    pub recipient: AgentName,
    pub message_type: MessageType,
    pub content: String,
    pub priority: MessagePriority,
    pub timestamp: Timestamp,
    pub status: MessageStatus,
    pub response_expected: bool,
    /// Request this message answers (responses only)
    pub in_reply_to: Option<MessageId>,
    /// Handler error text when `status == Error`
    pub error: Option<String>,
}

impl Message {
    /// Materialize a draft as a pending message.
    pub fn from_draft(id: MessageId, draft: MessageDraft, timestamp: Timestamp) -> Self {
        Self {
            id,
            sender: draft.sender,
            recipient: draft.recipient,
            message_type: draft.message_type,
            content: draft.content,
            priority: draft.priority,
            timestamp,
            status: MessageStatus::Pending,
            response_expected: draft.response_expected,
            in_reply_to: draft.in_reply_to,
            error: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == MessageStatus::Pending
    }
}

// ============================================================================
// KNOWLEDGE RECORDS
// ============================================================================

/// A learned pattern: either a shared insight or an interaction outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightRecord {
    pub source: PatternSource,
    pub content: String,
    pub confidence: f64,
    pub success: bool,
    pub recorded_at: Timestamp,
}

/// One recorded interaction of an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningSession {
    pub interaction_type: String,
    pub summary: String,
    pub success: bool,
    pub recorded_at: Timestamp,
}

/// A past collaboration, stored on both participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborationRecord {
    pub sender: AgentName,
    pub recipient: AgentName,
    pub content: String,
    pub success: bool,
    pub timestamp: Timestamp,
}

impl CollaborationRecord {
    /// Whether this record is between exactly `a` and `b`, in either direction.
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.sender == a && self.recipient == b) || (self.sender == b && self.recipient == a)
    }
}

/// Learning and collaboration state of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentKnowledge {
    pub name: AgentName,
    pub learned_patterns: Vec<InsightRecord>,
    pub successful_strategies: BTreeSet<String>,
    /// Other agent -> willingness to collaborate, in `[0, 1]`
    pub collaboration_preferences: BTreeMap<AgentName, f64>,
    pub knowledge_areas: BTreeSet<String>,
    /// In `[0, 1]`
    pub learning_confidence: f64,
    /// In `[1, 2]`, never decreases
    pub expertise_level: f64,
    pub collaboration_history: Vec<CollaborationRecord>,
    pub learning_sessions: Vec<LearningSession>,
    pub total_interactions: u64,
    pub successful_interactions: u64,
    /// `successful / total * 100`, 0 before the first interaction
    pub success_rate: f64,
}

impl AgentKnowledge {
    /// Create the knowledge record for a seeded agent.
    pub fn from_seed(seed: &AgentSeed) -> Self {
        Self {
            name: seed.name.clone(),
            learned_patterns: Vec::new(),
            successful_strategies: BTreeSet::new(),
            collaboration_preferences: BTreeMap::new(),
            knowledge_areas: seed.knowledge_areas.iter().cloned().collect(),
            learning_confidence: clamp_unit(seed.learning_confidence),
            expertise_level: seed.expertise_level.clamp(MIN_EXPERTISE, MAX_EXPERTISE),
            collaboration_history: Vec::new(),
            learning_sessions: Vec::new(),
            total_interactions: 0,
            successful_interactions: 0,
            success_rate: 0.0,
        }
    }

    /// Preference toward `other`, or `default` if none has been recorded.
    pub fn preference_for(&self, other: &str, default: f64) -> f64 {
        self.collaboration_preferences
            .get(other)
            .copied()
            .unwrap_or(default)
    }

    /// Number of collaborations with `other` inside `[since, until]`.
    pub fn collaborations_with_between(
        &self,
        other: &str,
        since: Timestamp,
        until: Timestamp,
    ) -> usize {
        self.collaboration_history
            .iter()
            .filter(|r| r.is_between(&self.name, other))
            .filter(|r| r.timestamp >= since && r.timestamp <= until)
            .count()
    }

    /// Knowledge areas rendered as lowercase plain topics
    /// ("Goal_Planning" -> "goal planning").
    pub fn topics(&self) -> impl Iterator<Item = String> + '_ {
        self.knowledge_areas
            .iter()
            .map(|a| a.replace('_', " ").to_lowercase())
    }

    pub fn summary(&self) -> KnowledgeSummary {
        KnowledgeSummary {
            agent: self.name.clone(),
            expertise_level: self.expertise_level,
            learning_confidence: self.learning_confidence,
            patterns_count: self.learned_patterns.len(),
            strategies_count: self.successful_strategies.len(),
            success_rate: self.success_rate,
            total_interactions: self.total_interactions,
        }
    }
}

/// Read-only view of an agent's knowledge for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeSummary {
    pub agent: AgentName,
    pub expertise_level: f64,
    pub learning_confidence: f64,
    pub patterns_count: usize,
    pub strategies_count: usize,
    pub success_rate: f64,
    pub total_interactions: u64,
}

// ============================================================================
// THOUGHT STREAM ENTRIES
// ============================================================================

/// One line of the human-readable thought stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thought {
    pub agent: AgentName,
    pub timestamp: Timestamp,
    pub text: String,
}

impl Thought {
    pub fn new(agent: &str, text: impl Into<String>) -> Self {
        Self {
            agent: agent.to_string(),
            timestamp: Utc::now(),
            text: text.into(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
