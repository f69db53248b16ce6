//! Configuration types

use crate::{ConfigError, LyrixaResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Seeded defaults for one registered agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentSeed {
    pub name: String,
    /// Topic tags, underscores for spaces ("goal_planning")
    pub knowledge_areas: Vec<String>,
    pub learning_confidence: f64,
    pub expertise_level: f64,
}

impl AgentSeed {
    /// Seed with the stock starting values (confidence 0.5, expertise 1.0).
    pub fn new(name: &str, knowledge_areas: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            knowledge_areas: knowledge_areas.iter().map(|a| a.to_string()).collect(),
            learning_confidence: 0.5,
            expertise_level: 1.0,
        }
    }
}

/// Master configuration for the collaboration scaffold.
/// Every field is explicit; use `default_config` for the stock team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LyrixaConfig {
    /// Interval between ticks
    pub tick_interval_ms: u64,
    /// Chance per tick of a spontaneous collaboration
    pub spontaneous_probability: f64,
    /// Trailing window used to count recent collaborations
    pub history_window_ms: u64,
    /// Maximum entries kept in the thought stream
    pub thought_capacity: usize,
    /// Maximum messages kept on the bus (pending messages are never pruned)
    pub message_retention: Option<usize>,
    /// Preference below which an agent refuses to collaborate
    pub min_preference: f64,
    /// A workload draw must exceed this to pass
    pub workload_threshold: f64,
    /// Pairs with this many recent collaborations are not picked spontaneously
    pub max_recent_collaborations: usize,
    /// Preference assumed between agents with no history
    pub default_preference: f64,
    /// Seed for the random source; entropy when absent
    pub seed: Option<u64>,
    pub agents: Vec<AgentSeed>,
}

impl LyrixaConfig {
    /// The stock Lyrixa team with the usual tuning.
    pub fn default_config() -> Self {
        Self {
            tick_interval_ms: 3_000,
            spontaneous_probability: 0.1,
            history_window_ms: 3_600_000,
            thought_capacity: 100,
            message_retention: Some(500),
            min_preference: 0.3,
            workload_threshold: 0.3,
            max_recent_collaborations: 2,
            default_preference: 0.5,
            seed: None,
            agents: vec![
                AgentSeed::new("GoalAgent", &["goal_planning", "optimization", "task_tracking"]),
                AgentSeed::new(
                    "MemoryAgent",
                    &["memory_management", "pattern_recognition", "context_recall"],
                ),
                AgentSeed::new(
                    "PluginAgent",
                    &["plugin_management", "tool_integration", "automation"],
                ),
                AgentSeed::new(
                    "ReflectionAgent",
                    &["self_reflection", "pattern_recognition", "learning"],
                ),
                AgentSeed::new(
                    "EscalationAgent",
                    &["error_handling", "alert_triage", "system_health"],
                ),
            ],
        }
    }

    /// Same as `default_config` with a fixed random seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default_config()
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn history_window(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.history_window_ms.min(i64::MAX as u64) as i64)
    }

    /// Validate the configuration.
    ///
    /// Validates:
    /// - intervals and capacities are positive
    /// - probabilities, thresholds and seeded scores are in range
    /// - the agent registry is non-empty with unique, non-blank names
    pub fn validate(&self) -> LyrixaResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(invalid("tick_interval_ms", self.tick_interval_ms, "must be > 0"));
        }
        if self.history_window_ms == 0 {
            return Err(invalid("history_window_ms", self.history_window_ms, "must be > 0"));
        }
        if self.thought_capacity == 0 {
            return Err(invalid("thought_capacity", self.thought_capacity, "must be > 0"));
        }
        if self.message_retention == Some(0) {
            return Err(invalid("message_retention", 0, "must be > 0 when set"));
        }
        if self.max_recent_collaborations == 0 {
            return Err(invalid(
                "max_recent_collaborations",
                self.max_recent_collaborations,
                "must be > 0",
            ));
        }
        for (field, value) in [
            ("spontaneous_probability", self.spontaneous_probability),
            ("min_preference", self.min_preference),
            ("workload_threshold", self.workload_threshold),
            ("default_preference", self.default_preference),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, value, "must be between 0.0 and 1.0"));
            }
        }

        if self.agents.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "agents".to_string(),
            }
            .into());
        }
        let mut seen = HashSet::new();
        for seed in &self.agents {
            if seed.name.trim().is_empty() {
                return Err(invalid("agents.name", "\"\"", "must not be empty"));
            }
            if !seen.insert(seed.name.as_str()) {
                return Err(ConfigError::DuplicateAgent {
                    agent: seed.name.clone(),
                }
                .into());
            }
            if !(0.0..=1.0).contains(&seed.learning_confidence) {
                return Err(invalid(
                    &format!("agents.{}.learning_confidence", seed.name),
                    seed.learning_confidence,
                    "must be between 0.0 and 1.0",
                ));
            }
            if !(1.0..=2.0).contains(&seed.expertise_level) {
                return Err(invalid(
                    &format!("agents.{}.expertise_level", seed.name),
                    seed.expertise_level,
                    "must be between 1.0 and 2.0",
                ));
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> crate::LyrixaError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

// ============================================================================
// TESTS
// ============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
