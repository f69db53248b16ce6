//! Per-agent knowledge store.
//!
//! Owns every agent's learning and collaboration state and the handful of
//! rules that move it: success-rate bookkeeping, preference nudges after a
//! collaboration, insight confidence and slow expertise growth.

use chrono::Utc;
use lyrixa_core::entities::MAX_EXPERTISE;
use lyrixa_core::{
    clamp_unit, AgentError, AgentKnowledge, AgentName, AgentSeed, CollaborationRecord,
    InsightRecord, KnowledgeSummary, LearningSession, LyrixaResult, PatternSource, Timestamp,
};
use std::collections::BTreeMap;

/// Preference gained by each side after a successful collaboration.
pub const PREFERENCE_GAIN: f64 = 0.1;
/// Preference lost by each side after a failed collaboration.
pub const PREFERENCE_LOSS: f64 = 0.05;
/// Learning confidence gained per shared insight.
pub const INSIGHT_CONFIDENCE_GAIN: f64 = 0.05;
/// Expertise gained per qualifying `update_expertise` call.
pub const EXPERTISE_STEP: f64 = 0.005;
/// How many of the newest patterns `update_expertise` looks at.
pub const EXPERTISE_WINDOW: usize = 10;
/// Successes needed inside the window to gain expertise.
pub const EXPERTISE_MIN_SUCCESSES: usize = 2;

/// Substring (lowercase) found in a successful pattern -> strategy tag.
pub const STRATEGY_KEYWORDS: &[(&str, &str)] = &[
    ("optimiz", "optimization_focus"),
    ("collaborat", "collaborative_approach"),
    ("pattern", "pattern_recognition"),
    ("goal", "goal_alignment"),
    ("memory", "memory_leverage"),
    ("plugin", "tool_integration"),
];

/// Outcome of an `update_expertise` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpertiseUpdate {
    pub leveled_up: bool,
    pub expertise_level: f64,
    /// Strategy tags that were not known before this call
    pub new_strategies: Vec<String>,
}

/// Knowledge records keyed by agent name.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    agents: BTreeMap<AgentName, AgentKnowledge>,
    default_preference: f64,
}

impl KnowledgeStore {
    pub fn new(default_preference: f64) -> Self {
        Self {
            agents: BTreeMap::new(),
            default_preference: clamp_unit(default_preference),
        }
    }

    /// Register every seed and give each pair the default preference.
    pub fn from_seeds(seeds: &[AgentSeed], default_preference: f64) -> Self {
        let mut store = Self::new(default_preference);
        for seed in seeds {
            store.register(seed);
        }
        let names: Vec<AgentName> = store.agents.keys().cloned().collect();
        let default = store.default_preference;
        for knowledge in store.agents.values_mut() {
            for other in names.iter().filter(|n| **n != knowledge.name) {
                knowledge
                    .collaboration_preferences
                    .insert(other.clone(), default);
            }
        }
        store
    }

    /// Add an agent. Returns `false` (and changes nothing) if the name exists.
    pub fn register(&mut self, seed: &AgentSeed) -> bool {
        if self.agents.contains_key(&seed.name) {
            return false;
        }
        self.agents
            .insert(seed.name.clone(), AgentKnowledge::from_seed(seed));
        true
    }

    pub fn contains(&self, agent: &str) -> bool {
        self.agents.contains_key(agent)
    }

    pub fn get(&self, agent: &str) -> Option<&AgentKnowledge> {
        self.agents.get(agent)
    }

    fn get_mut(&mut self, agent: &str) -> LyrixaResult<&mut AgentKnowledge> {
        self.agents
            .get_mut(agent)
            .ok_or_else(|| AgentError::unknown_agent(agent).into())
    }

    /// Registered agent names, sorted.
    pub fn names(&self) -> Vec<AgentName> {
        self.agents.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn default_preference(&self) -> f64 {
        self.default_preference
    }

    /// Preference of `from` toward `to`; `None` if `from` is unknown.
    pub fn preference(&self, from: &str, to: &str) -> Option<f64> {
        self.agents
            .get(from)
            .map(|k| k.preference_for(to, self.default_preference))
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Record one interaction and refresh the agent's success rate.
    pub fn record_interaction(
        &mut self,
        agent: &str,
        interaction_type: &str,
        summary: &str,
        success: bool,
    ) -> LyrixaResult<()> {
        let now = Utc::now();
        let knowledge = self.get_mut(agent)?;

        knowledge.learning_sessions.push(LearningSession {
            interaction_type: interaction_type.to_string(),
            summary: summary.to_string(),
            success,
            recorded_at: now,
        });
        knowledge.learned_patterns.push(InsightRecord {
            source: PatternSource::Interaction,
            content: format!("{}: {}", interaction_type, summary),
            confidence: knowledge.learning_confidence,
            success,
            recorded_at: now,
        });

        knowledge.total_interactions += 1;
        if success {
            knowledge.successful_interactions += 1;
        }
        knowledge.success_rate = (knowledge.successful_interactions as f64
            / knowledge.total_interactions as f64)
            * 100.0;
        Ok(())
    }

    /// Record a collaboration on both participants and nudge their
    /// preferences toward each other. Nothing changes if either is unknown.
    pub fn record_collaboration(
        &mut self,
        sender: &str,
        recipient: &str,
        content: &str,
        success: bool,
    ) -> LyrixaResult<()> {
        self.record_collaboration_at(sender, recipient, content, success, Utc::now())
    }

    /// `record_collaboration` with an explicit timestamp.
    pub fn record_collaboration_at(
        &mut self,
        sender: &str,
        recipient: &str,
        content: &str,
        success: bool,
        at: Timestamp,
    ) -> LyrixaResult<()> {
        for agent in [sender, recipient] {
            if !self.contains(agent) {
                return Err(AgentError::unknown_agent(agent).into());
            }
        }

        let record = CollaborationRecord {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            content: content.to_string(),
            success,
            timestamp: at,
        };
        let delta = if success {
            PREFERENCE_GAIN
        } else {
            -PREFERENCE_LOSS
        };

        let sides: Vec<(&str, &str)> = if sender == recipient {
            vec![(sender, recipient)]
        } else {
            vec![(sender, recipient), (recipient, sender)]
        };
        let default = self.default_preference;
        for (me, other) in sides {
            let knowledge = self.get_mut(me)?;
            knowledge.collaboration_history.push(record.clone());
            if me != other {
                let current = knowledge.preference_for(other, default);
                knowledge
                    .collaboration_preferences
                    .insert(other.to_string(), clamp_unit(current + delta));
            }
        }

        tracing::debug!(sender, recipient, success, "collaboration recorded");
        Ok(())
    }

    /// Share an insight and return the confidence it carries:
    /// `0.7 * (0.6 * expertise + 0.4 * learning_confidence)`.
    pub fn share_insight(&mut self, agent: &str, content: &str) -> LyrixaResult<f64> {
        let knowledge = self.get_mut(agent)?;

        let confidence =
            0.7 * (0.6 * knowledge.expertise_level + 0.4 * knowledge.learning_confidence);
        knowledge.learned_patterns.push(InsightRecord {
            source: PatternSource::Insight,
            content: content.to_string(),
            confidence,
            success: true,
            recorded_at: Utc::now(),
        });
        knowledge.learning_confidence =
            clamp_unit(knowledge.learning_confidence + INSIGHT_CONFIDENCE_GAIN);

        Ok(confidence)
    }

    /// Grow expertise when enough recent patterns succeeded, and pick up any
    /// strategy tags mentioned by those successes.
    pub fn update_expertise(&mut self, agent: &str) -> LyrixaResult<ExpertiseUpdate> {
        let knowledge = self.get_mut(agent)?;

        let recent_successes: Vec<String> = knowledge
            .learned_patterns
            .iter()
            .rev()
            .take(EXPERTISE_WINDOW)
            .filter(|p| p.success)
            .map(|p| p.content.to_lowercase())
            .collect();

        let mut update = ExpertiseUpdate {
            leveled_up: false,
            expertise_level: knowledge.expertise_level,
            new_strategies: Vec::new(),
        };
        if recent_successes.len() < EXPERTISE_MIN_SUCCESSES {
            return Ok(update);
        }

        let before = knowledge.expertise_level;
        knowledge.expertise_level = (before + EXPERTISE_STEP).min(MAX_EXPERTISE);
        update.leveled_up = knowledge.expertise_level > before;
        update.expertise_level = knowledge.expertise_level;

        for content in &recent_successes {
            for (keyword, tag) in STRATEGY_KEYWORDS {
                if content.contains(keyword)
                    && knowledge.successful_strategies.insert(tag.to_string())
                {
                    update.new_strategies.push(tag.to_string());
                }
            }
        }

        if update.leveled_up || !update.new_strategies.is_empty() {
            tracing::debug!(
                agent,
                expertise = update.expertise_level,
                new_strategies = ?update.new_strategies,
                "expertise updated"
            );
        }
        Ok(update)
    }

    /// Add a topic tag. Returns whether it was new.
    pub fn add_knowledge_area(&mut self, agent: &str, area: &str) -> LyrixaResult<bool> {
        let knowledge = self.get_mut(agent)?;
        Ok(knowledge.knowledge_areas.insert(area.to_string()))
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    pub fn get_summary(&self, agent: &str) -> Option<KnowledgeSummary> {
        self.agents.get(agent).map(AgentKnowledge::summary)
    }

    /// Summaries of every agent, sorted by name.
    pub fn summaries(&self) -> Vec<KnowledgeSummary> {
        self.agents.values().map(AgentKnowledge::summary).collect()
    }

    /// Agent whose topics appear most often in `content`.
    /// Ties go to higher expertise, then to the lexically first name.
    /// `None` when nothing matches.
    pub fn best_match(&self, content: &str) -> Option<&str> {
        let lowered = content.to_lowercase();
        self.agents
            .values()
            .filter_map(|k| {
                let hits = k.topics().filter(|t| lowered.contains(t.as_str())).count();
                (hits > 0).then_some((k, hits))
            })
            .max_by(|(a, a_hits), (b, b_hits)| {
                a_hits
                    .cmp(b_hits)
                    .then(a.expertise_level.total_cmp(&b.expertise_level))
                    .then(b.name.cmp(&a.name))
            })
            .map(|(k, _)| k.name.as_str())
    }
}

// ============================================================================
// TESTS
// ============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
