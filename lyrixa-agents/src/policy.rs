//! Collaboration policy: whether two agents should work together, and which
//! pair to nudge into a spontaneous collaboration.
//!
//! Unknown agents are never an error here; they simply yield `false`/`None`.

use crate::knowledge::KnowledgeStore;
use crate::random::{pick, RandomSource};
use chrono::{DateTime, Utc};
use lyrixa_core::{AgentKnowledge, AgentName, LyrixaConfig, Timestamp};

/// Thresholds for collaboration decisions.
#[derive(Debug, Clone, PartialEq)]
pub struct CollaborationPolicy {
    /// Preference below which the sender will not collaborate
    pub min_preference: f64,
    /// A workload draw must exceed this
    pub workload_threshold: f64,
    /// Pairs with this many collaborations inside the window are skipped
    pub max_recent_collaborations: usize,
    /// Trailing window for counting recent collaborations
    pub history_window: chrono::Duration,
}

impl Default for CollaborationPolicy {
    fn default() -> Self {
        Self::from_config(&LyrixaConfig::default_config())
    }
}

impl CollaborationPolicy {
    pub fn from_config(config: &LyrixaConfig) -> Self {
        Self {
            min_preference: config.min_preference,
            workload_threshold: config.workload_threshold,
            max_recent_collaborations: config.max_recent_collaborations,
            history_window: config.history_window(),
        }
    }

    /// Decide whether `recipient` takes on `content` for `sender`.
    ///
    /// The preference gate runs before any randomness is consumed. Once it
    /// passes, exactly one workload value is drawn regardless of relevance.
    pub fn should_collaborate(
        &self,
        store: &KnowledgeStore,
        sender: &str,
        recipient: &str,
        content: &str,
        rng: &mut dyn RandomSource,
    ) -> bool {
        let (Some(sender_knowledge), Some(recipient_knowledge)) =
            (store.get(sender), store.get(recipient))
        else {
            return false;
        };

        let preference =
            sender_knowledge.preference_for(recipient, store.default_preference());
        if preference < self.min_preference {
            tracing::debug!(sender, recipient, preference, "collaboration refused on preference");
            return false;
        }

        let relevant = Self::is_relevant(recipient_knowledge, content);
        // No workload is tracked anywhere; this draw stands in for it.
        let workload = rng.next_f64();
        let available = workload > self.workload_threshold;

        tracing::debug!(sender, recipient, relevant, workload, "collaboration decision");
        relevant && available
    }

    /// Whether any of the agent's topics occurs in `content` (case-insensitive).
    pub fn is_relevant(knowledge: &AgentKnowledge, content: &str) -> bool {
        let lowered = content.to_lowercase();
        knowledge
            .topics()
            .any(|topic| lowered.contains(topic.as_str()))
    }

    /// Unordered pairs of known, distinct agents with fewer than
    /// `max_recent_collaborations` collaborations in `[now - window, now]`.
    /// Pairs follow the order of `agents`.
    pub fn eligible_pairs(
        &self,
        store: &KnowledgeStore,
        agents: &[AgentName],
        window: chrono::Duration,
        now: Timestamp,
    ) -> Vec<(AgentName, AgentName)> {
        let since = now
            .checked_sub_signed(window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let known: Vec<&AgentKnowledge> = agents.iter().filter_map(|a| store.get(a)).collect();

        let mut pairs = Vec::new();
        for (i, a) in known.iter().enumerate() {
            for b in known.iter().skip(i + 1) {
                if a.name == b.name {
                    continue;
                }
                let recent = a.collaborations_with_between(&b.name, since, now);
                if recent < self.max_recent_collaborations {
                    pairs.push((a.name.clone(), b.name.clone()));
                }
            }
        }
        pairs
    }

    /// Pick one eligible pair uniformly, or `None` if there is none.
    pub fn select_spontaneous_pair(
        &self,
        store: &KnowledgeStore,
        agents: &[AgentName],
        window: chrono::Duration,
        now: Timestamp,
        rng: &mut dyn RandomSource,
    ) -> Option<(AgentName, AgentName)> {
        let pairs = self.eligible_pairs(store, agents, window, now);
        pick(rng, &pairs).cloned()
    }
}

// ============================================================================
// TESTS
// ============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
