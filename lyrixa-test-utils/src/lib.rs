//! Lyrixa Test Utilities
//!
//! Shared test infrastructure for the Lyrixa workspace:
//! - Proptest generators for messages, seeds and configs
//! - Fixtures for services with scripted or seeded randomness
//! - Assertions for Lyrixa-specific error and range checks

// Re-export the scripted source so tests need only this crate
pub use lyrixa_agents::{CollaborationService, RandomSource, ScriptedRandom, SeededRandom};

pub use lyrixa_core::{
    AgentError, AgentSeed, ConfigError, KnowledgeSummary, LyrixaConfig, LyrixaError,
    LyrixaResult, Message, MessageDraft, MessagePriority, MessageStatus, MessageType, Timestamp,
};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for Lyrixa types.

    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    /// Generate a MessageType variant.
    pub fn arb_message_type() -> impl Strategy<Value = MessageType> {
        prop::sample::select(MessageType::ALL.to_vec())
    }

    /// Generate a MessagePriority variant.
    pub fn arb_priority() -> impl Strategy<Value = MessagePriority> {
        prop_oneof![
            Just(MessagePriority::Low),
            Just(MessagePriority::Normal),
            Just(MessagePriority::High),
            Just(MessagePriority::Critical),
        ]
    }

    /// Generate a name from the stock agent team.
    pub fn arb_stock_agent() -> impl Strategy<Value = String> {
        let names: Vec<String> = LyrixaConfig::default_config()
            .agents
            .into_iter()
            .map(|seed| seed.name)
            .collect();
        prop::sample::select(names)
    }

    /// Generate message content, sometimes mentioning stock topics.
    pub fn arb_content() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-zA-Z ]{0,40}",
            Just("optimize goals".to_string()),
            Just("pattern found".to_string()),
            Just("memory management pressure".to_string()),
            Just("plugin automation failed".to_string()),
        ]
    }

    /// Generate a valid AgentSeed with a given name.
    pub fn arb_agent_seed(name: String) -> impl Strategy<Value = AgentSeed> {
        (
            prop::collection::vec("[a-z]{3,10}(_[a-z]{3,10})?", 0..4),
            0.0f64..=1.0,
            1.0f64..=2.0,
        )
            .prop_map(move |(knowledge_areas, learning_confidence, expertise_level)| AgentSeed {
                name: name.clone(),
                knowledge_areas,
                learning_confidence,
                expertise_level,
            })
    }

    /// Generate a Timestamp within the last day.
    pub fn arb_recent_timestamp() -> impl Strategy<Value = Timestamp> {
        (0i64..86_400).prop_map(|secs| Utc::now() - chrono::Duration::seconds(secs))
    }

    /// Generate a valid LyrixaConfig with 2-5 uniquely named agents.
    pub fn arb_valid_config() -> impl Strategy<Value = LyrixaConfig> {
        let agents = (2usize..=5).prop_flat_map(|count| {
            (0..count)
                .map(|i| arb_agent_seed(format!("Agent{}", i)))
                .collect::<Vec<_>>()
        });
        (
            1u64..10_000,
            0.0f64..=1.0,
            1u64..86_400_000,
            1usize..500,
            prop::option::of(1usize..1000),
            0.0f64..=1.0,
            0.0f64..=1.0,
            1usize..5,
            0.0f64..=1.0,
            any::<u64>(),
            agents,
        )
            .prop_map(
                |(
                    tick_interval_ms,
                    spontaneous_probability,
                    history_window_ms,
                    thought_capacity,
                    message_retention,
                    min_preference,
                    workload_threshold,
                    max_recent_collaborations,
                    default_preference,
                    seed,
                    agents,
                )| LyrixaConfig {
                    tick_interval_ms,
                    spontaneous_probability,
                    history_window_ms,
                    thought_capacity,
                    message_retention,
                    min_preference,
                    workload_threshold,
                    max_recent_collaborations,
                    default_preference,
                    seed: Some(seed),
                    agents,
                },
            )
    }

    /// Generate a draft between stock agents.
    pub fn arb_draft() -> impl Strategy<Value = MessageDraft> {
        (
            arb_stock_agent(),
            arb_stock_agent(),
            arb_message_type(),
            arb_content(),
            arb_priority(),
        )
            .prop_map(|(sender, recipient, message_type, content, priority)| {
                MessageDraft::new(&sender, &recipient, message_type, &content)
                    .with_priority(priority)
            })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built services and configs.

    use super::*;

    /// The stock five-agent configuration.
    pub fn default_config() -> LyrixaConfig {
        LyrixaConfig::default_config()
    }

    /// A two-agent configuration ("A" and "B") with disjoint topics.
    pub fn pair_config() -> LyrixaConfig {
        LyrixaConfig {
            agents: vec![
                AgentSeed::new("A", &["goal_planning", "optimization"]),
                AgentSeed::new("B", &["memory_management", "pattern_recognition"]),
            ],
            ..LyrixaConfig::default_config()
        }
    }

    /// Service over the stock team seeded with `seed`.
    pub fn seeded_service(seed: u64) -> CollaborationService {
        CollaborationService::new(LyrixaConfig::seeded(seed))
            .unwrap_or_else(|err| panic!("stock config rejected: {}", err))
    }

    /// Service over `config` that replays `script` for every random draw.
    pub fn scripted_service(config: LyrixaConfig, script: ScriptedRandom) -> CollaborationService {
        CollaborationService::with_random(config, Box::new(script))
            .unwrap_or_else(|err| panic!("config rejected: {}", err))
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for Lyrixa-specific validation.

    use super::*;

    /// Assert that a LyrixaResult is an UnknownAgent error for `agent`.
    #[track_caller]
    pub fn assert_unknown_agent<T: std::fmt::Debug>(result: &LyrixaResult<T>, agent: &str) {
        match result {
            Err(LyrixaError::Agent(AgentError::UnknownAgent { agent: a })) => {
                assert_eq!(a, agent, "Wrong agent in UnknownAgent error");
            }
            other => panic!("Expected UnknownAgent({}), got: {:?}", agent, other),
        }
    }

    /// Assert that a LyrixaResult is a Config error.
    #[track_caller]
    pub fn assert_config_error<T: std::fmt::Debug>(result: &LyrixaResult<T>) {
        match result {
            Err(LyrixaError::Config(_)) => {}
            other => panic!("Expected Config error, got: {:?}", other),
        }
    }

    /// Assert that a value lies in `[0, 1]`.
    #[track_caller]
    pub fn assert_unit_interval(value: f64, what: &str) {
        assert!(
            (0.0..=1.0).contains(&value),
            "{} out of [0, 1]: {}",
            what,
            value
        );
    }

    /// Assert that a summary's scores are within their ranges.
    #[track_caller]
    pub fn assert_summary_in_range(summary: &KnowledgeSummary) {
        assert_unit_interval(summary.learning_confidence, "learning_confidence");
        assert!(
            (1.0..=2.0).contains(&summary.expertise_level),
            "expertise_level out of [1, 2]: {}",
            summary.expertise_level
        );
        assert!(
            (0.0..=100.0).contains(&summary.success_rate),
            "success_rate out of [0, 100]: {}",
            summary.success_rate
        );
    }

    /// Assert that a message is no longer pending.
    #[track_caller]
    pub fn assert_terminal(message: &Message) {
        assert!(
            message.status.is_terminal(),
            "message {} still {:?}",
            message.id,
            message.status
        );
    }
}
