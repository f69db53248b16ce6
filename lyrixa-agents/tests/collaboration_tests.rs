use lyrixa_agents::{TickScheduler, USER_AGENT};
use lyrixa_core::{MessagePriority, MessageStatus, MessageType};
use lyrixa_test_utils::assertions::{
    assert_summary_in_range, assert_terminal, assert_unit_interval, assert_unknown_agent,
};
use lyrixa_test_utils::fixtures::{default_config, pair_config, scripted_service, seeded_service};
use lyrixa_test_utils::generators::{arb_draft, arb_valid_config};
use lyrixa_test_utils::{CollaborationService, ScriptedRandom};
use proptest::prelude::*;

#[test]
fn tick_drains_two_messages_in_order() {
    let mut svc = scripted_service(pair_config(), ScriptedRandom::constant(0.9));
    let mut scheduler = TickScheduler::from_config(svc.config());

    let m1 = svc.send("A", "B", MessageType::Request, "optimize goals", MessagePriority::Normal);
    let m2 = svc.send("A", "B", MessageType::Insight, "pattern found", MessagePriority::Normal);
    assert!(m1.id < m2.id);

    let report = scheduler.tick(&mut svc);
    assert_eq!(report.processed + report.failed, 2);
    assert!(svc.bus().pending().is_empty());
    assert_terminal(svc.bus().get(m1.id).unwrap());
    assert_terminal(svc.bus().get(m2.id).unwrap());

    // The request is handled (B thinks) before the insight (A thinks).
    let agents: Vec<&str> = svc.thoughts().iter().map(|t| t.agent.as_str()).collect();
    assert_eq!(agents, vec!["B", "A"]);
}

#[test]
fn share_insight_confidence_and_learning() {
    let mut svc = scripted_service(default_config(), ScriptedRandom::constant(0.5));

    let confidence = svc.knowledge_mut().share_insight("GoalAgent", "x").unwrap();
    assert!((confidence - 0.56).abs() < 1e-9);
    let summary = svc.summary("GoalAgent").unwrap();
    assert!((summary.learning_confidence - 0.55).abs() < 1e-9);
    assert_eq!(summary.patterns_count, 1);
}

#[test]
fn summary_is_idempotent() {
    let mut svc = seeded_service(11);
    svc.send("GoalAgent", "MemoryAgent", MessageType::Insight, "memory pattern", MessagePriority::High);
    TickScheduler::from_config(svc.config()).tick(&mut svc);

    assert_eq!(svc.summary("GoalAgent"), svc.summary("GoalAgent"));
}

#[test]
fn unknown_agent_mutations_are_errors() {
    let mut svc = seeded_service(5);
    assert_unknown_agent(
        &svc.knowledge_mut().record_interaction("Ghost", "request", "x", true),
        "Ghost",
    );
    assert_unknown_agent(&svc.knowledge_mut().update_expertise("Ghost"), "Ghost");
    assert!(svc.summary("Ghost").is_none());
}

#[test]
fn user_conversation_round_trip() {
    let mut svc = scripted_service(default_config(), ScriptedRandom::constant(0.0));
    let mut scheduler = TickScheduler::new(0.0);

    let request = svc.submit_user_message("I need help with plugin management").unwrap();
    assert_eq!(request.recipient, "PluginAgent");

    let first = scheduler.tick(&mut svc);
    assert_eq!(first.follow_ups, 1);
    let second = scheduler.tick(&mut svc);
    assert_eq!(second.processed, 1);

    let reply = svc
        .bus()
        .to_recipient(USER_AGENT)
        .next()
        .expect("reply to the user");
    assert_eq!(reply.in_reply_to, Some(request.id));
    assert_eq!(reply.status, MessageStatus::Processed);
    assert_eq!(svc.summary("PluginAgent").unwrap().success_rate, 100.0);
}

#[test]
fn same_seed_same_story() {
    fn run(seed: u64) -> (Vec<String>, Vec<String>) {
        let mut svc = seeded_service(seed);
        let mut scheduler = TickScheduler::new(0.5);
        for round in 0..10 {
            svc.send(
                "GoalAgent",
                "MemoryAgent",
                MessageType::Request,
                &format!("memory management round {}", round),
                MessagePriority::Normal,
            );
            svc.send("ReflectionAgent", "all agents", MessageType::Insight, "learning pattern", MessagePriority::Low);
            scheduler.tick(&mut svc);
        }
        let thoughts = svc.thoughts().iter().map(|t| t.text.clone()).collect();
        let contents = svc.bus().messages().iter().map(|m| m.content.clone()).collect();
        (thoughts, contents)
    }

    assert_eq!(run(42), run(42));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Every message pending at the start of a tick is terminal afterwards,
    /// and scores stay in range whatever traffic arrives.
    #[test]
    fn prop_ticks_keep_invariants(
        seed in any::<u64>(),
        batches in prop::collection::vec(prop::collection::vec(arb_draft(), 0..6), 1..6),
    ) {
        let mut svc = seeded_service(seed);
        let mut scheduler = TickScheduler::from_config(svc.config());
        let mut expertise = svc.summary("GoalAgent").unwrap().expertise_level;

        for batch in batches {
            for draft in batch {
                svc.post(draft);
            }
            let before = svc.bus().pending_ids();
            scheduler.tick(&mut svc);
            for id in before {
                prop_assert!(svc.bus().get(id).unwrap().status.is_terminal());
            }

            for summary in svc.summaries() {
                assert_summary_in_range(&summary);
            }
            for agent in svc.knowledge().names() {
                let knowledge = svc.knowledge().get(&agent).unwrap();
                for pref in knowledge.collaboration_preferences.values() {
                    assert_unit_interval(*pref, "preference");
                }
            }

            let now = svc.summary("GoalAgent").unwrap().expertise_level;
            prop_assert!(now >= expertise);
            expertise = now;
        }
        prop_assert!(svc.thoughts().len() <= svc.thoughts().capacity());
    }

    /// Any valid config builds a working service.
    #[test]
    fn prop_valid_configs_build(config in arb_valid_config()) {
        let mut svc = CollaborationService::new(config).unwrap();
        let first = svc.knowledge().names()[0].clone();
        svc.send(&first, &first, MessageType::Insight, "self note", MessagePriority::Low);
        let report = TickScheduler::from_config(svc.config()).tick(&mut svc);
        prop_assert_eq!(report.processed, 1);
    }
}
