//! Per-type message handlers.
//!
//! A handler sees one message and a [`HandlerContext`] borrowing the state it
//! may touch. Follow-up messages go into the context's outbox and are posted
//! by the service after the handler returns successfully.

use crate::knowledge::KnowledgeStore;
use crate::policy::CollaborationPolicy;
use crate::random::RandomSource;
use crate::thoughts::{compose, topic_of, ThoughtKind, ThoughtStream};
use lyrixa_core::{LyrixaResult, Message, MessageDraft, MessageType};
use std::collections::BTreeMap;

/// Mutable view of the service handed to a handler.
pub struct HandlerContext<'a> {
    pub knowledge: &'a mut KnowledgeStore,
    pub policy: &'a CollaborationPolicy,
    pub thoughts: &'a mut ThoughtStream,
    pub rng: &'a mut dyn RandomSource,
    pub outbox: &'a mut Vec<MessageDraft>,
}

impl HandlerContext<'_> {
    /// Record a templated thought for `agent` about `peer` and `topic`.
    pub fn think(&mut self, kind: ThoughtKind, agent: &str, peer: &str, topic: &str) {
        self.think_with(kind, agent, &[("agent", agent), ("peer", peer), ("topic", topic)]);
    }

    /// Record a templated thought with arbitrary placeholder values.
    pub fn think_with(&mut self, kind: ThoughtKind, agent: &str, vars: &[(&str, &str)]) {
        let text = compose(&mut *self.rng, kind, vars);
        self.thoughts.record(agent, text);
    }

    /// Queue a follow-up message.
    pub fn reply(&mut self, draft: MessageDraft) {
        self.outbox.push(draft);
    }
}

/// Processes messages of one type.
pub trait MessageHandler {
    fn handle(&self, ctx: &mut HandlerContext<'_>, message: &Message) -> LyrixaResult<()>;
}

impl<F> MessageHandler for F
where
    F: Fn(&mut HandlerContext<'_>, &Message) -> LyrixaResult<()>,
{
    fn handle(&self, ctx: &mut HandlerContext<'_>, message: &Message) -> LyrixaResult<()> {
        self(ctx, message)
    }
}

/// Handler table keyed by message type.
pub type HandlerTable = BTreeMap<MessageType, Box<dyn MessageHandler>>;

/// One default handler per message type.
pub fn default_handlers() -> HandlerTable {
    let mut table: HandlerTable = BTreeMap::new();
    table.insert(MessageType::Request, Box::new(RequestHandler));
    table.insert(MessageType::Response, Box::new(ResponseHandler));
    table.insert(MessageType::Insight, Box::new(InsightHandler));
    table.insert(MessageType::Alert, Box::new(AlertHandler));
    table.insert(MessageType::Collaboration, Box::new(CollaborationHandler));
    table
}

// ============================================================================
// DEFAULT HANDLERS
// ============================================================================

/// Decides whether the recipient takes the request on and learns from it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestHandler;

impl MessageHandler for RequestHandler {
    fn handle(&self, ctx: &mut HandlerContext<'_>, message: &Message) -> LyrixaResult<()> {
        let sender = message.sender.as_str();
        let recipient = message.recipient.as_str();
        let topic = topic_of(&message.content);

        if !ctx.knowledge.contains(recipient) {
            ctx.think(ThoughtKind::Unreachable, sender, recipient, &topic);
            return Ok(());
        }

        let accepted = if ctx.knowledge.contains(sender) {
            let decision = ctx.policy.should_collaborate(
                &*ctx.knowledge,
                sender,
                recipient,
                &message.content,
                &mut *ctx.rng,
            );
            ctx.knowledge
                .record_collaboration(sender, recipient, &message.content, decision)?;
            decision
        } else {
            // Outsiders (the user) have no preference entry; relevance decides.
            ctx.knowledge
                .get(recipient)
                .is_some_and(|k| CollaborationPolicy::is_relevant(k, &message.content))
        };
        ctx.knowledge
            .record_interaction(recipient, "request", &message.content, accepted)?;

        let kind = if accepted {
            ThoughtKind::CollaborationAccepted
        } else {
            ThoughtKind::CollaborationDeclined
        };
        ctx.think(kind, recipient, sender, &topic);

        if message.response_expected {
            let answer = if accepted {
                format!("Taking this on: {}", topic)
            } else {
                format!("Not able to help with {} right now", topic)
            };
            ctx.reply(
                MessageDraft::new(recipient, sender, MessageType::Response, &answer)
                    .with_priority(message.priority)
                    .in_reply_to(message.id),
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseHandler;

impl MessageHandler for ResponseHandler {
    fn handle(&self, ctx: &mut HandlerContext<'_>, message: &Message) -> LyrixaResult<()> {
        if ctx.knowledge.contains(&message.recipient) {
            ctx.knowledge
                .record_interaction(&message.recipient, "response", &message.content, true)?;
        }
        let topic = topic_of(&message.content);
        ctx.think(ThoughtKind::ResponseReceived, &message.recipient, &message.sender, &topic);
        Ok(())
    }
}

/// The sender shares the insight and may grow in expertise.
/// Fails if the sender is unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsightHandler;

impl MessageHandler for InsightHandler {
    fn handle(&self, ctx: &mut HandlerContext<'_>, message: &Message) -> LyrixaResult<()> {
        let sender = message.sender.as_str();
        let recipient = message.recipient.as_str();

        let confidence = ctx.knowledge.share_insight(sender, &message.content)?;
        ctx.knowledge.update_expertise(sender)?;
        if recipient != sender && ctx.knowledge.contains(recipient) {
            ctx.knowledge
                .record_interaction(recipient, "insight", &message.content, true)?;
        }

        let topic = topic_of(&message.content);
        let confidence = format!("{:.2}", confidence);
        ctx.think_with(
            ThoughtKind::InsightShared,
            sender,
            &[
                ("agent", sender),
                ("peer", recipient),
                ("topic", topic.as_str()),
                ("confidence", confidence.as_str()),
            ],
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlertHandler;

impl MessageHandler for AlertHandler {
    fn handle(&self, ctx: &mut HandlerContext<'_>, message: &Message) -> LyrixaResult<()> {
        if ctx.knowledge.contains(&message.recipient) {
            ctx.knowledge
                .record_interaction(&message.recipient, "alert", &message.content, true)?;
        }
        let topic = topic_of(&message.content);
        ctx.think(ThoughtKind::AlertRaised, &message.sender, &message.recipient, &topic);
        Ok(())
    }
}

/// Records a completed collaboration. Fails if either side is unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollaborationHandler;

impl MessageHandler for CollaborationHandler {
    fn handle(&self, ctx: &mut HandlerContext<'_>, message: &Message) -> LyrixaResult<()> {
        ctx.knowledge
            .record_collaboration(&message.sender, &message.recipient, &message.content, true)?;
        let topic = topic_of(&message.content);
        ctx.think(
            ThoughtKind::CollaborationRecorded,
            &message.sender,
            &message.recipient,
            &topic,
        );
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use chrono::Utc;
    use lyrixa_core::{AgentError, LyrixaConfig, LyrixaError, MessagePriority};

    struct Fixture {
        knowledge: KnowledgeStore,
        policy: CollaborationPolicy,
        thoughts: ThoughtStream,
        rng: ScriptedRandom,
        outbox: Vec<MessageDraft>,
    }

    impl Fixture {
        fn new(rng: ScriptedRandom) -> Self {
            let config = LyrixaConfig::default_config();
            Self {
                knowledge: KnowledgeStore::from_seeds(&config.agents, config.default_preference),
                policy: CollaborationPolicy::from_config(&config),
                thoughts: ThoughtStream::new(config.thought_capacity),
                rng,
                outbox: Vec::new(),
            }
        }

        fn run(&mut self, handler: &dyn MessageHandler, message: &Message) -> LyrixaResult<()> {
            let mut ctx = HandlerContext {
                knowledge: &mut self.knowledge,
                policy: &self.policy,
                thoughts: &mut self.thoughts,
                rng: &mut self.rng,
                outbox: &mut self.outbox,
            };
            handler.handle(&mut ctx, message)
        }
    }

    fn message(sender: &str, recipient: &str, message_type: MessageType, content: &str) -> Message {
        Message::from_draft(
            1,
            MessageDraft::new(sender, recipient, message_type, content),
            Utc::now(),
        )
    }

    #[test]
    fn test_default_table_covers_every_type() {
        let table = default_handlers();
        for t in MessageType::ALL {
            assert!(table.contains_key(&t), "{}", t);
        }
    }

    #[test]
    fn test_request_accepted_updates_both_sides() {
        let mut fx = Fixture::new(ScriptedRandom::new([0.9, 0.0]));
        let msg = message("GoalAgent", "MemoryAgent", MessageType::Request, "memory management please");
        fx.run(&RequestHandler, &msg).unwrap();

        for (a, b) in [("GoalAgent", "MemoryAgent"), ("MemoryAgent", "GoalAgent")] {
            let pref = fx.knowledge.preference(a, b).unwrap();
            assert!((pref - 0.6).abs() < 1e-9);
        }
        let memory = fx.knowledge.get("MemoryAgent").unwrap();
        assert_eq!(memory.total_interactions, 1);
        assert_eq!(memory.success_rate, 100.0);
        assert_eq!(fx.thoughts.len(), 1);
        assert_eq!(fx.thoughts.iter().next().unwrap().agent, "MemoryAgent");
        assert!(fx.outbox.is_empty());
    }

    #[test]
    fn test_request_declined_lowers_preference() {
        let mut fx = Fixture::new(ScriptedRandom::constant(0.1));
        let msg = message("GoalAgent", "MemoryAgent", MessageType::Request, "memory management");
        fx.run(&RequestHandler, &msg).unwrap();

        let pref = fx.knowledge.preference("GoalAgent", "MemoryAgent").unwrap();
        assert!((pref - 0.45).abs() < 1e-9);
        assert_eq!(fx.knowledge.get("MemoryAgent").unwrap().success_rate, 0.0);
    }

    #[test]
    fn test_request_from_user_gets_response() {
        let mut fx = Fixture::new(ScriptedRandom::constant(0.0));
        let mut msg = message("User", "GoalAgent", MessageType::Request, "help with goal planning");
        msg.response_expected = true;
        msg.priority = MessagePriority::High;
        msg.id = 42;
        fx.run(&RequestHandler, &msg).unwrap();

        let goal = fx.knowledge.get("GoalAgent").unwrap();
        assert_eq!(goal.successful_interactions, 1);
        assert!(goal.collaboration_history.is_empty());

        assert_eq!(fx.outbox.len(), 1);
        let reply = &fx.outbox[0];
        assert_eq!(reply.sender, "GoalAgent");
        assert_eq!(reply.recipient, "User");
        assert_eq!(reply.message_type, MessageType::Response);
        assert_eq!(reply.in_reply_to, Some(42));
        assert_eq!(reply.priority, MessagePriority::High);
    }

    #[test]
    fn test_request_to_unknown_recipient_only_thinks() {
        let mut fx = Fixture::new(ScriptedRandom::constant(0.0));
        let mut msg = message("GoalAgent", "all agents", MessageType::Request, "anyone?");
        msg.response_expected = true;
        fx.run(&RequestHandler, &msg).unwrap();

        assert_eq!(fx.knowledge.get("GoalAgent").unwrap().total_interactions, 0);
        assert!(fx.outbox.is_empty());
        assert_eq!(fx.thoughts.len(), 1);
    }

    #[test]
    fn test_insight_shares_and_records() {
        let mut fx = Fixture::new(ScriptedRandom::constant(0.0));
        let msg = message("GoalAgent", "MemoryAgent", MessageType::Insight, "pattern found");
        fx.run(&InsightHandler, &msg).unwrap();

        let goal = fx.knowledge.get("GoalAgent").unwrap();
        assert!((goal.learning_confidence - 0.55).abs() < 1e-9);
        assert_eq!(goal.learned_patterns.len(), 1);
        assert_eq!(fx.knowledge.get("MemoryAgent").unwrap().total_interactions, 1);
        // First template carries the rendered confidence.
        assert_eq!(
            fx.thoughts.iter().next().unwrap().text,
            "GoalAgent shares an insight (0.56 confidence): pattern found"
        );
    }

    #[test]
    fn test_insight_from_unknown_sender_fails() {
        let mut fx = Fixture::new(ScriptedRandom::constant(0.0));
        let msg = message("Ghost", "MemoryAgent", MessageType::Insight, "boo");
        let err = fx.run(&InsightHandler, &msg).unwrap_err();
        assert_eq!(err, LyrixaError::Agent(AgentError::unknown_agent("Ghost")));
        assert!(fx.thoughts.is_empty());
    }

    #[test]
    fn test_alert_to_broadcast_target() {
        let mut fx = Fixture::new(ScriptedRandom::constant(0.0));
        let msg = message("EscalationAgent", "System", MessageType::Alert, "disk almost full");
        fx.run(&AlertHandler, &msg).unwrap();
        assert_eq!(fx.knowledge.get("EscalationAgent").unwrap().total_interactions, 0);
        assert_eq!(fx.thoughts.len(), 1);
    }

    #[test]
    fn test_collaboration_requires_known_agents() {
        let mut fx = Fixture::new(ScriptedRandom::constant(0.0));
        let ok = message("GoalAgent", "PluginAgent", MessageType::Collaboration, "automation");
        fx.run(&CollaborationHandler, &ok).unwrap();
        assert_eq!(fx.knowledge.get("PluginAgent").unwrap().collaboration_history.len(), 1);

        let bad = message("GoalAgent", "Ghost", MessageType::Collaboration, "x");
        assert!(fx.run(&CollaborationHandler, &bad).is_err());
    }

    fn custom(ctx: &mut HandlerContext<'_>, m: &Message) -> LyrixaResult<()> {
        ctx.thoughts.record(&m.sender, "custom");
        Ok(())
    }

    #[test]
    fn test_function_as_handler() {
        let mut fx = Fixture::new(ScriptedRandom::constant(0.0));
        let msg = message("A", "B", MessageType::Alert, "x");
        fx.run(&custom, &msg).unwrap();
        assert_eq!(fx.thoughts.iter().next().unwrap().text, "custom");
    }
}
