//! Collaboration service: the single owner of all scaffold state.

use crate::bus::MessageBus;
use crate::handlers::{default_handlers, HandlerContext, HandlerTable, MessageHandler};
use crate::knowledge::KnowledgeStore;
use crate::policy::CollaborationPolicy;
use crate::random::{RandomSource, SeededRandom};
use crate::thoughts::{compose, ThoughtKind, ThoughtStream};
use chrono::Utc;
use lyrixa_core::{
    AgentError, AgentName, KnowledgeSummary, LyrixaConfig, LyrixaResult, Message, MessageDraft,
    MessageId, MessagePriority, MessageStatus, MessageType,
};

/// Sender name used for messages typed in by a person.
pub const USER_AGENT: &str = "User";

/// Collaboration topics picked for spontaneous collaborations.
const SPONTANEOUS_TOPICS: &[&str] = &[
    "optimization strategies",
    "pattern recognition",
    "goal alignment",
    "memory management",
    "plugin automation",
    "error handling",
];

/// Result of one `process_pending` pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Messages marked `Processed`
    pub processed: Vec<MessageId>,
    /// Messages marked `Error`
    pub failed: Vec<MessageId>,
    /// Follow-up messages posted by handlers; left pending for the next pass
    pub follow_ups: Vec<MessageId>,
}

pub struct CollaborationService {
    config: LyrixaConfig,
    bus: MessageBus,
    knowledge: KnowledgeStore,
    policy: CollaborationPolicy,
    thoughts: ThoughtStream,
    handlers: HandlerTable,
    rng: Box<dyn RandomSource>,
}

impl std::fmt::Debug for CollaborationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollaborationService")
            .field("agents", &self.knowledge.names())
            .field("messages", &self.bus.len())
            .field("pending", &self.bus.pending_count())
            .field("thoughts", &self.thoughts.len())
            .finish()
    }
}

impl CollaborationService {
    /// Build a service from a validated config. Uses `config.seed` when set,
    /// otherwise OS entropy.
    pub fn new(config: LyrixaConfig) -> LyrixaResult<Self> {
        let rng: Box<dyn RandomSource> = match config.seed {
            Some(seed) => Box::new(SeededRandom::new(seed)),
            None => Box::new(SeededRandom::from_entropy()),
        };
        Self::with_random(config, rng)
    }

    /// Build a service with an explicit random source.
    pub fn with_random(config: LyrixaConfig, rng: Box<dyn RandomSource>) -> LyrixaResult<Self> {
        config.validate()?;

        let knowledge = KnowledgeStore::from_seeds(&config.agents, config.default_preference);
        tracing::debug!(agents = knowledge.len(), "collaboration service ready");

        Ok(Self {
            bus: MessageBus::with_retention(config.message_retention),
            policy: CollaborationPolicy::from_config(&config),
            thoughts: ThoughtStream::new(config.thought_capacity),
            handlers: default_handlers(),
            knowledge,
            rng,
            config,
        })
    }

    /// Replace the handler for one message type.
    pub fn set_handler(&mut self, message_type: MessageType, handler: Box<dyn MessageHandler>) {
        self.handlers.insert(message_type, handler);
    }

    // ------------------------------------------------------------------------
    // Sending
    // ------------------------------------------------------------------------

    pub fn send(
        &mut self,
        sender: &str,
        recipient: &str,
        message_type: MessageType,
        content: &str,
        priority: MessagePriority,
    ) -> Message {
        self.bus.send(sender, recipient, message_type, content, priority)
    }

    pub fn post(&mut self, draft: MessageDraft) -> Message {
        self.bus.post(draft)
    }

    /// Route free text from a person to the best matching agent as a request
    /// that expects a response. Falls back to the first registered agent.
    pub fn submit_user_message(&mut self, content: &str) -> LyrixaResult<Message> {
        let recipient = self
            .knowledge
            .best_match(content)
            .map(str::to_string)
            .or_else(|| self.config.agents.first().map(|seed| seed.name.clone()))
            .ok_or_else(|| AgentError::unknown_agent(USER_AGENT))?;

        tracing::debug!(%recipient, "routing user message");
        let draft = MessageDraft::new(USER_AGENT, &recipient, MessageType::Request, content)
            .expecting_response();
        Ok(self.bus.post(draft))
    }

    // ------------------------------------------------------------------------
    // Processing
    // ------------------------------------------------------------------------

    /// Handle every message that was pending when the call started, oldest
    /// first. Each ends up `Processed` or `Error`; handler failures never
    /// escape. Follow-ups posted along the way stay pending.
    pub fn process_pending(&mut self) -> ProcessOutcome {
        let mut outcome = ProcessOutcome::default();

        for id in self.bus.pending_ids() {
            let Some(message) = self.bus.get(id).cloned() else {
                continue;
            };

            let mut outbox = Vec::new();
            let result = match self.handlers.get(&message.message_type) {
                Some(handler) => {
                    let mut ctx = HandlerContext {
                        knowledge: &mut self.knowledge,
                        policy: &self.policy,
                        thoughts: &mut self.thoughts,
                        rng: self.rng.as_mut(),
                        outbox: &mut outbox,
                    };
                    handler.handle(&mut ctx, &message)
                }
                None => Err(AgentError::HandlerFailed {
                    message_id: id,
                    message_type: message.message_type,
                    reason: "no handler registered".to_string(),
                }
                .into()),
            };

            match result {
                Ok(()) => {
                    self.bus.mark(id, MessageStatus::Processed, None);
                    outcome.processed.push(id);
                    for draft in outbox {
                        outcome.follow_ups.push(self.bus.post(draft).id);
                    }
                }
                Err(err) => {
                    tracing::debug!(message_id = id, error = %err, "message handler failed");
                    self.bus.mark(id, MessageStatus::Error, Some(err.to_string()));
                    outcome.failed.push(id);
                }
            }
        }

        outcome
    }

    /// With probability `probability`, start one spontaneous collaboration.
    /// The probability draw always happens first.
    pub fn maybe_spontaneous_collaboration(&mut self, probability: f64) -> Option<Message> {
        if self.rng.next_f64() >= probability {
            return None;
        }
        self.initiate_spontaneous_collaboration()
    }

    /// Pick an eligible pair and post a collaboration message between them.
    /// `None` when every pair has collaborated enough recently.
    pub fn initiate_spontaneous_collaboration(&mut self) -> Option<Message> {
        let agents: Vec<AgentName> = self.config.agents.iter().map(|s| s.name.clone()).collect();
        let (sender, recipient) = self.policy.select_spontaneous_pair(
            &self.knowledge,
            &agents,
            self.policy.history_window,
            Utc::now(),
            self.rng.as_mut(),
        )?;

        let topic = crate::random::pick(self.rng.as_mut(), SPONTANEOUS_TOPICS)
            .copied()
            .unwrap_or("shared work");
        let text = compose(
            self.rng.as_mut(),
            ThoughtKind::SpontaneousCollaboration,
            &[("agent", sender.as_str()), ("peer", recipient.as_str()), ("topic", topic)],
        );
        self.thoughts.record(&sender, text);

        let content = format!("Let's collaborate on {}", topic);
        tracing::debug!(%sender, %recipient, topic, "spontaneous collaboration");
        Some(self.bus.send(
            &sender,
            &recipient,
            MessageType::Collaboration,
            &content,
            MessagePriority::Normal,
        ))
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn summary(&self, agent: &str) -> Option<KnowledgeSummary> {
        self.knowledge.get_summary(agent)
    }

    pub fn summaries(&self) -> Vec<KnowledgeSummary> {
        self.knowledge.summaries()
    }

    pub fn thoughts(&self) -> &ThoughtStream {
        &self.thoughts
    }

    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    pub fn knowledge(&self) -> &KnowledgeStore {
        &self.knowledge
    }

    pub fn knowledge_mut(&mut self) -> &mut KnowledgeStore {
        &mut self.knowledge
    }

    pub fn policy(&self) -> &CollaborationPolicy {
        &self.policy
    }

    pub fn config(&self) -> &LyrixaConfig {
        &self.config
    }
}

// ============================================================================
// TESTS
// ============================================================================
