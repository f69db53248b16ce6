//! Message bus: append-only, insertion-ordered record of inter-agent messages.

use chrono::Utc;
use lyrixa_core::{Message, MessageDraft, MessageId, MessagePriority, MessageStatus, MessageType};

/// Ordered log of messages. Ids start at 1 and are never reused.
#[derive(Debug, Clone)]
pub struct MessageBus {
    messages: Vec<Message>,
    next_id: MessageId,
    retention: Option<usize>,
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBus {
    /// Create an unbounded bus.
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
            retention: None,
        }
    }

    /// Create a bus that keeps at most `retention` messages.
    /// Pending messages are never pruned, so the bound can be exceeded while
    /// they wait for a tick.
    pub fn with_retention(retention: Option<usize>) -> Self {
        Self {
            retention,
            ..Self::new()
        }
    }

    /// Append a pending message. The recipient is not validated.
    pub fn send(
        &mut self,
        sender: &str,
        recipient: &str,
        message_type: MessageType,
        content: &str,
        priority: MessagePriority,
    ) -> Message {
        self.post(MessageDraft::new(sender, recipient, message_type, content).with_priority(priority))
    }

    /// Append a pending message built from a draft.
    pub fn post(&mut self, draft: MessageDraft) -> Message {
        let id = self.next_id;
        self.next_id += 1;

        let message = Message::from_draft(id, draft, Utc::now());
        tracing::debug!(
            message_id = id,
            sender = %message.sender,
            recipient = %message.recipient,
            message_type = %message.message_type,
            priority = %message.priority,
            "message posted"
        );
        self.messages.push(message.clone());
        self.prune();
        message
    }

    /// Pending messages in insertion (FIFO) order.
    pub fn pending(&self) -> Vec<&Message> {
        self.messages.iter().filter(|m| m.is_pending()).collect()
    }

    /// Ids of pending messages in insertion order.
    pub fn pending_ids(&self) -> Vec<MessageId> {
        self.messages
            .iter()
            .filter(|m| m.is_pending())
            .map(|m| m.id)
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_pending()).count()
    }

    /// Move a pending message to a terminal status.
    ///
    /// Returns `false` if the message is unknown, already terminal, or the
    /// requested status is `Pending`.
    pub fn mark(&mut self, id: MessageId, status: MessageStatus, error: Option<String>) -> bool {
        if status == MessageStatus::Pending {
            return false;
        }
        let Some(message) = self.get_mut(id) else {
            return false;
        };
        if !message.is_pending() {
            return false;
        }
        message.status = status;
        message.error = error;
        true
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages
            .binary_search_by_key(&id, |m| m.id)
            .ok()
            .map(|idx| &self.messages[idx])
    }

    fn get_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        match self.messages.binary_search_by_key(&id, |m| m.id) {
            Ok(idx) => self.messages.get_mut(idx),
            Err(_) => None,
        }
    }

    /// All retained messages in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Id the next posted message will receive.
    pub fn next_id(&self) -> MessageId {
        self.next_id
    }

    // ------------------------------------------------------------------------
    // Routing queries
    // ------------------------------------------------------------------------

    pub fn from_sender<'a>(&'a self, sender: &'a str) -> impl Iterator<Item = &'a Message> + 'a {
        self.messages.iter().filter(move |m| m.sender == sender)
    }

    pub fn to_recipient<'a>(
        &'a self,
        recipient: &'a str,
    ) -> impl Iterator<Item = &'a Message> + 'a {
        self.messages.iter().filter(move |m| m.recipient == recipient)
    }

    pub fn of_type(&self, message_type: MessageType) -> impl Iterator<Item = &Message> + '_ {
        self.messages
            .iter()
            .filter(move |m| m.message_type == message_type)
    }

    /// Messages with priority `>= priority`.
    pub fn at_least(&self, priority: MessagePriority) -> impl Iterator<Item = &Message> + '_ {
        self.messages.iter().filter(move |m| m.priority >= priority)
    }

    /// Drop the oldest handled messages until the retention bound holds.
    fn prune(&mut self) {
        let Some(limit) = self.retention else {
            return;
        };
        if self.messages.len() <= limit {
            return;
        }
        let mut excess = self.messages.len() - limit;
        self.messages.retain(|m| {
            if excess > 0 && !m.is_pending() {
                excess -= 1;
                false
            } else {
                true
            }
        });
    }
}

// ============================================================================
// TESTS
// ============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_message_type() -> impl Strategy<Value = MessageType> {
        prop::sample::select(MessageType::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Ids returned by `send` are unique and strictly increasing, with or
        /// without retention pruning.
        #[test]
        fn prop_ids_strictly_increasing(
            types in prop::collection::vec(arb_message_type(), 1..60),
            retention in prop::option::of(1usize..10),
            mark_every in 1usize..4,
        ) {
            let mut bus = MessageBus::with_retention(retention);
            let mut last = 0;
            for (i, t) in types.into_iter().enumerate() {
                let msg = bus.send("A", "B", t, "content", MessagePriority::Normal);
                prop_assert!(msg.id > last, "id {} not greater than {}", msg.id, last);
                last = msg.id;
                if i % mark_every == 0 {
                    bus.mark(msg.id, MessageStatus::Processed, None);
                }
            }
        }

        /// Retention never drops a pending message.
        #[test]
        fn prop_retention_keeps_pending(
            count in 1usize..50,
            retention in 1usize..10,
            processed in prop::collection::vec(any::<bool>(), 50),
        ) {
            let mut bus = MessageBus::with_retention(Some(retention));
            let mut pending = Vec::new();
            for (i, mark) in processed.iter().take(count).enumerate() {
                let msg = bus.send("A", "B", MessageType::Request, &i.to_string(), MessagePriority::Low);
                if *mark {
                    bus.mark(msg.id, MessageStatus::Processed, None);
                } else {
                    pending.push(msg.id);
                }
            }
            prop_assert_eq!(bus.pending_ids(), pending);
            prop_assert!(bus.len() <= retention.max(bus.pending_count() + 1));
        }
    }
}
