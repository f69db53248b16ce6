//! Thought stream and the canned templates that fill it.

use crate::random::{pick, RandomSource};
use lyrixa_core::Thought;
use std::collections::VecDeque;

/// Situations that produce a thought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThoughtKind {
    CollaborationAccepted,
    CollaborationDeclined,
    ResponseReceived,
    InsightShared,
    AlertRaised,
    CollaborationRecorded,
    SpontaneousCollaboration,
    Unreachable,
}

const COLLABORATION_ACCEPTED: &[&str] = &[
    "{agent} agrees to help {peer} with {topic}",
    "{agent} sees a fit with {peer} on {topic} and joins in",
    "Working with {peer} on {topic} sounds promising to {agent}",
];

const COLLABORATION_DECLINED: &[&str] = &[
    "{agent} is too busy to take on {topic} for {peer} right now",
    "{agent} passes on {peer}'s request about {topic}",
    "{topic} is outside what {agent} can help {peer} with today",
];

const RESPONSE_RECEIVED: &[&str] = &[
    "{agent} hears back from {peer} about {topic}",
    "{peer} answered {agent} on {topic}",
];

const INSIGHT_SHARED: &[&str] = &[
    "{agent} shares an insight ({confidence} confidence): {topic}",
    "{agent} noticed something worth passing on to {peer}: {topic}",
    "New pattern from {agent}, confidence {confidence}: {topic}",
];

const ALERT_RAISED: &[&str] = &[
    "{agent} flags an alert for {peer}: {topic}",
    "{agent} is keeping an eye on {topic}",
];

const COLLABORATION_RECORDED: &[&str] = &[
    "{agent} and {peer} wrap up a session on {topic}",
    "{agent} logs a joint effort with {peer}: {topic}",
];

const SPONTANEOUS_COLLABORATION: &[&str] = &[
    "{agent} reaches out to {peer} about {topic}",
    "{agent} wonders whether {peer} could help with {topic}",
    "{agent} and {peer} haven't talked about {topic} in a while",
];

const UNREACHABLE: &[&str] = &[
    "{agent} has no one to talk to about {topic}",
    "A message for {peer} about {topic} goes unanswered",
];

impl ThoughtKind {
    pub fn templates(&self) -> &'static [&'static str] {
        match self {
            ThoughtKind::CollaborationAccepted => COLLABORATION_ACCEPTED,
            ThoughtKind::CollaborationDeclined => COLLABORATION_DECLINED,
            ThoughtKind::ResponseReceived => RESPONSE_RECEIVED,
            ThoughtKind::InsightShared => INSIGHT_SHARED,
            ThoughtKind::AlertRaised => ALERT_RAISED,
            ThoughtKind::CollaborationRecorded => COLLABORATION_RECORDED,
            ThoughtKind::SpontaneousCollaboration => SPONTANEOUS_COLLABORATION,
            ThoughtKind::Unreachable => UNREACHABLE,
        }
    }
}

/// Substitute `{name}` placeholders. Unknown placeholders are left as-is.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |text, (key, value)| {
        text.replace(&format!("{{{}}}", key), value)
    })
}

/// Pick a template for `kind` and render it.
pub fn compose(rng: &mut dyn RandomSource, kind: ThoughtKind, vars: &[(&str, &str)]) -> String {
    let template = pick(rng, kind.templates()).copied().unwrap_or("{agent}: {topic}");
    render(template, vars)
}

/// Shorten message content for use as a `{topic}`.
pub fn topic_of(content: &str) -> String {
    const MAX_CHARS: usize = 60;
    let trimmed = content.trim();
    if trimmed.chars().count() <= MAX_CHARS {
        return trimmed.to_string();
    }
    let mut short: String = trimmed.chars().take(MAX_CHARS).collect();
    short.push_str("...");
    short
}

// ============================================================================
// THOUGHT STREAM
// ============================================================================

/// Bounded FIFO of thoughts; the oldest entry is dropped when full.
#[derive(Debug, Clone)]
pub struct ThoughtStream {
    entries: VecDeque<Thought>,
    capacity: usize,
    total: u64,
}

impl ThoughtStream {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            total: 0,
        }
    }

    pub fn push(&mut self, thought: Thought) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(thought);
        self.total += 1;
    }

    pub fn record(&mut self, agent: &str, text: impl Into<String>) {
        self.push(Thought::new(agent, text));
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Thought> {
        self.entries.iter()
    }

    /// Up to `n` newest thoughts, oldest first.
    pub fn recent(&self, n: usize) -> Vec<&Thought> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).collect()
    }

    /// Thoughts recorded after the stream had seen `seen` in total.
    /// Entries already evicted are not returned.
    pub fn since(&self, seen: u64) -> Vec<&Thought> {
        let new = self.total.saturating_sub(seen);
        self.recent(usize::try_from(new).unwrap_or(usize::MAX))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Thoughts ever recorded, including evicted ones.
    pub fn total_recorded(&self) -> u64 {
        self.total
    }
}
