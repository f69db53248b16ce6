//! Tick loop driving a [`CollaborationService`].
//!
//! The loop runs on a single-threaded runtime. Ticks, input lines and the
//! shutdown signal are all handled from one `select!`, so the service is only
//! ever touched from one place.

use crate::config::HostConfig;
use crate::error::HostError;
use crate::events::{parse_input, HostEvent, InputAction};
use lyrixa_agents::{CollaborationService, TickReport, TickScheduler};
use lyrixa_core::KnowledgeSummary;
use std::time::Duration;
use tokio::sync::mpsc;

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TickLimit,
    Quit,
    Interrupted,
}

pub struct Driver {
    service: CollaborationService,
    scheduler: TickScheduler,
    tick_interval: Duration,
    max_ticks: Option<u64>,
    seen_thoughts: u64,
}

impl Driver {
    pub fn new(config: &HostConfig) -> Result<Self, HostError> {
        let service = CollaborationService::new(config.lyrixa.clone())?;
        Ok(Self::with_service(service, config.max_ticks))
    }

    pub fn with_service(service: CollaborationService, max_ticks: Option<u64>) -> Self {
        let scheduler = TickScheduler::from_config(service.config());
        let tick_interval = service.config().tick_interval();
        Self {
            service,
            scheduler,
            tick_interval,
            max_ticks,
            seen_thoughts: 0,
        }
    }

    pub fn service(&self) -> &CollaborationService {
        &self.service
    }

    pub fn ticks(&self) -> u64 {
        self.scheduler.ticks()
    }

    /// Whether the tick limit has been reached.
    pub fn finished(&self) -> bool {
        self.max_ticks
            .is_some_and(|limit| self.scheduler.ticks() >= limit)
    }

    /// Run one tick and log what it produced.
    pub fn tick(&mut self) -> TickReport {
        let report = self.scheduler.tick(&mut self.service);
        tracing::info!(
            tick = report.tick,
            processed = report.processed,
            failed = report.failed,
            follow_ups = report.follow_ups,
            spontaneous = ?report.spontaneous,
            "tick"
        );
        self.log_new_thoughts();
        report
    }

    /// React to one line of input. Returns `true` when the user asked to quit.
    pub fn handle_input(&mut self, line: &str) -> Result<bool, HostError> {
        match parse_input(line) {
            InputAction::Ignore => {}
            InputAction::Quit => return Ok(true),
            InputAction::Summary => {
                for summary in self.service.summaries() {
                    log_summary(&summary);
                }
            }
            InputAction::Submit(text) => {
                let message = self.service.submit_user_message(&text)?;
                tracing::info!(
                    message_id = message.id,
                    recipient = %message.recipient,
                    "user message queued"
                );
            }
        }
        Ok(false)
    }

    /// Pretty JSON of every agent's summary.
    pub fn summaries_json(&self) -> Result<String, HostError> {
        Ok(serde_json::to_string_pretty(&self.service.summaries())?)
    }

    /// Tick on the configured interval until the tick limit, `/quit`, or
    /// ctrl-c. A closed input channel does not stop the loop.
    pub async fn run(&mut self, mut events: mpsc::Receiver<HostEvent>) -> Result<StopReason, HostError> {
        let mut ticker = tokio::time::interval(self.tick_interval);
        let mut input_open = true;
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            if self.finished() {
                return Ok(StopReason::TickLimit);
            }

            tokio::select! {
                _ = ticker.tick() => {
                    self.tick();
                }
                event = events.recv(), if input_open => match event {
                    Some(HostEvent::Input(line)) => {
                        if self.handle_input(&line)? {
                            return Ok(StopReason::Quit);
                        }
                    }
                    Some(HostEvent::InputClosed) | None => {
                        tracing::debug!("input closed");
                        input_open = false;
                    }
                },
                _ = &mut ctrl_c => {
                    return Ok(StopReason::Interrupted);
                }
            }
        }
    }

    fn log_new_thoughts(&mut self) {
        let thoughts = self.service.thoughts();
        for thought in thoughts.since(self.seen_thoughts) {
            tracing::info!(agent = %thought.agent, "{}", thought.text);
        }
        self.seen_thoughts = thoughts.total_recorded();
    }
}

fn log_summary(summary: &KnowledgeSummary) {
    tracing::info!(
        agent = %summary.agent,
        expertise = summary.expertise_level,
        confidence = summary.learning_confidence,
        patterns = summary.patterns_count,
        strategies = summary.strategies_count,
        success_rate = summary.success_rate,
        "summary"
    );
}
