//! Tick scheduler.
//!
//! Each tick drains the messages that were pending when it started and then
//! may start one spontaneous collaboration. The scheduler is `Idle` between
//! ticks and `Processing` only inside [`TickScheduler::tick`], which takes
//! `&mut` so ticks cannot overlap.

use crate::service::CollaborationService;
use lyrixa_core::{LyrixaConfig, MessageId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    Idle,
    Processing,
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// 1-based tick number
    pub tick: u64,
    pub processed: usize,
    pub failed: usize,
    pub follow_ups: usize,
    /// Id of the spontaneous collaboration message, if one was started
    pub spontaneous: Option<MessageId>,
}

#[derive(Debug, Clone)]
pub struct TickScheduler {
    state: SchedulerState,
    ticks: u64,
    spontaneous_probability: f64,
}

impl TickScheduler {
    pub fn new(spontaneous_probability: f64) -> Self {
        Self {
            state: SchedulerState::Idle,
            ticks: 0,
            spontaneous_probability: spontaneous_probability.clamp(0.0, 1.0),
        }
    }

    pub fn from_config(config: &LyrixaConfig) -> Self {
        Self::new(config.spontaneous_probability)
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one tick against `service`.
    pub fn tick(&mut self, service: &mut CollaborationService) -> TickReport {
        self.state = SchedulerState::Processing;
        self.ticks += 1;

        let outcome = service.process_pending();
        let spontaneous = service
            .maybe_spontaneous_collaboration(self.spontaneous_probability)
            .map(|m| m.id);

        self.state = SchedulerState::Idle;

        let report = TickReport {
            tick: self.ticks,
            processed: outcome.processed.len(),
            failed: outcome.failed.len(),
            follow_ups: outcome.follow_ups.len(),
            spontaneous,
        };
        tracing::debug!(
            tick = report.tick,
            processed = report.processed,
            failed = report.failed,
            follow_ups = report.follow_ups,
            spontaneous = ?report.spontaneous,
            "tick complete"
        );
        report
    }
}
