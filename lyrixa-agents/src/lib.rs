//! Lyrixa Agents - Knowledge & Messaging
//!
//! Behavior behind the Lyrixa agent team:
//! - Message bus with FIFO processing and bounded retention
//! - Per-agent knowledge store (learning, preferences, expertise)
//! - Collaboration policy and spontaneous pairing
//! - Per-type message handlers and the thought stream
//! - Collaboration service and tick scheduler tying it together
//!
//! Everything is single-threaded; the host drives [`TickScheduler::tick`].

pub mod bus;
pub mod handlers;
pub mod knowledge;
pub mod policy;
pub mod random;
pub mod scheduler;
pub mod service;
pub mod thoughts;

pub use bus::MessageBus;
pub use handlers::{
    default_handlers, AlertHandler, CollaborationHandler, HandlerContext, HandlerTable,
    InsightHandler, MessageHandler, RequestHandler, ResponseHandler,
};
pub use knowledge::{ExpertiseUpdate, KnowledgeStore};
pub use policy::CollaborationPolicy;
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use scheduler::{SchedulerState, TickReport, TickScheduler};
pub use service::{CollaborationService, ProcessOutcome, USER_AGENT};
pub use thoughts::{ThoughtKind, ThoughtStream};
