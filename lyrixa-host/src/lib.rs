//! Lyrixa host library exports.

pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod telemetry;
