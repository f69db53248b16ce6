//! Identity types for Lyrixa records

use chrono::{DateTime, Utc};

/// Name of a logical agent role (e.g. "GoalAgent").
/// Agents have no execution thread of their own; the name is purely a key.
pub type AgentName = String;

/// Message identifier. Assigned by the bus, strictly increasing, never reused.
pub type MessageId = u64;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Clamp a score into the unit interval `[0.0, 1.0]`.
///
/// NaN collapses to `0.0` so a bad input can never escape the range.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_unit_bounds() {
        assert_eq!(clamp_unit(-0.2), 0.0);
        assert_eq!(clamp_unit(1.7), 1.0);
        assert_eq!(clamp_unit(0.42), 0.42);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
    }
}
