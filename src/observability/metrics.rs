//! Metrics collection.
//!
//! # Metrics
//! - `gate_decisions_total` (counter): decisions by outcome (`continue`,
//!   `bypass`, or a deny reason)
//! - `gate_rate_limited_total` (counter): 429s issued
//! - `gate_session_events_total` (counter): session store activity
//!
//! # Design Decisions
//! - Uses the `metrics` facade only; the host installs the recorder and
//!   exporter
//! - Labels are static strings to keep updates allocation-free

use metrics::counter;

/// Record a gate decision outcome.
pub fn record_decision(outcome: &'static str) {
    counter!("gate_decisions_total", "outcome" => outcome).increment(1);
}

/// Record a rate-limited denial.
pub fn record_rate_limited() {
    counter!("gate_rate_limited_total").increment(1);
}

/// Record session store activity.
pub fn record_session_event(kind: &'static str) {
    counter!("gate_session_events_total", "kind" => kind).increment(1);
}
