//! Metrics collection.
//!
//! # Responsibilities
//! - Define client metrics (API calls, latency, guard decisions, logins)
//! - Record through the `metrics` facade; the embedding application decides
//!   whether a recorder/exporter is installed
//!
//! # Metrics
//! - `bloody_api_calls_total` (counter): calls by action, outcome
//! - `bloody_api_call_duration_seconds` (histogram): round-trip latency by action
//! - `bloody_guard_decisions_total` (counter): guard results by role, decision
//! - `bloody_logins_total` (counter): successful logins by persistence tier

use metrics::{counter, histogram};
use std::time::Instant;

/// Record a finished gateway call.
pub fn record_api_call(action: &str, outcome: &'static str, start: Instant) {
    let action = action.to_string();
    counter!("bloody_api_calls_total", "action" => action.clone(), "outcome" => outcome).increment(1);
    histogram!("bloody_api_call_duration_seconds", "action" => action).record(start.elapsed().as_secs_f64());
}

/// Record a session guard decision.
pub fn record_guard_decision(role: &'static str, granted: bool) {
    let decision = if granted { "granted" } else { "denied" };
    counter!("bloody_guard_decisions_total", "role" => role, "decision" => decision).increment(1);
}

/// Record a persisted login.
pub fn record_login(persistence: &'static str) {
    counter!("bloody_logins_total", "persistence" => persistence).increment(1);
}
