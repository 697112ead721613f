//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! gateway, session guard, page controllers produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms via the metrics facade)
//! ```
//!
//! # Design Decisions
//! - Structured fields (action, status, role) instead of formatted strings
//! - Request ID flows from the gateway into every log line of a call
//! - Metrics are cheap no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
