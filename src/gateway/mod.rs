//! Request gateway subsystem.
//!
//! # Data Flow
//! ```text
//! ActionRequest (action, method, query, body)
//!     → action.rs (URL: base + endpoint + ?action=<name>[&<query>])
//!     → client.rs (headers, JSON body, timeout, send)
//!     → non-2xx: error.rs (HttpFailure with status + message / raw excerpt)
//!     → 2xx:     envelope.rs (parsed JSON returned as-is)
//! ```
//!
//! # Design Decisions
//! - One endpoint; every operation is multiplexed through the `action` parameter
//! - Transport failures are `Err`; declared failures are `Ok` envelopes with
//!   `success: false` and must be checked by the caller
//! - No retries, no schema validation of successful responses
//! - Malformed JSON on a 2xx response is a distinct, loud error

pub mod action;
pub mod client;
pub mod envelope;
pub mod error;
pub(crate) mod lenient;

pub use action::{Action, ActionRequest, Method};
pub use client::{ApiGateway, X_REQUEST_ID};
pub use envelope::Envelope;
pub use error::{FailureDetail, GatewayError, HttpFailure};
