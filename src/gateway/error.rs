//! Gateway error types.

use std::fmt;
use thiserror::Error;

/// Longest slice of a non-JSON error body echoed back in an error string.
pub const RAW_EXCERPT_CHARS: usize = 200;

/// Marker appended when an error body could not be parsed as JSON.
pub const NOT_JSON_MARKER: &str = "(No es JSON)";

/// What could be recovered from the body of a non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureDetail {
    /// Body was JSON with a usable `message` field.
    Message(String),
    /// Body was JSON without a message.
    NoMessage,
    /// Body was not JSON; holds at most [`RAW_EXCERPT_CHARS`] characters of it.
    NotJson { excerpt: String },
}

/// A response whose HTTP status signalled failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFailure {
    pub status: u16,
    pub detail: FailureDetail,
}

impl HttpFailure {
    /// Classify a failed response body.
    pub fn from_body(status: u16, body: &str) -> Self {
        let detail = match serde_json::from_str::<serde_json::Value>(body) {
            // A bare `null` has no fields to look into
            Ok(serde_json::Value::Null) | Err(_) => FailureDetail::NotJson {
                excerpt: body.chars().take(RAW_EXCERPT_CHARS).collect(),
            },
            Ok(json) => match json.get("message").filter(|m| is_truthy(m)) {
                Some(serde_json::Value::String(m)) => FailureDetail::Message(m.clone()),
                Some(other) => FailureDetail::Message(other.to_string()),
                None => FailureDetail::NoMessage,
            },
        };
        Self { status, detail }
    }

    /// Server-provided message, if the body carried one.
    pub fn message(&self) -> Option<&str> {
        match &self.detail {
            FailureDetail::Message(m) => Some(m),
            _ => None,
        }
    }
}

/// Whether a `message` value counts as present: empty strings, zero, `false` and `null` do not.
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP error! Status: {}", self.status)?;
        match &self.detail {
            FailureDetail::Message(m) => write!(f, ", Message: {}", m),
            FailureDetail::NoMessage => Ok(()),
            FailureDetail::NotJson { excerpt } => {
                write!(f, ", Raw Response: {}... {}", excerpt, NOT_JSON_MARKER)
            }
        }
    }
}

/// Errors raised by [`ApiGateway`](crate::gateway::ApiGateway) calls.
///
/// A declared failure (`success: false`) is *not* represented here.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Non-2xx HTTP status.
    #[error("{0}")]
    Http(HttpFailure),

    /// Connection, DNS or protocol failure before a response arrived.
    #[error("Network error calling '{action}': {source}")]
    Network {
        action: String,
        #[source]
        source: reqwest::Error,
    },

    /// No response within the configured timeout.
    #[error("Request for '{action}' timed out after {secs} seconds")]
    Timeout { action: String, secs: u64 },

    /// A 2xx response whose body is not the expected JSON.
    #[error("Invalid JSON in response to '{action}': {source}")]
    Decode {
        action: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request body could not be serialized.
    #[error("Could not serialize body for '{action}': {source}")]
    Serialize {
        action: String,
        #[source]
        source: serde_json::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Setup(#[source] reqwest::Error),

    /// The configured API location is not a usable URL.
    #[error("Invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl GatewayError {
    /// HTTP status, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Http(failure) => Some(failure.status),
            _ => None,
        }
    }

    /// Short outcome label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Http(_) => "http_error",
            GatewayError::Network { .. } => "network_error",
            GatewayError::Timeout { .. } => "timeout",
            GatewayError::Decode { .. } => "decode_error",
            GatewayError::Serialize { .. } => "serialize_error",
            GatewayError::Setup(_) => "setup_error",
            GatewayError::InvalidUrl { .. } => "invalid_url",
        }
    }
}
