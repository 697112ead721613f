//! Status region shown at the top of a page or form.

use serde::Serialize;
use std::fmt;

use crate::gateway::{Envelope, GatewayError};

/// Colour of the status region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Success,
    Error,
    /// Loading or informational.
    Neutral,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Success => "success",
            Tone::Error => "error",
            Tone::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub text: String,
    pub tone: Tone,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Success)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Error)
    }

    pub fn neutral(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Neutral)
    }

    /// The server message, toned by the envelope's `success` flag.
    pub fn from_envelope<T>(envelope: &Envelope<T>) -> Self {
        let tone = if envelope.success { Tone::Success } else { Tone::Error };
        Self::new(envelope.message.clone(), tone)
    }

    /// Outcome of a mutation: the envelope message, or `fallback` when the
    /// call itself failed. Raw gateway errors are never shown.
    pub fn from_outcome<T>(outcome: &Result<Envelope<T>, GatewayError>, fallback: &str) -> Self {
        match outcome {
            Ok(envelope) => Self::from_envelope(envelope),
            Err(_) => Self::error(fallback),
        }
    }

    pub fn is_error(&self) -> bool {
        self.tone == Tone::Error
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.tone.as_str(), self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::HttpFailure;
    use serde_json::Value;

    fn envelope(success: bool, message: &str) -> Envelope<Value> {
        serde_json::from_value(serde_json::json!({"success": success, "message": message})).unwrap()
    }

    #[test]
    fn test_from_envelope_tone() {
        assert_eq!(
            StatusMessage::from_envelope(&envelope(true, "Cita confirmada")),
            StatusMessage::success("Cita confirmada")
        );
        assert_eq!(
            StatusMessage::from_envelope(&envelope(false, "Cita no encontrada")),
            StatusMessage::error("Cita no encontrada")
        );
    }

    #[test]
    fn test_from_outcome_hides_transport_errors() {
        let failed: Result<Envelope<Value>, GatewayError> =
            Err(GatewayError::Http(HttpFailure::from_body(500, "boom")));
        let status = StatusMessage::from_outcome(&failed, "Error al confirmar cita.");
        assert_eq!(status, StatusMessage::error("Error al confirmar cita."));
        assert!(!status.text.contains("500"));
    }

    #[test]
    fn test_display() {
        assert_eq!(StatusMessage::neutral("Cargando...").to_string(), "[neutral] Cargando...");
    }
}
