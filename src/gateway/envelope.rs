//! Response envelope shared by every action.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gateway::lenient;

/// Uniform `{success, message, data?}` wrapper returned by the API.
///
/// `success: false` is a declared application failure, not a transport error;
/// callers branch on it and show `message` verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub success: bool,

    #[serde(default, deserialize_with = "lenient::text")]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Present on `login` responses.
    #[serde(default, deserialize_with = "lenient::opt_int", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,

    /// Present on `login` responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Server message when the envelope declares a failure.
    pub fn failure_message(&self) -> Option<&str> {
        (!self.success).then_some(self.message.as_str())
    }
}

impl Envelope<Value> {
    /// Decode a raw envelope into a typed one.
    ///
    /// `data` is only decoded for successful envelopes: a declared failure
    /// keeps its message and never turns into a decode error.
    pub fn decode_data<T: DeserializeOwned>(self) -> Result<Envelope<T>, serde_json::Error> {
        let data = match (self.success, self.data) {
            (true, Some(value)) if !value.is_null() => Some(serde_json::from_value(value)?),
            _ => None,
        };
        Ok(Envelope {
            success: self.success,
            message: self.message,
            data,
            user_id: self.user_id,
            user_type: self.user_type,
        })
    }
}
