//! HTTP client for the action endpoint.
//!
//! # Responsibilities
//! - Send one request per call with JSON headers and an optional JSON body
//! - Normalize non-2xx responses into [`HttpFailure`]
//! - Return the parsed JSON of successful responses untouched
//! - Enforce the configured request timeout

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::gateway::action::{Action, ActionRequest, Method};
use crate::gateway::envelope::Envelope;
use crate::gateway::error::{GatewayError, HttpFailure};
use crate::observability::metrics;

/// Header carrying the per-call correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

const JSON: &str = "application/json";

/// Request gateway: the only component that talks to the API.
#[derive(Clone)]
pub struct ApiGateway {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl ApiGateway {
    /// Build a gateway from API settings.
    pub fn new(config: &ApiConfig) -> Result<Self, GatewayError> {
        let endpoint = endpoint_url(&config.base_url, &config.endpoint_path)?;
        let timeout = config.timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GatewayError::Setup)?;

        tracing::debug!(endpoint = %endpoint, timeout_secs = timeout.as_secs(), "API gateway ready");

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    /// Absolute URL of the action endpoint, without query.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Call an action by name.
    ///
    /// `query` is appended verbatim after `action=<name>&`; it must already be
    /// URL-safe. `body` is ignored for GET.
    pub async fn call(
        &self,
        action: &str,
        method: Method,
        body: Option<Value>,
        query: &str,
    ) -> Result<Value, GatewayError> {
        let action: Action = action.parse().unwrap_or_else(|never| match never {});
        let request = ActionRequest::new(action, method).query(query).body(body);
        self.send(&request).await
    }

    /// Send a request and return the parsed JSON body.
    pub async fn send(&self, request: &ActionRequest) -> Result<Value, GatewayError> {
        let start = Instant::now();
        let action = request.action.as_str();
        let result = self.execute(request).await;

        let outcome = match &result {
            Ok(value) if declares_failure(value) => "declared_failure",
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        metrics::record_api_call(action, outcome, start);
        result
    }

    /// Send a request and decode the envelope's `data` as `T`.
    pub async fn send_typed<T: DeserializeOwned>(
        &self,
        request: &ActionRequest,
    ) -> Result<Envelope<T>, GatewayError> {
        let value = self.send(request).await?;
        let decode = |source| GatewayError::Decode {
            action: request.action.to_string(),
            source,
        };
        let raw: Envelope = serde_json::from_value(value).map_err(decode)?;
        raw.decode_data().map_err(decode)
    }

    async fn execute(&self, request: &ActionRequest) -> Result<Value, GatewayError> {
        let action = request.action.as_str();
        let url = request.url(&self.endpoint);
        let request_id = Uuid::new_v4().to_string();

        if request.body.is_some() && !request.method.allows_body() {
            tracing::warn!(request_id = %request_id, action = %action, "Body dropped from GET request");
        }

        tracing::debug!(
            request_id = %request_id,
            action = %action,
            method = %request.method,
            url = %url,
            has_body = request.effective_body().is_some(),
            "Calling API"
        );

        let mut builder = self
            .client
            .request(request.method.into(), &url)
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
            .header(X_REQUEST_ID, &request_id);

        if let Some(body) = request.effective_body() {
            let payload = serde_json::to_vec(body).map_err(|source| GatewayError::Serialize {
                action: action.to_string(),
                source,
            })?;
            builder = builder.body(payload);
        }

        let response = builder.send().await.map_err(|e| self.transport_error(action, e))?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.transport_error(action, e))?;

        if !status.is_success() {
            let raw = String::from_utf8_lossy(&bytes);
            let failure = HttpFailure::from_body(status.as_u16(), &raw);
            tracing::error!(
                request_id = %request_id,
                action = %action,
                status = status.as_u16(),
                error = %failure,
                body = %raw,
                "API responded with error status"
            );
            return Err(GatewayError::Http(failure));
        }

        let value: Value = serde_json::from_slice(&bytes).map_err(|source| {
            tracing::error!(request_id = %request_id, action = %action, error = %source, "API response is not JSON");
            GatewayError::Decode {
                action: action.to_string(),
                source,
            }
        })?;

        if declares_failure(&value) {
            let message = value.get("message").and_then(Value::as_str).unwrap_or_default();
            tracing::warn!(
                request_id = %request_id,
                action = %action,
                message = %message,
                "API declared failure"
            );
        } else {
            tracing::debug!(request_id = %request_id, action = %action, status = status.as_u16(), "API call succeeded");
        }

        Ok(value)
    }

    fn transport_error(&self, action: &str, source: reqwest::Error) -> GatewayError {
        let error = if source.is_timeout() {
            GatewayError::Timeout {
                action: action.to_string(),
                secs: self.timeout.as_secs(),
            }
        } else {
            GatewayError::Network {
                action: action.to_string(),
                source,
            }
        };
        tracing::error!(action = %action, error = %error, "API call failed");
        error
    }
}

impl std::fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiGateway")
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout.as_secs())
            .finish()
    }
}

fn declares_failure(value: &Value) -> bool {
    value.get("success") == Some(&Value::Bool(false))
}

/// Join base URL and endpoint path into the absolute endpoint URL.
fn endpoint_url(base_url: &str, endpoint_path: &str) -> Result<String, GatewayError> {
    let invalid = |reason: String| GatewayError::InvalidUrl {
        url: format!("{}{}", base_url, endpoint_path),
        reason,
    };
    let base = url::Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(invalid("URL cannot be a base".to_string()));
    }
    let endpoint = base.join(endpoint_path).map_err(|e| invalid(e.to_string()))?;
    Ok(endpoint.to_string())
}
