//! Shared utilities for integration tests: a programmable stub of the action endpoint.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use bloody_client::config::{ApiConfig, ClientConfig, SessionConfig};
use bloody_client::pages::{App, History};
use bloody_client::{ApiGateway, BloodBankApi, SessionStore};

pub const ENDPOINT_PATH: &str = "/bloody-project/api/api.php";

/// One request as received by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn action(&self) -> Option<String> {
        self.query_param("action")
    }

    pub fn query_param(&self, key: &str) -> Option<String> {
        let query = self.uri.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

#[derive(Default)]
struct Inner {
    responses: HashMap<String, (u16, String)>,
    delays: HashMap<String, Duration>,
    requests: Vec<RecordedRequest>,
}

/// Handle to a running stub API.
#[derive(Clone, Default)]
pub struct StubApi {
    inner: Arc<Mutex<Inner>>,
    pub base_url: String,
}

impl StubApi {
    /// Reply to `action` with a raw body.
    pub fn respond(&self, action: &str, status: u16, body: impl Into<String>) {
        let mut inner = self.inner.lock().expect("stub mutex poisoned");
        inner.responses.insert(action.to_string(), (status, body.into()));
    }

    /// Reply to `action` with a JSON body.
    pub fn respond_json(&self, action: &str, status: u16, body: Value) {
        self.respond(action, status, body.to_string());
    }

    /// Hold the reply to `action` for `delay` before sending it.
    pub fn delay(&self, action: &str, delay: Duration) {
        let mut inner = self.inner.lock().expect("stub mutex poisoned");
        inner.delays.insert(action.to_string(), delay);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().expect("stub mutex poisoned").requests.clone()
    }

    pub fn requests_for(&self, action: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.action().as_deref() == Some(action))
            .collect()
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            endpoint_path: ENDPOINT_PATH.to_string(),
            timeout_secs: 5,
        }
    }

    pub fn gateway(&self) -> ApiGateway {
        ApiGateway::new(&self.api_config()).expect("gateway builds")
    }

    /// App wired to this stub, with in-memory sessions and no redirect delays.
    pub fn app(&self) -> (App, Arc<History>) {
        let history = Arc::new(History::new());
        let app = App::new(
            BloodBankApi::new(self.gateway()),
            SessionStore::in_memory(),
            history.clone(),
            SessionConfig::default().without_delays(),
        );
        (app, history)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api: self.api_config(),
            ..ClientConfig::default()
        }
    }
}

async fn handle(
    State(stub): State<StubApi>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = RecordedRequest {
        method,
        uri,
        headers,
        body,
    };
    let action = request.action().unwrap_or_default();

    let ((status, body), delay) = {
        let mut inner = stub.inner.lock().expect("stub mutex poisoned");
        inner.requests.push(request);
        let reply = inner.responses.get(&action).cloned().unwrap_or_else(|| {
            (
                404,
                r#"{"success":false,"message":"Acción no válida"}"#.to_string(),
            )
        });
        let delay = inner.delays.get(&action).copied();
        (reply, delay)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(status).expect("valid status");
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// Start a stub API on an ephemeral port.
pub async fn start_stub_api() -> StubApi {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let stub = StubApi {
        base_url: format!("http://{}", addr),
        ..StubApi::default()
    };
    let router = Router::new().fallback(handle).with_state(stub.clone());

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    stub
}
