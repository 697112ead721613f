//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration for the blood-donation client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// API location and request settings.
    pub api: ApiConfig,

    /// Identity persistence and redirect timing.
    pub session: SessionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// API endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme and host of the API server (e.g., "https://donaciones.example.org").
    pub base_url: String,

    /// Path of the single action endpoint.
    pub endpoint_path: String,

    /// Total time allowed for one call (request and response) in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            endpoint_path: "/bloody-project/api/api.php".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Session identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// File backing the long-lived ("remember me") store.
    pub remembered_path: PathBuf,

    /// Optional file backing the tab-scoped store. Held in memory when absent,
    /// so it lives exactly as long as the process.
    pub tab_scoped_path: Option<PathBuf>,

    /// Delay before an unauthorized visitor is sent to the login page.
    pub guard_redirect_delay_ms: u64,

    /// Delay before a successful login moves to the role landing page.
    pub login_redirect_delay_ms: u64,

    /// Delay before a successful registration moves to the login page.
    pub register_redirect_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            remembered_path: PathBuf::from(".bloody/session.json"),
            tab_scoped_path: None,
            guard_redirect_delay_ms: 1500,
            login_redirect_delay_ms: 1000,
            register_redirect_delay_ms: 2000,
        }
    }
}

impl SessionConfig {
    pub fn guard_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.guard_redirect_delay_ms)
    }

    pub fn login_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.login_redirect_delay_ms)
    }

    pub fn register_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.register_redirect_delay_ms)
    }

    /// Same settings with every redirect delay set to zero.
    pub fn without_delays(mut self) -> Self {
        self.guard_redirect_delay_ms = 0;
        self.login_redirect_delay_ms = 0;
        self.register_redirect_delay_ms = 0;
        self
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
