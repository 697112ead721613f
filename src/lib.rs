//! Client core for the blood donation platform.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI / embedding app
//!          │
//!          ▼
//!   ┌──────────────┐     ┌──────────────────┐
//!   │    pages     │────▶│     session      │  identity tiers + role guard
//!   │ route → ctrl │     └──────────────────┘
//!   │   → views    │
//!   └──────┬───────┘
//!          ▼
//!   ┌──────────────┐     ┌──────────────────┐
//!   │     api      │────▶│     gateway      │────▶ action endpoint (HTTP/JSON)
//!   │ typed calls  │     │ one call, errors │
//!   └──────────────┘     └──────────────────┘
//!
//!   cross-cutting: config (TOML), observability (tracing, metrics)
//! ```

pub mod api;
pub mod config;
pub mod gateway;
pub mod observability;
pub mod pages;
pub mod session;

pub use api::BloodBankApi;
pub use config::ClientConfig;
pub use gateway::{ApiGateway, Envelope, GatewayError};
pub use pages::{App, Page, PageView};
pub use session::{Identity, SessionGuard, SessionStore, UserType};
