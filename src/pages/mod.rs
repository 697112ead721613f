//! Pages subsystem.
//!
//! # Data Flow
//! ```text
//! location / CLI page name
//!     → route.rs (Page, resolved once)
//!     → app.rs (dispatch to controller)
//!     → public.rs | donor.rs | admin.rs | center.rs
//!         guarded pages: session guard first, no API call on denial
//!         independent loaders: tokio::join!, each rendered on its own
//!     → views.rs (pure render into PageView)
//!     → navigator.rs (follow the redirect, if any)
//! ```
//!
//! # Design Decisions
//! - Controllers return a view description, never print or navigate
//! - Failures of one loader only affect its own section

pub mod admin;
pub mod app;
pub mod center;
pub mod donor;
pub mod navigator;
pub mod public;
pub mod route;
pub mod status;
pub mod views;

pub use admin::AdminTab;
pub use app::App;
pub use navigator::{History, Navigator, Redirect};
pub use route::{Page, UnknownPage};
pub use status::{StatusMessage, Tone};
pub use views::{Outcome, PageView, Section};
