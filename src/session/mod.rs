//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! login response → store.rs (persist pair in the selected tier)
//!                      ↓
//! page open → guard.rs (read identity, check role)
//!                      ↓
//!          granted: controller runs loaders
//!          denied:  neutral status + delayed redirect to login
//! ```
//!
//! # Design Decisions
//! - Identity is client-trusted; there is no expiry and no verification
//! - Both tiers sit behind one injected [`SessionStore`], built once per app

pub mod guard;
pub mod identity;
pub mod store;

pub use guard::{AccessDenied, SessionGuard};
pub use identity::{Identity, IdentityError, UserType};
pub use store::{FileStore, IdentityStore, MemoryStore, Persistence, SessionError, SessionStore};
