//! Client-side authorization gate.
//!
//! # Responsibilities
//! - Decide whether a role-specific page may run its data loaders
//! - Produce the "not authorized" status and the delayed redirect to login
//!
//! # Design Decisions
//! - The guard only reads identity; it never writes or clears a store
//! - A denial carries everything the page needs to render, so controllers
//!   return early without issuing a single API call

use std::time::Duration;
use thiserror::Error;

use crate::observability::metrics;
use crate::pages::{Page, Redirect, StatusMessage};
use crate::session::identity::{Identity, UserType};
use crate::session::store::SessionStore;

/// A failed role check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("access denied: {expected} required")]
pub struct AccessDenied {
    pub expected: UserType,
    pub found: Option<UserType>,
    pub status: StatusMessage,
    pub redirect: Redirect,
}

#[derive(Debug, Clone)]
pub struct SessionGuard {
    store: SessionStore,
    redirect_delay: Duration,
}

impl SessionGuard {
    pub fn new(store: SessionStore, redirect_delay: Duration) -> Self {
        Self {
            store,
            redirect_delay,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.store.current_identity()
    }

    /// Identity of the current user when it has the `expected` role.
    pub fn require_role(&self, expected: UserType) -> Result<Identity, AccessDenied> {
        let identity = self.store.current_identity();

        match identity {
            Some(identity) if identity.user_type == expected => {
                metrics::record_guard_decision(expected.as_str(), true);
                tracing::debug!(user_id = identity.user_id, role = %expected, "Access granted");
                Ok(identity)
            }
            other => {
                metrics::record_guard_decision(expected.as_str(), false);
                let found = other.map(|i| i.user_type);
                tracing::warn!(
                    expected = %expected,
                    found = found.map(|t| t.as_str()).unwrap_or("none"),
                    "Access denied, redirecting to login"
                );
                Err(AccessDenied {
                    expected,
                    found,
                    status: StatusMessage::neutral(format!(
                        "No has iniciado sesión como {} o tu sesión ha expirado.",
                        expected.label()
                    )),
                    redirect: Redirect::new(Page::Login, self.redirect_delay),
                })
            }
        }
    }
}
