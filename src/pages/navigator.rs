//! Page navigation.
//!
//! Controllers never navigate by themselves: they return a [`Redirect`] and
//! the caller follows it through a [`Navigator`].

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::pages::route::Page;

/// Something that can move the user to another page.
pub trait Navigator: Send + Sync {
    fn navigate(&self, page: Page);
}

/// Navigator that records every visit.
#[derive(Debug, Default)]
pub struct History {
    visits: Mutex<Vec<Page>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<Page> {
        self.visits.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn current(&self) -> Option<Page> {
        self.visits.lock().unwrap_or_else(PoisonError::into_inner).last().copied()
    }
}

impl Navigator for History {
    fn navigate(&self, page: Page) {
        tracing::debug!(page = %page, path = page.path(), "Navigating");
        self.visits.lock().unwrap_or_else(PoisonError::into_inner).push(page);
    }
}

/// Pending navigation to `target` after `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub target: Page,
    pub delay: Duration,
}

impl Redirect {
    pub fn new(target: Page, delay: Duration) -> Self {
        Self { target, delay }
    }

    pub fn immediate(target: Page) -> Self {
        Self::new(target, Duration::ZERO)
    }

    /// Wait out the delay, then navigate.
    pub async fn follow(&self, navigator: &dyn Navigator) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        navigator.navigate(self.target);
    }
}
