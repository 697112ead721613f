//! Application root: wiring and page dispatch.
//!
//! # Responsibilities
//! - Own the API client, the session tiers, the guard and the navigator
//! - Resolve a page once and hand it to its controller
//! - Follow redirects produced by controllers
//!
//! # Design Decisions
//! - Everything is built once in [`App::from_config`] and shared by reference;
//!   controllers never reach for ambient state
//! - Controllers return a [`PageView`]; rendering and navigation stay with the caller

use std::sync::Arc;

use crate::api::BloodBankApi;
use crate::config::{ClientConfig, SessionConfig};
use crate::gateway::{ApiGateway, GatewayError};
use crate::pages::admin::AdminTab;
use crate::pages::navigator::{Navigator, Redirect};
use crate::pages::route::Page;
use crate::pages::status::StatusMessage;
use crate::pages::views::PageView;
use crate::session::{AccessDenied, SessionGuard, SessionStore};

pub struct App {
    pub(crate) api: BloodBankApi,
    pub(crate) sessions: SessionStore,
    pub(crate) guard: SessionGuard,
    pub(crate) navigator: Arc<dyn Navigator>,
    pub(crate) session_config: SessionConfig,
}

impl App {
    pub fn new(
        api: BloodBankApi,
        sessions: SessionStore,
        navigator: Arc<dyn Navigator>,
        session_config: SessionConfig,
    ) -> Self {
        let guard = SessionGuard::new(sessions.clone(), session_config.guard_redirect_delay());
        Self {
            api,
            sessions,
            guard,
            navigator,
            session_config,
        }
    }

    /// Build the whole client from configuration.
    pub fn from_config(config: &ClientConfig, navigator: Arc<dyn Navigator>) -> Result<Self, GatewayError> {
        let gateway = ApiGateway::new(&config.api)?;
        let sessions = SessionStore::from_config(&config.session);
        Ok(Self::new(
            BloodBankApi::new(gateway),
            sessions,
            navigator,
            config.session.clone(),
        ))
    }

    pub fn api(&self) -> &BloodBankApi {
        &self.api
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    /// Open a page and run whatever it loads on arrival.
    pub async fn open(&self, page: Page) -> PageView {
        tracing::info!(page = %page, path = page.path(), "Opening page");
        match page {
            Page::Index => self.open_index().await,
            Page::Faq => self.open_faq().await,
            Page::Login | Page::Register | Page::Contact => self.open_form(page),
            Page::DonorProfile => self.open_donor_profile().await,
            Page::AdminDashboard => self.open_admin(AdminTab::default()).await,
            Page::CenterWorkspace => self.open_center_workspace().await,
        }
    }

    /// Open the page a location path points to. `None` for unknown paths.
    pub async fn open_path(&self, path: &str) -> Option<PageView> {
        match Page::resolve(path) {
            Some(page) => Some(self.open(page).await),
            None => {
                tracing::debug!(path = %path, "No page for path");
                None
            }
        }
    }

    /// Follow the view's redirect, if any. Returns the page navigated to.
    pub async fn follow(&self, view: &PageView) -> Option<Page> {
        let redirect = view.redirect?;
        redirect.follow(self.navigator.as_ref()).await;
        Some(redirect.target)
    }

    /// Clear both session tiers and go back to the index.
    pub fn logout(&self) -> PageView {
        let view = PageView::new(Page::Index).with_redirect(Redirect::immediate(Page::Index));
        match self.sessions.clear() {
            Ok(()) => view.with_status(StatusMessage::success("Sesión cerrada.")),
            Err(e) => {
                tracing::error!(error = %e, "Failed to clear session");
                view.with_status(StatusMessage::error("No se pudo cerrar la sesión."))
            }
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("api", &self.api)
            .field("session_config", &self.session_config)
            .finish_non_exhaustive()
    }
}

/// View for a guarded page whose role check failed.
pub(crate) fn denied_view(page: Page, denied: AccessDenied) -> PageView {
    PageView::new(page)
        .with_status(denied.status)
        .with_redirect(denied.redirect)
}
