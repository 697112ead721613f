//! Admin dashboard.
//!
//! Guarded by the `admin` role. Each tab loads its own data when shown.

use std::fmt;
use std::str::FromStr;

use crate::api::UserStatus;
use crate::pages::app::{denied_view, App};
use crate::pages::route::Page;
use crate::pages::status::StatusMessage;
use crate::pages::views::{self, PageView};
use crate::session::UserType;

/// Dashboard tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AdminTab {
    #[default]
    Estadisticas,
    GestionUsuarios,
    Mensajes,
}

impl AdminTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminTab::Estadisticas => "estadisticas",
            AdminTab::GestionUsuarios => "gestion-usuarios",
            AdminTab::Mensajes => "mensajes",
        }
    }
}

impl fmt::Display for AdminTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "estadisticas" => Ok(AdminTab::Estadisticas),
            "gestion-usuarios" | "usuarios" => Ok(AdminTab::GestionUsuarios),
            "mensajes" => Ok(AdminTab::Mensajes),
            other => Err(format!("unknown admin tab '{}'", other)),
        }
    }
}

impl App {
    fn require_admin(&self) -> Result<(), PageView> {
        self.guard
            .require_role(UserType::Admin)
            .map(|_| ())
            .map_err(|denied| denied_view(Page::AdminDashboard, denied))
    }

    /// Show one dashboard tab.
    pub async fn open_admin(&self, tab: AdminTab) -> PageView {
        if let Err(view) = self.require_admin() {
            return view;
        }
        tracing::debug!(tab = %tab, "Showing admin tab");

        let view = PageView::new(Page::AdminDashboard);
        match tab {
            AdminTab::Estadisticas => {
                view.with_section(views::render_admin_stats(&self.api.get_admin_stats().await))
            }
            AdminTab::GestionUsuarios => {
                view.with_section(views::render_usuarios(&self.api.get_all_users().await))
            }
            AdminTab::Mensajes => {
                view.with_section(views::render_mensajes(&self.api.get_contact_messages().await))
            }
        }
    }

    pub async fn update_user_status(&self, user_id: i64, estado: UserStatus) -> PageView {
        if let Err(view) = self.require_admin() {
            return view;
        }
        let outcome = self.api.update_user_status(user_id, estado).await;
        let status = StatusMessage::from_outcome(&outcome, "Error al actualizar estado.");
        tracing::info!(user_id, estado = %estado, ok = !status.is_error(), "User status update");
        self.open_admin(AdminTab::GestionUsuarios).await.with_status(status)
    }

    pub async fn mark_contact_message_read(&self, message_id: i64) -> PageView {
        if let Err(view) = self.require_admin() {
            return view;
        }
        let outcome = self.api.mark_contact_message_read(message_id).await;
        let status = StatusMessage::from_outcome(&outcome, "Error al marcar mensaje como leído.");
        self.open_admin(AdminTab::Mensajes).await.with_status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::app::testing::offline_app;
    use crate::session::Identity;

    #[test]
    fn test_tab_names() {
        assert_eq!(AdminTab::default(), AdminTab::Estadisticas);
        for tab in [AdminTab::Estadisticas, AdminTab::GestionUsuarios, AdminTab::Mensajes] {
            assert_eq!(tab.as_str().parse::<AdminTab>().unwrap(), tab);
        }
        assert!("ajustes".parse::<AdminTab>().is_err());
    }

    #[tokio::test]
    async fn test_donor_cannot_use_admin_actions() {
        let (app, _) = offline_app();
        app.sessions().persist(&Identity::new(3, UserType::Donante), true).unwrap();

        let view = app.update_user_status(9, UserStatus::Inactivo).await;
        assert_eq!(view.page, Page::AdminDashboard);
        assert_eq!(view.redirect.map(|r| r.target), Some(Page::Login));
        assert_eq!(
            view.status.unwrap().text,
            "No has iniciado sesión como administrador o tu sesión ha expirado."
        );
    }

    #[tokio::test]
    async fn test_stats_tab_network_failure() {
        let (app, _) = offline_app();
        app.sessions().persist(&Identity::new(1, UserType::Admin), true).unwrap();

        let view = app.open_admin(AdminTab::Estadisticas).await;
        assert_eq!(view.sections[0].lines, vec!["Error de red al cargar estadísticas."]);
    }
}
