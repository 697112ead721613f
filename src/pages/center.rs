//! Health center workspace.
//!
//! Guarded by the `centro_salud` role. The center id is the logged-in user id.

use crate::api::{FormFields, InventoryUpdate};
use crate::pages::app::{denied_view, App};
use crate::pages::route::Page;
use crate::pages::status::StatusMessage;
use crate::pages::views::{self, PageView};
use crate::session::{Identity, UserType};

/// Appointment state listed on the workspace.
const PENDING: &str = "pendiente";

impl App {
    fn center(&self) -> Result<Identity, PageView> {
        self.guard
            .require_role(UserType::CentroSalud)
            .map_err(|denied| denied_view(Page::CenterWorkspace, denied))
    }

    pub(crate) async fn open_center_workspace(&self) -> PageView {
        let identity = match self.center() {
            Ok(identity) => identity,
            Err(view) => return view,
        };
        let centro_id = identity.user_id;

        let (citas, donaciones, inventario) = tokio::join!(
            self.api.get_citas_by_centro(centro_id, PENDING),
            self.api.get_donaciones_by_centro(centro_id),
            self.api.get_inventario(centro_id),
        );
        tracing::debug!(centro_id, "Workspace data loaded");

        PageView::new(Page::CenterWorkspace)
            .with_section(views::render_citas_centro(&citas))
            .with_section(views::render_donaciones_centro(&donaciones))
            .with_section(views::render_inventario(&inventario))
    }

    async fn refreshed_pending(&self, centro_id: i64, status: StatusMessage) -> PageView {
        let citas = self.api.get_citas_by_centro(centro_id, PENDING).await;
        PageView::new(Page::CenterWorkspace)
            .with_status(status)
            .with_section(views::render_citas_centro(&citas))
    }

    /// Confirm that the donor attended.
    pub async fn confirm_attendance(&self, cita_id: i64) -> PageView {
        let identity = match self.center() {
            Ok(identity) => identity,
            Err(view) => return view,
        };
        let outcome = self.api.confirm_cita(cita_id).await;
        let status = StatusMessage::from_outcome(&outcome, "Error al confirmar asistencia.");
        self.refreshed_pending(identity.user_id, status).await
    }

    pub async fn cancel_center_cita(&self, cita_id: i64) -> PageView {
        let identity = match self.center() {
            Ok(identity) => identity,
            Err(view) => return view,
        };
        let outcome = self.api.cancel_cita(cita_id).await;
        let status = StatusMessage::from_outcome(&outcome, "Error al cancelar cita.");
        self.refreshed_pending(identity.user_id, status).await
    }

    /// Set the stock of one blood type. Negative quantities never reach the API.
    pub async fn update_inventory(&self, tipo_sangre: &str, cantidad_unidades: i64) -> PageView {
        let identity = match self.center() {
            Ok(identity) => identity,
            Err(view) => return view,
        };
        if cantidad_unidades < 0 {
            tracing::debug!(tipo_sangre = %tipo_sangre, cantidad_unidades, "Negative quantity rejected");
            return PageView::new(Page::CenterWorkspace)
                .with_status(StatusMessage::error("La cantidad no puede ser negativa."));
        }

        let update = InventoryUpdate {
            centro_salud_id: identity.user_id,
            tipo_sangre: tipo_sangre.to_string(),
            cantidad_unidades,
        };
        let outcome = self.api.update_inventario(&update).await;
        let status = StatusMessage::from_outcome(&outcome, "Error al actualizar inventario.");
        let inventario = self.api.get_inventario(identity.user_id).await;
        PageView::new(Page::CenterWorkspace)
            .with_status(status)
            .with_section(views::render_inventario(&inventario))
    }

    /// Record a donation result for this center.
    ///
    /// `centro_salud_id` is always taken from the session, overriding the form.
    pub async fn add_donation_result(&self, mut fields: FormFields) -> PageView {
        let identity = match self.center() {
            Ok(identity) => identity,
            Err(view) => return view,
        };
        fields.insert("centro_salud_id", identity.user_id.to_string());

        let outcome = self.api.add_donacion_result(&fields).await;
        let status =
            StatusMessage::from_outcome(&outcome, "Error al agregar donación. Inténtalo de nuevo.");
        let view = PageView::new(Page::CenterWorkspace).with_status(status);

        match outcome {
            Ok(env) if env.success => {
                let donaciones = self.api.get_donaciones_by_centro(identity.user_id).await;
                view.with_section(views::render_donaciones_centro(&donaciones))
            }
            _ => view,
        }
    }

    /// Send a notification to a donor. Fields are sent as entered.
    pub async fn send_notification(&self, fields: &FormFields) -> PageView {
        if let Err(view) = self.center() {
            return view;
        }
        let outcome = self.api.send_notification(fields).await;
        PageView::new(Page::CenterWorkspace).with_status(StatusMessage::from_outcome(
            &outcome,
            "Error al enviar notificación. Inténtalo de nuevo.",
        ))
    }
}
