//! Donor profile page.
//!
//! Guarded by the `donante` role. The profile is loaded first; only when it
//! succeeds are appointments, donations and notifications loaded, concurrently
//! and independently of each other.

use crate::api::{FormFields, NewAppointment};
use crate::pages::app::{denied_view, App};
use crate::pages::route::Page;
use crate::pages::status::StatusMessage;
use crate::pages::views::{self, PageView};
use crate::session::{Identity, UserType};

impl App {
    fn donor(&self) -> Result<Identity, PageView> {
        self.guard
            .require_role(UserType::Donante)
            .map_err(|denied| denied_view(Page::DonorProfile, denied))
    }

    pub(crate) async fn open_donor_profile(&self) -> PageView {
        let identity = match self.donor() {
            Ok(identity) => identity,
            Err(view) => return view,
        };
        let id = identity.user_id;

        let (profile, hospitales) =
            tokio::join!(self.api.get_donante_profile(id), self.api.get_centros_salud());
        let (status, profile_section) = views::render_profile(&profile);
        let mut view = PageView::new(Page::DonorProfile).with_status(status);

        if let Some(section) = profile_section {
            let (citas, donaciones, notificaciones) = tokio::join!(
                self.api.get_citas_donante(id),
                self.api.get_donaciones_donante(id),
                self.api.get_notificaciones(id),
            );
            view = view
                .with_section(section)
                .with_section(views::render_citas_donante(&citas))
                .with_section(views::render_donaciones_donante(&donaciones))
                .with_section(views::render_notificaciones(&notificaciones));
        } else {
            tracing::warn!(user_id = id, "Profile not loaded, skipping dependent lists");
        }

        view.with_section(views::render_hospitales(&hospitales))
    }

    async fn refreshed_citas(&self, identity: Identity, status: StatusMessage) -> PageView {
        let citas = self.api.get_citas_donante(identity.user_id).await;
        PageView::new(Page::DonorProfile)
            .with_status(status)
            .with_section(views::render_citas_donante(&citas))
    }

    async fn refreshed_notificaciones(&self, identity: Identity, status: StatusMessage) -> PageView {
        let notificaciones = self.api.get_notificaciones(identity.user_id).await;
        PageView::new(Page::DonorProfile)
            .with_status(status)
            .with_section(views::render_notificaciones(&notificaciones))
    }

    pub async fn confirm_cita(&self, cita_id: i64) -> PageView {
        let identity = match self.donor() {
            Ok(identity) => identity,
            Err(view) => return view,
        };
        let outcome = self.api.confirm_cita(cita_id).await;
        let status = StatusMessage::from_outcome(&outcome, "Error al confirmar cita.");
        self.refreshed_citas(identity, status).await
    }

    pub async fn cancel_cita(&self, cita_id: i64) -> PageView {
        let identity = match self.donor() {
            Ok(identity) => identity,
            Err(view) => return view,
        };
        let outcome = self.api.cancel_cita(cita_id).await;
        let status = StatusMessage::from_outcome(&outcome, "Error al cancelar cita.");
        self.refreshed_citas(identity, status).await
    }

    pub async fn mark_notification_read(&self, notif_id: i64) -> PageView {
        let identity = match self.donor() {
            Ok(identity) => identity,
            Err(view) => return view,
        };
        let outcome = self.api.mark_notif_read(notif_id).await;
        let status = StatusMessage::from_outcome(&outcome, "Error al marcar como leída.");
        self.refreshed_notificaciones(identity, status).await
    }

    pub async fn mark_all_notifications_read(&self) -> PageView {
        let identity = match self.donor() {
            Ok(identity) => identity,
            Err(view) => return view,
        };
        let outcome = self.api.mark_all_notifs_read(identity.user_id).await;
        let status = StatusMessage::from_outcome(&outcome, "Error al marcar todas como leídas.");
        self.refreshed_notificaciones(identity, status).await
    }

    /// Schedule an appointment for the logged-in donor.
    ///
    /// `fields` holds the form as entered (`centro_salud_id`, `fecha_hora`, ...).
    pub async fn schedule_appointment(&self, fields: FormFields) -> PageView {
        let identity = match self.donor() {
            Ok(identity) => identity,
            Err(view) => return view,
        };
        let appointment = NewAppointment {
            donante_id: identity.user_id,
            fields,
        };

        match self.api.add_cita(&appointment).await {
            Ok(env) if env.success => {
                self.refreshed_citas(identity, StatusMessage::success(env.message)).await
            }
            Ok(env) => {
                tracing::warn!(message = %env.message, "Appointment rejected");
                PageView::new(Page::DonorProfile).with_status(StatusMessage::error(env.message))
            }
            Err(e) => {
                tracing::error!(error = %e, "Appointment request failed");
                PageView::new(Page::DonorProfile)
                    .with_status(StatusMessage::error("Error de red o servidor al agendar cita."))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::FormFields;
    use crate::pages::app::testing::offline_app;
    use crate::pages::Page;
    use crate::session::{Identity, UserType};

    #[tokio::test]
    async fn test_donor_actions_require_donor_role() {
        let (app, _) = offline_app();
        app.sessions().persist(&Identity::new(5, UserType::CentroSalud), false).unwrap();

        let views = [
            app.confirm_cita(1).await,
            app.cancel_cita(1).await,
            app.mark_notification_read(1).await,
            app.mark_all_notifications_read().await,
            app.schedule_appointment(FormFields::new()).await,
        ];
        for view in views {
            assert_eq!(view.redirect.map(|r| r.target), Some(Page::Login));
            assert!(view.sections.is_empty());
        }
    }

    #[tokio::test]
    async fn test_unreachable_api_shows_profile_error() {
        let (app, _) = offline_app();
        app.sessions().persist(&Identity::new(5, UserType::Donante), false).unwrap();

        let view = app.open(Page::DonorProfile).await;
        let status = view.status.unwrap();
        assert!(status.is_error());
        assert_eq!(status.text, "Error de red o servidor al cargar perfil.");
        // Only the hospital list, since dependent lists wait for the profile
        assert_eq!(view.sections.len(), 1);
        assert_eq!(view.sections[0].lines, vec!["Error al cargar hospitales"]);
    }
}
