//! Pages open to everyone: index, FAQ and the three forms.

use crate::api::{Credentials, FormFields};
use crate::pages::app::App;
use crate::pages::navigator::Redirect;
use crate::pages::route::Page;
use crate::pages::status::StatusMessage;
use crate::pages::views::{self, PageView, Section};
use crate::session::{Identity, UserType};

impl App {
    pub(crate) async fn open_index(&self) -> PageView {
        let (donantes, centros) = tokio::join!(self.api.get_donantes(), self.api.get_centros_salud());
        PageView::new(Page::Index)
            .with_section(views::render_donantes(&donantes))
            .with_section(views::render_centros(&centros))
    }

    pub(crate) async fn open_faq(&self) -> PageView {
        let faqs = self.api.get_faqs().await;
        PageView::new(Page::Faq).with_section(views::render_faqs(&faqs))
    }

    pub(crate) fn open_form(&self, page: Page) -> PageView {
        let fields = match page {
            Page::Login => "email, password, remember",
            Page::Register => "nombre_completo, email, password, ...",
            _ => "nombre, email, mensaje",
        };
        PageView::new(page).with_section(Section::single("Formulario", fields))
    }

    /// Submit the login form.
    ///
    /// On success the identity goes to the remembered tier when `remember` is
    /// set, to the tab-scoped tier otherwise, and the view redirects to the
    /// role's landing page.
    pub async fn login(&self, credentials: &Credentials, remember: bool) -> PageView {
        let view = PageView::new(Page::Login);

        let envelope = match self.api.login(credentials).await {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(error = %e, "Login request failed");
                return view.with_status(StatusMessage::error("Error de red o servidor. Inténtalo más tarde."));
            }
        };

        if !envelope.success {
            tracing::warn!(message = %envelope.message, "Login rejected");
            return view.with_status(StatusMessage::error(envelope.message));
        }

        let delay = self.session_config.login_redirect_delay();
        let status = StatusMessage::success(format!("{} Redirigiendo...", envelope.message));
        let user_type = envelope.user_type.as_deref().map(str::parse::<UserType>);

        let identity = match (envelope.user_id, user_type) {
            (Some(user_id), Some(Ok(user_type))) => Identity::new(user_id, user_type),
            _ => {
                tracing::warn!(
                    user_id = ?envelope.user_id,
                    user_type = ?envelope.user_type,
                    "Login response has no usable identity, redirecting to index"
                );
                return view
                    .with_status(status)
                    .with_redirect(Redirect::new(Page::Index, delay));
            }
        };

        if let Err(e) = self.sessions.persist(&identity, remember) {
            tracing::error!(error = %e, "Failed to persist session identity");
            return view.with_status(StatusMessage::error("No se pudo guardar la sesión."));
        }

        view.with_status(status)
            .with_redirect(Redirect::new(Page::landing_for(identity.user_type), delay))
    }

    /// Submit the registration form. Fields are sent as entered.
    pub async fn register(&self, fields: &FormFields) -> PageView {
        let view = PageView::new(Page::Register);
        match self.api.register(fields).await {
            Ok(env) if env.success => view
                .with_status(StatusMessage::success(format!("{} Redirigiendo a login...", env.message)))
                .with_redirect(Redirect::new(Page::Login, self.session_config.register_redirect_delay())),
            Ok(env) => {
                tracing::warn!(message = %env.message, "Registration rejected");
                view.with_status(StatusMessage::error(env.message))
            }
            Err(e) => {
                tracing::error!(error = %e, "Registration request failed");
                view.with_status(StatusMessage::error(
                    "Error de red o servidor al registrar. Inténtalo más tarde.",
                ))
            }
        }
    }

    /// Submit the contact form.
    pub async fn submit_contact(&self, fields: &FormFields) -> PageView {
        let outcome = self.api.send_contact_message(fields).await;
        if let Err(e) = &outcome {
            tracing::error!(error = %e, "Contact message failed");
        }
        PageView::new(Page::Contact).with_status(StatusMessage::from_outcome(
            &outcome,
            "Error al enviar el mensaje. Inténtalo de nuevo.",
        ))
    }
}
