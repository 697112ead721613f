//! Typed operations over the action endpoint.
//!
//! One method per known action. Each builds the exact query string or body the
//! server expects and decodes the envelope's `data` into a model.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::api::models::{
    AdminStats, CentroSalud, CitaCentro, CitaDonante, ContactMessage, Credentials, DonacionCentro,
    DonacionDonante, Donante, DonanteProfile, Faq, FormFields, InventarioRow, InventoryUpdate,
    NewAppointment, Notificacion, UserStatus, Usuario,
};
use crate::gateway::{Action, ActionRequest, ApiGateway, Envelope, GatewayError};

type ApiResult<T> = Result<Envelope<T>, GatewayError>;

/// Client for every operation of the blood bank API.
#[derive(Debug, Clone)]
pub struct BloodBankApi {
    gateway: ApiGateway,
}

impl BloodBankApi {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }

    async fn fetch<T: DeserializeOwned>(&self, request: ActionRequest) -> ApiResult<T> {
        self.gateway.send_typed(&request).await
    }

    async fn submit(&self, action: Action, body: Value) -> ApiResult<Value> {
        self.fetch(ActionRequest::post(action).body(Some(body))).await
    }

    fn by_id(action: Action, key: &str, id: i64) -> ActionRequest {
        ActionRequest::get(action).query(format!("{}={}", key, id))
    }

    // --- public ---

    pub async fn get_donantes(&self) -> ApiResult<Vec<Donante>> {
        self.fetch(ActionRequest::get(Action::GetDonantes)).await
    }

    pub async fn get_centros_salud(&self) -> ApiResult<Vec<CentroSalud>> {
        self.fetch(ActionRequest::get(Action::GetCentrosSalud)).await
    }

    pub async fn get_faqs(&self) -> ApiResult<Vec<Faq>> {
        self.fetch(ActionRequest::get(Action::GetFaqs)).await
    }

    /// Successful envelopes carry `user_id` and `user_type`.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<Value> {
        let request = ActionRequest::post(Action::Login).json(credentials)?;
        self.fetch(request).await
    }

    pub async fn register(&self, fields: &FormFields) -> ApiResult<Value> {
        let request = ActionRequest::post(Action::Register).json(fields)?;
        self.fetch(request).await
    }

    pub async fn send_contact_message(&self, fields: &FormFields) -> ApiResult<Value> {
        let request = ActionRequest::post(Action::SendContactMessage).json(fields)?;
        self.fetch(request).await
    }

    // --- donor ---

    pub async fn get_donante_profile(&self, user_id: i64) -> ApiResult<DonanteProfile> {
        self.fetch(Self::by_id(Action::GetDonanteProfile, "user_id", user_id)).await
    }

    pub async fn get_citas_donante(&self, donante_id: i64) -> ApiResult<Vec<CitaDonante>> {
        self.fetch(Self::by_id(Action::GetCitasDonante, "donante_id", donante_id)).await
    }

    pub async fn get_donaciones_donante(&self, donante_id: i64) -> ApiResult<Vec<DonacionDonante>> {
        self.fetch(Self::by_id(Action::GetDonacionesDonante, "donante_id", donante_id)).await
    }

    pub async fn get_notificaciones(&self, user_id: i64) -> ApiResult<Vec<Notificacion>> {
        self.fetch(Self::by_id(Action::GetNotificaciones, "user_id", user_id)).await
    }

    pub async fn confirm_cita(&self, cita_id: i64) -> ApiResult<Value> {
        self.submit(Action::ConfirmCita, json!({ "cita_id": cita_id })).await
    }

    pub async fn cancel_cita(&self, cita_id: i64) -> ApiResult<Value> {
        self.submit(Action::CancelCita, json!({ "cita_id": cita_id })).await
    }

    pub async fn mark_notif_read(&self, notif_id: i64) -> ApiResult<Value> {
        self.submit(Action::MarkNotifRead, json!({ "notif_id": notif_id })).await
    }

    pub async fn mark_all_notifs_read(&self, user_id: i64) -> ApiResult<Value> {
        self.submit(Action::MarkNotifRead, json!({ "user_id": user_id, "mark_all": true }))
            .await
    }

    pub async fn add_cita(&self, appointment: &NewAppointment) -> ApiResult<Value> {
        self.submit(Action::AddCita, appointment.to_body()).await
    }

    // --- admin ---

    pub async fn get_admin_stats(&self) -> ApiResult<AdminStats> {
        self.fetch(ActionRequest::get(Action::GetAdminStats)).await
    }

    pub async fn get_all_users(&self) -> ApiResult<Vec<Usuario>> {
        self.fetch(ActionRequest::get(Action::GetAllUsers)).await
    }

    pub async fn update_user_status(&self, user_id: i64, estado: UserStatus) -> ApiResult<Value> {
        self.submit(
            Action::UpdateUserStatus,
            json!({ "user_id": user_id, "estado": estado.as_str() }),
        )
        .await
    }

    pub async fn get_contact_messages(&self) -> ApiResult<Vec<ContactMessage>> {
        self.fetch(ActionRequest::get(Action::GetContactMessages)).await
    }

    pub async fn mark_contact_message_read(&self, message_id: i64) -> ApiResult<Value> {
        self.submit(Action::MarkContactMessageRead, json!({ "message_id": message_id }))
            .await
    }

    // --- health center ---

    pub async fn get_citas_by_centro(&self, centro_id: i64, estado: &str) -> ApiResult<Vec<CitaCentro>> {
        let request = ActionRequest::get(Action::GetCitasByCentro)
            .query_pairs([("centro_id", centro_id.to_string().as_str()), ("estado", estado)]);
        self.fetch(request).await
    }

    pub async fn get_donaciones_by_centro(&self, centro_id: i64) -> ApiResult<Vec<DonacionCentro>> {
        self.fetch(Self::by_id(Action::GetDonacionesByCentro, "centro_id", centro_id)).await
    }

    pub async fn get_inventario(&self, centro_id: i64) -> ApiResult<Vec<InventarioRow>> {
        self.fetch(Self::by_id(Action::GetInventario, "centro_id", centro_id)).await
    }

    pub async fn update_inventario(&self, update: &InventoryUpdate) -> ApiResult<Value> {
        let request = ActionRequest::post(Action::UpdateInventario).json(update)?;
        self.fetch(request).await
    }

    /// `fields` must already carry `centro_salud_id`.
    pub async fn add_donacion_result(&self, fields: &FormFields) -> ApiResult<Value> {
        let request = ActionRequest::post(Action::AddDonacionResult).json(fields)?;
        self.fetch(request).await
    }

    pub async fn send_notification(&self, fields: &FormFields) -> ApiResult<Value> {
        let request = ActionRequest::post(Action::SendNotification).json(fields)?;
        self.fetch(request).await
    }
}
