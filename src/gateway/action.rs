//! Action vocabulary and request description.
//!
//! # Responsibilities
//! - Name every action the API understands (unknown names pass through)
//! - Pick the HTTP method an action is normally sent with
//! - Build the target URL from base, endpoint path, action and raw query

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::gateway::error::GatewayError;

/// HTTP method used for an action call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// GET calls never carry a body, whatever the caller supplied.
    pub fn allows_body(&self) -> bool {
        !matches!(self, Method::Get)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            other => Err(format!("unsupported HTTP method '{}'", other)),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation identifier sent in the `action` query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    GetDonantes,
    GetCentrosSalud,
    Login,
    Register,
    SendContactMessage,
    GetFaqs,
    GetDonanteProfile,
    GetCitasDonante,
    ConfirmCita,
    CancelCita,
    GetDonacionesDonante,
    GetNotificaciones,
    MarkNotifRead,
    AddCita,
    GetAdminStats,
    GetAllUsers,
    UpdateUserStatus,
    GetContactMessages,
    MarkContactMessageRead,
    GetCitasByCentro,
    GetDonacionesByCentro,
    GetInventario,
    UpdateInventario,
    AddDonacionResult,
    SendNotification,
    /// Any action the server defines that this client has no name for.
    Other(String),
}

static KNOWN: &[(Action, &str)] = &[
    (Action::GetDonantes, "get_donantes"),
    (Action::GetCentrosSalud, "get_centros_salud"),
    (Action::Login, "login"),
    (Action::Register, "register"),
    (Action::SendContactMessage, "send_contact_message"),
    (Action::GetFaqs, "get_faqs"),
    (Action::GetDonanteProfile, "get_donante_profile"),
    (Action::GetCitasDonante, "get_citas_donante"),
    (Action::ConfirmCita, "confirm_cita"),
    (Action::CancelCita, "cancel_cita"),
    (Action::GetDonacionesDonante, "get_donaciones_donante"),
    (Action::GetNotificaciones, "get_notificaciones"),
    (Action::MarkNotifRead, "mark_notif_read"),
    (Action::AddCita, "add_cita"),
    (Action::GetAdminStats, "get_admin_stats"),
    (Action::GetAllUsers, "get_all_users"),
    (Action::UpdateUserStatus, "update_user_status"),
    (Action::GetContactMessages, "get_contact_messages"),
    (Action::MarkContactMessageRead, "mark_contact_message_read"),
    (Action::GetCitasByCentro, "get_citas_by_centro"),
    (Action::GetDonacionesByCentro, "get_donaciones_by_centro"),
    (Action::GetInventario, "get_inventario"),
    (Action::UpdateInventario, "update_inventario"),
    (Action::AddDonacionResult, "add_donacion_result"),
    (Action::SendNotification, "send_notification"),
];

impl Action {
    /// Every named action, in API documentation order.
    pub fn known() -> impl Iterator<Item = &'static Action> {
        KNOWN.iter().map(|(action, _)| action)
    }

    /// Wire name of the action.
    pub fn as_str(&self) -> &str {
        if let Action::Other(name) = self {
            return name;
        }
        KNOWN
            .iter()
            .find(|(action, _)| action == self)
            .map(|(_, name)| *name)
            .unwrap_or_default()
    }

    /// Method the action is normally sent with: reads are GET, mutations POST.
    pub fn default_method(&self) -> Method {
        match self {
            Action::GetDonantes
            | Action::GetCentrosSalud
            | Action::GetFaqs
            | Action::GetDonanteProfile
            | Action::GetCitasDonante
            | Action::GetDonacionesDonante
            | Action::GetNotificaciones
            | Action::GetAdminStats
            | Action::GetAllUsers
            | Action::GetContactMessages
            | Action::GetCitasByCentro
            | Action::GetDonacionesByCentro
            | Action::GetInventario
            | Action::Other(_) => Method::Get,
            _ => Method::Post,
        }
    }
}

impl FromStr for Action {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(KNOWN
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(action, _)| action.clone())
            .unwrap_or_else(|| Action::Other(s.to_string())))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single call to the API endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub action: Action,
    pub method: Method,
    /// Pre-encoded query string appended after the action, without a leading `&`.
    pub query: String,
    pub body: Option<serde_json::Value>,
}

impl ActionRequest {
    pub fn new(action: Action, method: Method) -> Self {
        Self {
            action,
            method,
            query: String::new(),
            body: None,
        }
    }

    pub fn get(action: Action) -> Self {
        Self::new(action, Method::Get)
    }

    pub fn post(action: Action) -> Self {
        Self::new(action, Method::Post)
    }

    /// Attach a raw, already URL-safe query string. It is sent verbatim.
    pub fn query(mut self, raw: impl Into<String>) -> Self {
        self.query = raw.into();
        self
    }

    /// Encode key/value pairs into the query string.
    pub fn query_pairs<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in pairs {
            serializer.append_pair(key.as_ref(), value.as_ref());
        }
        self.query = serializer.finish();
        self
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, GatewayError> {
        let value = serde_json::to_value(body).map_err(|source| GatewayError::Serialize {
            action: self.action.to_string(),
            source,
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// Attach an already-built JSON body.
    pub fn body(mut self, body: Option<serde_json::Value>) -> Self {
        self.body = body;
        self
    }

    /// Body that will actually be sent: none for GET or when absent.
    pub fn effective_body(&self) -> Option<&serde_json::Value> {
        if self.method.allows_body() {
            self.body.as_ref().filter(|b| !b.is_null())
        } else {
            None
        }
    }

    /// Target URL for `endpoint` (base URL joined with the endpoint path).
    pub fn url(&self, endpoint: &str) -> String {
        let mut url = format!("{}?action={}", endpoint, self.action);
        if !self.query.is_empty() {
            url.push('&');
            url.push_str(&self.query);
        }
        url
    }
}
