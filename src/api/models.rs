//! Records exchanged with the API.
//!
//! Read models are decoded from envelope `data`; numeric columns may arrive as
//! numbers or strings, so they go through the tolerant decoders. Write models
//! serialize to the exact bodies the server expects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::gateway::lenient;

// ---------------------------------------------------------------------------
// Public listings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Donante {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub nombre_completo: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub tipo_sangre: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub telefono: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CentroSalud {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub nombre: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub direccion: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub telefono: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Faq {
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub pregunta: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub respuesta: String,
}

// ---------------------------------------------------------------------------
// Donor
// ---------------------------------------------------------------------------

/// Donor profile. Any field may be missing or null.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DonanteProfile {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub nombre_completo: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub curp: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub tipo_sangre: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub telefono: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub fecha_nacimiento: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub genero: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub discapacidad: Option<String>,
}

/// Appointment as seen by the donor.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CitaDonante {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub fecha_hora: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub centro_nombre: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub centro_direccion: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub estado: String,
}

impl CitaDonante {
    /// Only pending appointments can be confirmed.
    pub fn can_confirm(&self) -> bool {
        self.estado == "pendiente"
    }

    /// Cancelled or completed appointments cannot be cancelled again.
    pub fn can_cancel(&self) -> bool {
        !matches!(self.estado.as_str(), "cancelada" | "completada")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DonacionDonante {
    #[serde(default, deserialize_with = "lenient::text")]
    pub fecha: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub volumen_ml: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub resultado: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub centro_nombre: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Notificacion {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub tipo: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub titulo: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub mensaje: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub fecha_envio: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub leida: bool,
}

impl Notificacion {
    pub fn icon(&self) -> &'static str {
        match self.tipo.as_str() {
            "cita" => "📅",
            "donacion" => "🩸",
            _ => "🔔",
        }
    }
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AdminStats {
    #[serde(default, deserialize_with = "lenient::text")]
    pub total_donantes: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub total_centros: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub citas_pendientes: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub donaciones_aprobadas_mes: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Usuario {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub tipo: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub estado: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub fecha_registro: String,
}

/// Account status an administrator can assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Activo,
    Inactivo,
    Pendiente,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Activo => "activo",
            UserStatus::Inactivo => "inactivo",
            UserStatus::Pendiente => "pendiente",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "activo" => Ok(UserStatus::Activo),
            "inactivo" => Ok(UserStatus::Inactivo),
            "pendiente" => Ok(UserStatus::Pendiente),
            other => Err(format!("unknown user status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ContactMessage {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub nombre: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub mensaje: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub fecha_envio: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub estado: String,
}

impl ContactMessage {
    pub fn is_new(&self) -> bool {
        self.estado == "nuevo"
    }
}

// ---------------------------------------------------------------------------
// Health center
// ---------------------------------------------------------------------------

/// Appointment as seen by the health center.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CitaCentro {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub fecha_hora: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub donante_nombre: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub donante_tipo_sangre: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub notas: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DonacionCentro {
    #[serde(default, deserialize_with = "lenient::text")]
    pub fecha: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub donante_nombre: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub donante_tipo_sangre: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub volumen_ml: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub resultado: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InventarioRow {
    #[serde(default, deserialize_with = "lenient::text")]
    pub tipo_sangre: String,
    #[serde(default, deserialize_with = "lenient::int")]
    pub cantidad_unidades: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub ultima_actualizacion: String,
}

// ---------------------------------------------------------------------------
// Write models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Flat string fields of a submitted form, sent as a JSON object of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormFields(BTreeMap<String, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fields as a JSON object of strings.
    pub fn to_json_map(&self) -> Map<String, Value> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Appointment request from the donor's scheduling form.
///
/// Form fields travel as strings; `donante_id` and `centro_salud_id` are
/// integers (`null` when the selected center is not a number).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub donante_id: i64,
    pub fields: FormFields,
}

impl NewAppointment {
    pub fn to_body(&self) -> Value {
        let mut body = self.fields.to_json_map();
        let centro = self
            .fields
            .get("centro_salud_id")
            .and_then(|v| v.trim().parse::<i64>().ok());
        body.insert("donante_id".into(), Value::from(self.donante_id));
        body.insert("centro_salud_id".into(), centro.map(Value::from).unwrap_or(Value::Null));
        Value::Object(body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryUpdate {
    pub centro_salud_id: i64,
    pub tipo_sangre: String,
    pub cantidad_unidades: i64,
}
