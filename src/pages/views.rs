//! View descriptions.
//!
//! Every function here is pure: it takes the outcome of one API call and
//! returns the section a page shows for it. Three shapes are possible per
//! list: rows, an empty-list line, or a failure line. Transport failures
//! never leak their error text.

use serde::Serialize;
use std::fmt::{self, Write as _};

use crate::api::models::{
    AdminStats, CentroSalud, CitaCentro, CitaDonante, ContactMessage, DonacionCentro, DonacionDonante,
    Donante, DonanteProfile, Faq, InventarioRow, Notificacion, Usuario,
};
use crate::gateway::{Envelope, GatewayError};
use crate::pages::navigator::Redirect;
use crate::pages::route::Page;
use crate::pages::status::StatusMessage;

/// Result of one gateway call as seen by a view.
pub type Outcome<T> = Result<Envelope<T>, GatewayError>;

const NOT_AVAILABLE: &str = "N/A";

/// A titled block of text lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub lines: Vec<String>,
}

impl Section {
    pub fn new(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
        }
    }

    pub fn single(title: impl Into<String>, line: impl Into<String>) -> Self {
        Self::new(title, vec![line.into()])
    }
}

/// Everything a page shows after it has been opened or an action ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub page: Page,
    pub status: Option<StatusMessage>,
    pub sections: Vec<Section>,
    #[serde(skip)]
    pub redirect: Option<Redirect>,
}

impl PageView {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            status: None,
            sections: Vec::new(),
            redirect: None,
        }
    }

    pub fn with_status(mut self, status: StatusMessage) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn with_redirect(mut self, redirect: Redirect) -> Self {
        self.redirect = Some(redirect);
        self
    }

    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }
}

impl fmt::Display for PageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ({}) ==", self.page, self.page.path())?;
        if let Some(status) = &self.status {
            writeln!(f, "{}", status)?;
        }
        for section in &self.sections {
            writeln!(f, "-- {} --", section.title)?;
            for line in &section.lines {
                writeln!(f, "  {}", line)?;
            }
        }
        if let Some(redirect) = &self.redirect {
            writeln!(f, "-> {} en {} ms", redirect.target.path(), redirect.delay.as_millis())?;
        }
        Ok(())
    }
}

/// What an empty (or declared-failed) list shows.
#[derive(Clone, Copy)]
enum Empty {
    Fixed(&'static str),
    /// The server message when it is non-empty, the fallback otherwise.
    MessageOr(&'static str),
}

fn list<T>(
    title: &str,
    outcome: &Outcome<Vec<T>>,
    empty: Empty,
    failed: &str,
    line: impl Fn(&T) -> String,
) -> Section {
    let lines = match outcome {
        Ok(env) if env.success && env.data.as_ref().is_some_and(|rows| !rows.is_empty()) => {
            env.data.iter().flatten().map(line).collect()
        }
        Ok(env) => vec![match empty {
            Empty::Fixed(text) => text.to_string(),
            Empty::MessageOr(text) if env.message.is_empty() => text.to_string(),
            Empty::MessageOr(_) => env.message.clone(),
        }],
        Err(_) => vec![failed.to_string()],
    };
    Section::new(title, lines)
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().filter(|v| !v.is_empty()).unwrap_or(NOT_AVAILABLE)
}

// --- public pages ---

pub fn render_donantes(outcome: &Outcome<Vec<Donante>>) -> Section {
    list(
        "Donantes",
        outcome,
        Empty::MessageOr("No se encontraron donantes."),
        "Error al cargar donantes. Inténtalo más tarde.",
        |d| format!("ID: {} - {} ({}, Tel: {})", d.id, d.nombre_completo, d.tipo_sangre, d.telefono),
    )
}

pub fn render_centros(outcome: &Outcome<Vec<CentroSalud>>) -> Section {
    list(
        "Centros de salud",
        outcome,
        Empty::MessageOr("No se encontraron centros de salud."),
        "Error al cargar centros de salud. Inténtalo más tarde.",
        |c| format!("ID: {} - {} ({}, Tel: {})", c.id, c.nombre, c.direccion, c.telefono),
    )
}

pub fn render_faqs(outcome: &Outcome<Vec<Faq>>) -> Section {
    list(
        "Preguntas frecuentes",
        outcome,
        Empty::Fixed("No se encontraron preguntas frecuentes."),
        "Error al cargar las FAQs. Inténtalo más tarde.",
        |faq| format!("{} {}", faq.pregunta, faq.respuesta),
    )
}

// --- donor profile ---

/// Profile status and, when loaded, the profile fields.
pub fn render_profile(outcome: &Outcome<DonanteProfile>) -> (StatusMessage, Option<Section>) {
    match outcome {
        Ok(env) if env.success => {
            let empty = DonanteProfile::default();
            let p = env.data.as_ref().unwrap_or(&empty);
            let lines = vec![
                format!("Nombre: {}", or_na(&p.nombre_completo)),
                format!("Email: {}", or_na(&p.email)),
                format!("CURP: {}", or_na(&p.curp)),
                format!("Tipo de sangre: {}", or_na(&p.tipo_sangre)),
                format!("Teléfono: {}", or_na(&p.telefono)),
                format!("Fecha de nacimiento: {}", or_na(&p.fecha_nacimiento)),
                format!("Género: {}", or_na(&p.genero)),
                format!("Discapacidad: {}", or_na(&p.discapacidad)),
            ];
            (
                StatusMessage::success("Perfil cargado exitosamente."),
                Some(Section::new("Perfil", lines)),
            )
        }
        Ok(env) => (
            StatusMessage::error(format!("Error al cargar perfil: {}", env.message)),
            None,
        ),
        Err(_) => (
            StatusMessage::error("Error de red o servidor al cargar perfil."),
            None,
        ),
    }
}

pub fn render_citas_donante(outcome: &Outcome<Vec<CitaDonante>>) -> Section {
    list(
        "Mis citas",
        outcome,
        Empty::Fixed("No tienes citas agendadas."),
        "Error al cargar citas.",
        |cita| {
            let mut line = format!(
                "#{} {} - {} ({}) - Estado: {}",
                cita.id, cita.fecha_hora, cita.centro_nombre, cita.centro_direccion, cita.estado
            );
            if cita.can_confirm() {
                line.push_str(" [confirmar]");
            }
            if cita.can_cancel() {
                line.push_str(" [cancelar]");
            }
            line
        },
    )
}

pub fn render_donaciones_donante(outcome: &Outcome<Vec<DonacionDonante>>) -> Section {
    list(
        "Historial de donaciones",
        outcome,
        Empty::Fixed("No tienes historial de donaciones."),
        "Error al cargar historial de donaciones.",
        |d| format!("{} - {} ml - {} - {}", d.fecha, d.volumen_ml, d.resultado, d.centro_nombre),
    )
}

pub fn render_notificaciones(outcome: &Outcome<Vec<Notificacion>>) -> Section {
    list(
        "Notificaciones",
        outcome,
        Empty::Fixed("No tienes notificaciones."),
        "Error al cargar notificaciones.",
        |n| {
            let mut line = format!("{} #{} {}: {} ({})", n.icon(), n.id, n.titulo, n.mensaje, n.fecha_envio);
            line.push_str(if n.leida { " - Leída" } else { " [marcar como leída]" });
            line
        },
    )
}

pub fn render_hospitales(outcome: &Outcome<Vec<CentroSalud>>) -> Section {
    list(
        "Hospitales para cita",
        outcome,
        Empty::Fixed("No hay hospitales disponibles"),
        "Error al cargar hospitales",
        |c| format!("{}: {}", c.id, c.nombre),
    )
}

// --- admin ---

pub fn render_admin_stats(outcome: &Outcome<AdminStats>) -> Section {
    let lines = match outcome {
        Ok(env) if env.success => {
            let empty = AdminStats::default();
            let s = env.data.as_ref().unwrap_or(&empty);
            vec![
                format!("Donantes Registrados: {}", s.total_donantes),
                format!("Centros de Salud Activos: {}", s.total_centros),
                format!("Citas Pendientes: {}", s.citas_pendientes),
                format!("Donaciones Aprobadas (Último mes): {}", s.donaciones_aprobadas_mes),
            ]
        }
        Ok(env) => vec![format!("Error al cargar estadísticas: {}", env.message)],
        Err(_) => vec!["Error de red al cargar estadísticas.".to_string()],
    };
    Section::new("Estadísticas", lines)
}

pub fn render_usuarios(outcome: &Outcome<Vec<Usuario>>) -> Section {
    list(
        "Gestión de usuarios",
        outcome,
        Empty::Fixed("No se encontraron usuarios."),
        "Error al cargar usuarios.",
        |u| format!("#{} {} ({}) - Estado: {} - Registro: {}", u.id, u.email, u.tipo, u.estado, u.fecha_registro),
    )
}

pub fn render_mensajes(outcome: &Outcome<Vec<ContactMessage>>) -> Section {
    list(
        "Mensajes de contacto",
        outcome,
        Empty::Fixed("No se encontraron mensajes de contacto."),
        "Error al cargar mensajes.",
        |m| {
            let mut line = String::new();
            if m.is_new() {
                line.push('*');
            }
            let _ = write!(line, "#{} {} <{}>: {} ({}) [{}]", m.id, m.nombre, m.email, m.mensaje, m.fecha_envio, m.estado);
            if m.is_new() {
                line.push_str(" [marcar como leído]");
            }
            line
        },
    )
}

// --- health center ---

pub fn render_citas_centro(outcome: &Outcome<Vec<CitaCentro>>) -> Section {
    list(
        "Citas pendientes",
        outcome,
        Empty::Fixed("No hay citas pendientes para este centro."),
        "Error al cargar citas pendientes.",
        |c| {
            format!(
                "#{} Fecha: {} - Donante: {} ({}) - Notas: {}",
                c.id,
                c.fecha_hora,
                c.donante_nombre,
                c.donante_tipo_sangre,
                or_na(&c.notas)
            )
        },
    )
}

pub fn render_donaciones_centro(outcome: &Outcome<Vec<DonacionCentro>>) -> Section {
    list(
        "Donaciones recientes",
        outcome,
        Empty::Fixed("No hay donaciones recientes para este centro."),
        "Error al cargar donaciones recientes.",
        |d| {
            format!(
                "Fecha: {} - Donante: {} ({}) - Volumen: {}ml - Resultado: {}",
                d.fecha, d.donante_nombre, d.donante_tipo_sangre, d.volumen_ml, d.resultado
            )
        },
    )
}

pub fn render_inventario(outcome: &Outcome<Vec<InventarioRow>>) -> Section {
    list(
        "Inventario",
        outcome,
        Empty::Fixed("No se encontró inventario para este centro."),
        "Error al cargar inventario.",
        |row| format!("{}: {} unidades (actualizado {})", row.tipo_sangre, row.cantidad_unidades, row.ultima_actualizacion),
    )
}
