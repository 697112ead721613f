//! Typed API surface.
//!
//! # Data Flow
//! ```text
//! page controller → service.rs (BloodBankApi: build query / body per action)
//!                        ↓
//!                  gateway (one HTTP call, error normalization)
//!                        ↓
//!                  models.rs (decode envelope data)
//! ```

pub mod models;
pub mod service;

pub use models::{
    AdminStats, CentroSalud, CitaCentro, CitaDonante, ContactMessage, Credentials, DonacionCentro,
    DonacionDonante, Donante, DonanteProfile, Faq, FormFields, InventarioRow, InventoryUpdate,
    NewAppointment, Notificacion, UserStatus, Usuario,
};
pub use service::BloodBankApi;
