//! # API Shared
//!
//! Wire types shared by the EMR HTTP surface.
//!
//! Contains:
//! - Request, response and error bodies (`serde` + `utoipa::ToSchema`)
//! - Query-string parameter types (`utoipa::IntoParams`)
//! - Conversions from `emr-core` domain types
//! - `HealthService`
//!
//! Used by `api-rest`; kept separate so other front ends can reuse the same JSON shapes.

pub mod consultation;
pub mod diagnosis;
pub mod error;
pub mod health;
pub mod timestamp;

pub use consultation::{
    ConsultationRes, CreateConsultationReq, ListConsultationsQuery, ListConsultationsRes,
};
pub use diagnosis::{DiagnosisCodeRes, SearchDiagnosisQuery};
pub use error::{ErrorRes, FieldErrorRes};
pub use health::{HealthRes, HealthService};
