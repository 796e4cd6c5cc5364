//! # EMR Core
//!
//! Core business logic for the clinic EMR backend.
//!
//! This crate contains the data operations behind the API:
//! - Diagnosis code catalog search and seeding
//! - Consultation validation, persistence, paging and deletion
//! - SQLite connection handling with one connection per operation
//!
//! **No API concerns**: HTTP routing, JSON wire types and CORS belong in `api-rest` or
//! `api-shared`.

pub mod codes;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod repositories;
pub mod seed;
pub mod service;
pub mod validation;

pub use codes::DiagnosisCodes;
pub use config::CoreConfig;
pub use constants::DEFAULT_DATABASE_PATH;
pub use db::Database;
pub use emr_types::NonEmptyText;
pub use error::{EmrError, EmrResult, ErrorKind};
pub use repositories::catalog::DiagnosisCode;
pub use repositories::consultations::{Consultation, ConsultationPage};
pub use service::EmrService;
pub use validation::{ConsultationDraft, FieldError, Pagination, ValidationErrors};
