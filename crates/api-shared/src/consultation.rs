use chrono::{DateTime, Utc};
use emr_core::{Consultation, ConsultationDraft, ConsultationPage};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Body of `POST /api/consultation`.
///
/// Only the JSON shape is checked during deserialization. Emptiness and catalog membership
/// are checked by the core service so that they report as field or code errors.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateConsultationReq {
    #[schema(example = "Jane Doe")]
    pub patient_name: String,
    pub diagnosis_codes: Vec<String>,
    #[schema(example = "Monitor BP")]
    pub treatment_notes: String,
    /// Defaults to the creation time when omitted or null.
    #[serde(default, deserialize_with = "crate::timestamp::optional::deserialize")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub consultation_date: Option<DateTime<Utc>>,
}

impl From<CreateConsultationReq> for ConsultationDraft {
    fn from(req: CreateConsultationReq) -> Self {
        ConsultationDraft {
            patient_name: req.patient_name,
            diagnosis_codes: req.diagnosis_codes,
            treatment_notes: req.treatment_notes,
            consultation_date: req.consultation_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConsultationRes {
    pub id: i64,
    pub patient_name: String,
    pub diagnosis_codes: Vec<String>,
    pub treatment_notes: String,
    pub consultation_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<Consultation> for ConsultationRes {
    fn from(c: Consultation) -> Self {
        Self {
            id: c.id,
            patient_name: c.patient_name,
            diagnosis_codes: c.diagnosis_codes.into_vec(),
            treatment_notes: c.treatment_notes,
            consultation_date: c.consultation_date,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListConsultationsRes {
    pub consultations: Vec<ConsultationRes>,
    /// Number of consultations in the store, independent of paging.
    pub total: i64,
}

impl From<ConsultationPage> for ListConsultationsRes {
    fn from(page: ConsultationPage) -> Self {
        Self {
            consultations: page.consultations.into_iter().map(Into::into).collect(),
            total: page.total,
        }
    }
}

/// Query string for `GET /api/consultations`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListConsultationsQuery {
    /// Number of records to skip (default 0, minimum 0).
    pub skip: Option<i64>,
    /// Maximum number of records to return (default 100, between 1 and 500).
    pub limit: Option<i64>,
}
