use emr_core::DiagnosisCode;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DiagnosisCodeRes {
    pub id: i64,
    #[schema(example = "E11.9")]
    pub code: String,
    #[schema(example = "Type 2 diabetes mellitus without complications")]
    pub description: String,
}

impl From<DiagnosisCode> for DiagnosisCodeRes {
    fn from(code: DiagnosisCode) -> Self {
        Self {
            id: code.id,
            code: code.code,
            description: code.description,
        }
    }
}

/// Query string for `GET /api/diagnosis`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchDiagnosisQuery {
    /// Case-insensitive substring of a code or description. Omit to list the first codes.
    pub search: Option<String>,
}
