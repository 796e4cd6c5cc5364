use emr_core::ValidationErrors;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    /// Human-readable summary.
    pub detail: String,
    /// Per-field failures, present only for field validation errors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldErrorRes>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorRes {
    pub field: String,
    pub message: String,
}

impl ErrorRes {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            errors: Vec::new(),
        }
    }
}

impl From<&ValidationErrors> for ErrorRes {
    fn from(errors: &ValidationErrors) -> Self {
        Self {
            detail: errors.to_string(),
            errors: errors
                .errors()
                .iter()
                .map(|e| FieldErrorRes {
                    field: e.field.to_string(),
                    message: e.message.clone(),
                })
                .collect(),
        }
    }
}
