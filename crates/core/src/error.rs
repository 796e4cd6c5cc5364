use crate::validation::ValidationErrors;

/// Broad classification of an [`EmrError`].
///
/// API layers use this to pick a response status without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing, empty or out-of-range caller input.
    Input,
    /// A diagnosis code that is not present in the catalog.
    Reference,
    /// The requested record does not exist.
    NotFound,
    /// The store or its surroundings failed.
    Store,
}

#[derive(Debug, thiserror::Error)]
pub enum EmrError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("Invalid diagnosis code: {0}")]
    InvalidDiagnosisCode(String),
    #[error("invalid pagination: {0}")]
    InvalidPagination(String),
    #[error("Consultation with ID {0} not found")]
    ConsultationNotFound(i64),

    #[error("failed to open database {}: {source}", .path.display())]
    DatabaseOpen {
        path: std::path::PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to initialise database schema: {0}")]
    SchemaInit(rusqlite::Error),
    #[error("database query failed: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("failed to serialize diagnosis codes: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize diagnosis codes: {0}")]
    Deserialization(serde_json::Error),
    #[error("invalid stored timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("failed to read confirmation: {0}")]
    Prompt(std::io::Error),
}

impl EmrError {
    /// Classifies this error for the API boundary.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EmrError::InvalidInput(_) | EmrError::Validation(_) | EmrError::InvalidPagination(_) => {
                ErrorKind::Input
            }
            EmrError::InvalidDiagnosisCode(_) => ErrorKind::Reference,
            EmrError::ConsultationNotFound(_) => ErrorKind::NotFound,
            EmrError::DatabaseOpen { .. }
            | EmrError::SchemaInit(_)
            | EmrError::Database(_)
            | EmrError::Serialization(_)
            | EmrError::Deserialization(_)
            | EmrError::InvalidTimestamp(_)
            | EmrError::Prompt(_) => ErrorKind::Store,
        }
    }
}

impl From<ValidationErrors> for EmrError {
    fn from(errors: ValidationErrors) -> Self {
        EmrError::Validation(errors)
    }
}

pub type EmrResult<T> = std::result::Result<T, EmrError>;
