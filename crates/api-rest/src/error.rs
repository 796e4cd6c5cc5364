//! Mapping from core errors and extractor rejections to HTTP responses.
//!
//! | Source                                   | Status |
//! |------------------------------------------|--------|
//! | field validation, unknown diagnosis code | 400    |
//! | missing consultation                     | 404    |
//! | malformed body, query or path            | 422    |
//! | out-of-range pagination                  | 422    |
//! | store failure                            | 500    |

use api_shared::ErrorRes;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use emr_core::{EmrError, ErrorKind};

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorRes,
}

impl ApiError {
    pub fn new(status: StatusCode, body: ErrorRes) -> Self {
        Self { status, body }
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, ErrorRes::new(detail))
    }

    /// Maps a core error raised while `context` (e.g. "creating consultation") was running.
    ///
    /// Store failures are logged here with full detail; the response carries only the
    /// error's display message.
    pub fn from_core(context: &str, err: EmrError) -> Self {
        match err.kind() {
            ErrorKind::Input => match &err {
                EmrError::Validation(errors) => {
                    Self::new(StatusCode::BAD_REQUEST, ErrorRes::from(errors))
                }
                EmrError::InvalidPagination(_) => Self::unprocessable(err.to_string()),
                _ => Self::new(StatusCode::BAD_REQUEST, ErrorRes::new(err.to_string())),
            },
            ErrorKind::Reference => {
                Self::new(StatusCode::BAD_REQUEST, ErrorRes::new(err.to_string()))
            }
            ErrorKind::NotFound => Self::new(StatusCode::NOT_FOUND, ErrorRes::new(err.to_string())),
            ErrorKind::Store => {
                tracing::error!("Error {}: {:?}", context, err);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorRes::new(format!("Error {context}: {err}")),
                )
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &ErrorRes {
        &self.body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("rejected request body: {}", rejection.body_text());
        Self::unprocessable(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::warn!("rejected query string: {}", rejection.body_text());
        Self::unprocessable(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::warn!("rejected path parameter: {}", rejection.body_text());
        Self::unprocessable(rejection.body_text())
    }
}
