//! HTTP handlers.
//!
//! Handlers only translate between wire types and `emr-core` calls. Core calls are blocking
//! SQLite work, so each one runs on the tokio blocking pool via [`run_blocking`].

use crate::error::ApiError;
use crate::AppState;
use api_shared::{
    ConsultationRes, CreateConsultationReq, DiagnosisCodeRes, ErrorRes, HealthRes,
    HealthService, ListConsultationsQuery, ListConsultationsRes, SearchDiagnosisQuery,
};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use emr_core::{EmrResult, Pagination};

/// Runs a blocking core operation off the async runtime and maps its error.
async fn run_blocking<T, F>(context: &'static str, op: F) -> Result<T, ApiError>
where
    F: FnOnce() -> EmrResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(op).await {
        Ok(result) => result.map_err(|e| ApiError::from_core(context, e)),
        Err(join_error) => {
            tracing::error!("Error {}: blocking task failed: {:?}", context, join_error);
            Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorRes::new(format!("Error {context}: internal task failure")),
            ))
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Also served at `/`. Used by monitoring and load balancer health checks; it does not touch
/// the database.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/api/diagnosis",
    tag = "Diagnosis Codes",
    params(SearchDiagnosisQuery),
    responses(
        (status = 200, description = "Up to 20 matching diagnosis codes, ordered by code", body = [DiagnosisCodeRes]),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Search ICD-10 diagnosis codes
///
/// Case-insensitive substring match on code or description. Without a search term the first
/// codes in code order are returned. Results are capped at 20.
#[axum::debug_handler]
pub async fn search_diagnosis_codes(
    State(state): State<AppState>,
    query: Result<Query<SearchDiagnosisQuery>, QueryRejection>,
) -> Result<Json<Vec<DiagnosisCodeRes>>, ApiError> {
    let Query(query) = query?;
    let service = state.service.clone();

    let codes = run_blocking("searching diagnosis codes", move || {
        service.search_diagnosis_codes(query.search.as_deref())
    })
    .await?;

    Ok(Json(codes.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/consultation",
    tag = "Consultations",
    request_body = CreateConsultationReq,
    responses(
        (status = 201, description = "Consultation created", body = ConsultationRes),
        (status = 400, description = "Empty required field or invalid diagnosis code", body = ErrorRes),
        (status = 422, description = "Malformed payload", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Create a new consultation
///
/// Every diagnosis code must exist in the catalog; otherwise nothing is stored and the first
/// unknown code is named in the error.
#[axum::debug_handler]
pub async fn create_consultation(
    State(state): State<AppState>,
    payload: Result<Json<CreateConsultationReq>, JsonRejection>,
) -> Result<(StatusCode, Json<ConsultationRes>), ApiError> {
    let Json(req) = payload?;
    let service = state.service.clone();

    let consultation = run_blocking("creating consultation", move || {
        service.create_consultation(req.into())
    })
    .await?;

    Ok((StatusCode::CREATED, Json(consultation.into())))
}

#[utoipa::path(
    get,
    path = "/api/consultations",
    tag = "Consultations",
    params(ListConsultationsQuery),
    responses(
        (status = 200, description = "Page of consultations, newest first, with total count", body = ListConsultationsRes),
        (status = 422, description = "Invalid skip or limit", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List consultations ordered by consultation date, newest first
#[axum::debug_handler]
pub async fn list_consultations(
    State(state): State<AppState>,
    query: Result<Query<ListConsultationsQuery>, QueryRejection>,
) -> Result<Json<ListConsultationsRes>, ApiError> {
    let Query(query) = query?;
    let page = Pagination::new(query.skip, query.limit)
        .map_err(|e| ApiError::from_core("fetching consultations", e))?;
    let service = state.service.clone();

    let page = run_blocking("fetching consultations", move || {
        service.list_consultations(page)
    })
    .await?;

    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/api/consultation/{id}",
    tag = "Consultations",
    params(("id" = i64, Path, description = "Consultation id")),
    responses(
        (status = 200, description = "Consultation details", body = ConsultationRes),
        (status = 404, description = "Consultation not found", body = ErrorRes),
        (status = 422, description = "Id is not an integer", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Get a consultation by id
#[axum::debug_handler]
pub async fn get_consultation(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ConsultationRes>, ApiError> {
    let Path(id) = id?;
    let service = state.service.clone();

    let consultation =
        run_blocking("fetching consultation", move || service.get_consultation(id)).await?;

    Ok(Json(consultation.into()))
}

#[utoipa::path(
    delete,
    path = "/api/consultation/{id}",
    tag = "Consultations",
    params(("id" = i64, Path, description = "Consultation id")),
    responses(
        (status = 204, description = "Consultation deleted"),
        (status = 404, description = "Consultation not found", body = ErrorRes),
        (status = 422, description = "Id is not an integer", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Delete a consultation by id
///
/// Deleting the same id twice reports 404 the second time.
#[axum::debug_handler]
pub async fn delete_consultation(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let service = state.service.clone();

    run_blocking("deleting consultation", move || {
        service.delete_consultation(id)
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
