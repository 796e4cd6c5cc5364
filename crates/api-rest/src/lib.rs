//! # API REST
//!
//! REST API implementation for the EMR backend.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (status codes, JSON rejections, CORS)
//!
//! Uses `api-shared` for wire types and `emr-core` for all data operations.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod handlers;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use emr_core::{CoreConfig, EmrService};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

/// Origins allowed when none are configured: the local frontend dev servers.
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:3000",
];

/// Application state shared across REST API handlers
///
/// Holds only the stateless core service; every request opens its own store connection.
#[derive(Clone)]
pub struct AppState {
    service: EmrService,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            service: EmrService::new(cfg),
        }
    }

    pub fn service(&self) -> &EmrService {
        &self.service
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ClinicCare Mini EMR",
        description = "A lightweight Electronic Medical Records API for clinic consultations"
    ),
    paths(
        handlers::health,
        handlers::search_diagnosis_codes,
        handlers::create_consultation,
        handlers::list_consultations,
        handlers::get_consultation,
        handlers::delete_consultation,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::DiagnosisCodeRes,
        api_shared::CreateConsultationReq,
        api_shared::ConsultationRes,
        api_shared::ListConsultationsRes,
        api_shared::ErrorRes,
        api_shared::FieldErrorRes,
    )),
    tags(
        (name = "Health"),
        (name = "Diagnosis Codes"),
        (name = "Consultations")
    )
)]
pub struct ApiDoc;

/// Builds the full REST router, including Swagger UI at `/swagger-ui`.
///
/// CORS is not applied here; wrap the router with [`cors_layer`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health))
        .route("/api/diagnosis", get(handlers::search_diagnosis_codes))
        .route(
            "/api/consultation",
            axum::routing::post(handlers::create_consultation),
        )
        .route("/api/consultations", get(handlers::list_consultations))
        .route(
            "/api/consultation/:id",
            get(handlers::get_consultation).delete(handlers::delete_consultation),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}

/// CORS policy for the router.
///
/// Only the listed origins may call the API, with any header and the methods the API uses.
/// An empty `origins` list falls back to [`DEFAULT_CORS_ORIGINS`].
///
/// # Errors
///
/// Returns an error if an origin is not a valid header value.
pub fn cors_layer(
    origins: &[String],
) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let origins = if origins.is_empty() {
        DEFAULT_CORS_ORIGINS
            .iter()
            .map(|o| HeaderValue::from_static(*o))
            .collect()
    } else {
        origins
            .iter()
            .map(|o| HeaderValue::from_str(o))
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use emr_core::seed::{seed_catalog, SeedMode, ICD10_CODES};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_app() -> (TempDir, Router) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = Arc::new(
            CoreConfig::new(dir.path().join("emr.db"), Duration::from_secs(5))
                .expect("CoreConfig::new should succeed"),
        );
        let state = AppState::new(cfg);
        seed_catalog(state.service().database(), SeedMode::Force, |_| Ok(true))
            .expect("seed should succeed");
        (dir, router(state))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.expect("request failed");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should be readable")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body should be JSON")
        };
        (status, body)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn delete_req(uri: &str) -> Request<Body> {
        Request::delete(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn consultation(name: &str, codes: &[&str], date: &str) -> Value {
        json!({
            "patient_name": name,
            "diagnosis_codes": codes,
            "treatment_notes": "Monitor BP",
            "consultation_date": date,
        })
    }

    #[tokio::test]
    async fn health_is_served_at_root_and_health() {
        let (_dir, app) = test_app();
        for uri in ["/", "/health"] {
            let (status, body) = send(&app, get_req(uri)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "healthy");
        }
    }

    #[tokio::test]
    async fn search_without_term_returns_first_twenty_codes_in_order() {
        let (_dir, app) = test_app();
        let (status, body) = send(&app, get_req("/api/diagnosis")).await;
        assert_eq!(status, StatusCode::OK);

        let codes: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["code"].as_str().unwrap())
            .collect();
        let mut expected: Vec<&str> = ICD10_CODES.iter().map(|(c, _)| *c).collect();
        expected.sort_unstable();
        expected.truncate(20);
        assert_eq!(codes, expected);
    }

    #[tokio::test]
    async fn search_is_case_insensitive() {
        let (_dir, app) = test_app();
        let (status, body) = send(&app, get_req("/api/diagnosis?search=e11")).await;
        assert_eq!(status, StatusCode::OK);
        let codes: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["code"].as_str().unwrap())
            .collect();
        assert!(codes.contains(&"E11.9"));
        assert!(codes.iter().all(|c| c.starts_with("E11")));

        let (status, body) = send(&app, get_req("/api/diagnosis?search=zzzz")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn create_consultation_returns_created_record() {
        let (_dir, app) = test_app();
        let payload = json!({
            "patient_name": "Jane Doe",
            "diagnosis_codes": ["I10"],
            "treatment_notes": "Monitor BP",
        });

        let (status, body) = send(&app, post_json("/api/consultation", &payload)).await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(body["id"].as_i64().unwrap() > 0);
        assert_eq!(body["patient_name"], "Jane Doe");
        assert_eq!(body["diagnosis_codes"], json!(["I10"]));
        assert!(body["consultation_date"].is_string());
        assert!(body["created_at"].is_string());

        let id = body["id"].as_i64().unwrap();
        let (status, fetched) = send(&app, get_req(&format!("/api/consultation/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, body);
    }

    #[tokio::test]
    async fn unknown_code_is_rejected_without_creating_anything() {
        let (_dir, app) = test_app();
        let payload = consultation("Jane Doe", &["I10", "Z99.999"], "2024-01-15T10:00:00Z");

        let (status, body) = send(&app, post_json("/api/consultation", &payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Invalid diagnosis code: Z99.999");

        let (_, list) = send(&app, get_req("/api/consultations")).await;
        assert_eq!(list["total"], 0);
    }

    #[tokio::test]
    async fn blank_fields_are_bad_requests() {
        let (_dir, app) = test_app();
        let payload = json!({
            "patient_name": "  ",
            "diagnosis_codes": [" "],
            "treatment_notes": "Monitor BP",
        });

        let (status, body) = send(&app, post_json("/api/consultation", &payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, ["patient_name", "diagnosis_codes"]);
    }

    #[tokio::test]
    async fn malformed_payloads_are_unprocessable() {
        let (_dir, app) = test_app();

        let missing_codes = json!({ "patient_name": "Jane Doe", "treatment_notes": "x" });
        let (status, _) = send(&app, post_json("/api/consultation", &missing_codes)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let bad_date = consultation("Jane Doe", &["I10"], "not a date");
        let (status, _) = send(&app, post_json("/api/consultation", &bad_date)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        for date in ["+10000-01-01T00:00:00", "-0001-01-01T00:00:00"] {
            let far_date = consultation("Jane Doe", &["I10"], date);
            let (status, body) = send(&app, post_json("/api/consultation", &far_date)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{date}");
            assert!(body["detail"].as_str().unwrap().contains("out of range"));
        }
        let (_, list) = send(&app, get_req("/api/consultations")).await;
        assert_eq!(list["total"], 0);

        let not_json = Request::post("/api/consultation")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, not_json).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn list_is_paginated_newest_first() {
        let (_dir, app) = test_app();
        for day in 1..=5 {
            let payload = consultation(
                &format!("Patient {day}"),
                &["I10"],
                &format!("2024-01-0{day}T09:00:00Z"),
            );
            let (status, _) = send(&app, post_json("/api/consultation", &payload)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&app, get_req("/api/consultations?skip=1&limit=2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 5);
        let names: Vec<&str> = body["consultations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["patient_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Patient 4", "Patient 3"]);

        let (_, body) = send(&app, get_req("/api/consultations?skip=10")).await;
        assert_eq!(body["consultations"], json!([]));
        assert_eq!(body["total"], 5);
    }

    #[tokio::test]
    async fn out_of_range_paging_is_unprocessable() {
        let (_dir, app) = test_app();
        for uri in [
            "/api/consultations?limit=0",
            "/api/consultations?limit=501",
            "/api/consultations?skip=-1",
            "/api/consultations?skip=abc",
        ] {
            let (status, _) = send(&app, get_req(uri)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        }
    }

    #[tokio::test]
    async fn missing_consultation_is_not_found() {
        let (_dir, app) = test_app();
        let (status, body) = send(&app, get_req("/api/consultation/9999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Consultation with ID 9999 not found");

        let (status, _) = send(&app, get_req("/api/consultation/abc")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn delete_succeeds_once() {
        let (_dir, app) = test_app();
        let payload = consultation("Jane Doe", &["I10"], "2024-01-15T10:00:00Z");
        let (_, created) = send(&app, post_json("/api/consultation", &payload)).await;
        let uri = format!("/api/consultation/{}", created["id"]);

        let (status, body) = send(&app, delete_req(&uri)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = send(&app, delete_req(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, get_req(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn openapi_document_lists_every_endpoint() {
        let (_dir, app) = test_app();
        let (status, body) = send(&app, get_req("/api-docs/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        for path in [
            "/health",
            "/api/diagnosis",
            "/api/consultation",
            "/api/consultations",
            "/api/consultation/{id}",
        ] {
            assert!(body["paths"].get(path).is_some(), "missing {path}");
        }
    }

    #[test]
    fn cors_layer_rejects_invalid_origins() {
        assert!(cors_layer(&[]).is_ok());
        assert!(cors_layer(&["http://localhost:5173".to_string()]).is_ok());
        assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
    }

    async fn allowed_origin(cors: CorsLayer, origin: &str) -> Option<String> {
        let (_dir, app) = test_app();
        let request = Request::get("/health")
            .header("origin", origin)
            .body(Body::empty())
            .unwrap();
        let response = app.layer(cors).oneshot(request).await.expect("request failed");
        response
            .headers()
            .get("access-control-allow-origin")
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn default_cors_allows_only_local_dev_origins() {
        let local = allowed_origin(cors_layer(&[]).unwrap(), "http://127.0.0.1:5173").await;
        assert_eq!(local.as_deref(), Some("http://127.0.0.1:5173"));

        let foreign = allowed_origin(cors_layer(&[]).unwrap(), "https://evil.example").await;
        assert_eq!(foreign, None);

        let configured = vec!["https://clinic.example".to_string()];
        let allowed =
            allowed_origin(cors_layer(&configured).unwrap(), "https://clinic.example").await;
        assert_eq!(allowed.as_deref(), Some("https://clinic.example"));
        let local = allowed_origin(cors_layer(&configured).unwrap(), "http://localhost:5173").await;
        assert_eq!(local, None);
    }
}
