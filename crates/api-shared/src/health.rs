use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Service name reported by the health check.
pub const SERVICE_NAME: &str = "ClinicCare Mini EMR API";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Health check shared by every front end.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Reports the service as healthy.
    ///
    /// This does not touch the database; it only confirms the process is serving requests.
    pub fn check_health() -> HealthRes {
        HealthRes {
            status: "healthy".into(),
            service: SERVICE_NAME.into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_health_reports_healthy() {
        let res = HealthService::check_health();
        assert_eq!(res.status, "healthy");
        assert_eq!(res.service, SERVICE_NAME);
        assert!(!res.version.is_empty());
    }
}
