use crate::AppState;
use axum::{extract::State, response::Json};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Name reported by the health endpoint.
pub const SERVICE_NAME: &str = "InfoGleam FHIR Service";

/// Health check response body.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct HealthRes {
    /// Always `"healthy"` while the process is serving requests.
    pub status: String,
    pub service: String,
    /// ISO-8601 UTC instant the check was answered.
    pub timestamp: String,
}

/// Simple health service for the REST API.
///
/// The service is stateless; being able to answer at all is the health signal.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    pub fn check_health(now: DateTime<Utc>) -> HealthRes {
        HealthRes {
            status: "healthy".into(),
            service: SERVICE_NAME.into(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used by monitoring, load balancers and the integration engine before it starts
/// forwarding messages.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health(Utc::now()))
}
