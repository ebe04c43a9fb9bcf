//! # API REST
//!
//! HTTP front of the HL7 to FHIR bridge.
//!
//! Handles:
//! - `POST /fhir/Patient`: decode a clinical record and answer with a FHIR `Patient`
//! - `GET /health`: liveness for load balancers and the integration engine
//! - `GET /api-docs/openapi.json`: OpenAPI description of the above
//!
//! The mapping itself lives in the `fhir` crate; this crate only owns decoding, status codes
//! and JSON error bodies.

#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod health;
pub mod patient;

pub use config::{ConfigError, IdStrategy, ServerConfig};
pub use error::{ApiError, ErrorRes, FaultRes};
pub use health::{HealthRes, HealthService};

use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use fhir::PatientIdGenerator;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub id_generator: Arc<dyn PatientIdGenerator>,
}

impl AppState {
    pub fn new(id_generator: Arc<dyn PatientIdGenerator>) -> Self {
        Self { id_generator }
    }

    pub fn from_config(cfg: &ServerConfig) -> Self {
        Self::new(cfg.id_strategy().generator())
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health::health, patient::create_patient),
    components(schemas(
        HealthRes,
        ErrorRes,
        FaultRes,
        fhir::ClinicalRecord,
        fhir::FhirPatient,
        fhir::Meta,
        fhir::Identifier,
        fhir::HumanName,
        fhir::Address,
        fhir::ContactPoint,
        fhir::AdministrativeGender,
        fhir::NameUse,
        fhir::AddressUse,
        fhir::ContactPointSystem,
        fhir::ContactPointUse,
    ))
)]
pub struct ApiDoc;

/// Build the REST router with all routes, CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/fhir/Patient", post(patient::create_patient))
        .route("/api-docs/openapi.json", get(openapi))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
