//! JSON error responses.
//!
//! - client input faults: `400 {"error": ...}`
//! - unexpected transformation faults: `500 {"error": ..., "details": ...}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use fhir::{FhirError, TransformError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const TRANSFORMATION_FAILED: &str = "FHIR transformation failed";

/// Body of a 400 response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

/// Body of a 500 response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct FaultRes {
    pub error: String,
    pub details: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("FHIR transformation failed: {0}")]
    TransformationFailed(String),
}

impl From<FhirError> for ApiError {
    fn from(err: FhirError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<TransformError> for ApiError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::MissingIdentification => ApiError::BadRequest(err.to_string()),
            TransformError::Fault(details) => ApiError::TransformationFailed(details),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(error) => {
                (StatusCode::BAD_REQUEST, Json(ErrorRes { error })).into_response()
            }
            ApiError::TransformationFailed(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FaultRes {
                    error: TRANSFORMATION_FAILED.into(),
                    details,
                }),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_identification_is_bad_request() {
        let response = ApiError::from(TransformError::MissingIdentification).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn fault_is_internal_error() {
        let err = ApiError::from(TransformError::Fault("boom".into()));
        assert_eq!(err.to_string(), "FHIR transformation failed: boom");
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn decode_failure_is_bad_request() {
        let err = ApiError::from(FhirError::InvalidRecord("schema mismatch".into()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
