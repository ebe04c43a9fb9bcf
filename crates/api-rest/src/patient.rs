//! `POST /fhir/Patient`.

use crate::error::{ApiError, ErrorRes, FaultRes};
use crate::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use fhir::{ClinicalRecord, FhirPatient};

#[utoipa::path(
    post,
    path = "/fhir/Patient",
    request_body = ClinicalRecord,
    responses(
        (status = 201, description = "FHIR R4 Patient resource", body = FhirPatient),
        (status = 400, description = "Malformed record or missing identification", body = ErrorRes),
        (status = 500, description = "Transformation failed", body = FaultRes)
    )
)]
/// Transform an HL7-derived clinical record into a FHIR R4 Patient resource
///
/// The body is decoded into a [`ClinicalRecord`] here, at the boundary, so the transformer
/// only ever sees the closed typed shape.
///
/// # Returns
/// * `201` with the `Patient` resource as JSON
///
/// # Errors
/// * `400 Bad Request` if the body is not a JSON object of string fields, or neither
///   `firstName` nor `lastName` is present.
/// * `500 Internal Server Error` if the resource cannot be assembled or serialised.
#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let record = ClinicalRecord::from_json(&body).map_err(|e| {
        tracing::warn!("Rejected clinical record: {}", e);
        ApiError::from(e)
    })?;
    tracing::debug!("Received clinical record: {:?}", record);

    let patient = fhir::transform(&record, Utc::now(), state.id_generator.as_ref()).map_err(
        |e| {
            if e.is_validation() {
                tracing::warn!("Rejected clinical record: {}", e);
            } else {
                tracing::error!("Error transforming to FHIR: {}", e);
            }
            ApiError::from(e)
        },
    )?;

    let resource = serde_json::to_value(&patient).map_err(|e| {
        tracing::error!("Error serialising FHIR Patient {}: {}", patient.id, e);
        ApiError::TransformationFailed(e.to_string())
    })?;

    tracing::info!("Transformed clinical record to FHIR Patient {}", patient.id);
    tracing::debug!("FHIR Patient: {}", resource);

    Ok((StatusCode::CREATED, Json(resource)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router;
    use axum::body::Body;
    use axum::http::{header, Request};
    use chrono::{DateTime, Utc};
    use fhir::{PatientIdGenerator, TimestampIdGenerator};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct EmptyId;

    impl PatientIdGenerator for EmptyId {
        fn generate(&self, _now: DateTime<Utc>) -> String {
            String::new()
        }
    }

    async fn post_with(generator: Arc<dyn PatientIdGenerator>, body: &str) -> (StatusCode, Value) {
        let app = router(AppState::new(generator));
        let response = app
            .oneshot(
                Request::post("/fhir/Patient")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("build request"),
            )
            .await
            .expect("call router");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let value = serde_json::from_slice(&bytes).expect("json body");
        (status, value)
    }

    async fn post(body: &str) -> (StatusCode, Value) {
        post_with(Arc::new(TimestampIdGenerator), body).await
    }

    #[tokio::test]
    async fn creates_patient_from_named_record() {
        let (status, body) = post(
            r#"{"firstName":"John","lastName":"Doe","gender":"M","patientId":"P123"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["resourceType"], "Patient");
        assert_eq!(body["id"], "P123");
        assert_eq!(body["gender"], "male");
        assert_eq!(
            body["name"],
            json!([{ "use": "official", "family": "Doe", "given": ["John"] }])
        );
        assert_eq!(
            body["identifier"],
            json!([{ "system": "http://hospital.infogleam.com/patients", "value": "P123" }])
        );
        assert_eq!(body["meta"]["versionId"], "1");
        assert_eq!(body["meta"]["source"], "urn:infogleam:mirth");
        assert!(body.get("address").is_none());
        assert!(body.get("telecom").is_none());
        assert!(body.get("birthDate").is_none());
    }

    #[tokio::test]
    async fn attaches_optional_elements() {
        let (status, body) = post(
            r#"{
                "lastName": "Smith",
                "birthDate": "1975-06-30",
                "address": "1 Main St",
                "city": "Springfield",
                "zipCode": "12345",
                "country": "US",
                "phone": "555-0100"
            }"#,
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["birthDate"], "1975-06-30");
        assert_eq!(
            body["address"],
            json!([{
                "use": "home",
                "line": ["1 Main St"],
                "city": "Springfield",
                "postalCode": "12345",
                "country": "US"
            }])
        );
        assert_eq!(
            body["telecom"],
            json!([{ "system": "phone", "value": "555-0100", "use": "home" }])
        );
        assert_eq!(body["gender"], "unknown");
        assert!(body["id"]
            .as_str()
            .expect("id string")
            .starts_with("patient-"));
    }

    #[tokio::test]
    async fn empty_record_is_bad_request() {
        let (status, body) = post("{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "error": "Missing required patient identification data" })
        );
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (status, body) = post("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn wrong_field_type_is_bad_request() {
        let (status, body) = post(r#"{"lastName": ["Smith"]}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .expect("error string")
            .contains("lastName"));
    }

    #[tokio::test]
    async fn generator_fault_is_internal_error() {
        let (status, body) = post_with(Arc::new(EmptyId), r#"{"lastName":"Smith"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "FHIR transformation failed");
        assert!(body["details"].is_string());
    }
}
