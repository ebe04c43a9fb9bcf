//! Clinical record to FHIR `Patient` mapping.
//!
//! Defaults:
//! - `id`: the record's patient id, else a generated fallback
//! - `identifier[0].value`: the record's patient id, else `UNKNOWN`
//! - `name[0].family` / `name[0].given`: `Unknown` for a missing part
//! - `gender`: `unknown` for a missing or unrecognised code
//!
//! `birthDate`, `address` and `telecom` appear only when their source field is non-empty.
//! Address sub-fields are attached individually.

use crate::ids::{is_url_safe, PatientIdGenerator};
use crate::patient::{
    Address, AddressUse, AdministrativeGender, ContactPoint, ContactPointSystem,
    ContactPointUse, FhirPatient, HumanName, Identifier, Meta, NameUse,
};
use crate::record::{present, ClinicalRecord};
use crate::{TransformError, TransformResult, IDENTIFIER_SYSTEM, META_SOURCE};
use chrono::{DateTime, SecondsFormat, Utc};

const META_VERSION_ID: &str = "1";
const UNKNOWN_IDENTIFIER: &str = "UNKNOWN";
const UNKNOWN_NAME: &str = "Unknown";

/// Map an HL7 administrative sex code to a FHIR gender.
///
/// Case-insensitive over `M`, `F`, `O` and `U`. Anything else, including a missing or empty
/// code, is `unknown`.
pub fn map_gender(code: Option<&str>) -> AdministrativeGender {
    match code.map(str::to_ascii_uppercase).as_deref() {
        Some("M") => AdministrativeGender::Male,
        Some("F") => AdministrativeGender::Female,
        Some("O") => AdministrativeGender::Other,
        _ => AdministrativeGender::Unknown,
    }
}

/// Build a FHIR `Patient` from a clinical record.
///
/// Pure in `(record, now)` for a deterministic `ids`: the only generated values are the
/// fallback id and `meta.lastUpdated`, and both derive from `now`.
///
/// # Errors
///
/// - [`TransformError::MissingIdentification`] if both `firstName` and `lastName` are absent
///   or empty.
/// - [`TransformError::Fault`] if a fallback id is needed and `ids` returns an empty or
///   non-URL-safe token.
pub fn transform(
    record: &ClinicalRecord,
    now: DateTime<Utc>,
    ids: &dyn PatientIdGenerator,
) -> TransformResult<FhirPatient> {
    let first_name = present(&record.first_name);
    let last_name = present(&record.last_name);
    if first_name.is_none() && last_name.is_none() {
        return Err(TransformError::MissingIdentification);
    }

    let patient_id = present(&record.patient_id);
    let id = match patient_id {
        Some(id) => id.to_string(),
        None => {
            let generated = ids.generate(now);
            if !is_url_safe(&generated) {
                return Err(TransformError::Fault(format!(
                    "generated patient id {generated:?} is not a non-empty URL-safe token"
                )));
            }
            tracing::debug!("No patientId supplied, generated {}", generated);
            generated
        }
    };

    let address = present(&record.address)
        .map(|line| Address {
            use_type: AddressUse::Home,
            line: vec![line.to_string()],
            city: present(&record.city).map(str::to_string),
            postal_code: present(&record.zip_code).map(str::to_string),
            country: present(&record.country).map(str::to_string),
        })
        .into_iter()
        .collect();

    let telecom = present(&record.phone)
        .map(|phone| ContactPoint {
            system: ContactPointSystem::Phone,
            value: phone.to_string(),
            use_type: ContactPointUse::Home,
        })
        .into_iter()
        .collect();

    Ok(FhirPatient {
        resource_type: FhirPatient::RESOURCE_TYPE.to_string(),
        id,
        meta: Meta {
            version_id: META_VERSION_ID.to_string(),
            last_updated: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            source: META_SOURCE.to_string(),
        },
        identifier: vec![Identifier {
            system: IDENTIFIER_SYSTEM.to_string(),
            value: patient_id.unwrap_or(UNKNOWN_IDENTIFIER).to_string(),
        }],
        name: vec![HumanName {
            use_type: NameUse::Official,
            family: last_name.unwrap_or(UNKNOWN_NAME).to_string(),
            given: vec![first_name.unwrap_or(UNKNOWN_NAME).to_string()],
        }],
        gender: map_gender(record.gender.as_deref()),
        birth_date: present(&record.birth_date).map(str::to_string),
        address,
        telecom,
    })
}
