//! Inbound clinical record.
//!
//! The integration engine posts the fields it extracted from an HL7 admission message as a
//! flat JSON object. This module decodes that object into a closed, typed shape so the
//! transformer never sees an open-ended map.
//!
//! Notes:
//! - Every field is optional. Empty strings are kept as received and treated as absent by
//!   the transformer.
//! - Keys not listed here are ignored.
//! - Non-string values for a listed key are rejected at decode time.

use crate::{FhirError, FhirResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Patient fields extracted from an HL7 v2 message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalRecord {
    /// Hospital patient identifier (PID-3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// HL7 administrative sex code (`M`, `F`, `O`, `U`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    /// Date of birth, passed through unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    /// Street address line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ClinicalRecord {
    /// Decode a clinical record from a JSON body.
    ///
    /// This uses `serde_path_to_error` so the error names the offending key (for example
    /// `lastName`) when a value has the wrong type.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::InvalidRecord`] if the body is not a JSON object or a listed
    /// field is not a string or null.
    pub fn from_json(body: &[u8]) -> FhirResult<Self> {
        let mut deserializer = serde_json::Deserializer::from_slice(body);

        match serde_path_to_error::deserialize::<_, ClinicalRecord>(&mut deserializer) {
            Ok(record) => {
                deserializer.end()?;
                Ok(record)
            }
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() || path == "." {
                    "<root>"
                } else {
                    path.as_str()
                };
                Err(FhirError::InvalidRecord(format!(
                    "schema mismatch at {path}: {source}"
                )))
            }
        }
    }
}

/// A field's value if it is present and non-empty.
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}
