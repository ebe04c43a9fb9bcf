//! FHIR R4 `Patient` wire model.
//!
//! These structs serialise to exactly the JSON the service returns: field names follow the
//! FHIR element names and optional repeating elements are omitted when empty rather than
//! emitted as `[]`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// Coded values
// ============================================================================

/// FHIR administrative gender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AdministrativeGender {
    Male,
    Female,
    Other,
    Unknown,
}

impl AdministrativeGender {
    pub fn as_str(self) -> &'static str {
        match self {
            AdministrativeGender::Male => "male",
            AdministrativeGender::Female => "female",
            AdministrativeGender::Other => "other",
            AdministrativeGender::Unknown => "unknown",
        }
    }
}

/// Purpose of a human name. Only the official name is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NameUse {
    Official,
}

/// Purpose of an address. Inbound records carry a single home address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AddressUse {
    Home,
}

/// Telecommunications channel. Inbound records carry a phone number only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContactPointSystem {
    Phone,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContactPointUse {
    Home,
}

// ============================================================================
// Resource
// ============================================================================

/// A FHIR R4 `Patient` resource.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FhirPatient {
    /// Always `"Patient"`.
    pub resource_type: String,

    pub id: String,

    pub meta: Meta,

    pub identifier: Vec<Identifier>,

    pub name: Vec<HumanName>,

    pub gender: AdministrativeGender,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<Address>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telecom: Vec<ContactPoint>,
}

impl FhirPatient {
    pub const RESOURCE_TYPE: &'static str = "Patient";
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub version_id: String,

    /// ISO-8601 UTC instant with millisecond precision.
    pub last_updated: String,

    pub source: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct Identifier {
    pub system: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct HumanName {
    #[serde(rename = "use")]
    pub use_type: NameUse,

    pub family: String,

    pub given: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "use")]
    pub use_type: AddressUse,

    pub line: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct ContactPoint {
    pub system: ContactPointSystem,

    pub value: String,

    #[serde(rename = "use")]
    pub use_type: ContactPointUse,
}
