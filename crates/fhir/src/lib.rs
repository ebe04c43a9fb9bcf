//! HL7 v2 to FHIR R4 translation.
//!
//! This crate turns the flat clinical record that an HL7-parsing front end extracts from an
//! admission message into a FHIR R4 `Patient` resource.
//!
//! This crate focuses on:
//! - a closed, typed input shape ([`ClinicalRecord`]) decoded and checked at the boundary
//! - the FHIR wire model for the produced resource ([`FhirPatient`])
//! - the pure mapping between the two ([`transform`]), with identifier generation injected
//!   through [`PatientIdGenerator`]
//!
//! Nothing here performs I/O or holds state between calls.

pub mod ids;
pub mod patient;
pub mod record;
pub mod transform;

pub use ids::{PatientIdGenerator, TimestampIdGenerator, UuidIdGenerator};
pub use patient::{
    Address, AddressUse, AdministrativeGender, ContactPoint, ContactPointSystem,
    ContactPointUse, FhirPatient, HumanName, Identifier, Meta, NameUse,
};
pub use record::ClinicalRecord;
pub use transform::{map_gender, transform};

/// Provenance URI stamped into `meta.source`.
pub const META_SOURCE: &str = "urn:infogleam:mirth";

/// Namespace of the hospital patient identifier.
pub const IDENTIFIER_SYSTEM: &str = "http://hospital.infogleam.com/patients";

/// Errors decoding input for the `fhir` crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid clinical record: {0}")]
    InvalidRecord(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;

/// Errors returned by [`transform`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TransformError {
    /// Neither a first nor a last name was supplied.
    #[error("Missing required patient identification data")]
    MissingIdentification,

    /// Unexpected failure while assembling the resource.
    #[error("{0}")]
    Fault(String),
}

/// Type alias for Results that can fail with a [`TransformError`].
pub type TransformResult<T> = Result<T, TransformError>;

impl TransformError {
    /// True for faults the caller can fix by correcting its input.
    pub fn is_validation(&self) -> bool {
        matches!(self, TransformError::MissingIdentification)
    }
}
