//! Fallback patient identifiers.
//!
//! When an inbound record carries no patient identifier the transformer asks a
//! [`PatientIdGenerator`] for one. The generator is injected so tests can pin the output and
//! deployments can choose how strong the uniqueness guarantee is.

use chrono::{DateTime, Utc};

/// Prefix shared by all generated patient identifiers.
pub const GENERATED_ID_PREFIX: &str = "patient-";

/// Source of fallback patient resource ids.
pub trait PatientIdGenerator: Send + Sync {
    /// Produce an id for a resource generated at `now`.
    ///
    /// Implementations must return a non-empty, URL-safe token.
    fn generate(&self, now: DateTime<Utc>) -> String;
}

/// `patient-<unix millis>`.
///
/// Deterministic in `now`. Two records transformed within the same millisecond receive the
/// same id; use [`UuidIdGenerator`] where that matters.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimestampIdGenerator;

impl PatientIdGenerator for TimestampIdGenerator {
    fn generate(&self, now: DateTime<Utc>) -> String {
        format!("{GENERATED_ID_PREFIX}{}", now.timestamp_millis())
    }
}

/// `patient-<uuid v4, simple form>`, unique per call regardless of `now`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIdGenerator;

impl PatientIdGenerator for UuidIdGenerator {
    fn generate(&self, _now: DateTime<Utc>) -> String {
        format!("{GENERATED_ID_PREFIX}{}", uuid::Uuid::new_v4().simple())
    }
}

/// True if `id` is non-empty and made only of RFC 3986 unreserved characters.
pub fn is_url_safe(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~'))
}
