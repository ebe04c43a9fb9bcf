//! REST server runtime configuration.
//!
//! Resolved once at process startup and then passed into the router. Request handlers never
//! read the environment. The parsing functions take the raw `Option<String>` values so they
//! can be exercised without touching process-wide environment variables.

use fhir::{PatientIdGenerator, TimestampIdGenerator, UuidIdGenerator};
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

/// Listen port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT value: {0:?}")]
    InvalidPort(String),
    #[error("unknown PATIENT_ID_STRATEGY {0:?} (expected \"timestamp\" or \"uuid\")")]
    UnknownIdStrategy(String),
}

/// How fallback patient ids are generated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdStrategy {
    /// `patient-<unix millis>`.
    #[default]
    Timestamp,
    /// `patient-<uuid>`.
    Uuid,
}

impl IdStrategy {
    pub fn generator(self) -> Arc<dyn PatientIdGenerator> {
        match self {
            IdStrategy::Timestamp => Arc::new(TimestampIdGenerator),
            IdStrategy::Uuid => Arc::new(UuidIdGenerator),
        }
    }
}

impl FromStr for IdStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timestamp" => Ok(IdStrategy::Timestamp),
            "uuid" => Ok(IdStrategy::Uuid),
            _ => Err(ConfigError::UnknownIdStrategy(s.to_string())),
        }
    }
}

/// REST server configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    port: u16,
    id_strategy: IdStrategy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PORT, IdStrategy::default())
    }
}

impl ServerConfig {
    pub fn new(port: u16, id_strategy: IdStrategy) -> Self {
        Self { port, id_strategy }
    }

    /// Build a configuration from raw `PORT` and `PATIENT_ID_STRATEGY` values.
    ///
    /// Missing or blank values fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a value is present but cannot be parsed.
    pub fn from_env_values(
        port: Option<String>,
        id_strategy: Option<String>,
    ) -> Result<Self, ConfigError> {
        let port = match non_blank(port) {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(value))?,
            None => DEFAULT_PORT,
        };
        let id_strategy = non_blank(id_strategy)
            .map(|value| value.parse::<IdStrategy>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self { port, id_strategy })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn id_strategy(&self) -> IdStrategy {
        self.id_strategy
    }

    /// Listen on all interfaces so the service is reachable from the integration engine's
    /// container network.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let cfg = ServerConfig::from_env_values(None, None).expect("default config");
        assert_eq!(cfg, ServerConfig::default());
        assert_eq!(cfg.port(), 3000);
        assert_eq!(cfg.id_strategy(), IdStrategy::Timestamp);
        assert_eq!(cfg.bind_addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn blank_values_use_defaults() {
        let cfg = ServerConfig::from_env_values(Some("  ".into()), Some(String::new()))
            .expect("default config");
        assert_eq!(cfg, ServerConfig::default());
    }

    #[test]
    fn parses_port_and_strategy() {
        let cfg = ServerConfig::from_env_values(Some("8080".into()), Some("UUID".into()))
            .expect("config");
        assert_eq!(cfg.port(), 8080);
        assert_eq!(cfg.id_strategy(), IdStrategy::Uuid);
    }

    #[test]
    fn rejects_non_numeric_port() {
        let err = ServerConfig::from_env_values(Some("http".into()), None)
            .expect_err("should reject port");
        assert_eq!(err, ConfigError::InvalidPort("http".into()));
    }

    #[test]
    fn rejects_out_of_range_port() {
        assert!(ServerConfig::from_env_values(Some("70000".into()), None).is_err());
    }

    #[test]
    fn rejects_unknown_strategy() {
        let err = ServerConfig::from_env_values(None, Some("random".into()))
            .expect_err("should reject strategy");
        assert!(matches!(err, ConfigError::UnknownIdStrategy(_)));
    }
}
