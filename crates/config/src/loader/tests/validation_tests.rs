//! Validation tests for the configuration loader builder.
//!
//! Responsibilities:
//! - Test timeout configuration validation (zero, max boundary, valid values).
//! - Test max retries validation (zero allowed, max boundary).
//! - Test organization id validation.

use crate::constants::{MAX_MAX_RETRIES, MAX_TIMEOUT_SECS};
use crate::loader::builder::ConfigLoader;
use crate::loader::error::ConfigError;
use std::time::Duration;

fn base() -> ConfigLoader {
    ConfigLoader::new()
        .with_base_url("http://localhost:3000".to_string())
        .with_api_token("glsa_token".to_string())
}

#[test]
fn test_timeout_zero_invalid() {
    match base().with_timeout(Duration::from_secs(0)).build() {
        Err(ConfigError::InvalidTimeout { message }) => {
            assert!(message.contains("must be greater than 0"), "{message}");
        }
        other => panic!("Expected InvalidTimeout, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_timeout_max_boundary() {
    assert!(
        base()
            .with_timeout(Duration::from_secs(MAX_TIMEOUT_SECS))
            .build()
            .is_ok()
    );
    assert!(matches!(
        base()
            .with_timeout(Duration::from_secs(MAX_TIMEOUT_SECS + 1))
            .build(),
        Err(ConfigError::InvalidTimeout { .. })
    ));
}

#[test]
fn test_max_retries_bounds() {
    assert!(base().with_max_retries(0).build().is_ok());
    assert!(base().with_max_retries(MAX_MAX_RETRIES).build().is_ok());
    assert!(matches!(
        base().with_max_retries(MAX_MAX_RETRIES + 1).build(),
        Err(ConfigError::InvalidMaxRetries { .. })
    ));
}

#[test]
fn test_org_id_must_be_positive() {
    assert!(matches!(
        base().with_org_id(0).build(),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(base().with_org_id(1).build().is_ok());
}
