//! Property-based tests for configuration serialization.
//!
//! Test coverage:
//! - ConnectionConfig: roundtrip serialization with all fields
//! - AuthConfig: strategy type and secrets survive serialization
//! - ConfigLoader: any valid http(s) URL is normalized without a trailing slash

use proptest::prelude::*;
use secrecy::{ExposeSecret, SecretString};

use grafana_config::{AuthConfig, AuthStrategy, ConfigLoader, ConnectionConfig};
use std::time::Duration;

fn base_url_strategy() -> impl Strategy<Value = String> {
    let scheme = prop_oneof![Just("http"), Just("https")];
    let host = prop_oneof![
        Just("localhost"),
        Just("grafana"),
        Just("grafana.example.com"),
        Just("monitoring.internal"),
    ];
    (scheme, host, 1024u16..=65535u16)
        .prop_map(|(scheme, host, port)| format!("{scheme}://{host}:{port}"))
}

proptest! {
    #[test]
    fn connection_config_roundtrip(
        base_url in base_url_strategy(),
        org_id in proptest::option::of(1i64..1000),
        skip_verify in any::<bool>(),
        timeout in 1u64..3600,
        max_retries in 0usize..=10,
    ) {
        let original = ConnectionConfig {
            base_url,
            org_id,
            skip_verify,
            timeout: Duration::from_secs(timeout),
            max_retries,
        };

        let json = serde_json::to_string(&original).unwrap();
        let back: ConnectionConfig = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(back.base_url, original.base_url);
        prop_assert_eq!(back.org_id, original.org_id);
        prop_assert_eq!(back.skip_verify, original.skip_verify);
        prop_assert_eq!(back.timeout, original.timeout);
        prop_assert_eq!(back.max_retries, original.max_retries);
    }

    #[test]
    fn basic_auth_roundtrip(username in "[a-z]{1,16}", password in "[A-Za-z0-9!@#]{1,32}") {
        let original = AuthConfig {
            strategy: AuthStrategy::Basic {
                username: username.clone(),
                password: SecretString::new(password.clone().into()),
            },
        };

        let json = serde_json::to_string(&original).unwrap();
        let back: AuthConfig = serde_json::from_str(&json).unwrap();

        match back.strategy {
            AuthStrategy::Basic { username: u, password: p } => {
                prop_assert_eq!(u, username);
                prop_assert_eq!(p.expose_secret(), password.as_str());
            }
            _ => prop_assert!(false, "expected Basic strategy"),
        }
    }

    #[test]
    fn base_url_normalization(base_url in base_url_strategy()) {
        let config = ConfigLoader::new()
            .with_base_url(format!("{base_url}/"))
            .with_api_token("token".to_string())
            .build()
            .unwrap();
        prop_assert_eq!(config.connection.base_url, base_url);
    }
}
