use axum::http::StatusCode;
use medley_api::{
    config::ApiConfig,
    middleware::{
        error_handling::map_error,
        signature::{sign, verify_signature},
    },
};
use medley_core::errors::MedleyError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::collections::HashMap;

#[rstest]
#[case(MedleyError::NotFound("missing".to_string()), StatusCode::NOT_FOUND)]
#[case(MedleyError::Validation("bad".to_string()), StatusCode::BAD_REQUEST)]
#[case(MedleyError::Authentication("bad signature".to_string()), StatusCode::UNAUTHORIZED)]
#[case(MedleyError::Authorization("no".to_string()), StatusCode::FORBIDDEN)]
#[case(MedleyError::Unavailable("closed".to_string()), StatusCode::SERVICE_UNAVAILABLE)]
#[case(MedleyError::Upstream(eyre::eyre!("timeout")), StatusCode::BAD_GATEWAY)]
fn test_error_status_mapping(#[case] error: MedleyError, #[case] expected: StatusCode) {
    let response = map_error(error);

    assert_eq!(response.status(), expected);
}

#[test]
fn test_internal_error_is_500() {
    let error = MedleyError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    assert_eq!(map_error(error).status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_sign_is_deterministic_hex() {
    let first = sign("secret", b"payload").unwrap();
    let second = sign("secret", b"payload").unwrap();

    assert_eq!(first, second);
    assert!(first.starts_with("sha256="));
    assert_eq!(first.len(), "sha256=".len() + 64);
}

#[test]
fn test_known_hmac_vector() {
    // RFC 4231 test case 2
    let header = sign("Jefe", b"what do ya want for nothing?").unwrap();

    assert_eq!(
        header,
        "sha256=5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
    );
}

#[rstest]
#[case("")]
#[case("sha1=abcdef")]
#[case("sha256=zz")]
#[case("sha256=00")]
fn test_bad_signatures_are_rejected(#[case] header: &str) {
    let result = verify_signature("secret", header, b"payload");

    assert!(matches!(result, Err(MedleyError::Authentication(_))));
}

#[test]
fn test_config_defaults() {
    let config = ApiConfig::from_lookup(|_| None).unwrap();

    assert_eq!(config.server_addr(), "0.0.0.0:5000");
    assert_eq!(config.webhook_secret, None);
    assert_eq!(config.request_timeout, 30);
}

#[test]
fn test_config_prefers_api_port_over_port() {
    let vars = HashMap::from([
        ("API_PORT", "8080"),
        ("PORT", "9090"),
        ("WEBHOOK_SECRET", "hunter2"),
    ]);

    let config = ApiConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.webhook_secret.as_deref(), Some("hunter2"));
}

#[test]
fn test_config_rejects_bad_port() {
    let result = ApiConfig::from_lookup(|key| (key == "PORT").then(|| "not-a-port".to_string()));

    assert!(result.is_err());
}
