use std::error::Error;
use medley_core::errors::{MedleyError, MedleyResult};

#[test]
fn test_medley_error_display() {
    let not_found = MedleyError::NotFound("Track not found".to_string());
    let validation = MedleyError::Validation("Invalid input".to_string());
    let authentication = MedleyError::Authentication("Bad signature".to_string());
    let authorization = MedleyError::Authorization("Not an admin".to_string());
    let unavailable = MedleyError::Unavailable("Bot is shutting down".to_string());
    let upstream = MedleyError::Upstream(eyre::eyre!("Weather service unavailable"));
    let internal = MedleyError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    assert_eq!(not_found.to_string(), "Resource not found: Track not found");
    assert_eq!(validation.to_string(), "Validation error: Invalid input");
    assert_eq!(
        authentication.to_string(),
        "Authentication error: Bad signature"
    );
    assert_eq!(
        authorization.to_string(),
        "Authorization error: Not an admin"
    );
    assert_eq!(unavailable.to_string(), "Service unavailable: Bot is shutting down");
    assert!(upstream.to_string().contains("Upstream service error:"));
    assert!(internal.to_string().contains("Internal server error:"));
}

#[test]
fn test_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let medley_error = MedleyError::Internal(Box::new(io_error));

    assert!(medley_error.source().is_some());
}

#[test]
fn test_medley_result() {
    let result: MedleyResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: MedleyResult<i32> = Err(MedleyError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_from_eyre_report() {
    let report = eyre::eyre!("connection reset");
    let medley_error: MedleyError = report.into();

    assert!(matches!(medley_error, MedleyError::Upstream(_)));
    assert!(medley_error.to_string().contains("connection reset"));
}

#[test]
fn test_apology_keeps_user_facing_messages() {
    let not_found = MedleyError::NotFound("Couldn't find a track with that name.".to_string());
    let validation = MedleyError::Validation("Invalid range! First number must be ≤ second.".to_string());

    assert_eq!(not_found.apology(), "Couldn't find a track with that name.");
    assert_eq!(validation.apology(), "Invalid range! First number must be ≤ second.");
}

#[test]
fn test_apology_hides_internal_details() {
    let upstream = MedleyError::Upstream(eyre::eyre!("401 from api.openai.com"));
    let authorization = MedleyError::Authorization("missing MANAGE_GUILD".to_string());

    assert_eq!(upstream.apology(), "Sorry, couldn't process that request.");
    assert!(!authorization.apology().contains("MANAGE_GUILD"));
}
