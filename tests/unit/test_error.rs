use msc_client::error::{AppError, ErrorKind};
use reqwest::StatusCode;

#[test]
fn test_app_error_display_authentication_failed() {
    let error = AppError::AuthenticationFailed;
    assert_eq!(error.to_string(), "authentication failed");
}

#[test]
fn test_app_error_display_not_found() {
    let error = AppError::NotFound;
    assert_eq!(error.to_string(), "not found");
}

#[test]
fn test_app_error_display_service_unavailable() {
    let error = AppError::ServiceUnavailable(StatusCode::BAD_GATEWAY);
    assert!(error.to_string().contains("502"));
}

#[test]
fn test_app_error_display_unexpected() {
    let error = AppError::Unexpected {
        status: StatusCode::FORBIDDEN,
        body: "denied".to_string(),
    };
    let message = error.to_string();
    assert!(message.contains("403"));
    assert!(message.contains("denied"));
}

#[test]
fn test_app_error_display_conversion() {
    let error = AppError::Conversion("field 'amount' is not numeric".to_string());
    assert_eq!(
        error.to_string(),
        "conversion error: field 'amount' is not numeric"
    );
}

#[test]
fn test_app_error_display_invalid_input() {
    let error = AppError::InvalidInput("invalid CNPJ".to_string());
    assert_eq!(error.to_string(), "invalid input: invalid CNPJ");
}

#[test]
fn test_app_error_display_billing() {
    let error = AppError::Billing("billing blocked".to_string());
    assert_eq!(error.to_string(), "billing error: billing blocked");
    assert_eq!(error.kind(), ErrorKind::Billing);
}

#[test]
fn test_app_error_from_json_error() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: AppError = json_error.into();
    assert!(matches!(error, AppError::Json(_)));
    assert_eq!(error.kind(), ErrorKind::Serialization);
}

#[test]
fn test_app_error_kinds() {
    assert_eq!(AppError::Timeout.kind(), ErrorKind::Timeout);
    assert_eq!(AppError::NotFound.kind(), ErrorKind::NotFound);
    assert_eq!(
        AppError::BadRequest(String::new()).kind(),
        ErrorKind::BadRequest
    );
    assert_eq!(
        AppError::Config("x".to_string()).kind(),
        ErrorKind::InvalidInput
    );
    assert_eq!(
        AppError::Deserialization("x".to_string()).kind(),
        ErrorKind::Serialization
    );
}
