use msc_client::application::config::{Config, Environment};
use msc_client::constants::{PRODUCTION_BASE_URL, TEST_BASE_URL};
use msc_client::error::AppError;
use std::time::Duration;

#[test]
fn test_default_environment_is_test() {
    assert_eq!(Environment::default(), Environment::Test);
    assert_eq!(Environment::Test.base_url(), TEST_BASE_URL);
    assert_eq!(Environment::Production.base_url(), PRODUCTION_BASE_URL);
}

#[test]
fn test_for_environment_defaults() {
    let config = Config::for_environment(Environment::Production);
    assert_eq!(config.token_cache.ttl_seconds, 6000);
    assert_eq!(config.token_cache.capacity, 100);
    assert_eq!(config.timeout(), Duration::from_secs(30));
    assert!(config.validate().is_ok());
}

#[test]
fn test_with_base_url_trims_trailing_slash() {
    let config = Config::for_environment(Environment::Test).with_base_url("https://api.example.com/");
    assert_eq!(config.rest_api.base_url, "https://api.example.com");
}

#[test]
fn test_validate_accepts_local_mock_servers() {
    let config = Config::for_environment(Environment::Test).with_base_url("http://127.0.0.1:1234");
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_bad_values() {
    let config = Config::for_environment(Environment::Test).with_base_url("ftp://example.com");
    assert!(matches!(config.validate(), Err(AppError::Config(_))));

    let mut config = Config::for_environment(Environment::Test);
    config.token_cache.capacity = 0;
    assert!(matches!(config.validate(), Err(AppError::Config(_))));

    let mut config = Config::for_environment(Environment::Test);
    config.retry.max_attempts = 0;
    assert!(matches!(config.validate(), Err(AppError::Config(_))));
}

#[test]
fn test_config_serializes() {
    let config = Config::for_environment(Environment::Test);
    let value = serde_json::to_value(&config).unwrap();
    assert_eq!(value["token_cache"]["ttl_seconds"], 6000);
    assert_eq!(value["rest_api"]["base_url"], TEST_BASE_URL);

    let back: Config = serde_json::from_value(value).unwrap();
    assert_eq!(back, config);
}
