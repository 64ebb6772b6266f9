/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/
use crate::constants::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_SECS,
    DEFAULT_TOKEN_CACHE_CAPACITY, DEFAULT_TOKEN_TTL_SECS, PRODUCTION_BASE_URL, TEST_BASE_URL,
};
use crate::error::AppError;
use crate::utils::config::{get_env_or_default, get_env_or_none};
use dotenv::dotenv;
use reqwest::Url;
use pretty_simple_display::{DebugPretty, DisplaySimple};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Hosts reachable over plain `http`, for mock servers
const LOCAL_HOSTS: [&str; 3] = ["127.0.0.1", "localhost", "[::1]"];

/// Backend the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Sandbox backend
    #[default]
    Test,
    /// Live backend
    Production,
}

impl Environment {
    /// Default base URL of the environment
    #[must_use]
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Test => TEST_BASE_URL,
            Environment::Production => PRODUCTION_BASE_URL,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(AppError::Config(format!("unknown environment: {other}"))),
        }
    }
}

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq)]
/// Configuration for the REST API
pub struct RestApiConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Timeout in seconds for a single HTTP call
    pub timeout: u64,
}

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq)]
/// Configuration of the access token cache
pub struct TokenCacheConfig {
    /// Lifetime of a cached token in seconds
    pub ttl_seconds: u64,
    /// Maximum number of cached tokens
    pub capacity: usize,
}

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq)]
/// Retry settings for resource calls
pub struct RetrySettings {
    /// Total attempts per call, 1 disables retries
    pub max_attempts: u32,
    /// Delay between attempts in milliseconds
    pub delay_ms: u64,
}

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq)]
/// Configuration for rate limiting API requests
pub struct RateLimiterConfig {
    /// Maximum number of requests allowed per period
    pub max_requests: u32,
    /// Time period in seconds for the rate limit
    pub period_seconds: u64,
    /// Burst size - maximum number of requests that can be made at once
    pub burst_size: u32,
}

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq)]
/// Main configuration for the MSC API client
pub struct Config {
    /// Target backend
    pub environment: Environment,
    /// REST API configuration
    pub rest_api: RestApiConfig,
    /// Access token cache configuration
    pub token_cache: TokenCacheConfig,
    /// Retry configuration
    pub retry: RetrySettings,
    /// Rate limiter configuration for API requests
    pub rate_limiter: RateLimiterConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Loads the configuration from the environment and the `.env` file
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `MSC_ENVIRONMENT` | `test` |
    /// | `MSC_BASE_URL` | depends on the environment |
    /// | `MSC_TIMEOUT_SECS` | 30 |
    /// | `MSC_TOKEN_TTL_SECS` | 6000 |
    /// | `MSC_TOKEN_CACHE_CAPACITY` | 100 |
    /// | `MSC_MAX_ATTEMPTS` | 5 |
    /// | `MSC_RETRY_DELAY_MS` | 500 |
    /// | `MSC_RATE_LIMIT_MAX_REQUESTS` | 60 |
    /// | `MSC_RATE_LIMIT_PERIOD_SECONDS` | 60 |
    /// | `MSC_RATE_LIMIT_BURST_SIZE` | 20 |
    pub fn new() -> Self {
        match dotenv() {
            Ok(_) => debug!("Successfully loaded .env file"),
            Err(e) => debug!("Failed to load .env file: {e}"),
        }

        let environment = get_env_or_default("MSC_ENVIRONMENT", Environment::Test);
        let base_url = get_env_or_none::<String>("MSC_BASE_URL")
            .unwrap_or_else(|| environment.base_url().to_string());

        Config {
            environment,
            rest_api: RestApiConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                timeout: get_env_or_default("MSC_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
            },
            token_cache: TokenCacheConfig {
                ttl_seconds: get_env_or_default("MSC_TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS),
                capacity: get_env_or_default(
                    "MSC_TOKEN_CACHE_CAPACITY",
                    DEFAULT_TOKEN_CACHE_CAPACITY,
                ),
            },
            retry: RetrySettings {
                max_attempts: get_env_or_default("MSC_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS),
                delay_ms: get_env_or_default("MSC_RETRY_DELAY_MS", DEFAULT_RETRY_DELAY_MS),
            },
            rate_limiter: RateLimiterConfig {
                max_requests: get_env_or_default("MSC_RATE_LIMIT_MAX_REQUESTS", 60),
                period_seconds: get_env_or_default("MSC_RATE_LIMIT_PERIOD_SECONDS", 60),
                burst_size: get_env_or_default("MSC_RATE_LIMIT_BURST_SIZE", 20),
            },
        }
    }

    /// Configuration for an environment with every other value defaulted
    ///
    /// Unlike [`Config::new`] nothing is read from the process environment.
    #[must_use]
    pub fn for_environment(environment: Environment) -> Self {
        Config {
            environment,
            rest_api: RestApiConfig {
                base_url: environment.base_url().to_string(),
                timeout: DEFAULT_TIMEOUT_SECS,
            },
            token_cache: TokenCacheConfig {
                ttl_seconds: DEFAULT_TOKEN_TTL_SECS,
                capacity: DEFAULT_TOKEN_CACHE_CAPACITY,
            },
            retry: RetrySettings {
                max_attempts: DEFAULT_MAX_ATTEMPTS,
                delay_ms: DEFAULT_RETRY_DELAY_MS,
            },
            rate_limiter: RateLimiterConfig {
                max_requests: 60,
                period_seconds: 60,
                burst_size: 20,
            },
        }
    }

    /// Replaces the base URL, dropping any trailing slash
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.rest_api.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Timeout of a single HTTP call
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.rest_api.timeout)
    }

    /// Checks the configuration for values the client cannot work with
    ///
    /// The base URL must use `https`, except plain `http` pointing at a local
    /// host, which is accepted for mock servers.
    pub fn validate(&self) -> Result<(), AppError> {
        let url = self.rest_api.base_url.as_str();
        let invalid_url =
            || AppError::Config(format!("base url must be an https url with a host: '{url}'"));
        let parsed = Url::parse(url).map_err(|_| invalid_url())?;
        let host = parsed.host_str().unwrap_or_default();
        let allowed = match parsed.scheme() {
            "https" => !host.is_empty(),
            "http" => LOCAL_HOSTS.contains(&host),
            _ => false,
        };
        if !allowed {
            return Err(invalid_url());
        }
        if self.token_cache.capacity == 0 {
            return Err(AppError::Config("token cache capacity must be positive".into()));
        }
        if self.token_cache.ttl_seconds == 0 {
            return Err(AppError::Config("token ttl must be positive".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(AppError::Config("max attempts must be at least 1".into()));
        }
        if self.rate_limiter.period_seconds == 0 {
            return Err(AppError::Config("rate limit period must be positive".into()));
        }
        Ok(())
    }
}
