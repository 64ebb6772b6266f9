//! # msc-client
//!
//! Client library for the Mercado Simples (MSC) receivables API.
//!
//! The crate takes care of the three things every call to the API needs:
//!
//! - **Authentication**: access tokens are requested with the API user and
//!   password of a [`Credential`](model::auth::Credential) and cached for a
//!   fixed lifetime in a bounded, concurrency safe
//!   [`TokenCache`](application::token_cache::TokenCache).
//! - **Money**: the API exchanges currency amounts as integer cents, the
//!   library works in decimal major units. [`model::money`] and
//!   [`model::schema`] convert named fields in both directions.
//! - **Transport**: [`Client`](application::client::Client) sends requests
//!   through a rate limited [`Transport`](model::http::Transport), retries
//!   transient failures and maps status codes to [`AppError`](error::AppError).
//!
//! ## Example
//!
//! ```rust,no_run
//! use msc_client::prelude::*;
//!
//! # async fn run() -> Result<(), AppError> {
//! setup_logger();
//! let client = Client::new(Config::new())?;
//! let credential = Credential::new("20.299.078/0001-66", "api-user", "api-pass")?;
//!
//! let contract: serde_json::Value = client
//!     .get(&credential, ApiNamespace::Contracts, Some("42"), &[], schema::CONTRACT)
//!     .await?;
//! info!("contract: {contract}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! [`Config::new`](application::config::Config::new) reads a `.env` file and
//! the environment:
//!
//! | Variable | Default |
//! |---|---|
//! | `MSC_ENVIRONMENT` | `test` |
//! | `MSC_BASE_URL` | base URL of the environment |
//! | `MSC_TIMEOUT_SECS` | `30` |
//! | `MSC_TOKEN_TTL_SECS` | `6000` |
//! | `MSC_TOKEN_CACHE_CAPACITY` | `100` |
//! | `MSC_MAX_ATTEMPTS` | `5` |
//! | `MSC_RETRY_DELAY_MS` | `500` |
//! | `MSC_RATE_LIMIT_MAX_REQUESTS` | `60` |
//! | `MSC_RATE_LIMIT_PERIOD_SECONDS` | `60` |
//! | `MSC_RATE_LIMIT_BURST_SIZE` | `20` |
//! | `LOGLEVEL` | `INFO` |

/// Token issuance, token cache, configuration and the API client
pub mod application;

/// Library wide constants
pub mod constants;

/// Error types
pub mod error;

/// Money codec, credentials and HTTP plumbing
pub mod model;

/// Commonly used types in one import
pub mod prelude;

/// Logging, environment and document helpers
pub mod utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
#[must_use]
pub fn version() -> &'static str {
    VERSION
}
