/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! # MSC Client Prelude
//!
//! Brings the types needed for most interactions with the MSC API into scope.
//!
//! ## Usage
//!
//! ```rust
//! use msc_client::prelude::*;
//!
//! let config = Config::for_environment(Environment::Test);
//! assert!(config.validate().is_ok());
//! ```

// ============================================================================
// CORE CONFIGURATION AND SETUP
// ============================================================================

/// Configuration of the client
pub use crate::application::config::{
    Config, Environment, RateLimiterConfig, RestApiConfig, RetrySettings, TokenCacheConfig,
};

/// Library version information
pub use crate::{VERSION, version};

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Main error type and its classification
pub use crate::error::{AppError, ErrorKind, MscResult};

// ============================================================================
// AUTHENTICATION
// ============================================================================

/// Credentials and tokens
pub use crate::model::auth::{
    AccessToken, AccountType, BankAccount, Credential, CredentialKey, CredentialPool, Secret,
};

/// Token issuance
pub use crate::application::auth::{HttpTokenIssuer, TokenIssuer};

/// Token cache and its clocks
pub use crate::application::token_cache::{Clock, ManualClock, SystemClock, TokenCache};

// ============================================================================
// CLIENT AND TRANSPORT
// ============================================================================

/// API client
pub use crate::application::client::{ApiCall, Client};

/// Endpoint construction
pub use crate::application::endpoints::{ApiNamespace, url};

/// HTTP transport abstraction
pub use crate::model::http::{HttpRequest, HttpResponse, RequestAuth, ReqwestTransport, Transport};

/// Retry policy
pub use crate::model::retry::RetryPolicy;

/// Rate limiting
pub use crate::application::rate_limiter::RateLimiter;

// ============================================================================
// MONEY
// ============================================================================

/// Minor/major unit conversion
pub use crate::model::money::{
    MoneyFields, Record, major_to_minor, minor_to_major, to_major, to_major_list, to_minor,
    to_minor_list,
};

/// Currency layouts of the API resources
pub use crate::model::schema::{self, MoneySchema};

// ============================================================================
// UTILITIES
// ============================================================================

/// Logging utilities
pub use crate::utils::logger::setup_logger;

/// CNPJ validation
pub use crate::utils::cnpj::validate_cnpj;

/// Global constants
pub use crate::constants::*;

// ============================================================================
// RE-EXPORTS FROM EXTERNAL CRATES
// ============================================================================

/// Re-export commonly used external types
pub use async_trait::async_trait;
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};
pub use std::sync::Arc;
pub use tracing::{debug, error, info, warn};

/// Re-export chrono for date/time handling
pub use chrono::{DateTime, Utc};

/// Re-export reqwest types used in requests and errors
pub use reqwest::{Method, StatusCode};
