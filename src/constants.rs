/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/
/// Base URL of the production backend
pub const PRODUCTION_BASE_URL: &str = "https://backend.mercadosimples.tech";
/// Base URL of the test backend
pub const TEST_BASE_URL: &str = "https://backend-test.mercadosimples.tech";
/// User agent string used in HTTP requests to identify this client
pub const USER_AGENT: &str = "msc-client/0.1.0";
/// Default lifetime of a cached access token in seconds
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 6000;
/// Default maximum number of cached access tokens
pub const DEFAULT_TOKEN_CACHE_CAPACITY: usize = 100;
/// Default timeout in seconds for a single HTTP call
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default number of attempts for a retried call (1 = no retry)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
/// Default delay in milliseconds between retried calls
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;
/// Number of decimal places between minor and major currency units
pub const MINOR_UNIT_SCALE: u32 = 2;
/// Minor units per major unit
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;
