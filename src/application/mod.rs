/// Token issuance against the authentication endpoint
pub mod auth;
/// API client
pub mod client;
/// Application configuration module
pub mod config;
/// Endpoint paths
pub mod endpoints;
/// Rate limiter module for API request throttling
pub mod rate_limiter;
/// Bounded, TTL based cache of access tokens
pub mod token_cache;
