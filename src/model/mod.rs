/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/
/// Credentials, secrets and token payloads
pub mod auth;
/// HTTP request and response types and the transport abstraction
pub mod http;
/// Minor/major currency unit conversion
pub mod money;
/// Retry policy for HTTP requests
pub mod retry;
/// Currency field layouts of the API resources
pub mod schema;
