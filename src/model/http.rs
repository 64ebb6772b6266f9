/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! HTTP transport seam
//!
//! Everything above this module talks to the network through the
//! [`Transport`] trait. [`ReqwestTransport`] is the default implementation;
//! tests plug in their own.

use crate::application::config::RateLimiterConfig;
use crate::application::rate_limiter::RateLimiter;
use crate::constants::USER_AGENT;
use crate::error::AppError;
use crate::model::auth::Secret;
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error};

/// Authorization attached to a request
#[derive(Clone)]
pub enum RequestAuth {
    /// HTTP basic authentication, used to obtain tokens
    Basic {
        /// API user
        username: Secret,
        /// API password
        password: Secret,
    },
    /// `Authorization: Bearer <token>`
    Bearer(Secret),
}

impl fmt::Debug for RequestAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestAuth::Basic { .. } => write!(f, "Basic(****)"),
            RequestAuth::Bearer(_) => write!(f, "Bearer(****)"),
        }
    }
}

/// A request handed to a [`Transport`]
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Extra headers
    pub headers: Vec<(String, String)>,
    /// Query string parameters
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
    /// Authorization
    pub auth: Option<RequestAuth>,
    /// Timeout of this single call
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Creates a request without headers, query, body or auth
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
            auth: None,
            timeout: None,
        }
    }

    /// Adds a header
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Adds a query parameter
    #[must_use]
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    /// Sets the JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the authorization
    #[must_use]
    pub fn auth(mut self, auth: RequestAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets the timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// What a [`Transport`] returns for any completed exchange, successful or not
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// Status code
    pub status: StatusCode,
    /// Raw body
    pub body: String,
}

impl HttpResponse {
    /// Creates a response
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Parses the body as JSON, an empty body reads as `null`
    pub fn json_value(&self) -> Result<Value, AppError> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Parses the body into `T`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Sends requests and returns status and body
///
/// Implementations return `Ok` for every response the server produced,
/// whatever its status; status interpretation belongs to the caller. `Err`
/// is reserved for failures to complete the exchange: network errors and
/// [`AppError::Timeout`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one HTTP exchange
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AppError>;
}

/// [`Transport`] backed by `reqwest` with client side rate limiting
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    rate_limiter: RateLimiter,
}

impl ReqwestTransport {
    /// Creates a transport
    pub fn new(rate_limiter: &RateLimiterConfig) -> Result<Self, AppError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(client, rate_limiter))
    }

    /// Creates a transport reusing an existing `reqwest` client
    #[must_use]
    pub fn with_client(client: Client, rate_limiter: &RateLimiterConfig) -> Self {
        Self {
            client,
            rate_limiter: RateLimiter::new(rate_limiter),
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AppError> {
        self.rate_limiter.wait().await;

        debug!("{} {}", request.method, request.url);

        let mut builder = self.client.request(request.method.clone(), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder = match &request.auth {
            Some(RequestAuth::Basic { username, password }) => {
                builder.basic_auth(username.expose(), Some(password.expose()))
            }
            Some(RequestAuth::Bearer(token)) => builder.bearer_auth(token.expose()),
            None => builder,
        };
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        debug!("Response status: {}", status);

        if status.is_server_error() {
            error!("{} {} failed with status {}", request.method, request.url, status);
        }

        Ok(HttpResponse { status, body })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::Timeout
    } else {
        AppError::Network(e)
    }
}
