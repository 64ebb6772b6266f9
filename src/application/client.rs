/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Client for the MSC API with automatic authentication
//!
//! Every call follows the same path: take a token from the shared
//! [`TokenCache`], convert the body's currency fields to minor units, send it
//! with a bearer token, map the status code and convert the response's
//! currency fields back to major units before deserializing.

use crate::application::auth::HttpTokenIssuer;
use crate::application::config::Config;
use crate::application::endpoints::{ApiNamespace, url};
use crate::application::token_cache::TokenCache;
use crate::error::AppError;
use crate::model::auth::Credential;
use crate::model::http::{HttpRequest, HttpResponse, RequestAuth, ReqwestTransport, Transport};
use crate::model::retry::RetryPolicy;
use crate::model::schema::MoneySchema;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Description of one resource call
#[derive(Debug, Clone)]
pub struct ApiCall {
    /// HTTP method
    pub method: Method,
    /// Path root
    pub namespace: ApiNamespace,
    /// Path below the namespace
    pub path: Option<String>,
    /// Query string parameters
    pub query: Vec<(String, String)>,
    /// Body in domain form (major units)
    pub body: Option<Value>,
    /// Currency layout of the body
    pub request_schema: MoneySchema,
    /// Currency layout of the response
    pub response_schema: MoneySchema,
}

impl ApiCall {
    /// Creates a call without path, query or body
    #[must_use]
    pub fn new(method: Method, namespace: ApiNamespace) -> Self {
        Self {
            method,
            namespace,
            path: None,
            query: Vec::new(),
            body: None,
            request_schema: MoneySchema::NONE,
            response_schema: MoneySchema::NONE,
        }
    }

    /// Sets the path below the namespace
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Adds a query parameter
    #[must_use]
    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    /// Sets the body and its currency layout
    #[must_use]
    pub fn body(mut self, body: Value, schema: MoneySchema) -> Self {
        self.body = Some(body);
        self.request_schema = schema;
        self
    }

    /// Sets the currency layout of the response
    #[must_use]
    pub fn returns(mut self, schema: MoneySchema) -> Self {
        self.response_schema = schema;
        self
    }
}

/// Client for the MSC API
pub struct Client<T: Transport + 'static = ReqwestTransport> {
    config: Arc<Config>,
    transport: Arc<T>,
    tokens: Arc<TokenCache>,
    retry: RetryPolicy,
}

impl Client<ReqwestTransport> {
    /// Creates a client using the default `reqwest` transport
    ///
    /// # Errors
    /// [`AppError::Config`] when the configuration is invalid, or a network
    /// error if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let transport = Arc::new(ReqwestTransport::new(&config.rate_limiter)?);
        Self::with_transport(config, transport)
    }
}

impl<T: Transport + 'static> Client<T> {
    /// Creates a client over `transport` with its own token cache
    pub fn with_transport(config: Config, transport: Arc<T>) -> Result<Self, AppError> {
        config.validate()?;
        let issuer = Arc::new(HttpTokenIssuer::new(&config, transport.clone()));
        let tokens = Arc::new(TokenCache::new(issuer, &config.token_cache));
        Self::with_token_cache(config, transport, tokens)
    }

    /// Creates a client sharing an existing token cache
    ///
    /// Clients built from the same cache never request two tokens for the
    /// same credential while one is valid.
    pub fn with_token_cache(
        config: Config,
        transport: Arc<T>,
        tokens: Arc<TokenCache>,
    ) -> Result<Self, AppError> {
        config.validate()?;
        let retry = RetryPolicy::from(&config.retry);
        Ok(Self {
            config: Arc::new(config),
            transport,
            tokens,
            retry,
        })
    }

    /// Replaces the retry policy
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Configuration of this client
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Token cache of this client
    #[must_use]
    pub fn tokens(&self) -> &Arc<TokenCache> {
        &self.tokens
    }

    /// Performs `call` and deserializes the decoded response into `R`
    ///
    /// # Arguments
    ///
    /// * `credential` - Credential the bearer token is obtained for
    /// * `call` - Method, path, query, body and currency layouts of the call
    ///
    /// # Returns
    ///
    /// The response body with its currency fields in major units, as `R`
    ///
    /// # Errors
    ///
    /// * [`AppError::AuthenticationFailed`] when the token request or the call is rejected
    /// * [`AppError::ServiceUnavailable`] when every attempt ended in a 5xx
    /// * [`AppError::NotFound`], [`AppError::BadRequest`], [`AppError::Billing`]
    ///   or [`AppError::Unexpected`] for the other statuses
    /// * [`AppError::Conversion`] or [`AppError::Deserialization`] when the body
    ///   does not fit the layout or `R`
    ///
    /// # Example
    ///
    /// ```ignore
    /// let call = ApiCall::new(Method::GET, ApiNamespace::Contracts)
    ///     .path("C1")
    ///     .returns(schema::CONTRACT);
    /// let contract: serde_json::Value = client.execute(&credential, call).await?;
    /// ```
    pub async fn execute<R: DeserializeOwned>(
        &self,
        credential: &Credential,
        call: ApiCall,
    ) -> Result<R, AppError> {
        let value = self.execute_value(credential, call).await?;
        serde_json::from_value(value).map_err(|e| AppError::Deserialization(e.to_string()))
    }

    /// Performs `call` and returns the decoded response as JSON
    pub async fn execute_value(
        &self,
        credential: &Credential,
        call: ApiCall,
    ) -> Result<Value, AppError> {
        let token = self.tokens.get_token(credential).await?;

        let target = url(
            &self.config.rest_api.base_url,
            call.namespace,
            call.path.as_deref(),
        );
        let mut request = HttpRequest::new(call.method.clone(), target)
            .header("Accept", "application/json")
            .auth(RequestAuth::Bearer(token))
            .timeout(self.config.timeout());
        request.query = call.query;
        if let Some(body) = call.body {
            request = request.json(call.request_schema.encode(body)?);
        }

        let transport = self.transport.clone();
        let response = self
            .retry
            .run(|| {
                let transport = transport.clone();
                let request = request.clone();
                async move {
                    let response = transport.send(request).await?;
                    if response.status.is_server_error() {
                        return Err(AppError::ServiceUnavailable(response.status));
                    }
                    Ok::<_, AppError>(response)
                }
            })
            .await
            .inspect_err(|e| error!("{} {} failed: {}", request.method, request.url, e))?;

        match self.check_status(credential, &request, response).await? {
            Some(value) => call.response_schema.decode(value),
            None => Ok(Value::Null),
        }
    }

    /// GET `{namespace}/{path}` with `query`
    pub async fn get<R: DeserializeOwned>(
        &self,
        credential: &Credential,
        namespace: ApiNamespace,
        path: Option<&str>,
        query: &[(&str, &str)],
        schema: MoneySchema,
    ) -> Result<R, AppError> {
        let mut call = ApiCall::new(Method::GET, namespace).returns(schema);
        if let Some(path) = path {
            call = call.path(path);
        }
        for (name, value) in query {
            call = call.query(name, value);
        }
        self.execute(credential, call).await
    }

    /// POST `body` to `{namespace}/{path}`
    pub async fn post<R: DeserializeOwned>(
        &self,
        credential: &Credential,
        namespace: ApiNamespace,
        path: Option<&str>,
        body: Value,
        schema: MoneySchema,
    ) -> Result<R, AppError> {
        self.send_body(Method::POST, credential, namespace, path, body, schema)
            .await
    }

    /// PATCH `body` to `{namespace}/{path}`
    pub async fn patch<R: DeserializeOwned>(
        &self,
        credential: &Credential,
        namespace: ApiNamespace,
        path: Option<&str>,
        body: Value,
        schema: MoneySchema,
    ) -> Result<R, AppError> {
        self.send_body(Method::PATCH, credential, namespace, path, body, schema)
            .await
    }

    async fn send_body<R: DeserializeOwned>(
        &self,
        method: Method,
        credential: &Credential,
        namespace: ApiNamespace,
        path: Option<&str>,
        body: Value,
        schema: MoneySchema,
    ) -> Result<R, AppError> {
        let mut call = ApiCall::new(method, namespace)
            .body(body, schema)
            .returns(schema);
        if let Some(path) = path {
            call = call.path(path);
        }
        self.execute(credential, call).await
    }

    /// Maps the status of a resource response
    ///
    /// | Status | Result |
    /// |---|---|
    /// | 200 | decoded body |
    /// | 204 on `GET` | [`AppError::NotFound`] |
    /// | 400 | [`AppError::BadRequest`] |
    /// | 401 | [`AppError::AuthenticationFailed`] |
    /// | 402 | [`AppError::Billing`] |
    /// | other | [`AppError::Unexpected`] |
    ///
    /// 5xx never reaches this point, the retry loop turns it into
    /// [`AppError::ServiceUnavailable`]. A rejected bearer token is dropped
    /// from the cache so the next call authenticates again.
    async fn check_status(
        &self,
        credential: &Credential,
        request: &HttpRequest,
        response: HttpResponse,
    ) -> Result<Option<Value>, AppError> {
        match response.status {
            StatusCode::OK => {
                debug!("{} {} succeeded", request.method, request.url);
                response.json_value().map(Some)
            }
            StatusCode::NO_CONTENT if request.method == Method::GET => {
                info!("{} {} returned no content", request.method, request.url);
                Err(AppError::NotFound)
            }
            StatusCode::BAD_REQUEST => {
                warn!("Bad request to {}: {}", request.url, response.body);
                Err(AppError::BadRequest(response.body))
            }
            StatusCode::UNAUTHORIZED => {
                warn!("Bearer token rejected by {}, dropping cached token", request.url);
                self.tokens.invalidate(credential).await;
                Err(AppError::AuthenticationFailed)
            }
            StatusCode::PAYMENT_REQUIRED => {
                warn!("Billing blocked {} {}: {}", request.method, request.url, response.body);
                Err(AppError::Billing(response.body))
            }
            status => {
                error!("Unexpected status {} from {}: {}", status, request.url, response.body);
                Err(AppError::Unexpected {
                    status,
                    body: response.body,
                })
            }
        }
    }
}

impl<T: Transport + 'static> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.config.rest_api.base_url)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
