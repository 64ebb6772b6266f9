/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Token issuance
//!
//! [`HttpTokenIssuer`] performs the network half of authentication: a POST to
//! `{base_url}/authenticate/token` with the API user and password as basic
//! auth credentials. Caching lives in [`crate::application::token_cache`].

use crate::application::config::Config;
use crate::application::endpoints::{ApiNamespace, url};
use crate::error::AppError;
use crate::model::auth::{AccessToken, Credential, TokenResponse};
use crate::model::http::{HttpRequest, HttpResponse, RequestAuth, Transport};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Issues access tokens for credentials
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Performs one token request
    async fn issue(&self, credential: &Credential) -> Result<AccessToken, AppError>;
}

/// [`TokenIssuer`] calling the authentication endpoint through a [`Transport`]
pub struct HttpTokenIssuer<T: Transport> {
    transport: Arc<T>,
    token_url: String,
    timeout: Duration,
}

impl<T: Transport> HttpTokenIssuer<T> {
    /// Creates an issuer for the base URL of `config`
    pub fn new(config: &Config, transport: Arc<T>) -> Self {
        Self {
            transport,
            token_url: url(&config.rest_api.base_url, ApiNamespace::Authenticate, Some("token")),
            timeout: config.timeout(),
        }
    }

    /// URL the issuer posts to
    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.token_url
    }
}

#[async_trait]
impl<T: Transport + 'static> TokenIssuer for HttpTokenIssuer<T> {
    async fn issue(&self, credential: &Credential) -> Result<AccessToken, AppError> {
        debug!("Sending token request to: {}", self.token_url);

        let request = HttpRequest::new(Method::POST, self.token_url.as_str())
            .auth(RequestAuth::Basic {
                username: credential.api_user.clone(),
                password: credential.api_pass.clone(),
            })
            .timeout(self.timeout);

        let response = self.transport.send(request).await?;
        parse_token_response(response)
    }
}

/// Maps the token endpoint's response to a token or an error
///
/// | Status | Result |
/// |---|---|
/// | 200 | token from `access_token` |
/// | 401 | [`AppError::AuthenticationFailed`] |
/// | 5xx | [`AppError::ServiceUnavailable`] |
/// | other | [`AppError::Unexpected`] |
pub fn parse_token_response(response: HttpResponse) -> Result<AccessToken, AppError> {
    match response.status {
        StatusCode::OK => {
            let body: TokenResponse = response.json()?;
            if body.access_token.trim().is_empty() {
                error!("Token endpoint returned an empty access token");
                return Err(AppError::Unexpected {
                    status: response.status,
                    body: "empty access_token".to_string(),
                });
            }
            Ok(AccessToken::new(body.access_token))
        }
        StatusCode::UNAUTHORIZED => {
            error!("Token request rejected: wrong credentials");
            Err(AppError::AuthenticationFailed)
        }
        status if status.is_server_error() => {
            error!("Token request failed with server error {}", status);
            Err(AppError::ServiceUnavailable(status))
        }
        status => {
            error!("Token request failed with status {}: {}", status, response.body);
            Err(AppError::Unexpected {
                status,
                body: response.body,
            })
        }
    }
}
