//! HTTP transport abstraction.
//!
//! The client builds an [`ApiRequest`] for every operation and hands it to a
//! [`Transport`]. The default transport is [`ReqwestTransport`]; tests and
//! embedders can supply their own implementation through
//! [`DiscordClientBuilder::build_with_transport`](crate::client::DiscordClientBuilder::build_with_transport).

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::BotToken;
use crate::client::ClientConfig;
use crate::error::ApiError;

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;

/// A single outbound request.
#[derive(Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute request URL
    pub url: String,
    /// Value of the `Authorization` header, if any
    pub authorization: Option<String>,
    /// JSON body, if any
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// Create a request without authorization or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            authorization: None,
            body: None,
        }
    }

    /// Authenticate the request as the bot.
    pub fn bot_auth(mut self, token: &BotToken) -> Self {
        self.authorization = Some(token.authorization_header());
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Json` if the body cannot be serialized.
    pub fn json(mut self, body: &impl Serialize) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

// Security: the Authorization header and webhook URLs carry secrets
impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("url", &"<REDACTED>")
            .field(
                "authorization",
                &self.authorization.as_ref().map(|_| "<REDACTED>"),
            )
            .field("body", &self.body)
            .finish()
    }
}

/// Status and body of a completed request.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Bytes,
}

impl ApiResponse {
    /// Create a response from its parts.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Json` if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Executes requests against the remote service.
///
/// One call, one HTTP exchange: implementations must not retry. Any status
/// code is a successful execution; only failures to complete the exchange are
/// errors.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use discord_webhook_sdk::client::{
///     ApiOutcome, ApiRequest, ApiResponse, DiscordClient, MessageId, Transport,
/// };
/// use discord_webhook_sdk::{ApiError, Credentials};
///
/// struct AlwaysNoContent;
///
/// #[async_trait]
/// impl Transport for AlwaysNoContent {
///     async fn execute(&self, _request: ApiRequest) -> Result<ApiResponse, ApiError> {
///         Ok(ApiResponse::new(204, Vec::new()))
///     }
/// }
///
/// let client = DiscordClient::builder(Credentials::new("token", "42"))
///     .build_with_transport(AlwaysNoContent)
///     .unwrap();
///
/// # tokio_test::block_on(async {
/// let outcome = client.pin_message(&MessageId::new("7")).await.unwrap();
/// assert_eq!(outcome, ApiOutcome::Success(204));
/// # });
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and wait for the complete response.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Transport backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport honouring the configured timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Configuration` if the HTTP client cannot be created.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ApiError::Configuration {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut builder = self.client.request(request.method, &request.url);

        if let Some(authorization) = &request.authorization {
            builder = builder.header(reqwest::header::AUTHORIZATION, authorization);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(ApiResponse { status, body })
    }
}
