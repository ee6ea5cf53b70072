//! Discord API client for webhook and channel message operations.
//!
//! This module provides the main `DiscordClient`. Every operation maps onto
//! exactly one REST call; bot-scoped endpoints authenticate with the bot
//! token, webhook-scoped endpoints rely on the secret embedded in the webhook
//! URL instead.

mod message;
mod outcome;
mod pin;
mod transport;
mod webhook;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::Method;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{ChannelId, Credentials};
use crate::error::{ApiError, ValidationError};

pub use message::{EditMessageRequest, Embed, EmbedImage, Message, MessageId, SendMessageRequest};
pub use outcome::{ApiOutcome, Precondition};
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
pub use webhook::{
    CreateWebhookRequest, UpdateWebhookRequest, Webhook, WebhookId, WebhookRef, WebhookSummary,
};

/// Default Discord REST API base.
pub const DEFAULT_API_BASE_URL: &str = "https://discord.com/api/v9";

/// Configuration for Discord API client behavior.
///
/// # Examples
///
/// ```
/// use discord_webhook_sdk::client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(10))
///     .with_user_agent("my-bot/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User agent string for API requests
    pub user_agent: String,
    /// Request timeout duration
    pub timeout: Duration,
    /// Discord API base URL
    pub api_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("discord-webhook-sdk/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new builder for client configuration.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the Discord API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Builder for constructing `ClientConfig` instances.
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new configuration builder with defaults.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the Discord API base URL.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Discord API client bound to one channel.
///
/// Holds the bot credentials, the target channel and an optional active
/// webhook. The active webhook sits behind a lock; each operation reads it
/// once, so a concurrent `set_active_webhook` never splits a single call
/// across two webhooks. Share the client between tasks with an `Arc`.
///
/// # Examples
///
/// ```no_run
/// # use discord_webhook_sdk::auth::Credentials;
/// # use discord_webhook_sdk::client::{ApiOutcome, DiscordClient};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = DiscordClient::builder(Credentials::new("bot-token", "1234567890")).build()?;
///
/// if let ApiOutcome::Success(url) = client.create_webhook("announcements").await? {
///     println!("Created webhook {}", url);
/// }
///
/// let sent = client.send_message("Hello!", None).await?;
/// println!("{:?}", sent);
///
/// client.close();
/// # Ok(())
/// # }
/// ```
pub struct DiscordClient<T: Transport = ReqwestTransport> {
    transport: T,
    credentials: Credentials,
    config: ClientConfig,
    active_webhook: RwLock<Option<WebhookRef>>,
}

impl DiscordClient {
    /// Create a new builder for constructing a Discord client.
    ///
    /// # Arguments
    ///
    /// * `credentials` - Bot token and target channel
    pub fn builder(credentials: Credentials) -> DiscordClientBuilder {
        DiscordClientBuilder::new(credentials)
    }
}

impl<T: Transport> DiscordClient<T> {
    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the channel this client operates on.
    pub fn channel_id(&self) -> &ChannelId {
        &self.credentials.channel_id
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ========================================================================
    // Active Webhook State
    // ========================================================================

    /// Use the given webhook for subsequent webhook-scoped operations.
    ///
    /// The webhook id is taken from the second-to-last `/` segment of the URL.
    /// No network call is made.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidFormat` if the URL has no id segment.
    pub fn set_active_webhook(&self, url: &str) -> Result<WebhookRef, ValidationError> {
        let webhook = WebhookRef::parse(url)?;
        self.replace_active_webhook(Some(webhook.clone()));
        debug!(webhook_id = %webhook.id(), "Active webhook set");
        Ok(webhook)
    }

    /// Snapshot of the active webhook, if one is set.
    pub fn active_webhook(&self) -> Option<WebhookRef> {
        self.active_webhook
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forget the active webhook. Returns the previous value.
    pub fn clear_active_webhook(&self) -> Option<WebhookRef> {
        self.replace_active_webhook(None)
    }

    /// Release the transport.
    ///
    /// Consumes the client; pooled connections are closed once the last
    /// handle to the transport is gone.
    pub fn close(self) {
        debug!(channel_id = %self.credentials.channel_id, "Closing Discord client");
    }

    fn replace_active_webhook(&self, webhook: Option<WebhookRef>) -> Option<WebhookRef> {
        let mut guard = self
            .active_webhook
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, webhook)
    }

    /// Clear the active webhook only if it is still `expected`.
    fn clear_active_webhook_if(&self, expected: &WebhookRef) -> bool {
        let mut guard = self
            .active_webhook
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if guard.as_ref() == Some(expected) {
            *guard = None;
            true
        } else {
            false
        }
    }

    /// Active webhook for an operation that cannot run without one.
    fn require_active_webhook(&self, operation: &'static str) -> Option<WebhookRef> {
        let webhook = self.active_webhook();
        if webhook.is_none() {
            warn!(
                operation,
                "Webhook URL or ID is not set; use set_active_webhook or create_webhook first"
            );
        }
        webhook
    }

    // ========================================================================
    // Request Helpers
    // ========================================================================

    /// Build an absolute API URL from path segments relative to the base URL.
    fn api_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.config.api_base_url)?;
        push_path_segments(&mut url, segments)?;
        Ok(url)
    }

    /// Build a bot-authenticated request against the API base.
    fn bot_request(&self, method: Method, segments: &[&str]) -> Result<ApiRequest, ApiError> {
        let url = self.api_url(segments)?;
        Ok(ApiRequest::new(method, url.as_str()).bot_auth(&self.credentials.token))
    }

    /// Execute a request. `route` is what gets logged and must not contain
    /// webhook tokens.
    async fn execute(
        &self,
        operation: &'static str,
        route: &str,
        request: ApiRequest,
    ) -> Result<ApiResponse, ApiError> {
        let method = request.method.clone();
        let response = self.transport.execute(request).await?;

        debug!(
            operation,
            method = %method,
            path = route,
            status = response.status,
            "Discord API request completed"
        );

        Ok(response)
    }
}

/// Append `segments` to the path of `url`, percent-encoding each one.
///
/// A segment can never add or remove path components: `/`, `?` and `%` are
/// escaped, and empty or dot segments are rejected.
fn push_path_segments(url: &mut Url, segments: &[&str]) -> Result<(), ApiError> {
    if let Some(segment) = segments
        .iter()
        .find(|segment| matches!(**segment, "" | "." | ".."))
    {
        return Err(ValidationError::InvalidFormat {
            field: "path".to_string(),
            message: format!("invalid path segment {:?}", segment),
        }
        .into());
    }

    url.path_segments_mut()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "url".to_string(),
            message: "URL cannot carry a path".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(())
}

impl<T: Transport> std::fmt::Debug for DiscordClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordClient")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .field("active_webhook", &self.active_webhook())
            .finish()
    }
}

/// Builder for constructing `DiscordClient` instances.
pub struct DiscordClientBuilder {
    credentials: Credentials,
    config: Option<ClientConfig>,
    webhook_url: Option<String>,
}

impl DiscordClientBuilder {
    /// Create a new client builder.
    fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            config: None,
            webhook_url: None,
        }
    }

    /// Set the client configuration.
    ///
    /// If not set, uses `ClientConfig::default()`.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Start with the given webhook already active.
    pub fn webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }

    /// Build the client with the default reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for incomplete credentials or a malformed
    /// webhook URL, and `ApiError::Configuration` if the HTTP client cannot be
    /// created.
    pub fn build(self) -> Result<DiscordClient, ApiError> {
        let config = self.config.clone().unwrap_or_default();
        let transport = ReqwestTransport::from_config(&config)?;
        self.config(config).build_with_transport(transport)
    }

    /// Build the client on top of a custom transport.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for incomplete credentials or a malformed
    /// webhook URL.
    pub fn build_with_transport<T: Transport>(
        self,
        transport: T,
    ) -> Result<DiscordClient<T>, ApiError> {
        self.credentials.validate()?;

        let active_webhook = self
            .webhook_url
            .as_deref()
            .map(WebhookRef::parse)
            .transpose()?;

        Ok(DiscordClient {
            transport,
            credentials: self.credentials,
            config: self.config.unwrap_or_default(),
            active_webhook: RwLock::new(active_webhook),
        })
    }
}

impl std::fmt::Debug for DiscordClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordClientBuilder")
            .field("credentials", &self.credentials)
            .field("config", &self.config)
            .field("webhook_url", &self.webhook_url.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
