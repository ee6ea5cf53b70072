//! Blocking facade over [`DiscordClient`].
//!
//! Every method drives the corresponding async operation to completion on a
//! private current-thread runtime, so results and state are identical to the
//! async client. Do not call these methods from inside an async runtime; use
//! [`DiscordClient`] there instead.

use std::time::Duration;

use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::auth::{ChannelId, Credentials};
use crate::client::{
    ApiOutcome, ClientConfig, DiscordClient, Message, MessageId, ReqwestTransport, Transport,
    Webhook, WebhookRef, WebhookSummary,
};
use crate::error::{ApiError, ValidationError};

#[cfg(test)]
#[path = "blocking_tests.rs"]
mod tests;

/// Grace period for in-flight I/O when the facade shuts down.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Synchronous Discord client.
///
/// # Examples
///
/// ```no_run
/// use discord_webhook_sdk::auth::Credentials;
/// use discord_webhook_sdk::blocking::BlockingClient;
/// use discord_webhook_sdk::client::ClientConfig;
///
/// # fn example() -> Result<(), discord_webhook_sdk::ApiError> {
/// let client = BlockingClient::new(
///     Credentials::new("bot-token", "1234567890"),
///     ClientConfig::default(),
/// )?;
///
/// client.set_active_webhook("https://discord.com/api/webhooks/123/abc")?;
/// let sent = client.send_message("Hello from a plain thread", None)?;
/// println!("{:?}", sent);
///
/// client.close();
/// # Ok(())
/// # }
/// ```
pub struct BlockingClient<T: Transport = ReqwestTransport> {
    inner: DiscordClient<T>,
    runtime: Runtime,
}

impl BlockingClient {
    /// Create a blocking client with the default reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for incomplete credentials and
    /// `ApiError::Configuration` if the HTTP client or runtime cannot start.
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self, ApiError> {
        let inner = DiscordClient::builder(credentials).config(config).build()?;
        Self::from_client(inner)
    }
}

impl<T: Transport> BlockingClient<T> {
    /// Wrap an existing async client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Configuration` if the runtime cannot start.
    pub fn from_client(inner: DiscordClient<T>) -> Result<Self, ApiError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ApiError::Configuration {
                message: format!("Failed to start blocking runtime: {}", e),
            })?;

        Ok(Self { inner, runtime })
    }

    /// Borrow the wrapped async client.
    pub fn client(&self) -> &DiscordClient<T> {
        &self.inner
    }

    /// Get the channel this client operates on.
    pub fn channel_id(&self) -> &ChannelId {
        self.inner.channel_id()
    }

    /// See [`DiscordClient::set_active_webhook`].
    pub fn set_active_webhook(&self, url: &str) -> Result<WebhookRef, ValidationError> {
        self.inner.set_active_webhook(url)
    }

    /// See [`DiscordClient::active_webhook`].
    pub fn active_webhook(&self) -> Option<WebhookRef> {
        self.inner.active_webhook()
    }

    /// See [`DiscordClient::clear_active_webhook`].
    pub fn clear_active_webhook(&self) -> Option<WebhookRef> {
        self.inner.clear_active_webhook()
    }

    /// See [`DiscordClient::create_webhook`].
    pub fn create_webhook(&self, name: &str) -> Result<ApiOutcome<String>, ApiError> {
        self.runtime.block_on(self.inner.create_webhook(name))
    }

    /// See [`DiscordClient::get_webhook_info`].
    pub fn get_webhook_info(&self, url: Option<&str>) -> Result<ApiOutcome<Webhook>, ApiError> {
        self.runtime.block_on(self.inner.get_webhook_info(url))
    }

    /// See [`DiscordClient::list_webhooks`].
    pub fn list_webhooks(&self) -> Result<ApiOutcome<Vec<WebhookSummary>>, ApiError> {
        self.runtime.block_on(self.inner.list_webhooks())
    }

    /// See [`DiscordClient::update_webhook`].
    pub fn update_webhook(
        &self,
        name: &str,
        url: Option<&str>,
    ) -> Result<ApiOutcome<u16>, ApiError> {
        self.runtime.block_on(self.inner.update_webhook(name, url))
    }

    /// See [`DiscordClient::delete_webhook`].
    pub fn delete_webhook(&self, url: Option<&str>) -> Result<ApiOutcome<u16>, ApiError> {
        self.runtime.block_on(self.inner.delete_webhook(url))
    }

    /// See [`DiscordClient::send_message`].
    pub fn send_message(
        &self,
        content: &str,
        image_url: Option<&str>,
    ) -> Result<ApiOutcome<MessageId>, ApiError> {
        self.runtime
            .block_on(self.inner.send_message(content, image_url))
    }

    /// See [`DiscordClient::edit_message`].
    pub fn edit_message(
        &self,
        message_id: &MessageId,
        content: &str,
    ) -> Result<ApiOutcome<u16>, ApiError> {
        self.runtime
            .block_on(self.inner.edit_message(message_id, content))
    }

    /// See [`DiscordClient::delete_message`].
    pub fn delete_message(&self, message_id: &MessageId) -> Result<ApiOutcome<u16>, ApiError> {
        self.runtime.block_on(self.inner.delete_message(message_id))
    }

    /// See [`DiscordClient::get_message`].
    pub fn get_message(&self, message_id: &MessageId) -> Result<ApiOutcome<Message>, ApiError> {
        self.runtime.block_on(self.inner.get_message(message_id))
    }

    /// See [`DiscordClient::get_pinned_messages`].
    pub fn get_pinned_messages(&self) -> Result<ApiOutcome<Vec<MessageId>>, ApiError> {
        self.runtime.block_on(self.inner.get_pinned_messages())
    }

    /// See [`DiscordClient::pin_message`].
    pub fn pin_message(&self, message_id: &MessageId) -> Result<ApiOutcome<u16>, ApiError> {
        self.runtime.block_on(self.inner.pin_message(message_id))
    }

    /// See [`DiscordClient::unpin_message`].
    pub fn unpin_message(&self, message_id: &MessageId) -> Result<ApiOutcome<u16>, ApiError> {
        self.runtime.block_on(self.inner.unpin_message(message_id))
    }

    /// Release the client and stop the private runtime.
    pub fn close(self) {
        let Self { inner, runtime } = self;
        inner.close();
        runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
        debug!("Blocking Discord client closed");
    }
}

impl<T: Transport> std::fmt::Debug for BlockingClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingClient")
            .field("inner", &self.inner)
            .finish()
    }
}
