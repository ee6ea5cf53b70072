//! # Discord Webhook SDK
//!
//! Client for managing Discord channel webhooks and the messages they post.
//!
//! This SDK provides:
//! - Webhook lifecycle management (create, inspect, list, rename, delete)
//! - Message sending, editing and deletion through an active webhook
//! - Channel message retrieval and pin management with a bot token
//! - An async client and a blocking facade with identical semantics
//!
//! Every operation returns an [`ApiOutcome`]: the decoded payload on success,
//! the HTTP status on a remote rejection, or a precondition when no request
//! was sent. Transport and decoding faults surface as [`ApiError`].
//!
//! # Examples
//!
//! ## Async client
//!
//! ```rust,no_run
//! use discord_webhook_sdk::{ApiOutcome, Credentials, DiscordClient};
//!
//! # async fn example() -> Result<(), discord_webhook_sdk::ApiError> {
//! let client = DiscordClient::builder(Credentials::new("bot-token", "1234567890")).build()?;
//!
//! client.create_webhook("release-notes").await?;
//! if let ApiOutcome::Success(id) = client.send_message("v1.2 is out", None).await? {
//!     client.pin_message(&id).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Blocking client
//!
//! ```rust,no_run
//! use discord_webhook_sdk::blocking::BlockingClient;
//! use discord_webhook_sdk::{ClientConfig, Credentials};
//!
//! # fn example() -> Result<(), discord_webhook_sdk::ApiError> {
//! let client = BlockingClient::new(
//!     Credentials::new("bot-token", "1234567890"),
//!     ClientConfig::default(),
//! )?;
//!
//! for webhook in client.list_webhooks()?.success().unwrap_or_default() {
//!     println!("{}: {}", webhook.name, webhook.url);
//! }
//! # Ok(())
//! # }
//! ```

// Public modules
pub mod auth;
pub mod blocking;
pub mod client;
pub mod error;

// Re-export commonly used types at crate root for convenience
pub use error::{ApiError, ValidationError};

pub use auth::{BotToken, ChannelId, Credentials};

pub use client::{
    ApiOutcome, ClientConfig, DiscordClient, Message, MessageId, Precondition, ReqwestTransport,
    Transport, Webhook, WebhookId, WebhookRef, WebhookSummary, DEFAULT_API_BASE_URL,
};
