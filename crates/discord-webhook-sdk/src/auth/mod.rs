//! Bot credentials and channel identity.
//!
//! This module provides the values a client is constructed from:
//! - `BotToken`, the secret used for bot-scoped endpoints
//! - `ChannelId`, the channel all channel-scoped operations target
//! - `Credentials`, the pair of the two as read from configuration

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::ValidationError;

// ============================================================================
// Core ID Types
// ============================================================================

/// Discord channel identifier (a snowflake, kept as an opaque string).
///
/// # Examples
///
/// ```
/// use discord_webhook_sdk::auth::ChannelId;
///
/// let channel = ChannelId::new("1122334455");
/// assert_eq!(channel.as_str(), "1122334455");
/// assert_eq!(channel.to_string(), "1122334455");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    /// Create a new channel ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChannelId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Required {
                field: "channel_id".to_string(),
            });
        }
        Ok(Self::new(trimmed))
    }
}

// ============================================================================
// Token Types
// ============================================================================

/// Bot token used in the `Authorization: Bot <token>` header.
///
/// The token is wiped from memory on drop and never shows up in `Debug`
/// output.
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct BotToken(String);

impl BotToken {
    /// Wrap a raw bot token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the raw token (only for immediate use).
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header of bot-scoped requests.
    pub fn authorization_header(&self) -> String {
        format!("Bot {}", self.0)
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

// Security: Don't expose the token in debug output
impl std::fmt::Debug for BotToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BotToken").field(&"<REDACTED>").finish()
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Credentials a client is constructed from.
///
/// Recognized configuration fields are `token` and `channel_id` (`channelId`
/// is accepted as an alias).
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// Bot token for bot-scoped endpoints
    pub token: BotToken,

    /// Channel that webhooks, messages and pins live in
    #[serde(alias = "channelId")]
    pub channel_id: ChannelId,
}

impl Credentials {
    /// Create credentials from a token and channel.
    pub fn new(token: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            token: BotToken::new(token),
            channel_id: ChannelId::new(channel_id),
        }
    }

    /// Check that both fields are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.token.is_empty() {
            return Err(ValidationError::Required {
                field: "token".to_string(),
            });
        }
        if self.channel_id.as_str().trim().is_empty() {
            return Err(ValidationError::Required {
                field: "channel_id".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
