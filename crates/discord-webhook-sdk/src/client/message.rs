// Message operations: send, edit and delete through the active webhook,
// fetch through the bot.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::auth::ChannelId;
use crate::client::{
    push_path_segments, ApiOutcome, ApiRequest, DiscordClient, Precondition, Transport,
    WebhookId, WebhookRef,
};
use crate::error::{ApiError, ValidationError};

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;

/// Discord message identifier (snowflake).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Create a new message ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for MessageId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Required {
                field: "message_id".to_string(),
            });
        }
        Ok(Self::new(trimmed))
    }
}

/// Channel message.
///
/// Only `id` is guaranteed; everything else defaults when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier
    pub id: MessageId,

    /// Channel the message was posted in
    #[serde(default)]
    pub channel_id: Option<ChannelId>,

    /// Message text
    #[serde(default)]
    pub content: String,

    /// Webhook that posted the message, if any
    #[serde(default)]
    pub webhook_id: Option<WebhookId>,

    /// Whether the message is pinned
    #[serde(default)]
    pub pinned: bool,

    /// Rich embeds
    #[serde(default)]
    pub embeds: Vec<Embed>,

    /// Creation timestamp
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,

    /// Last edit timestamp
    #[serde(default)]
    pub edited_timestamp: Option<DateTime<Utc>>,
}

/// Rich embed attached to a message. Only the image part is modelled.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Embed {
    /// Embedded image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,
}

/// Image inside an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedImage {
    /// Image source URL
    pub url: String,
}

/// Body of a webhook execute request.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    /// Message text (required)
    pub content: String,

    /// Embeds; omitted from the payload when empty
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

impl SendMessageRequest {
    /// Text message, optionally with a single image embed.
    pub fn new(content: impl Into<String>, image_url: Option<&str>) -> Self {
        let embeds = image_url
            .map(|url| {
                vec![Embed {
                    image: Some(EmbedImage {
                        url: url.to_string(),
                    }),
                }]
            })
            .unwrap_or_default();

        Self {
            content: content.into(),
            embeds,
        }
    }
}

/// Body of a webhook message edit.
#[derive(Debug, Clone, Serialize)]
pub struct EditMessageRequest {
    /// Replacement text
    pub content: String,
}

impl<T: Transport> DiscordClient<T> {
    /// Post a message through the active webhook.
    ///
    /// `POST {webhook_url}?wait=true`
    ///
    /// Returns the new message's id on HTTP 200. The request carries no bot
    /// authorization; the webhook URL is the credential.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, an unparseable webhook URL, or
    /// an undecodable response.
    pub async fn send_message(
        &self,
        content: &str,
        image_url: Option<&str>,
    ) -> Result<ApiOutcome<MessageId>, ApiError> {
        let Some(webhook) = self.require_active_webhook("send_message") else {
            return Ok(ApiOutcome::Precondition(Precondition::NoActiveWebhook));
        };

        let mut url = Url::parse(webhook.url())?;
        url.query_pairs_mut().append_pair("wait", "true");

        let request = ApiRequest::new(Method::POST, url.as_str())
            .json(&SendMessageRequest::new(content, image_url))?;

        let response = self.execute("send_message", "<webhook>", request).await?;
        if response.status != 200 {
            return Ok(ApiOutcome::Failure(response.status));
        }

        let message: Message = response.json()?;
        Ok(ApiOutcome::Success(message.id))
    }

    /// Replace the content of a message posted by the active webhook.
    ///
    /// `PATCH {webhook_url}/messages/{message_id}`
    ///
    /// Returns the raw status code.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, an unparseable webhook URL, or
    /// an invalid message id.
    pub async fn edit_message(
        &self,
        message_id: &MessageId,
        content: &str,
    ) -> Result<ApiOutcome<u16>, ApiError> {
        let Some(webhook) = self.require_active_webhook("edit_message") else {
            return Ok(ApiOutcome::Precondition(Precondition::NoActiveWebhook));
        };

        let url = webhook_message_url(&webhook, message_id)?;
        let request = ApiRequest::new(Method::PATCH, url.as_str()).json(&EditMessageRequest {
            content: content.to_string(),
        })?;

        let route = format!("<webhook>/messages/{}", message_id);
        let response = self.execute("edit_message", &route, request).await?;
        Ok(ApiOutcome::from_status(response.status))
    }

    /// Delete a message posted by the active webhook.
    ///
    /// `DELETE {webhook_url}/messages/{message_id}`
    ///
    /// Returns the raw status code.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, an unparseable webhook URL, or
    /// an invalid message id.
    pub async fn delete_message(
        &self,
        message_id: &MessageId,
    ) -> Result<ApiOutcome<u16>, ApiError> {
        let Some(webhook) = self.require_active_webhook("delete_message") else {
            return Ok(ApiOutcome::Precondition(Precondition::NoActiveWebhook));
        };

        let url = webhook_message_url(&webhook, message_id)?;
        let request = ApiRequest::new(Method::DELETE, url.as_str());

        let route = format!("<webhook>/messages/{}", message_id);
        let response = self.execute("delete_message", &route, request).await?;
        Ok(ApiOutcome::from_status(response.status))
    }

    /// Fetch a message from the client's channel.
    ///
    /// `GET /channels/{channel_id}/messages/{message_id}`, bot authenticated,
    /// so it works for any message in the channel.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, an invalid message id, or an
    /// undecodable response.
    pub async fn get_message(
        &self,
        message_id: &MessageId,
    ) -> Result<ApiOutcome<Message>, ApiError> {
        let segments = [
            "channels",
            self.channel_id().as_str(),
            "messages",
            message_id.as_str(),
        ];
        let request = self.bot_request(Method::GET, &segments)?;

        let response = self
            .execute("get_message", &segments.join("/"), request)
            .await?;
        if response.status != 200 {
            return Ok(ApiOutcome::Failure(response.status));
        }

        Ok(ApiOutcome::Success(response.json()?))
    }
}

/// `{webhook_url}/messages/{message_id}`, keeping any query on the webhook URL.
fn webhook_message_url(webhook: &WebhookRef, message_id: &MessageId) -> Result<Url, ApiError> {
    let mut url = Url::parse(webhook.url())?;
    push_path_segments(&mut url, &["messages", message_id.as_str()])?;
    Ok(url)
}
