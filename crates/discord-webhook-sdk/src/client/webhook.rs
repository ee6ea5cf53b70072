// Webhook lifecycle operations: create, fetch, list, update, delete

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::ChannelId;
use crate::client::{ApiOutcome, DiscordClient, Precondition, Transport};
use crate::error::{ApiError, ValidationError};

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;

/// Discord webhook identifier (snowflake).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WebhookId(String);

impl WebhookId {
    /// Create a new webhook ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WebhookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a webhook: its execute URL and the id derived from it.
///
/// Webhook URLs have the shape `.../webhooks/{id}/{token}`.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookRef {
    url: String,
    id: WebhookId,
}

impl WebhookRef {
    /// Parse a webhook URL, taking the id from its second-to-last `/` segment.
    ///
    /// The split is literal: with a trailing slash the token segment is taken
    /// as the id.
    ///
    /// # Examples
    ///
    /// ```
    /// use discord_webhook_sdk::client::WebhookRef;
    ///
    /// let webhook = WebhookRef::parse("https://discord.com/api/webhooks/123/abc").unwrap();
    /// assert_eq!(webhook.id().as_str(), "123");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidFormat` when there is no non-empty
    /// second-to-last segment.
    pub fn parse(url: impl Into<String>) -> Result<Self, ValidationError> {
        let url = url.into();
        let segments: Vec<&str> = url.split('/').collect();

        let id = match segments.len() {
            n if n >= 2 => segments[n - 2],
            _ => "",
        };
        if id.is_empty() {
            return Err(ValidationError::InvalidFormat {
                field: "webhook_url".to_string(),
                message: "expected a URL ending in /{webhook_id}/{webhook_token}".to_string(),
            });
        }

        let id = WebhookId::new(id);
        Ok(Self { url, id })
    }

    /// Build a reference from a known URL and id without parsing.
    pub fn from_parts(url: impl Into<String>, id: WebhookId) -> Self {
        Self {
            url: url.into(),
            id,
        }
    }

    /// Webhook execute URL (contains the webhook token).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Webhook id.
    pub fn id(&self) -> &WebhookId {
        &self.id
    }
}

// Security: the URL embeds the webhook token
impl std::fmt::Debug for WebhookRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookRef")
            .field("id", &self.id)
            .field("url", &"<REDACTED>")
            .finish()
    }
}

/// Webhook descriptor as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    /// Webhook identifier
    pub id: WebhookId,

    /// Display name
    pub name: Option<String>,

    /// Execute URL (only present for incoming webhooks)
    pub url: Option<String>,

    /// Channel the webhook posts into
    pub channel_id: Option<ChannelId>,

    /// Webhook type (1 = incoming, 2 = channel follower, 3 = application)
    #[serde(rename = "type")]
    pub webhook_type: Option<u8>,
}

/// Name and URL of a webhook in the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookSummary {
    /// Display name (empty if the service reports none)
    pub name: String,

    /// Execute URL
    pub url: String,
}

/// Request to create a new webhook.
#[derive(Debug, Clone, Serialize)]
pub struct CreateWebhookRequest {
    /// Webhook name (required)
    pub name: String,
}

/// Request to rename an existing webhook.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateWebhookRequest {
    /// New webhook name
    pub name: String,
}

impl<T: Transport> DiscordClient<T> {
    /// Create a webhook in the client's channel and make it the active webhook.
    ///
    /// `POST /channels/{channel_id}/webhooks`
    ///
    /// Returns the new webhook's URL on HTTP 200.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or if the response lacks a URL.
    pub async fn create_webhook(&self, name: &str) -> Result<ApiOutcome<String>, ApiError> {
        let segments = ["channels", self.channel_id().as_str(), "webhooks"];
        let request = self
            .bot_request(Method::POST, &segments)?
            .json(&CreateWebhookRequest {
                name: name.to_string(),
            })?;

        let response = self
            .execute("create_webhook", &segments.join("/"), request)
            .await?;
        if response.status != 200 {
            return Ok(ApiOutcome::Failure(response.status));
        }

        let webhook: Webhook = response.json()?;
        let url = webhook
            .url
            .ok_or_else(|| ApiError::UnexpectedResponse {
                message: format!("created webhook {} has no url", webhook.id),
            })?;

        self.replace_active_webhook(Some(WebhookRef::from_parts(url.clone(), webhook.id.clone())));
        info!(webhook_id = %webhook.id, "Created webhook and set it active");

        Ok(ApiOutcome::Success(url))
    }

    /// Fetch a webhook descriptor.
    ///
    /// `GET /webhooks/{webhook_id}`
    ///
    /// Uses the id of `url` when given, otherwise the active webhook.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, a malformed `url`, or an
    /// undecodable response.
    pub async fn get_webhook_info(
        &self,
        url: Option<&str>,
    ) -> Result<ApiOutcome<Webhook>, ApiError> {
        let Some(webhook_id) = self.target_webhook_id(url, "get_webhook_info")? else {
            return Ok(ApiOutcome::Precondition(Precondition::NoActiveWebhook));
        };

        let segments = ["webhooks", webhook_id.as_str()];
        let request = self.bot_request(Method::GET, &segments)?;
        let response = self
            .execute("get_webhook_info", &segments.join("/"), request)
            .await?;
        if response.status != 200 {
            return Ok(ApiOutcome::Failure(response.status));
        }

        Ok(ApiOutcome::Success(response.json()?))
    }

    /// List the webhooks of the client's channel.
    ///
    /// `GET /channels/{channel_id}/webhooks`
    ///
    /// Webhooks without an execute URL (channel follower and application
    /// webhooks) are skipped since they cannot be used to send messages.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an undecodable response.
    pub async fn list_webhooks(&self) -> Result<ApiOutcome<Vec<WebhookSummary>>, ApiError> {
        let segments = ["channels", self.channel_id().as_str(), "webhooks"];
        let request = self.bot_request(Method::GET, &segments)?;

        let response = self
            .execute("list_webhooks", &segments.join("/"), request)
            .await?;
        if response.status != 200 {
            return Ok(ApiOutcome::Failure(response.status));
        }

        let webhooks: Vec<Webhook> = response.json()?;
        let summaries = webhooks
            .into_iter()
            .filter_map(|webhook| {
                webhook.url.map(|url| WebhookSummary {
                    name: webhook.name.unwrap_or_default(),
                    url,
                })
            })
            .collect();

        Ok(ApiOutcome::Success(summaries))
    }

    /// Rename a webhook.
    ///
    /// `PATCH /webhooks/{webhook_id}`
    ///
    /// Targets `url` when given, otherwise the active webhook. Returns the raw
    /// status code.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or a malformed `url`.
    pub async fn update_webhook(
        &self,
        name: &str,
        url: Option<&str>,
    ) -> Result<ApiOutcome<u16>, ApiError> {
        let Some(webhook_id) = self.target_webhook_id(url, "update_webhook")? else {
            return Ok(ApiOutcome::Precondition(Precondition::NoActiveWebhook));
        };

        let segments = ["webhooks", webhook_id.as_str()];
        let request = self
            .bot_request(Method::PATCH, &segments)?
            .json(&UpdateWebhookRequest {
                name: name.to_string(),
            })?;

        let response = self
            .execute("update_webhook", &segments.join("/"), request)
            .await?;
        Ok(ApiOutcome::from_status(response.status))
    }

    /// Delete a webhook.
    ///
    /// `DELETE /webhooks/{webhook_id}`
    ///
    /// Without `url` the active webhook is deleted, and once the request
    /// completes it is cleared from the client whatever the status code.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or a malformed `url`. The
    /// active webhook is kept when the request never completed.
    pub async fn delete_webhook(&self, url: Option<&str>) -> Result<ApiOutcome<u16>, ApiError> {
        let (webhook_id, active) = match url {
            Some(url) => (WebhookRef::parse(url)?.id, None),
            None => match self.require_active_webhook("delete_webhook") {
                Some(active) => (active.id.clone(), Some(active)),
                None => return Ok(ApiOutcome::Precondition(Precondition::NoActiveWebhook)),
            },
        };

        let segments = ["webhooks", webhook_id.as_str()];
        let request = self.bot_request(Method::DELETE, &segments)?;
        let response = self
            .execute("delete_webhook", &segments.join("/"), request)
            .await?;

        if let Some(active) = active {
            if self.clear_active_webhook_if(&active) {
                info!(status = response.status, "Cleared deleted active webhook");
            }
        }

        Ok(ApiOutcome::from_status(response.status))
    }

    /// Id of the webhook an operation targets: the one in `url`, else the active one.
    fn target_webhook_id(
        &self,
        url: Option<&str>,
        operation: &'static str,
    ) -> Result<Option<WebhookId>, ApiError> {
        match url {
            Some(url) => Ok(Some(WebhookRef::parse(url)?.id)),
            None => Ok(self
                .require_active_webhook(operation)
                .map(|webhook| webhook.id)),
        }
    }
}
