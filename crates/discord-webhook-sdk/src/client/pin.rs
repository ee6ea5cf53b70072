// Pin operations on the client's channel

use reqwest::Method;

use crate::auth::ChannelId;
use crate::client::{ApiOutcome, DiscordClient, Message, MessageId, Transport};
use crate::error::ApiError;

#[cfg(test)]
#[path = "pin_tests.rs"]
mod tests;

impl<T: Transport> DiscordClient<T> {
    /// Ids of the pinned messages in the client's channel.
    ///
    /// `GET /channels/{channel_id}/pins`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an undecodable response.
    pub async fn get_pinned_messages(&self) -> Result<ApiOutcome<Vec<MessageId>>, ApiError> {
        let segments = ["channels", self.channel_id().as_str(), "pins"];
        let request = self.bot_request(Method::GET, &segments)?;

        let response = self
            .execute("get_pinned_messages", &segments.join("/"), request)
            .await?;
        if response.status != 200 {
            return Ok(ApiOutcome::Failure(response.status));
        }

        let messages: Vec<Message> = response.json()?;
        Ok(ApiOutcome::Success(
            messages.into_iter().map(|message| message.id).collect(),
        ))
    }

    /// Pin a message in the client's channel.
    ///
    /// `PUT /channels/{channel_id}/pins/{message_id}`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or a message id that is not a
    /// single path segment (empty, `.` or `..`).
    pub async fn pin_message(&self, message_id: &MessageId) -> Result<ApiOutcome<u16>, ApiError> {
        let segments = pin_segments(self.channel_id(), message_id);
        let request = self.bot_request(Method::PUT, &segments)?;

        let response = self
            .execute("pin_message", &segments.join("/"), request)
            .await?;
        Ok(ApiOutcome::from_status(response.status))
    }

    /// Unpin a message in the client's channel.
    ///
    /// `DELETE /channels/{channel_id}/pins/{message_id}`
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or a message id that is not a
    /// single path segment (empty, `.` or `..`).
    pub async fn unpin_message(&self, message_id: &MessageId) -> Result<ApiOutcome<u16>, ApiError> {
        let segments = pin_segments(self.channel_id(), message_id);
        let request = self.bot_request(Method::DELETE, &segments)?;

        let response = self
            .execute("unpin_message", &segments.join("/"), request)
            .await?;
        Ok(ApiOutcome::from_status(response.status))
    }
}

/// `channels/{channel_id}/pins/{message_id}`
fn pin_segments<'a>(channel_id: &'a ChannelId, message_id: &'a MessageId) -> [&'a str; 4] {
    ["channels", channel_id.as_str(), "pins", message_id.as_str()]
}
