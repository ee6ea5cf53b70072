//! Shared fixtures for client tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use url::Url;
use wiremock::MockServer;

use crate::auth::Credentials;
use crate::client::{ApiRequest, ApiResponse, ClientConfig, DiscordClient, Transport};
use crate::error::ApiError;

pub(crate) const TEST_TOKEN: &str = "test-bot-token";
pub(crate) const TEST_CHANNEL: &str = "111222333";

/// Client pointed at the mock server, with no active webhook.
pub(crate) fn client_for(mock_server: &MockServer) -> DiscordClient {
    let config = ClientConfig::default().with_api_base_url(mock_server.uri());
    DiscordClient::builder(Credentials::new(TEST_TOKEN, TEST_CHANNEL))
        .config(config)
        .build()
        .unwrap()
}

/// Execute URL of a webhook served by the mock server.
pub(crate) fn webhook_url(mock_server: &MockServer, id: &str) -> String {
    format!("{}/webhooks/{}/webhook-secret-{}", mock_server.uri(), id, id)
}

/// Path part of [`webhook_url`], for request matchers.
pub(crate) fn webhook_path(id: &str) -> String {
    format!("/webhooks/{}/webhook-secret-{}", id, id)
}

/// `Authorization` header value bot-scoped requests must carry.
pub(crate) fn bot_header() -> String {
    format!("Bot {}", TEST_TOKEN)
}

// ============================================================================
// In-memory Discord
// ============================================================================

pub(crate) const FAKE_BASE_URL: &str = "http://discord.test";

/// Stateful stand-in for the service, covering the message and pin endpoints.
#[derive(Default)]
pub(crate) struct InMemoryDiscord {
    state: Mutex<FakeChannel>,
    requests: AtomicUsize,
}

#[derive(Default)]
struct FakeChannel {
    next_id: u64,
    messages: BTreeMap<String, String>,
    pins: Vec<String>,
}

impl InMemoryDiscord {
    /// Number of requests executed so far.
    pub(crate) fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Webhook URL the fake accepts executions on.
    pub(crate) fn webhook_url() -> String {
        format!("{}/webhooks/900/fake-token", FAKE_BASE_URL)
    }
}

fn message_json(id: &str, content: &str, pinned: bool) -> serde_json::Value {
    json!({
        "id": id,
        "channel_id": TEST_CHANNEL,
        "content": content,
        "webhook_id": "900",
        "pinned": pinned,
        "embeds": []
    })
}

fn body_content(request: &ApiRequest) -> String {
    request
        .body
        .as_ref()
        .and_then(|body| body.get("content"))
        .and_then(|content| content.as_str())
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl Transport for InMemoryDiscord {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let url = Url::parse(&request.url)?;
        let segments: Vec<String> = url
            .path_segments()
            .map(|segments| segments.map(str::to_string).collect())
            .unwrap_or_default();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        let mut guard = self.state.lock().unwrap();
        let channel = &mut *guard;
        let (status, body) = match (request.method.as_str(), segments.as_slice()) {
            ("POST", ["webhooks", "900", "fake-token"]) => {
                channel.next_id += 1;
                let id = format!("msg-{}", channel.next_id);
                let content = body_content(&request);
                channel.messages.insert(id.clone(), content.clone());
                (200, Some(message_json(&id, &content, false)))
            }
            ("PATCH", ["webhooks", "900", "fake-token", "messages", id]) => {
                let content = body_content(&request);
                match channel.messages.get_mut(*id) {
                    Some(existing) => {
                        *existing = content.clone();
                        let pinned = channel.pins.iter().any(|pin| pin == id);
                        (200, Some(message_json(id, &content, pinned)))
                    }
                    None => (404, None),
                }
            }
            ("DELETE", ["webhooks", "900", "fake-token", "messages", id]) => {
                if channel.messages.remove(*id).is_some() {
                    channel.pins.retain(|pin| pin != id);
                    (204, None)
                } else {
                    (404, None)
                }
            }
            ("GET", ["channels", _, "messages", id]) => match channel.messages.get(*id) {
                Some(content) => {
                    let pinned = channel.pins.iter().any(|pin| pin == id);
                    (200, Some(message_json(id, content, pinned)))
                }
                None => (404, None),
            },
            ("GET", ["channels", _, "pins"]) => {
                let pinned: Vec<serde_json::Value> = channel
                    .pins
                    .iter()
                    .filter_map(|id| {
                        channel
                            .messages
                            .get(id)
                            .map(|content| message_json(id, content, true))
                    })
                    .collect();
                (200, Some(json!(pinned)))
            }
            ("PUT", ["channels", _, "pins", id]) => {
                if !channel.messages.contains_key(*id) {
                    (404, None)
                } else {
                    if !channel.pins.iter().any(|pin| pin == id) {
                        channel.pins.push(id.to_string());
                    }
                    (204, None)
                }
            }
            ("DELETE", ["channels", _, "pins", id]) => {
                channel.pins.retain(|pin| pin != id);
                (204, None)
            }
            _ => (404, Some(json!({"message": "404: Not Found", "code": 0}))),
        };

        let body = match body {
            Some(value) => serde_json::to_vec(&value)?,
            None => Vec::new(),
        };
        Ok(ApiResponse::new(status, body))
    }
}

/// Client wired to a fresh [`InMemoryDiscord`] with its webhook active.
pub(crate) fn in_memory_client() -> DiscordClient<InMemoryDiscord> {
    let config = ClientConfig::default().with_api_base_url(FAKE_BASE_URL);
    DiscordClient::builder(Credentials::new(TEST_TOKEN, TEST_CHANNEL))
        .config(config)
        .webhook_url(InMemoryDiscord::webhook_url())
        .build_with_transport(InMemoryDiscord::default())
        .unwrap()
}
