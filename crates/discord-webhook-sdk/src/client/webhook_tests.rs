//! Tests for webhook operations.

use super::*;
use crate::client::test_support::{bot_header, client_for, webhook_url, TEST_CHANNEL};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod parsing {
    use super::*;

    /// Verify the id is the second-to-last segment of a webhook URL.
    #[test]
    fn test_parse_extracts_second_to_last_segment() {
        let urls = [
            ("https://discord.com/api/webhooks/123/abc", "123"),
            ("https://discord.com/api/v9/webhooks/987654321/tok-en_X", "987654321"),
            ("http://127.0.0.1:8080/webhooks/5/s", "5"),
        ];

        for (url, expected_id) in urls {
            let webhook = WebhookRef::parse(url).unwrap();
            assert_eq!(webhook.id().as_str(), expected_id, "url: {}", url);
            assert_eq!(webhook.url(), url);
        }
    }

    /// The split is literal, so a trailing slash shifts the id onto the token.
    #[test]
    fn test_parse_trailing_slash_takes_token_segment() {
        let webhook = WebhookRef::parse("https://discord.com/api/webhooks/123/tok/").unwrap();

        assert_eq!(webhook.id().as_str(), "tok");
    }

    #[test]
    fn test_parse_rejects_url_without_id_segment() {
        assert!(matches!(
            WebhookRef::parse("no-slashes-here"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            WebhookRef::parse("/token"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_debug_hides_webhook_token() {
        let webhook = WebhookRef::parse("https://discord.com/api/webhooks/1/very-secret").unwrap();
        let debug = format!("{:?}", webhook);

        assert!(!debug.contains("very-secret"));
        assert!(debug.contains('1'));
    }

    #[test]
    fn test_webhook_descriptor_tolerates_missing_fields() {
        let webhook: Webhook = serde_json::from_value(serde_json::json!({
            "id": "42",
            "type": 2,
            "name": null
        }))
        .unwrap();

        assert_eq!(webhook.id.as_str(), "42");
        assert_eq!(webhook.webhook_type, Some(2));
        assert!(webhook.name.is_none());
        assert!(webhook.url.is_none());
    }
}

mod create {
    use super::*;

    #[tokio::test]
    async fn test_create_webhook_stores_and_returns_url() {
        let mock_server = MockServer::start().await;
        let url = webhook_url(&mock_server, "555");

        Mock::given(method("POST"))
            .and(path(format!("/channels/{}/webhooks", TEST_CHANNEL)))
            .and(header("Authorization", bot_header().as_str()))
            .and(body_json(serde_json::json!({"name": "deploys"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "555",
                "type": 1,
                "name": "deploys",
                "channel_id": TEST_CHANNEL,
                "url": url
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let outcome = client.create_webhook("deploys").await.unwrap();

        assert_eq!(outcome, ApiOutcome::Success(url.clone()));
        let active = client.active_webhook().unwrap();
        assert_eq!(active.url(), url);
        assert_eq!(active.id().as_str(), "555");
    }

    #[tokio::test]
    async fn test_create_webhook_failure_keeps_state() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/channels/{}/webhooks", TEST_CHANNEL)))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "code": 30007,
                "message": "Maximum number of webhooks reached (15)"
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let outcome = client.create_webhook("one-too-many").await.unwrap();

        assert_eq!(outcome, ApiOutcome::Failure(400));
        assert!(client.active_webhook().is_none());
    }

    #[tokio::test]
    async fn test_create_webhook_without_url_is_unexpected_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/channels/{}/webhooks", TEST_CHANNEL)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "1", "type": 3})),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client.create_webhook("app").await;

        assert!(matches!(result, Err(ApiError::UnexpectedResponse { .. })));
        assert!(client.active_webhook().is_none());
    }
}

mod info {
    use super::*;

    #[tokio::test]
    async fn test_get_webhook_info_requires_active_webhook() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let outcome = client.get_webhook_info(None).await.unwrap();

        assert_eq!(
            outcome,
            ApiOutcome::Precondition(Precondition::NoActiveWebhook)
        );
    }

    /// An explicit URL is enough even when no webhook is active.
    #[tokio::test]
    async fn test_get_webhook_info_with_explicit_url() {
        let mock_server = MockServer::start().await;
        let url = webhook_url(&mock_server, "77");

        Mock::given(method("GET"))
            .and(path("/webhooks/77"))
            .and(header("Authorization", bot_header().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "77",
                "name": "alerts",
                "url": url
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let outcome = client.get_webhook_info(Some(&url)).await.unwrap();

        let webhook = outcome.success().unwrap();
        assert_eq!(webhook.name.as_deref(), Some("alerts"));
        assert_eq!(webhook.url.as_deref(), Some(url.as_str()));
        assert!(client.active_webhook().is_none());
    }

    #[tokio::test]
    async fn test_get_webhook_info_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/webhooks/404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        client
            .set_active_webhook(&webhook_url(&mock_server, "404"))
            .unwrap();

        let outcome = client.get_webhook_info(None).await.unwrap();
        assert_eq!(outcome, ApiOutcome::Failure(404));
    }
}

mod list {
    use super::*;

    #[tokio::test]
    async fn test_list_webhooks_returns_name_url_pairs() {
        let mock_server = MockServer::start().await;
        let first = webhook_url(&mock_server, "1");
        let second = webhook_url(&mock_server, "2");

        Mock::given(method("GET"))
            .and(path(format!("/channels/{}/webhooks", TEST_CHANNEL)))
            .and(header("Authorization", bot_header().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "1", "type": 1, "name": "first", "url": first},
                {"id": "2", "type": 1, "name": null, "url": second},
                {"id": "3", "type": 2, "name": "follower"}
            ])))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let webhooks = client.list_webhooks().await.unwrap().success().unwrap();

        assert_eq!(
            webhooks,
            vec![
                WebhookSummary {
                    name: "first".to_string(),
                    url: first
                },
                WebhookSummary {
                    name: String::new(),
                    url: second
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_list_webhooks_forbidden() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/channels/{}/webhooks", TEST_CHANNEL)))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        assert_eq!(
            client.list_webhooks().await.unwrap(),
            ApiOutcome::Failure(403)
        );
    }

    /// Every listed webhook, once made active, reports its own URL back.
    #[tokio::test]
    async fn test_listed_webhooks_resolve_to_themselves() {
        let mock_server = MockServer::start().await;
        let ids = ["10", "20", "30"];

        let listing: Vec<serde_json::Value> = ids
            .iter()
            .map(|id| {
                serde_json::json!({
                    "id": id,
                    "type": 1,
                    "name": format!("hook-{}", id),
                    "url": webhook_url(&mock_server, id)
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path(format!("/channels/{}/webhooks", TEST_CHANNEL)))
            .respond_with(ResponseTemplate::new(200).set_body_json(&listing))
            .mount(&mock_server)
            .await;

        for (id, descriptor) in ids.iter().zip(&listing) {
            Mock::given(method("GET"))
                .and(path(format!("/webhooks/{}", id)))
                .respond_with(ResponseTemplate::new(200).set_body_json(descriptor))
                .mount(&mock_server)
                .await;
        }

        let client = client_for(&mock_server);
        let webhooks = client.list_webhooks().await.unwrap().success().unwrap();
        assert_eq!(webhooks.len(), ids.len());

        for summary in webhooks {
            client.set_active_webhook(&summary.url).unwrap();
            let info = client.get_webhook_info(None).await.unwrap().success().unwrap();
            assert_eq!(info.url.as_deref(), Some(summary.url.as_str()));
        }
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn test_update_webhook_active() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/webhooks/9"))
            .and(header("Authorization", bot_header().as_str()))
            .and(body_json(serde_json::json!({"name": "renamed"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "9",
                "name": "renamed"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        client
            .set_active_webhook(&webhook_url(&mock_server, "9"))
            .unwrap();

        let outcome = client.update_webhook("renamed", None).await.unwrap();
        assert_eq!(outcome, ApiOutcome::Success(200));
    }

    /// An explicit URL wins over the active webhook.
    #[tokio::test]
    async fn test_update_webhook_explicit_url_overrides_active() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/webhooks/2"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/webhooks/1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        client
            .set_active_webhook(&webhook_url(&mock_server, "1"))
            .unwrap();

        let outcome = client
            .update_webhook("other", Some(&webhook_url(&mock_server, "2")))
            .await
            .unwrap();
        assert_eq!(outcome, ApiOutcome::Success(200));
    }

    #[tokio::test]
    async fn test_update_webhook_requires_target() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let outcome = client.update_webhook("renamed", None).await.unwrap();

        assert_eq!(
            outcome,
            ApiOutcome::Precondition(Precondition::NoActiveWebhook)
        );
    }

    #[tokio::test]
    async fn test_update_webhook_rejects_malformed_url() {
        let mock_server = MockServer::start().await;
        let client = client_for(&mock_server);

        let result = client.update_webhook("renamed", Some("garbage")).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}

mod delete {
    use super::*;

    /// The active webhook is cleared whatever status the service returns.
    #[tokio::test]
    async fn test_delete_active_webhook_clears_state_for_any_status() {
        for status in [204u16, 404, 500] {
            let mock_server = MockServer::start().await;

            Mock::given(method("DELETE"))
                .and(path("/webhooks/31"))
                .and(header("Authorization", bot_header().as_str()))
                .respond_with(ResponseTemplate::new(status))
                .expect(1)
                .mount(&mock_server)
                .await;

            let client = client_for(&mock_server);
            client
                .set_active_webhook(&webhook_url(&mock_server, "31"))
                .unwrap();

            let outcome = client.delete_webhook(None).await.unwrap();

            assert_eq!(outcome, ApiOutcome::from_status(status));
            assert!(
                client.active_webhook().is_none(),
                "active webhook kept after status {}",
                status
            );
        }
    }

    /// Deleting another webhook by URL leaves the active one alone.
    #[tokio::test]
    async fn test_delete_explicit_webhook_keeps_active() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/webhooks/8"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let active_url = webhook_url(&mock_server, "7");
        client.set_active_webhook(&active_url).unwrap();

        let outcome = client
            .delete_webhook(Some(&webhook_url(&mock_server, "8")))
            .await
            .unwrap();

        assert_eq!(outcome, ApiOutcome::Success(204));
        assert_eq!(client.active_webhook().unwrap().url(), active_url);
    }

    #[tokio::test]
    async fn test_delete_webhook_without_target_sends_nothing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let outcome = client.delete_webhook(None).await.unwrap();

        assert_eq!(
            outcome,
            ApiOutcome::Precondition(Precondition::NoActiveWebhook)
        );
    }

    /// A request that never completed does not clear the active webhook.
    #[tokio::test]
    async fn test_delete_webhook_transport_failure_keeps_active() {
        let config = crate::client::ClientConfig::default().with_api_base_url("http://127.0.0.1:1");
        let client = DiscordClient::builder(crate::auth::Credentials::new("t", "c"))
            .config(config)
            .webhook_url("http://127.0.0.1:1/webhooks/3/secret")
            .build()
            .unwrap();

        let result = client.delete_webhook(None).await;

        assert!(matches!(result, Err(ApiError::Transport(_))));
        assert!(client.active_webhook().is_some());
    }
}
