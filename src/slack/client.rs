//! Slack API client module
//!
//! Encapsulates all Slack Web API interactions with retry logic and error handling.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use slack_morphism::errors::SlackClientError;
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::prelude::SlackApiConversationsOpenRequest;
use slack_morphism::{SlackApiToken, SlackApiTokenValue, SlackUserId};
use std::future::Future;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

use super::platform::{ChannelSummary, ChatPlatform, MessagePresentation, PostedMessage};
use crate::core::models::PostingIdentity;
use crate::errors::SlackError;

// Build the Slack client connector safely without panicking.
// If connector construction fails, store None and surface a SlackError at call sites.
static SLACK_CLIENT: std::sync::LazyLock<Option<SlackHyperClient>> =
    std::sync::LazyLock::new(|| match SlackClientHyperConnector::new() {
        Ok(connector) => Some(SlackHyperClient::new(connector)),
        Err(e) => {
            warn!("Failed to create Slack HTTP connector: {}", e);
            None
        }
    });

static HTTP_CLIENT: std::sync::LazyLock<Client> = std::sync::LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
});

pub const SLACK_API_BASE: &str = "https://slack.com/api";

/// Page size for `conversations.list`.
const CHANNEL_PAGE_LIMIT: u32 = 1000;

/// Upper bound on `conversations.list` pages followed for one lookup.
const MAX_CHANNEL_PAGES: usize = 50;

// ─────────────────────────────────────────────────────────────────────────────
// Payload builders and response parsing (extracted for testability)
// ─────────────────────────────────────────────────────────────────────────────

#[must_use]
pub(crate) fn build_post_message_payload(
    channel: &str,
    text: &str,
    presentation: &MessagePresentation,
) -> Value {
    let mut payload = json!({
        "channel": channel,
        "text": text,
    });

    if let MessagePresentation::Custom {
        username,
        icon_emoji,
    } = presentation
    {
        payload["username"] = Value::String(username.clone());
        payload["icon_emoji"] = Value::String(icon_emoji.clone());
    }

    payload
}

#[must_use]
pub(crate) fn build_reaction_payload(channel: &str, ts: &str, name: &str) -> Value {
    json!({
        "channel": channel,
        "timestamp": ts,
        "name": name,
    })
}

#[must_use]
pub(crate) fn build_list_channels_payload(cursor: Option<&str>) -> Value {
    let mut payload = json!({
        "types": "public_channel,private_channel",
        "exclude_archived": true,
        "limit": CHANNEL_PAGE_LIMIT,
    });

    if let Some(c) = cursor {
        payload["cursor"] = Value::String(c.to_string());
    }

    payload
}

/// Check the `ok` envelope every Web API response carries.
pub(crate) fn check_api_response(method: &str, body: Value) -> Result<Value, SlackError> {
    if body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        return Ok(body);
    }
    let code = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    Err(SlackError::platform(method, code))
}

/// Channels on one `conversations.list` page plus the cursor for the next.
pub(crate) fn parse_channel_page(body: &Value) -> (Vec<ChannelSummary>, Option<String>) {
    let channels = body
        .get("channels")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|c| {
                    Some(ChannelSummary {
                        id: c.get("id")?.as_str()?.to_string(),
                        name: c.get("name")?.as_str()?.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let next_cursor = body
        .get("response_metadata")
        .and_then(|m| m.get("next_cursor"))
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string);

    (channels, next_cursor)
}

pub(crate) fn parse_posted_message(
    channel: &str,
    body: &Value,
) -> Result<PostedMessage, SlackError> {
    let ts = body
        .get("ts")
        .and_then(Value::as_str)
        .ok_or_else(|| SlackError::GeneralError("chat.postMessage returned no ts".to_string()))?;
    let actual_channel = body
        .get("channel")
        .and_then(Value::as_str)
        .unwrap_or(channel);

    Ok(PostedMessage {
        channel: actual_channel.to_string(),
        ts: ts.to_string(),
    })
}

/// Follow `next_cursor` until it runs out, repeats, or the page cap is hit.
pub(crate) async fn collect_channel_pages<F, Fut>(
    mut fetch_page: F,
) -> Result<Vec<ChannelSummary>, SlackError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Value, SlackError>>,
{
    let mut channels = Vec::new();
    let mut cursor: Option<String> = None;

    for _ in 0..MAX_CHANNEL_PAGES {
        let body = fetch_page(cursor.clone()).await?;
        let (page, next) = parse_channel_page(&body);
        debug!("conversations.list page with {} channels", page.len());
        channels.extend(page);

        match next {
            Some(next) if cursor.as_deref() == Some(next.as_str()) => {
                warn!("conversations.list repeated cursor {}; stopping", next);
                return Ok(channels);
            }
            Some(next) => cursor = Some(next),
            None => return Ok(channels),
        }
    }

    warn!(
        "conversations.list still paging after {} pages; using {} channels",
        MAX_CHANNEL_PAGES,
        channels.len()
    );
    Ok(channels)
}

/// Retry transient failures only; platform refusals come straight back.
pub(crate) async fn retry_transient<F, Fut, T>(operation: F) -> Result<T, SlackError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SlackError>>,
{
    let strategy = ExponentialBackoff::from_millis(100).map(jitter).take(3);

    RetryIf::spawn(strategy, operation, SlackError::is_transient).await
}

fn client_error(method: &str, error: SlackClientError) -> SlackError {
    match error {
        SlackClientError::ApiError(api_err) => SlackError::platform(method, &api_err.code),
        other => SlackError::ApiError(format!("{method}: {other}")),
    }
}

/// Slack API client with retry logic and error handling.
///
/// One instance per token; the token decides which [`PostingIdentity`] it acts as.
pub struct SlackClient {
    token: SlackApiToken,
    identity: PostingIdentity,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String, identity: PostingIdentity) -> Self {
        Self {
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
            identity,
        }
    }

    /// Service identity from a bot token.
    #[must_use]
    pub fn service(bot_token: String) -> Self {
        Self::new(bot_token, PostingIdentity::Service)
    }

    /// Impersonation identity from a user token.
    #[must_use]
    pub fn impersonation(user_token: String) -> Self {
        Self::new(user_token, PostingIdentity::Impersonated)
    }

    async fn call_api(&self, method: &str, payload: &Value) -> Result<Value, SlackError> {
        let resp = HTTP_CLIENT
            .post(format!("{SLACK_API_BASE}/{method}"))
            .bearer_auth(&self.token.token_value.0)
            .json(payload)
            .send()
            .await
            .map_err(|e| SlackError::HttpError(format!("{method}: {e}")))?;

        if !resp.status().is_success() {
            return Err(SlackError::HttpError(format!(
                "{method} HTTP {}",
                resp.status()
            )));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| SlackError::GeneralError(format!("{method} JSON parse error: {e}")))?;

        check_api_response(method, body)
    }
}

#[async_trait]
impl ChatPlatform for SlackClient {
    fn identity(&self) -> PostingIdentity {
        self.identity
    }

    /// Not retried: a retry after a lost response would post the celebration twice.
    async fn post_message(
        &self,
        channel: &str,
        text: &str,
        presentation: &MessagePresentation,
    ) -> Result<PostedMessage, SlackError> {
        let payload = build_post_message_payload(channel, text, presentation);
        let body = self.call_api("chat.postMessage", &payload).await?;
        parse_posted_message(channel, &body)
    }

    async fn add_reaction(&self, channel: &str, ts: &str, name: &str) -> Result<(), SlackError> {
        let payload = build_reaction_payload(channel, ts, name);
        retry_transient(|| async { self.call_api("reactions.add", &payload).await.map(|_| ()) })
            .await
    }

    async fn list_channels(&self) -> Result<Vec<ChannelSummary>, SlackError> {
        collect_channel_pages(|cursor| async move {
            let payload = build_list_channels_payload(cursor.as_deref());
            retry_transient(|| async { self.call_api("conversations.list", &payload).await })
                .await
        })
        .await
    }

    async fn join_channel(&self, channel: &str) -> Result<(), SlackError> {
        let payload = json!({ "channel": channel });
        self.call_api("conversations.join", &payload)
            .await
            .map(|_| ())
    }

    async fn open_direct_message(&self, user_id: &str) -> Result<String, SlackError> {
        retry_transient(|| async {
            let session = SLACK_CLIENT
                .as_ref()
                .ok_or_else(|| {
                    SlackError::GeneralError("Slack HTTP connector not initialized".to_string())
                })?
                .open_session(&self.token);
            let open_req = SlackApiConversationsOpenRequest::new()
                .with_users(vec![SlackUserId(user_id.to_string())]);

            let result = session
                .conversations_open(&open_req)
                .await
                .map_err(|e| client_error("conversations.open", e))?;
            Ok::<String, SlackError>(result.channel.id.0)
        })
        .await
    }
}
