//! Acknowledge/respond channel back to the person who ran the command.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, error};

use super::response_builder::create_ephemeral_payload;
use crate::errors::SlackError;

#[async_trait]
pub trait CommandResponder: Send + Sync {
    /// Must be called exactly once, before any other work.
    async fn ack(&self) -> Result<(), SlackError>;

    /// Ephemeral reply to the invoker; may be called more than once.
    async fn respond(&self, text: &str) -> Result<(), SlackError>;
}

/// Replies through the command's `response_url`.
///
/// The API function already returned HTTP 200 to Slack before the task was
/// queued, so `ack` has nothing left to send.
pub struct ResponseUrlResponder {
    http_client: HttpClient,
    response_url: String,
}

impl ResponseUrlResponder {
    #[must_use]
    pub fn new(http_client: HttpClient, response_url: &str) -> Self {
        Self {
            http_client,
            response_url: response_url.to_string(),
        }
    }
}

#[async_trait]
impl CommandResponder for ResponseUrlResponder {
    async fn ack(&self) -> Result<(), SlackError> {
        debug!("Command acknowledged upstream by the API function");
        Ok(())
    }

    async fn respond(&self, text: &str) -> Result<(), SlackError> {
        if self.response_url.is_empty() {
            return Err(SlackError::GeneralError(
                "No response_url to reply to".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let body = create_ephemeral_payload(text);
        let resp = self
            .http_client
            .post(&self.response_url)
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            error!(
                "response_url POST failed: status={} body={}",
                status, body_text
            );
            return Err(SlackError::HttpError(format!(
                "response_url POST returned {status}"
            )));
        }

        Ok(())
    }
}
