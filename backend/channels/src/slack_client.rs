//! Slack Web API client.
//!
//! Posts replies with `chat.postMessage`. Slack reports most failures as
//! HTTP 200 with `"ok": false`, so both the status and the body are checked.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use glossbot_core::{ChatSender, GlossError};
use glossbot_logging::redact_sensitive_data;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

pub const DEFAULT_API_BASE: &str = "https://slack.com/api";

#[derive(Serialize)]
struct SlackPostMessage<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct SlackApiResponse {
    ok: bool,
    error: Option<String>,
}

#[derive(Clone)]
pub struct SlackClient {
    http_client: Client,
    bot_token: String,
    api_base: String,
}

impl SlackClient {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            bot_token: bot_token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API root (Slack-compatible gateways).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl ChatSender for SlackClient {
    async fn send_message(&self, channel: &str, text: &str) -> Result<()> {
        let url = format!("{}/chat.postMessage", self.api_base);
        let res = self
            .http_client
            .post(&url)
            .bearer_auth(&self.bot_token)
            .json(&SlackPostMessage { channel, text })
            .send()
            .await
            .context("chat.postMessage request failed")?;

        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        if let Err(e) = check_api_response(status, &body) {
            error!(channel = %channel, "[Slack] chat.postMessage failed: {}", redact_sensitive_data(&e.to_string()));
            return Err(e);
        }
        info!(channel = %channel, "[Slack] Sent message");
        Ok(())
    }
}

fn check_api_response(status: StatusCode, body: &str) -> Result<()> {
    if !status.is_success() {
        bail!(GlossError::Platform(format!("HTTP {status}: {body}")));
    }
    let parsed: SlackApiResponse = serde_json::from_str(body)
        .map_err(|e| GlossError::Platform(format!("unreadable Slack response: {e}")))?;
    if !parsed.ok {
        let reason = parsed.error.unwrap_or_else(|| "unknown_error".to_string());
        bail!(GlossError::Platform(reason));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_response() {
        assert!(check_api_response(StatusCode::OK, r#"{"ok":true,"ts":"1.2"}"#).is_ok());
    }

    #[test]
    fn test_ok_false_is_error() {
        let err = check_api_response(StatusCode::OK, r#"{"ok":false,"error":"channel_not_found"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("channel_not_found"));
    }

    #[test]
    fn test_http_error_and_garbage() {
        assert!(check_api_response(StatusCode::TOO_MANY_REQUESTS, "").is_err());
        assert!(check_api_response(StatusCode::OK, "<html>").is_err());
    }

    #[test]
    fn test_post_body_shape() {
        let body = serde_json::to_value(SlackPostMessage { channel: "C1", text: "hi" }).unwrap();
        assert_eq!(body, serde_json::json!({"channel": "C1", "text": "hi"}));
    }

    #[test]
    fn test_api_base_trailing_slash() {
        let client = SlackClient::new("xoxb-test").with_api_base("http://localhost:9000/api/");
        assert_eq!(client.api_base, "http://localhost:9000/api");
    }
}
