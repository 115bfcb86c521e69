/// Slack front receiver.
///
/// Receives Slack Events API webhooks, answers the `url_verification`
/// handshake, strips the bot mention from message text, and hands the
/// command to the worker without waiting for it. Slack always gets a fast
/// 200 so it does not redeliver.
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use glossbot_core::{JobDispatcher, WorkerJob};
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::signing::verify_signature;
use crate::ChannelAdapter;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct SlackConfig {
    /// Enables `X-Slack-Signature` verification when set.
    pub signing_secret: Option<String>,
    /// The bot's own user id, used for mention stripping and self-filtering.
    pub bot_user_id: Option<String>,
    pub webhook_path: String,
}

// ---------------------------------------------------------------------------
// Axum state
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct ReceiverState {
    config: SlackConfig,
    dispatcher: Arc<dyn JobDispatcher>,
}

impl ReceiverState {
    pub fn new(config: SlackConfig, dispatcher: Arc<dyn JobDispatcher>) -> Self {
        Self { config, dispatcher }
    }
}

// ---------------------------------------------------------------------------
// Slack wire types
// ---------------------------------------------------------------------------

/// Top-level callback envelope from the Slack Events API.
#[derive(Deserialize, Debug, Default)]
struct SlackEnvelope {
    /// Present on `url_verification` handshakes.
    challenge: Option<String>,
    /// Present on `event_callback`.
    #[serde(default)]
    event: Option<SlackEvent>,
}

#[derive(Deserialize, Debug, Default)]
struct SlackEvent {
    user: Option<String>,
    text: Option<String>,
    channel: Option<String>,
    /// If set this is a bot message, possibly our own reply.
    bot_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Receiver
// ---------------------------------------------------------------------------

pub struct SlackReceiver {
    state: ReceiverState,
}

impl SlackReceiver {
    pub fn new(config: SlackConfig, dispatcher: Arc<dyn JobDispatcher>) -> Self {
        Self { state: ReceiverState::new(config, dispatcher) }
    }
}

impl ChannelAdapter for SlackReceiver {
    fn name(&self) -> &str {
        "slack"
    }

    fn build_router(&self) -> Router {
        Router::new()
            .route(&self.state.config.webhook_path, post(handle_slack_event))
            .with_state(self.state.clone())
    }
}

// ---------------------------------------------------------------------------
// Webhook handler
// ---------------------------------------------------------------------------

pub async fn handle_slack_event(
    State(state): State<ReceiverState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // 1. Verify Slack signature (HMAC-SHA256 over timestamp + body)
    if let Some(secret) = &state.config.signing_secret {
        let now = chrono::Utc::now().timestamp();
        if !verify_slack_signature(&headers, &body, secret, now) {
            warn!("[Slack] Invalid signature, rejecting webhook");
            return (StatusCode::UNAUTHORIZED, "invalid_signature").into_response();
        }
    }

    // 2. Parse JSON
    let envelope: SlackEnvelope = match serde_json::from_slice(&body) {
        Ok(e) => e,
        Err(err) => {
            error!("[Slack] Failed to parse event envelope: {}", err);
            return (StatusCode::BAD_REQUEST, "bad_json").into_response();
        }
    };

    // 3. Handshake: echo the token and do nothing else
    if let Some(challenge) = envelope.challenge {
        info!("[Slack] Answering url_verification challenge");
        return (StatusCode::OK, Json(serde_json::json!({ "challenge": challenge })))
            .into_response();
    }

    // 4. Redeliveries were already acknowledged once; the job went out then or never
    if let Some(retry) = headers.get("x-slack-retry-num") {
        debug!(retry = ?retry, "[Slack] Ignoring redelivered event");
        return (StatusCode::OK, "OK").into_response();
    }

    let event = envelope.event.unwrap_or_default();

    // 5. Never answer bots, ourselves included
    let from_self = match (&event.user, &state.config.bot_user_id) {
        (Some(user), Some(bot)) => user == bot,
        _ => false,
    };
    if event.bot_id.is_some() || from_self {
        debug!("[Slack] Ignoring bot message");
        return (StatusCode::OK, "OK").into_response();
    }

    let text = strip_mention(
        event.text.as_deref().unwrap_or_default(),
        state.config.bot_user_id.as_deref(),
    );
    let channel = event.channel.unwrap_or_default();

    info!(channel = %channel, "[Slack] Command received");

    // 6. Fire-and-forget hand-off; the ack below does not depend on it
    if let Err(e) = state.dispatcher.dispatch(WorkerJob::new(text, channel.as_str())) {
        error!(channel = %channel, error = %e, "[Slack] Hand-off failed, command dropped");
    }

    (StatusCode::OK, "OK").into_response()
}

/// Remove a leading `<@BOT_ID>` mention and trim. Text that does not start
/// with the mention comes back trimmed but otherwise unchanged.
pub fn strip_mention(text: &str, bot_user_id: Option<&str>) -> String {
    let trimmed = text.trim();
    let Some(bot) = bot_user_id.filter(|b| !b.is_empty()) else {
        return trimmed.to_string();
    };
    let mention = format!("<@{bot}>");
    match trimmed.strip_prefix(&mention) {
        Some(rest) => rest.trim().to_string(),
        None => trimmed.to_string(),
    }
}

/// Verify the `X-Slack-Signature` header and reject stale timestamps.
fn verify_slack_signature(headers: &HeaderMap, body: &[u8], signing_secret: &str, now: i64) -> bool {
    verify_signature(
        headers,
        body,
        signing_secret,
        now,
        "x-slack-signature",
        "x-slack-request-timestamp",
    )
}
