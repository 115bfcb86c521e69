//! Messaging-platform plumbing: the Slack front receiver, the Slack reply
//! client, and HTTP job forwarding for split deployments.

pub mod signing;
pub mod slack;
pub mod slack_client;
pub mod worker_http;

pub use signing::{compute_signature, verify_signature};
pub use slack::{strip_mention, SlackConfig, SlackReceiver};
pub use slack_client::SlackClient;
pub use worker_http::{
    worker_router, HttpJobForwarder, WORKER_PATH, WORKER_SIGNATURE_HEADER, WORKER_TIMESTAMP_HEADER,
};

/// Inbound channel adapters expose their webhook endpoints as a router.
pub trait ChannelAdapter: Send + Sync {
    /// Human-readable adapter name for logging.
    fn name(&self) -> &str;

    /// Build the Axum sub-router for inbound webhook endpoints.
    fn build_router(&self) -> axum::Router;
}
