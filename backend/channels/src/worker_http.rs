//! Split-process job hand-off.
//!
//! `HttpJobForwarder` lets a receiver-only process push jobs to a worker
//! process over HTTP; `worker_router` is the matching inbound endpoint on the
//! worker side, which feeds its local queue. Both ends share a secret and
//! every forwarded body is signed with it.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use glossbot_core::{JobDispatcher, WorkerJob};
use reqwest::Client;
use tracing::{debug, error, warn};

use crate::signing::{compute_signature, verify_signature};

/// Path the worker listens on for forwarded jobs.
pub const WORKER_PATH: &str = "/internal/worker";
pub const WORKER_SIGNATURE_HEADER: &str = "x-glossbot-signature";
pub const WORKER_TIMESTAMP_HEADER: &str = "x-glossbot-request-timestamp";

/// `JobDispatcher` that POSTs each job to a remote worker on a detached task.
///
/// The caller never waits for the request; delivery failures are only logged.
#[derive(Clone)]
pub struct HttpJobForwarder {
    client: Client,
    target: String,
    secret: String,
}

impl HttpJobForwarder {
    /// `base_url` is the worker's origin, e.g. `http://worker:8080`.
    pub fn new(base_url: &str, secret: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            target: format!("{}{}", base_url.trim_end_matches('/'), WORKER_PATH),
            secret: secret.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl JobDispatcher for HttpJobForwarder {
    fn dispatch(&self, job: WorkerJob) -> Result<()> {
        let runtime = tokio::runtime::Handle::try_current()
            .context("job forwarding needs a running Tokio runtime")?;
        let body = serde_json::to_vec(&job).context("failed to encode worker job")?;
        let ts = chrono::Utc::now().timestamp().to_string();
        let signature = compute_signature(&self.secret, &ts, &body)
            .context("worker secret cannot key HMAC")?;
        let client = self.client.clone();
        let target = self.target.clone();

        runtime.spawn(async move {
            let request = client
                .post(&target)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .header(WORKER_TIMESTAMP_HEADER, ts)
                .header(WORKER_SIGNATURE_HEADER, signature)
                .body(body);
            match request.send().await {
                Ok(res) if res.status().is_success() => {
                    debug!(channel = %job.channel, "[Forwarder] Job delivered");
                }
                Ok(res) => {
                    error!(channel = %job.channel, status = %res.status(), "[Forwarder] Worker rejected job");
                }
                Err(e) => {
                    error!(channel = %job.channel, error = %e, "[Forwarder] Worker unreachable, job dropped");
                }
            }
        });
        Ok(())
    }
}

#[derive(Clone)]
struct IntakeState {
    dispatcher: Arc<dyn JobDispatcher>,
    secret: Arc<str>,
}

/// Inbound endpoint for forwarded jobs. Requests must carry a signature made
/// with `secret`.
pub fn worker_router(dispatcher: Arc<dyn JobDispatcher>, secret: &str) -> Router {
    Router::new()
        .route(WORKER_PATH, post(accept_job))
        .with_state(IntakeState {
            dispatcher,
            secret: Arc::from(secret),
        })
}

async fn accept_job(State(state): State<IntakeState>, headers: HeaderMap, body: Bytes) -> Response {
    let now = chrono::Utc::now().timestamp();
    if !verify_signature(
        &headers,
        &body,
        &state.secret,
        now,
        WORKER_SIGNATURE_HEADER,
        WORKER_TIMESTAMP_HEADER,
    ) {
        warn!("[Worker] Invalid signature, rejecting forwarded job");
        return (StatusCode::UNAUTHORIZED, "invalid_signature").into_response();
    }

    let job: WorkerJob = match serde_json::from_slice(&body) {
        Ok(job) => job,
        Err(e) => {
            warn!(error = %e, "[Worker] Malformed forwarded job");
            return (StatusCode::BAD_REQUEST, "bad_json").into_response();
        }
    };

    let channel = job.channel.clone();
    match state.dispatcher.dispatch(job) {
        Ok(()) => (StatusCode::ACCEPTED, "accepted").into_response(),
        Err(e) => {
            warn!(channel = %channel, error = %e, "[Worker] Could not enqueue forwarded job");
            (StatusCode::SERVICE_UNAVAILABLE, "queue_unavailable").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use glossbot_core::JobBus;

    use super::*;

    fn intake(dispatcher: Arc<dyn JobDispatcher>) -> State<IntakeState> {
        State(IntakeState {
            dispatcher,
            secret: Arc::from("shared"),
        })
    }

    fn signed_headers(secret: &str, body: &[u8]) -> HeaderMap {
        let ts = chrono::Utc::now().timestamp().to_string();
        let sig = compute_signature(secret, &ts, body).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(WORKER_TIMESTAMP_HEADER, HeaderValue::from_str(&ts).unwrap());
        headers.insert(WORKER_SIGNATURE_HEADER, HeaderValue::from_str(&sig).unwrap());
        headers
    }

    fn job_body(text: &str, channel: &str) -> Bytes {
        Bytes::from(serde_json::to_vec(&WorkerJob::new(text, channel)).unwrap())
    }

    #[test]
    fn test_target_url() {
        let forwarder = HttpJobForwarder::new("http://worker:8080/", "shared");
        assert_eq!(forwarder.target(), "http://worker:8080/internal/worker");
    }

    #[test]
    fn test_dispatch_outside_runtime_fails() {
        let forwarder = HttpJobForwarder::new("http://worker:8080", "shared");
        assert!(forwarder.dispatch(WorkerJob::new("!list", "C1")).is_err());
    }

    #[tokio::test]
    async fn test_signed_job_is_enqueued() {
        let mut bus = JobBus::new();
        let mut rx = bus.take_worker_rx().unwrap();
        let body = job_body("!list", "C7");

        let response =
            accept_job(intake(Arc::new(bus.dispatcher())), signed_headers("shared", &body), body).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(rx.recv().await.unwrap(), WorkerJob::new("!list", "C7"));
    }

    #[tokio::test]
    async fn test_unsigned_job_is_rejected() {
        let mut bus = JobBus::new();
        let mut rx = bus.take_worker_rx().unwrap();
        let body = job_body("!deleteword rust", "C1");

        let response = accept_job(intake(Arc::new(bus.dispatcher())), HeaderMap::new(), body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_job_signed_with_wrong_secret_is_rejected() {
        let mut bus = JobBus::new();
        let mut rx = bus.take_worker_rx().unwrap();
        let body = job_body("!deleteword rust", "C1");

        let response =
            accept_job(intake(Arc::new(bus.dispatcher())), signed_headers("guess", &body), body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_signed_bad_json_is_rejected() {
        let bus = JobBus::new();
        let body = Bytes::from_static(b"{not json");

        let response =
            accept_job(intake(Arc::new(bus.dispatcher())), signed_headers("shared", &body), body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_closed_queue_reports_unavailable() {
        let mut bus = JobBus::new();
        drop(bus.take_worker_rx());
        let body = job_body("!list", "C7");

        let response =
            accept_job(intake(Arc::new(bus.dispatcher())), signed_headers("shared", &body), body).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
