use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{response::Json, routing::get, Router};
use glossbot_channels::{
    worker_router, ChannelAdapter, HttpJobForwarder, SlackClient, SlackConfig, SlackReceiver, WORKER_PATH,
};
use glossbot_commands::{build_default_dispatcher, CommandWorker};
use glossbot_core::{Component, GlossaryStore, JobBus, JobDispatcher};
use glossbot_store::{InMemoryGlossaryStore, SqliteGlossaryStore};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::{Config, StoreKind};

/// Open the configured glossary backend.
pub fn open_store(config: &Config) -> Result<Arc<dyn GlossaryStore>> {
    let store: Arc<dyn GlossaryStore> = match config.store {
        StoreKind::Sqlite => Arc::new(SqliteGlossaryStore::open(&config.db_path, &config.table)?),
        StoreKind::Memory => {
            warn!("Using in-memory glossary; entries are lost on exit");
            Arc::new(InMemoryGlossaryStore::new())
        }
    };
    Ok(store)
}

/// Assemble the HTTP surface: health, Slack receiver and, on a split-mode
/// worker only, the signed job intake.
pub fn build_router(receiver: &dyn ChannelAdapter, intake: Option<Router>) -> Router {
    let mut app = Router::new()
        .route("/api/health", get(health))
        .merge(receiver.build_router());
    if let Some(intake) = intake {
        app = app.merge(intake);
    }
    app.layer(TraceLayer::new_for_http())
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "glossbot" }))
}

pub async fn run_server(config: Config) -> Result<()> {
    let bot_token = config.require_bot_token()?;
    info!(
        port = config.port,
        bind = %config.bind_address,
        store = ?config.store,
        table = %config.table,
        token = %config.masked_token(),
        "Starting GlossBot"
    );

    // Store and platform clients are built once and injected everywhere.
    let store = open_store(&config)?;
    let mut sender = SlackClient::new(bot_token);
    if let Some(base) = &config.slack_api_base {
        sender = sender.with_api_base(base.as_str());
    }
    let dispatcher = Arc::new(build_default_dispatcher(store));
    let worker = CommandWorker::new(dispatcher, Arc::new(sender));

    let mut bus = JobBus::with_buffer_size(config.queue_size);
    let worker_rx = bus.take_worker_rx().context("worker receiver already taken")?;
    tokio::spawn(async move {
        if let Err(e) = worker.start(worker_rx).await {
            error!(error = %e, "Command worker failed");
        }
    });

    let local_queue: Arc<dyn JobDispatcher> = Arc::new(bus.dispatcher());
    let receiver_dispatch: Arc<dyn JobDispatcher> = match &config.worker_url {
        Some(url) => {
            let forwarder = HttpJobForwarder::new(url, config.require_worker_secret()?);
            info!(target = %forwarder.target(), "Forwarding commands to remote worker");
            Arc::new(forwarder)
        }
        None => local_queue.clone(),
    };

    let receiver = SlackReceiver::new(
        SlackConfig {
            signing_secret: config.slack_signing_secret.clone(),
            bot_user_id: config.bot_user_id.clone(),
            webhook_path: config.webhook_path.clone(),
        },
        receiver_dispatch,
    );
    if config.slack_signing_secret.is_none() {
        warn!("SLACK_SIGNING_SECRET is not set; webhook signatures are not verified");
    }
    if config.bot_user_id.is_none() {
        warn!("BOT_USER_ID is not set; mentions are not stripped");
    }

    let intake = if config.worker_intake {
        info!(path = WORKER_PATH, "Accepting signed jobs from remote receivers");
        Some(worker_router(local_queue, config.require_worker_secret()?))
    } else {
        None
    };

    let app = build_router(&receiver, intake);
    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = %addr, webhook = %config.webhook_path, "HTTP receiver listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("GlossBot stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
