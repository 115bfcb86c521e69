/// Command worker — consumes `WorkerJob`s, runs them through the dispatcher,
/// and posts the reply to the originating channel.
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use glossbot_core::{ChatSender, Component, WorkerJob};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::dispatch::{CommandContext, CommandDispatcher};

pub struct CommandWorker {
    dispatcher: Arc<CommandDispatcher>,
    sender: Arc<dyn ChatSender>,
}

impl CommandWorker {
    pub fn new(dispatcher: Arc<CommandDispatcher>, sender: Arc<dyn ChatSender>) -> Self {
        Self { dispatcher, sender }
    }

    /// Handle one job to completion: parse, execute, reply.
    pub async fn process(&self, job: WorkerJob) -> Result<()> {
        process_job(&self.dispatcher, self.sender.as_ref(), job).await
    }
}

async fn process_job(
    dispatcher: &CommandDispatcher,
    sender: &dyn ChatSender,
    job: WorkerJob,
) -> Result<()> {
    let ctx = CommandContext::new(job.channel.as_str());
    let reply = dispatcher.respond(&ctx, &job.text).await;
    sender
        .send_message(&job.channel, &reply)
        .await
        .with_context(|| format!("Failed to send reply to channel {}", job.channel))
}

#[async_trait]
impl Component for CommandWorker {
    fn name(&self) -> &str {
        "command-worker"
    }

    /// Jobs are spawned independently, so their relative order is not kept.
    async fn start(&self, mut rx: mpsc::Receiver<WorkerJob>) -> Result<()> {
        info!("[Worker] Command worker started");
        while let Some(job) = rx.recv().await {
            let dispatcher = Arc::clone(&self.dispatcher);
            let sender = Arc::clone(&self.sender);
            tokio::spawn(async move {
                let channel = job.channel.clone();
                if let Err(e) = process_job(&dispatcher, sender.as_ref(), job).await {
                    error!(channel = %channel, error = %e, "[Worker] Job failed");
                }
            });
        }
        info!("[Worker] Job queue closed, worker stopping");
        Ok(())
    }
}
