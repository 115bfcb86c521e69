/// Command dispatch — route detected commands to handlers and turn every
/// outcome, including handler errors, into reply text.
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::detection::{detect_command, Detection};
use crate::messages;
use crate::registry::CommandRegistry;
use crate::types::{CommandInvocation, CommandKind};

// ---------------------------------------------------------------------------
// Handler trait
// ---------------------------------------------------------------------------

/// Context passed to every command handler.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub channel: String,
}

impl CommandContext {
    pub fn new(channel: impl Into<String>) -> Self {
        Self { channel: channel.into() }
    }
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Run the command and return the reply text.
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

pub struct CommandDispatcher {
    registry: CommandRegistry,
    handlers: HashMap<CommandKind, Arc<dyn CommandHandler>>,
}

impl CommandDispatcher {
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry, handlers: HashMap::new() }
    }

    pub fn register(&mut self, kind: CommandKind, handler: Arc<dyn CommandHandler>) {
        self.handlers.insert(kind, handler);
    }

    /// Parse `text` and produce the reply for it. Never fails: malformed
    /// input and handler errors both become user-facing text.
    pub async fn respond(&self, ctx: &CommandContext, text: &str) -> String {
        match detect_command(text, &self.registry) {
            Detection::Invocation(inv) => self.dispatch(ctx, &inv).await,
            Detection::UsageError(def) => {
                info!(command = %def.kind, channel = %ctx.channel, "[Commands] Usage error");
                messages::usage(def)
            }
            Detection::Unknown => {
                info!(channel = %ctx.channel, "[Commands] Unrecognized command");
                messages::INVALID_COMMAND.to_string()
            }
        }
    }

    pub async fn dispatch(&self, ctx: &CommandContext, inv: &CommandInvocation) -> String {
        let Some(handler) = self.handlers.get(&inv.kind) else {
            warn!(command = %inv.kind, "[Commands] No handler registered");
            return messages::INVALID_COMMAND.to_string();
        };

        info!(command = %inv.kind, keyword = ?inv.args.first(), channel = %ctx.channel, "[Commands] Dispatching");
        match handler.handle(ctx, inv).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(
                    command = %inv.kind,
                    keyword = ?inv.args.first(),
                    channel = %ctx.channel,
                    error = %e,
                    "[Commands] Handler failed"
                );
                messages::command_failed(inv)
            }
        }
    }
}
