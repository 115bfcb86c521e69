/// Glossary command handlers.
///
/// Each handler is a concrete struct implementing `CommandHandler` and holds
/// the injected store. Keyed commands (lookup/add/update/delete) return store
/// errors to the dispatcher; scans (list/search/random) log them and reply
/// with their own failure text.
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use glossbot_core::{GlossaryEntry, GlossaryStore};
use rand::seq::SliceRandom;
use tracing::{error, info};

use crate::dispatch::{CommandContext, CommandHandler};
use crate::messages;
use crate::registry::CommandRegistry;
use crate::types::CommandInvocation;

/// Maximum keywords shown by `!list`.
pub const LIST_LIMIT: usize = 10;
/// Maximum keywords shown by `!random`.
pub const RANDOM_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// !word
// ---------------------------------------------------------------------------

pub struct LookupHandler {
    pub store: Arc<dyn GlossaryStore>,
}

#[async_trait]
impl CommandHandler for LookupHandler {
    async fn handle(&self, _ctx: &CommandContext, inv: &CommandInvocation) -> Result<String> {
        let keyword = inv.args.one()?;
        Ok(match self.store.get(keyword).await? {
            Some(entry) => entry.description,
            None => messages::UNKNOWN_KEYWORD.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// !addword
// ---------------------------------------------------------------------------

pub struct AddHandler {
    pub store: Arc<dyn GlossaryStore>,
}

#[async_trait]
impl CommandHandler for AddHandler {
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<String> {
        let (keyword, description) = inv.args.two()?;
        self.store.put(GlossaryEntry::new(keyword, description)).await?;
        info!(keyword = %keyword, channel = %ctx.channel, "[Commands] Keyword registered");
        Ok(messages::added(keyword))
    }
}

// ---------------------------------------------------------------------------
// !update
// ---------------------------------------------------------------------------

pub struct UpdateHandler {
    pub store: Arc<dyn GlossaryStore>,
}

#[async_trait]
impl CommandHandler for UpdateHandler {
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<String> {
        let (keyword, description) = inv.args.two()?;
        self.store.update_description(keyword, description).await?;
        info!(keyword = %keyword, channel = %ctx.channel, "[Commands] Keyword updated");
        Ok(messages::updated(keyword))
    }
}

// ---------------------------------------------------------------------------
// !deleteword
// ---------------------------------------------------------------------------

pub struct DeleteHandler {
    pub store: Arc<dyn GlossaryStore>,
}

#[async_trait]
impl CommandHandler for DeleteHandler {
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<String> {
        let keyword = inv.args.one()?;
        self.store.delete(keyword).await?;
        info!(keyword = %keyword, channel = %ctx.channel, "[Commands] Keyword deleted");
        Ok(messages::deleted(keyword))
    }
}

// ---------------------------------------------------------------------------
// !list
// ---------------------------------------------------------------------------

pub struct ListHandler {
    pub store: Arc<dyn GlossaryStore>,
}

#[async_trait]
impl CommandHandler for ListHandler {
    async fn handle(&self, _ctx: &CommandContext, _inv: &CommandInvocation) -> Result<String> {
        let mut summaries = match self.store.scan_summaries().await {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "[Commands] list: scan failed");
                return Ok(messages::LIST_FAILED.to_string());
            }
        };
        if summaries.is_empty() {
            return Ok(messages::NO_KEYWORDS.to_string());
        }

        // `None < Some(_)`, so untimestamped rows sink to the end.
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        summaries.truncate(LIST_LIMIT);

        Ok(messages::bulleted(
            "📋 Recently added keywords:",
            summaries.iter().map(|s| s.keyword.as_str()),
        ))
    }
}

// ---------------------------------------------------------------------------
// !search
// ---------------------------------------------------------------------------

pub struct SearchHandler {
    pub store: Arc<dyn GlossaryStore>,
}

#[async_trait]
impl CommandHandler for SearchHandler {
    async fn handle(&self, _ctx: &CommandContext, inv: &CommandInvocation) -> Result<String> {
        let query = inv.args.one()?;
        let keywords = match self.store.scan_keywords().await {
            Ok(k) => k,
            Err(e) => {
                error!(error = %e, query = %query, "[Commands] search: scan failed");
                return Ok(messages::SEARCH_FAILED.to_string());
            }
        };

        let needle = query.to_lowercase();
        let matches: Vec<String> = keywords
            .into_iter()
            .filter(|k| k.to_lowercase().contains(&needle))
            .collect();

        if matches.is_empty() {
            return Ok(messages::no_matches(query));
        }
        Ok(messages::bulleted(&format!("🔍 Keywords matching `{query}`:"), &matches))
    }
}

// ---------------------------------------------------------------------------
// !random
// ---------------------------------------------------------------------------

pub struct RandomHandler {
    pub store: Arc<dyn GlossaryStore>,
}

#[async_trait]
impl CommandHandler for RandomHandler {
    async fn handle(&self, _ctx: &CommandContext, _inv: &CommandInvocation) -> Result<String> {
        let keywords = match self.store.scan_keywords().await {
            Ok(k) => k,
            Err(e) => {
                error!(error = %e, "[Commands] random: scan failed");
                return Ok(messages::RANDOM_FAILED.to_string());
            }
        };
        if keywords.is_empty() {
            return Ok(messages::NO_KEYWORDS.to_string());
        }

        Ok(messages::bulleted("🎲 Random keywords:", pick_random(&keywords, RANDOM_LIMIT)))
    }
}

/// Up to `n` distinct items, uniformly at random without replacement.
fn pick_random(items: &[String], n: usize) -> Vec<&String> {
    let mut rng = rand::thread_rng();
    items.choose_multiple(&mut rng, n).collect()
}

// ---------------------------------------------------------------------------
// !help
// ---------------------------------------------------------------------------

pub struct HelpHandler {
    pub registry: CommandRegistry,
}

#[async_trait]
impl CommandHandler for HelpHandler {
    async fn handle(&self, _ctx: &CommandContext, _inv: &CommandInvocation) -> Result<String> {
        let mut lines = vec!["*Available commands:*".to_string()];
        for cmd in self.registry.all() {
            lines.push(format!("• `{}` — {}", cmd.usage(), cmd.description));
        }
        Ok(lines.join("\n"))
    }
}
