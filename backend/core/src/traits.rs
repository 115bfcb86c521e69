use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::message::WorkerJob;
use crate::types::{EntrySummary, GlossaryEntry};

/// Trait for long-running runtime components (the command worker).
///
/// Each component consumes jobs from its channel and runs in its own Tokio task.
#[async_trait]
pub trait Component: Send + Sync + 'static {
    /// Human-readable name of this component.
    fn name(&self) -> &str;

    /// Start the component's event loop, consuming from the given receiver.
    async fn start(&self, rx: mpsc::Receiver<WorkerJob>) -> Result<()>;
}

/// Keyed glossary storage. All access is by primary key or full scan;
/// there is no locking or versioning, so the last writer wins.
#[async_trait]
pub trait GlossaryStore: Send + Sync {
    /// Fetch one entry by keyword.
    async fn get(&self, keyword: &str) -> Result<Option<GlossaryEntry>>;

    /// Write an entry, replacing any existing row with the same keyword.
    async fn put(&self, entry: GlossaryEntry) -> Result<()>;

    /// Overwrite only the description. A missing keyword gets a new row
    /// with no `created_at`.
    async fn update_description(&self, keyword: &str, description: &str) -> Result<()>;

    /// Remove an entry. Deleting a missing keyword is not an error.
    async fn delete(&self, keyword: &str) -> Result<()>;

    /// All rows projected to keyword and creation time.
    async fn scan_summaries(&self) -> Result<Vec<EntrySummary>>;

    /// All keywords in store iteration order.
    async fn scan_keywords(&self) -> Result<Vec<String>>;
}

/// Outbound side of the messaging platform.
#[async_trait]
pub trait ChatSender: Send + Sync {
    /// Post `text` to `channel`.
    async fn send_message(&self, channel: &str, text: &str) -> Result<()>;
}

/// Non-blocking hand-off from the receiver to the command worker.
///
/// Delivery is at-most-once and unordered: two jobs dispatched back to back
/// may execute in either order, and a job that fails to hand off is dropped.
pub trait JobDispatcher: Send + Sync {
    fn dispatch(&self, job: WorkerJob) -> Result<()>;
}
