use serde::{Deserialize, Serialize};

/// Payload handed from the front receiver to the command worker.
///
/// The receiver has already stripped the bot mention; the worker trims and
/// parses `text` itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerJob {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub channel: String,
}

impl WorkerJob {
    pub fn new(text: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            channel: channel.into(),
        }
    }
}
