pub mod channel;
pub mod error;
pub mod message;
pub mod traits;
pub mod types;

pub use channel::{JobBus, QueueDispatcher};
pub use error::GlossError;
pub use message::WorkerJob;
pub use traits::{ChatSender, Component, GlossaryStore, JobDispatcher};
pub use types::{EntrySummary, GlossaryEntry};
