use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::error::GlossError;
use crate::message::WorkerJob;
use crate::traits::JobDispatcher;

/// Default queue size between the receiver and the worker.
pub const DEFAULT_BUFFER_SIZE: usize = 256;

/// In-process job queue connecting the front receiver to the command worker.
///
/// Built on a bounded Tokio mpsc channel; the receiver never waits on it.
pub struct JobBus {
    pub worker_tx: mpsc::Sender<WorkerJob>,
    pub worker_rx: Option<mpsc::Receiver<WorkerJob>>,
}

impl JobBus {
    /// Create a new bus with the default buffer size.
    pub fn new() -> Self {
        Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
    }

    /// Create a new bus with a custom buffer size.
    pub fn with_buffer_size(buffer: usize) -> Self {
        let (worker_tx, worker_rx) = mpsc::channel(buffer.max(1));
        info!(buffer_size = buffer, "JobBus initialized");
        Self {
            worker_tx,
            worker_rx: Some(worker_rx),
        }
    }

    /// Take the worker receiver (can only be called once).
    pub fn take_worker_rx(&mut self) -> Option<mpsc::Receiver<WorkerJob>> {
        debug!("Worker receiver taken");
        self.worker_rx.take()
    }

    /// A dispatcher feeding this bus.
    pub fn dispatcher(&self) -> QueueDispatcher {
        QueueDispatcher::new(self.worker_tx.clone())
    }
}

impl Default for JobBus {
    fn default() -> Self {
        Self::new()
    }
}

/// `JobDispatcher` backed by the in-process queue.
#[derive(Clone)]
pub struct QueueDispatcher {
    tx: mpsc::Sender<WorkerJob>,
}

impl QueueDispatcher {
    pub fn new(tx: mpsc::Sender<WorkerJob>) -> Self {
        Self { tx }
    }
}

impl JobDispatcher for QueueDispatcher {
    fn dispatch(&self, job: WorkerJob) -> Result<()> {
        self.tx.try_send(job).map_err(|e| {
            let reason = match e {
                mpsc::error::TrySendError::Full(_) => "worker queue full",
                mpsc::error::TrySendError::Closed(_) => "worker queue closed",
            };
            GlossError::Dispatch(reason.to_string()).into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bus_dispatch_receive() {
        let mut bus = JobBus::new();
        let mut rx = bus.take_worker_rx().unwrap();

        bus.dispatcher().dispatch(WorkerJob::new("!list", "C1")).unwrap();
        let received = rx.recv().await.unwrap();
        assert_eq!(received, WorkerJob::new("!list", "C1"));
    }

    #[tokio::test]
    async fn test_bus_take_rx_once() {
        let mut bus = JobBus::new();
        assert!(bus.take_worker_rx().is_some());
        assert!(bus.take_worker_rx().is_none());
    }

    #[tokio::test]
    async fn test_dispatch_does_not_block_when_full() {
        let mut bus = JobBus::with_buffer_size(2);
        let _rx = bus.take_worker_rx().unwrap();
        let dispatcher = bus.dispatcher();

        for _ in 0..2 {
            dispatcher.dispatch(WorkerJob::new("!list", "C1")).unwrap();
        }

        let err = dispatcher.dispatch(WorkerJob::new("!list", "C1")).unwrap_err();
        assert!(err.to_string().contains("queue full"));
    }

    #[tokio::test]
    async fn test_dispatch_after_worker_gone() {
        let mut bus = JobBus::new();
        drop(bus.take_worker_rx());
        let err = bus.dispatcher().dispatch(WorkerJob::new("!list", "C1")).unwrap_err();
        assert!(err.to_string().contains("closed"));
    }
}
