//! Submission queue — the single hand-off point between producers and
//! the dispatcher.
//!
//! An unbounded mpsc channel: any number of cloned senders, one
//! receiver owned by the dispatcher. Tasks come out in the exact order
//! sends completed, globally across all producers.

use crate::{error::SubmitError, task::CommandTask};
use tokio::sync::mpsc;

/// Producer-side handle. Cheap to clone, safe to use from any task.
#[derive(Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<CommandTask>,
}

/// Consumer side, owned exclusively by the dispatcher.
pub struct CommandQueue {
    rx: mpsc::UnboundedReceiver<CommandTask>,
}

/// Create a connected sender/queue pair.
pub fn queue() -> (CommandSender, CommandQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CommandSender { tx }, CommandQueue { rx })
}

impl CommandSender {
    /// Enqueue a task without blocking.
    ///
    /// Fails with [`SubmitError::Closed`] once the dispatcher has
    /// stopped and dropped its end of the queue.
    pub fn submit(&self, task: CommandTask) -> Result<(), SubmitError> {
        self.tx.send(task).map_err(|_| SubmitError::Closed)
    }
}

impl CommandQueue {
    /// Receive the oldest queued task, or `None` when every sender is
    /// gone and the queue has drained.
    pub async fn recv(&mut self) -> Option<CommandTask> {
        self.rx.recv().await
    }

    /// Number of tasks currently queued.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether the queue is currently empty.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
