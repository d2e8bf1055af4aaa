//! Process-wide stop signal.
//!
//! A shared one-way flag: any component may trigger it, every holder
//! observes it. Blocking waits throughout the system select over
//! [`StopSignal::wait`] instead of polling a timeout.

use std::sync::Arc;
use tokio::sync::watch;

/// Cloneable handle to the process stop flag.
#[derive(Clone)]
pub struct StopSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl StopSignal {
    /// Create a new, untriggered signal.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request process-wide stop. Idempotent; visible to all clones.
    pub fn trigger(&self) {
        if !self.tx.send_replace(true) {
            tracing::info!("stop signal triggered");
        }
    }

    /// Whether stop has been requested.
    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once stop has been requested, immediately if it already
    /// has been.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so this cannot error.
        let _ = rx.wait_for(|stopped| *stopped).await;
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}
