//! Command tasks and their result-delivery sinks.
//!
//! A task bundles the command text with two producer-supplied sinks.
//! Both sinks run on the dispatcher only: the output sink zero or more
//! times while the command runs, the completion sink exactly once when
//! it finishes. `FnOnce` makes a second completion unrepresentable.

use crate::error::SubmitError;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Receives chunks of command output. Invoked only by the dispatcher.
///
/// `Sync` because interpreter futures hold a shared reference to the
/// sink across await points.
pub type OutputSink = Box<dyn Fn(&str) + Send + Sync>;

/// Receives the success flag once the command has finished.
pub type CompletionSink = Box<dyn FnOnce(bool) + Send>;

/// A queued unit of work: command text plus its delivery contract.
///
/// Ownership moves into the submission queue on submit and to the
/// dispatcher on receive; the dispatcher drops the task after the
/// completion sink has run. Tasks are never reused or re-queued.
pub struct CommandTask {
    text: String,
    output: OutputSink,
    completion: CompletionSink,
}

/// The result a collecting producer receives: success flag plus all
/// output the command wrote, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Whether the interpreter reported success.
    pub success: bool,
    /// Accumulated output text.
    pub output: String,
}

/// Awaitable handle to a collecting task's outcome.
#[derive(Debug)]
pub struct ResultHandle {
    rx: oneshot::Receiver<CommandOutcome>,
}

impl ResultHandle {
    /// Wait for the command to finish.
    ///
    /// Returns `None` when the task was abandoned: the dispatcher
    /// stopped before executing it and dropped the completion sink.
    pub async fn outcome(self) -> Option<CommandOutcome> {
        self.rx.await.ok()
    }
}

impl CommandTask {
    /// Build a task from command text and sinks.
    ///
    /// Empty or whitespace-only text is rejected before a task exists.
    pub fn new(
        text: impl Into<String>,
        output: OutputSink,
        completion: CompletionSink,
    ) -> Result<Self, SubmitError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SubmitError::Empty);
        }
        Ok(Self {
            text,
            output,
            completion,
        })
    }

    /// Build the synchronous-producer variant: output accumulates into
    /// a buffer and completion resolves the returned [`ResultHandle`]
    /// with the collected text.
    pub fn collecting(text: impl Into<String>) -> Result<(Self, ResultHandle), SubmitError> {
        let (tx, rx) = oneshot::channel();
        let buffer = Arc::new(Mutex::new(String::new()));
        let sink_buffer = Arc::clone(&buffer);

        let output: OutputSink = Box::new(move |chunk| {
            sink_buffer.lock().unwrap().push_str(chunk);
        });
        let completion: CompletionSink = Box::new(move |success| {
            let output = std::mem::take(&mut *buffer.lock().unwrap());
            // Receiver may have given up waiting; nothing to do then.
            let _ = tx.send(CommandOutcome { success, output });
        });

        Ok((Self::new(text, output, completion)?, ResultHandle { rx }))
    }

    /// The command text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn into_parts(self) -> (String, OutputSink, CompletionSink) {
        (self.text, self.output, self.completion)
    }
}

impl std::fmt::Debug for CommandTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandTask")
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}
