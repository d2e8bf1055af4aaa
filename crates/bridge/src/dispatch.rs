//! The dispatcher — single consumer loop over the submission queue.

use crate::{
    queue::CommandQueue,
    stop::StopSignal,
    task::{CommandTask, OutputSink},
};
use futures_util::FutureExt;
use std::{future::Future, panic::AssertUnwindSafe};

/// Executes command text on behalf of the dispatcher.
///
/// Invoked only from the dispatcher loop, so implementations need no
/// internal locking. May call the output sink any number of times
/// before returning the success flag.
///
/// Uses RPITIT (no dyn dispatch).
pub trait Interpreter: Send {
    /// Run one command, streaming output through `output`.
    fn execute(&mut self, text: &str, output: &OutputSink) -> impl Future<Output = bool> + Send;
}

/// The single consumer of the submission queue.
///
/// Drains tasks in FIFO order until the stop signal fires. Spawn
/// [`Dispatcher::run`] exactly once; producers keep cloned
/// [`CommandSender`](crate::CommandSender)s.
pub struct Dispatcher<I: Interpreter> {
    queue: CommandQueue,
    interpreter: I,
    stop: StopSignal,
}

impl<I: Interpreter> Dispatcher<I> {
    /// Create a dispatcher over a queue and an interpreter.
    pub fn new(queue: CommandQueue, interpreter: I, stop: StopSignal) -> Self {
        Self {
            queue,
            interpreter,
            stop,
        }
    }

    /// Run the dispatch loop until the stop signal fires or every
    /// sender is gone.
    ///
    /// Stopping is terminal: tasks still queued are dropped without
    /// executing and their completion sinks never fire. A collecting
    /// producer observes that through its closed result channel.
    pub async fn run(mut self) {
        tracing::info!("dispatcher started");
        loop {
            let task = tokio::select! {
                biased;
                _ = self.stop.wait() => None,
                task = self.queue.recv() => task,
            };
            let Some(task) = task else { break };
            self.execute(task).await;
        }
        let abandoned = self.queue.len();
        if abandoned > 0 {
            tracing::info!(abandoned, "dispatcher stopped, dropping queued tasks");
        } else {
            tracing::info!("dispatcher stopped");
        }
    }

    async fn execute(&mut self, task: CommandTask) {
        let (text, output, completion) = task.into_parts();
        tracing::debug!(command = %text, "executing command");

        let run = AssertUnwindSafe(self.interpreter.execute(&text, &output)).catch_unwind();
        let success = match run.await {
            Ok(success) => success,
            Err(_) => {
                tracing::error!(command = %text, "interpreter panicked, reporting failure");
                false
            }
        };

        completion(success);
    }
}
