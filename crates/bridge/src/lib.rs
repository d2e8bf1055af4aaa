//! Capstan bridge — cross-thread command dispatch core.
//!
//! Any number of producers build a [`CommandTask`] (command text plus
//! output and completion sinks) and push it onto the submission queue;
//! a single dispatcher drains the queue in strict FIFO order, runs
//! each command through the [`Interpreter`], streams output through the
//! task's sinks, and signals completion exactly once. Producers never
//! execute commands themselves.

pub mod dispatch;
pub mod error;
pub mod queue;
pub mod stop;
pub mod task;

pub use dispatch::{Dispatcher, Interpreter};
pub use error::SubmitError;
pub use queue::{CommandQueue, CommandSender, queue};
pub use stop::StopSignal;
pub use task::{CommandOutcome, CommandTask, CompletionSink, OutputSink, ResultHandle};
