//! Built-in administrative interpreter.
//!
//! The bridge treats the interpreter as an external collaborator; this
//! one ships with the server so the binary is operable out of the box.
//! It covers process-level commands only.

use bridge::{Interpreter, OutputSink, StopSignal};
use std::{future::Future, time::Instant};

/// Process-level command interpreter: help, version, uptime, shutdown.
pub struct AdminInterpreter {
    stop: StopSignal,
    started: Instant,
}

impl AdminInterpreter {
    /// Create an interpreter that can request process stop.
    pub fn new(stop: StopSignal) -> Self {
        Self {
            stop,
            started: Instant::now(),
        }
    }

    fn run(&self, text: &str, output: &OutputSink) -> bool {
        let mut words = text.split_whitespace();
        // CommandTask guarantees non-empty text.
        let command = words.next().unwrap_or_default();

        match command {
            "help" => {
                output("commands: help, version, uptime, shutdown\n");
                true
            }
            "version" => {
                output(concat!("capstand ", env!("CARGO_PKG_VERSION"), "\n"));
                true
            }
            "uptime" => {
                output(&format!("up {}s\n", self.started.elapsed().as_secs()));
                true
            }
            "shutdown" => {
                output("shutting down\n");
                self.stop.trigger();
                true
            }
            other => {
                output(&format!("unknown command: {other}\n"));
                false
            }
        }
    }
}

impl Interpreter for AdminInterpreter {
    fn execute(&mut self, text: &str, output: &OutputSink) -> impl Future<Output = bool> + Send {
        let success = self.run(text, output);
        std::future::ready(success)
    }
}
