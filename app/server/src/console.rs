//! Interactive console — the asynchronous producer.
//!
//! Reads one line at a time from stdin and submits it as a command
//! task without waiting for the result: output chunks print (and
//! flush) as the dispatcher produces them, and the completion sink
//! reprints the prompt. End of input requests process-wide stop.

use bridge::{CommandSender, CommandTask, StopSignal};
use compact_str::CompactString;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Cut a raw input line at the first CR/LF and trim surrounding
/// whitespace. `None` means there is nothing to submit.
pub fn normalize_line(line: &str) -> Option<&str> {
    let line = match line.find(['\r', '\n']) {
        Some(idx) => &line[..idx],
        None => line,
    };
    let line = line.trim();
    (!line.is_empty()).then_some(line)
}

fn print_flush(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}

/// Run the console read loop until end of input or process stop.
pub async fn run(submit: CommandSender, stop: StopSignal, prompt: CompactString) {
    tracing::info!("console started");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_flush(&prompt);

    loop {
        let line = tokio::select! {
            biased;
            _ = stop.wait() => break,
            line = lines.next_line() => line,
        };

        match line {
            Ok(Some(line)) => {
                let Some(command) = normalize_line(&line) else {
                    print_flush(&prompt);
                    continue;
                };

                let completion_prompt = prompt.clone();
                let task = CommandTask::new(
                    command,
                    Box::new(|chunk: &str| print_flush(chunk)),
                    Box::new(move |_success| print_flush(&completion_prompt)),
                );
                // normalize_line only yields non-empty text.
                if let Ok(task) = task
                    && submit.submit(task).is_err()
                {
                    break;
                }
            }
            Ok(None) => {
                tracing::info!("console reached end of input, requesting stop");
                stop.trigger();
                break;
            }
            Err(err) => {
                tracing::error!("console read failed: {err}");
                stop.trigger();
                break;
            }
        }
    }
    tracing::info!("console stopped");
}
