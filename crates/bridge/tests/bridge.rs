//! Dispatch bridge tests: ordering, sink contracts, shutdown.

use capstan_bridge::{
    CommandTask, Dispatcher, Interpreter, OutputSink, StopSignal, SubmitError, queue,
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};
use tokio::sync::oneshot;

/// Interpreter that records executed commands, echoes one output
/// chunk, and fails commands named "fail" and panics on "boom".
struct Recording {
    log: Arc<Mutex<Vec<String>>>,
}

impl Recording {
    fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (Self { log: Arc::clone(&log) }, log)
    }
}

impl Interpreter for Recording {
    async fn execute(&mut self, text: &str, output: &OutputSink) -> bool {
        if text == "boom" {
            panic!("interpreter exploded");
        }
        self.log.lock().unwrap().push(text.to_string());
        output(&format!("ran {text}"));
        text != "fail"
    }
}

#[tokio::test]
async fn fifo_across_cloned_senders() {
    let (sender, commands) = queue();
    let (interpreter, log) = Recording::new();
    let stop = StopSignal::new();
    let dispatcher = tokio::spawn(Dispatcher::new(commands, interpreter, stop).run());

    let other = sender.clone();
    for (producer, text) in [
        (&sender, "first"),
        (&other, "second"),
        (&sender, "third"),
        (&other, "fourth"),
    ] {
        let (task, _handle) = CommandTask::collecting(text).unwrap();
        producer.submit(task).unwrap();
    }

    // A final collecting task tells us everything before it ran.
    let (task, handle) = CommandTask::collecting("last").unwrap();
    sender.submit(task).unwrap();
    assert!(handle.outcome().await.unwrap().success);

    assert_eq!(
        *log.lock().unwrap(),
        ["first", "second", "third", "fourth", "last"]
    );

    drop(sender);
    drop(other);
    dispatcher.await.unwrap();
}

#[tokio::test]
async fn completion_fires_once_after_all_output() {
    let (sender, commands) = queue();
    let (interpreter, _log) = Recording::new();
    let stop = StopSignal::new();
    let dispatcher = tokio::spawn(Dispatcher::new(commands, interpreter, stop).run());

    let events = Arc::new(Mutex::new(Vec::new()));
    let completions = Arc::new(AtomicUsize::new(0));
    let (done_tx, done_rx) = oneshot::channel();

    let output_events = Arc::clone(&events);
    let completion_events = Arc::clone(&events);
    let completion_count = Arc::clone(&completions);
    let task = CommandTask::new(
        "status",
        Box::new(move |chunk| output_events.lock().unwrap().push(format!("out:{chunk}"))),
        Box::new(move |success| {
            completion_events.lock().unwrap().push(format!("done:{success}"));
            completion_count.fetch_add(1, Ordering::SeqCst);
            let _ = done_tx.send(());
        }),
    )
    .unwrap();
    sender.submit(task).unwrap();
    done_rx.await.unwrap();

    assert_eq!(*events.lock().unwrap(), ["out:ran status", "done:true"]);
    assert_eq!(completions.load(Ordering::SeqCst), 1);

    drop(sender);
    dispatcher.await.unwrap();
}

#[tokio::test]
async fn collecting_outcome_carries_output_on_failure() {
    let (sender, commands) = queue();
    let (interpreter, _log) = Recording::new();
    let stop = StopSignal::new();
    let dispatcher = tokio::spawn(Dispatcher::new(commands, interpreter, stop).run());

    let (task, handle) = CommandTask::collecting("fail").unwrap();
    sender.submit(task).unwrap();
    let outcome = handle.outcome().await.unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.output, "ran fail");

    let (task, handle) = CommandTask::collecting("status").unwrap();
    sender.submit(task).unwrap();
    let outcome = handle.outcome().await.unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.output, "ran status");

    drop(sender);
    dispatcher.await.unwrap();
}

#[tokio::test]
async fn stop_abandons_queued_tasks() {
    let (sender, commands) = queue();
    let (interpreter, log) = Recording::new();
    let stop = StopSignal::new();

    let completed = Arc::new(AtomicBool::new(false));
    let completion_flag = Arc::clone(&completed);
    let task = CommandTask::new(
        "never-runs",
        Box::new(|_| {}),
        Box::new(move |_| completion_flag.store(true, Ordering::SeqCst)),
    )
    .unwrap();
    sender.submit(task).unwrap();

    let (task, handle) = CommandTask::collecting("also-never-runs").unwrap();
    sender.submit(task).unwrap();

    // Stop before the dispatcher ever starts draining.
    stop.trigger();
    Dispatcher::new(commands, interpreter, stop).run().await;

    assert!(log.lock().unwrap().is_empty());
    assert!(!completed.load(Ordering::SeqCst));
    // Abandonment surfaces as a closed result channel.
    assert_eq!(handle.outcome().await, None);

    // The queue is gone with the dispatcher.
    let (task, _handle) = CommandTask::collecting("late").unwrap();
    assert_eq!(sender.submit(task).unwrap_err(), SubmitError::Closed);
}

#[tokio::test]
async fn interpreter_panic_reports_failure_and_loop_survives() {
    let (sender, commands) = queue();
    let (interpreter, log) = Recording::new();
    let stop = StopSignal::new();
    let dispatcher = tokio::spawn(Dispatcher::new(commands, interpreter, stop).run());

    let (task, handle) = CommandTask::collecting("boom").unwrap();
    sender.submit(task).unwrap();
    let outcome = handle.outcome().await.unwrap();
    assert!(!outcome.success);

    let (task, handle) = CommandTask::collecting("status").unwrap();
    sender.submit(task).unwrap();
    assert!(handle.outcome().await.unwrap().success);
    assert_eq!(*log.lock().unwrap(), ["status"]);

    drop(sender);
    dispatcher.await.unwrap();
}

#[test]
fn empty_command_is_rejected_before_a_task_exists() {
    let err = CommandTask::new("", Box::new(|_| {}), Box::new(|_| {})).unwrap_err();
    assert_eq!(err, SubmitError::Empty);

    let err = CommandTask::collecting("   \t").unwrap_err();
    assert_eq!(err, SubmitError::Empty);
}

#[tokio::test]
async fn stop_signal_is_idempotent_and_shared() {
    let stop = StopSignal::new();
    let observer = stop.clone();
    assert!(!observer.is_stopped());

    let waiter = tokio::spawn(async move { observer.wait().await });
    stop.trigger();
    stop.trigger();
    waiter.await.unwrap();
    assert!(stop.is_stopped());

    // Waiting after the fact resolves immediately.
    stop.wait().await;
}

#[test]
fn submit_error_display() {
    assert_eq!(SubmitError::Empty.to_string(), "command text is empty");
    assert_eq!(
        SubmitError::Closed.to_string(),
        "dispatcher is no longer accepting commands"
    );
}
