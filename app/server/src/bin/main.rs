//! Capstand binary entry point.
//!
//! Loads TOML configuration, builds the submission queue and stop
//! signal, spawns the dispatcher, the RPC endpoint, and the console
//! loop, and shuts everything down on ctrl-c, console EOF, or the
//! `shutdown` command.

use anyhow::Result;
use bridge::{Dispatcher, StopSignal, queue};
use capstan_server::{AdminInterpreter, RpcState, ServerConfig, StaticDirectory, console, rpc};
use std::{path::Path, sync::Arc};
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing from RUST_LOG (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load configuration.
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "capstand.toml".to_string());
    let config = if Path::new(&config_path).exists() {
        let config = ServerConfig::load(Path::new(&config_path))?;
        tracing::info!("loaded configuration from {config_path}");
        config
    } else {
        tracing::info!("no configuration at {config_path}, using defaults");
        ServerConfig::default()
    };

    let stop = StopSignal::new();
    let (sender, commands) = queue();

    // The one consumer: dispatcher over the built-in interpreter.
    let interpreter = AdminInterpreter::new(stop.clone());
    let dispatcher = tokio::spawn(Dispatcher::new(commands, interpreter, stop.clone()).run());

    // RPC producer. A bind failure has already requested stop; record
    // the error so the process exits non-zero after shutdown.
    let mut rpc_handle = None;
    let mut rpc_error = None;
    if config.rpc.enabled {
        let state = RpcState {
            directory: Arc::new(StaticDirectory::from_config(&config.accounts)),
            submit: sender.clone(),
            stop: stop.clone(),
        };
        match rpc::serve(state, &config.bind_address()).await {
            Ok(handle) => rpc_handle = Some(handle),
            Err(err) => rpc_error = Some(err),
        }
    } else {
        tracing::info!("rpc endpoint disabled by configuration");
    }

    // Console producer.
    let console = tokio::spawn(console::run(
        sender.clone(),
        stop.clone(),
        config.console.prompt.clone(),
    ));

    // Ctrl-c also requests stop.
    let ctrl_stop = stop.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            ctrl_stop.trigger();
        }
    });

    // Run until something requests stop, then drain the subsystems.
    stop.wait().await;
    drop(sender);
    dispatcher.await?;
    console.await?;
    if let Some(handle) = rpc_handle {
        handle.finished().await?;
    }
    tracing::info!("capstand shut down");

    match rpc_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
