//! HTTP RPC endpoint — the synchronous producer.
//!
//! A caller posts identity, secret, and command text; the handler
//! passes the administrator gate, submits a collecting task, and waits
//! for the dispatcher to finish the command before answering. Command
//! failure is an application-level fault carrying the accumulated
//! output, not a transport error.

use crate::auth::{AccountDirectory, AuthError, authorize};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use bridge::{CommandSender, CommandTask, StopSignal};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Shared state available to the RPC handler.
pub struct RpcState<D: AccountDirectory> {
    /// Account directory backing the gate.
    pub directory: Arc<D>,
    /// Producer handle onto the submission queue.
    pub submit: CommandSender,
    /// Process stop signal; a waiting handler unblocks on it.
    pub stop: StopSignal,
}

impl<D: AccountDirectory> Clone for RpcState<D> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            submit: self.submit.clone(),
            stop: self.stop.clone(),
        }
    }
}

/// RPC request body.
#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    /// Login identity.
    pub identity: Option<String>,
    /// Shared secret.
    pub secret: Option<String>,
    /// Command text to execute.
    #[serde(default)]
    pub command: String,
}

/// RPC response body: either the command output or a fault payload.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteResponse {
    /// Output of a successfully executed command.
    Result(String),
    /// Rejection reason or the output of a failed command.
    Fault(String),
}

/// Status plus body, as produced by [`execute`].
#[derive(Debug, PartialEq, Eq)]
pub struct ExecuteReply {
    /// HTTP status.
    pub status: StatusCode,
    /// Response body.
    pub body: ExecuteResponse,
}

impl ExecuteReply {
    fn fault(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ExecuteResponse::Fault(message.into()),
        }
    }
}

impl IntoResponse for ExecuteReply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Run one RPC request end to end: gate, submit, wait, answer.
///
/// Rejections (401/403/400) happen before any task is created. Once a
/// task is queued the handler waits for its outcome, unblocking with
/// 503 if the process stops first or the task is abandoned.
pub async fn execute<D: AccountDirectory>(
    state: &RpcState<D>,
    request: ExecuteRequest,
) -> ExecuteReply {
    if let Err(err) = authorize(
        state.directory.as_ref(),
        request.identity.as_deref(),
        request.secret.as_deref(),
    ) {
        let status = match err {
            AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
        };
        return ExecuteReply::fault(status, err.to_string());
    }

    let (task, handle) = match CommandTask::collecting(request.command) {
        Ok(pair) => pair,
        Err(err) => return ExecuteReply::fault(StatusCode::BAD_REQUEST, err.to_string()),
    };

    tracing::debug!(command = task.text(), "rpc command accepted");
    if state.submit.submit(task).is_err() {
        return ExecuteReply::fault(StatusCode::SERVICE_UNAVAILABLE, "server stopping");
    }

    tokio::select! {
        outcome = handle.outcome() => match outcome {
            Some(outcome) if outcome.success => ExecuteReply {
                status: StatusCode::OK,
                body: ExecuteResponse::Result(outcome.output),
            },
            Some(outcome) => ExecuteReply::fault(StatusCode::UNPROCESSABLE_ENTITY, outcome.output),
            // Task abandoned: the dispatcher stopped before running it.
            None => ExecuteReply::fault(StatusCode::SERVICE_UNAVAILABLE, "server stopping"),
        },
        _ = state.stop.wait() => {
            ExecuteReply::fault(StatusCode::SERVICE_UNAVAILABLE, "server stopping")
        }
    }
}

async fn execute_handler<D: AccountDirectory + 'static>(
    State(state): State<RpcState<D>>,
    Json(request): Json<ExecuteRequest>,
) -> ExecuteReply {
    execute(&state, request).await
}

/// Build the axum router with the `/execute` endpoint.
pub fn router<D: AccountDirectory + 'static>(state: RpcState<D>) -> Router {
    Router::new()
        .route("/execute", post(execute_handler::<D>))
        .with_state(state)
}

/// Handle returned by [`serve`] — holds the bound port and the server
/// task.
pub struct ServeHandle {
    /// The port the RPC endpoint is listening on.
    pub port: u16,
    join: JoinHandle<Result<(), std::io::Error>>,
}

impl ServeHandle {
    /// Wait for the server task to finish (it stops with the process
    /// stop signal).
    pub async fn finished(self) -> anyhow::Result<()> {
        self.join.await??;
        Ok(())
    }
}

/// Bind the listener and serve the RPC endpoint until the stop signal
/// fires.
///
/// A bind failure triggers process-wide stop before returning the
/// error: the server must not keep running half-started.
pub async fn serve<D: AccountDirectory + 'static>(
    state: RpcState<D>,
    bind: &str,
) -> anyhow::Result<ServeHandle> {
    let listener = match tokio::net::TcpListener::bind(bind).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("rpc listener could not bind to {bind}: {err}");
            state.stop.trigger();
            return Err(err.into());
        }
    };
    let port = listener.local_addr()?.port();
    tracing::info!("rpc listening on {bind} (port {port})");

    let stop = state.stop.clone();
    let app = router(state);
    let join = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                stop.wait().await;
                tracing::info!("rpc server shutting down");
            })
            .await
    });

    Ok(ServeHandle { port, join })
}
