//! Capstan server — application shell wiring the dispatch bridge to
//! its producers: an interactive console on stdin/stdout and an
//! authenticated HTTP RPC endpoint.

pub mod auth;
pub mod config;
pub mod console;
pub mod interpreter;
pub mod rpc;
pub mod utils;

pub use auth::{AccountDirectory, AccountId, AuthError, Privilege, StaticDirectory, authorize};
pub use config::ServerConfig;
pub use interpreter::AdminInterpreter;
pub use rpc::{ExecuteReply, ExecuteRequest, ExecuteResponse, RpcState};
