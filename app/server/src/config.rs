//! Server configuration loaded from TOML.

use crate::auth::Privilege;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default console prompt.
pub const DEFAULT_PROMPT: &str = "cap> ";

/// Top-level server configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// RPC endpoint configuration.
    pub rpc: RpcConfig,
    /// Interactive console configuration.
    pub console: ConsoleConfig,
    /// Accounts allowed through the RPC gate.
    pub accounts: Vec<AccountConfig>,
}

/// RPC endpoint configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Whether the RPC endpoint is served at all.
    pub enabled: bool,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_owned(),
            port: 7878,
        }
    }
}

/// Interactive console configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Prompt printed before each line of input and after each
    /// finished command.
    pub prompt: CompactString,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.into(),
        }
    }
}

/// One account entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Login identity.
    pub identity: CompactString,
    /// Shared secret (supports `${ENV_VAR}` expansion).
    pub secret: String,
    /// Granted privilege level.
    #[serde(default)]
    pub privilege: Privilege,
}

impl ServerConfig {
    /// Parse a TOML string, expanding environment variables in
    /// supported fields.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        let expanded = crate::utils::expand_env_vars(toml_str);
        let config: Self = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// The RPC bind address as `host:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.rpc.host, self.rpc.port)
    }
}
