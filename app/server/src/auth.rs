//! Account resolution and the administrator gate for the RPC path.
//!
//! The directory answers pure queries (resolve, secret check,
//! privilege); [`authorize`] composes them into the gate every RPC
//! request passes before a command task may be created.

use crate::config::AccountConfig;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque handle to a resolved account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountId(u32);

/// Privilege level granted to an account.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privilege {
    /// Ordinary account, no command access.
    #[default]
    User,
    /// Elevated account, still below the RPC gate.
    Moderator,
    /// Full administrative access.
    Admin,
}

/// Authorization error, reported to the producer before any task is
/// created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Missing or invalid credentials.
    Unauthenticated,
    /// Valid credentials but insufficient privilege.
    Forbidden,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "invalid credentials"),
            Self::Forbidden => write!(f, "insufficient privilege"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Pure account queries backing the RPC gate.
pub trait AccountDirectory: Send + Sync {
    /// Resolve an identity to an account, if known.
    fn resolve(&self, identity: &str) -> Option<AccountId>;
    /// Verify an account's secret.
    fn check_secret(&self, id: AccountId, secret: &str) -> bool;
    /// The privilege level granted to an account.
    fn privilege(&self, id: AccountId) -> Privilege;
}

struct AccountRecord {
    secret: String,
    privilege: Privilege,
}

/// Config-backed directory with a static account list.
pub struct StaticDirectory {
    records: Vec<AccountRecord>,
    index: BTreeMap<CompactString, u32>,
}

impl StaticDirectory {
    /// Build from the `[[accounts]]` config sections.
    pub fn from_config(accounts: &[AccountConfig]) -> Self {
        let mut records = Vec::with_capacity(accounts.len());
        let mut index = BTreeMap::new();
        for account in accounts {
            index.insert(account.identity.clone(), records.len() as u32);
            records.push(AccountRecord {
                secret: account.secret.clone(),
                privilege: account.privilege,
            });
        }
        Self { records, index }
    }

    fn record(&self, id: AccountId) -> Option<&AccountRecord> {
        self.records.get(id.0 as usize)
    }
}

impl AccountDirectory for StaticDirectory {
    fn resolve(&self, identity: &str) -> Option<AccountId> {
        self.index.get(identity).copied().map(AccountId)
    }

    fn check_secret(&self, id: AccountId, secret: &str) -> bool {
        self.record(id).is_some_and(|r| r.secret == secret)
    }

    fn privilege(&self, id: AccountId) -> Privilege {
        self.record(id).map(|r| r.privilege).unwrap_or_default()
    }
}

/// The administrator gate: missing credentials, unknown identity, or a
/// secret mismatch are all `Unauthenticated`; a resolved account below
/// [`Privilege::Admin`] is `Forbidden`.
pub fn authorize<D: AccountDirectory>(
    directory: &D,
    identity: Option<&str>,
    secret: Option<&str>,
) -> Result<AccountId, AuthError> {
    let (Some(identity), Some(secret)) = (identity, secret) else {
        tracing::debug!("client did not provide credentials");
        return Err(AuthError::Unauthenticated);
    };

    let Some(id) = directory.resolve(identity) else {
        tracing::debug!(identity, "unknown identity");
        return Err(AuthError::Unauthenticated);
    };

    if !directory.check_secret(id, secret) {
        tracing::debug!(identity, "secret mismatch");
        return Err(AuthError::Unauthenticated);
    }

    if directory.privilege(id) < Privilege::Admin {
        tracing::debug!(identity, "privilege below administrator");
        return Err(AuthError::Forbidden);
    }

    Ok(id)
}
