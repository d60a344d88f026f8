/*
 * Responsibility
 * - The resolved authorization scope of one request (AccessContext) and the
 *   inputs it is resolved from (Credentials, Share)
 *
 * Notes
 * - Resolution itself lives in resolver.rs; this file only holds the contract types.
 */
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::path::ResourcePath;

/// One operation a handler may require. Bit values follow the share permission mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Read,
    Update,
    Create,
    Delete,
    Share,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Read,
        Capability::Update,
        Capability::Create,
        Capability::Delete,
        Capability::Share,
    ];

    fn bit(self) -> u8 {
        match self {
            Capability::Read => 1,
            Capability::Update => 2,
            Capability::Create => 4,
            Capability::Delete => 8,
            Capability::Share => 16,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Read => "read",
            Capability::Update => "update",
            Capability::Create => "create",
            Capability::Delete => "delete",
            Capability::Share => "share",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    pub fn full() -> Self {
        Capability::ALL.into_iter().collect()
    }

    /// What a public link share grants.
    pub fn read_only() -> Self {
        [Capability::Read].into_iter().collect()
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    pub fn to_vec(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| self.contains(*c))
            .collect()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().fold(0, |acc, c| acc | c.bit()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    /// Signed-in account, full access to its own storage.
    Account,
    /// Public link share.
    Share { share_id: i64 },
}

/// Resolved scope of a single request. Only ever exposed fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessContext {
    pub owner: Uuid,
    pub root: ResourcePath,
    pub target: ResourcePath,
    pub scope: AccessScope,
    pub capabilities: CapabilitySet,
}

impl AccessContext {
    pub fn is_share(&self) -> bool {
        matches!(self.scope, AccessScope::Share { .. })
    }
}

/// What the caller presented. A share token wins over a session.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Share {
        token: String,
        password: Option<String>,
    },
    Session {
        bearer: String,
    },
    Anonymous,
}

impl Credentials {
    pub fn is_share(&self) -> bool {
        matches!(self, Credentials::Share { .. })
    }
}

// Never print secrets.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Share { password, .. } => f
                .debug_struct("Share")
                .field("token", &"<redacted>")
                .field("password", &password.as_ref().map(|_| "<redacted>"))
                .finish(),
            Credentials::Session { .. } => f
                .debug_struct("Session")
                .field("bearer", &"<redacted>")
                .finish(),
            Credentials::Anonymous => f.write_str("Anonymous"),
        }
    }
}

/// A public link share as the store knows it.
#[derive(Debug, Clone)]
pub struct Share {
    pub id: i64,
    pub token: String,
    pub owner: Uuid,
    pub path: String,
    pub password_hash: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Share {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}
