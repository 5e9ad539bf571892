//! Connection identity types
//!
//! `SessionMetadata` is created once per connection after a successful
//! handshake and carried by value next to the socket handle for the
//! connection's whole lifetime. It is never mutated.

use serde::{Deserialize, Serialize};

/// Privilege level decoded from the handshake credential.
///
/// Ordering follows privilege: `SuperAdmin > Admin > User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
            Role::SuperAdmin => write!(f, "super_admin"),
        }
    }
}

impl Role {
    /// Whether this role carries at least the privilege of `other`.
    pub fn at_least(&self, other: Role) -> bool {
        *self >= other
    }
}

/// Identity attached to a connection after a successful handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Subject the credential was issued to
    pub subject: String,
    /// Privilege level encoded in the credential
    pub role: Role,
}

impl SessionMetadata {
    pub fn new(subject: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            role,
        }
    }
}
