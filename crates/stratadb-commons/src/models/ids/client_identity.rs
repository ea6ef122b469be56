//! Identity of the client submitting a schema mutation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The authenticated client on whose behalf a schema mutation runs.
///
/// Access control has already been enforced by the time this reaches the
/// schema layer; the identity is only recorded in the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    /// Creates a new ClientIdentity from a user name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the client name as a string slice.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClientIdentity {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
