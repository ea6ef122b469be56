//! Type-safe wrapper for keyspace identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe wrapper for keyspace identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyspaceName(String);

impl KeyspaceName {
    /// Creates a new KeyspaceName from a string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the keyspace name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for KeyspaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for KeyspaceName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for KeyspaceName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
