//! Type-safe wrapper for column identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe wrapper for column identifiers.
///
/// Ordered so it can key the `BTreeMap`s inside the schema model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnName(String);

impl ColumnName {
    /// Creates a new ColumnName from a string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the column name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ColumnName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ColumnName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
