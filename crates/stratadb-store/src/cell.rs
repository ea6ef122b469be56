//! Cells and composite cell names.

use std::fmt;

/// A composite cell name: ordered string components compared
/// lexicographically component by component.
///
/// Component count and order are load-bearing; range reads rely on the
/// derived ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellName(Vec<String>);

impl CellName {
    /// Creates a cell name from its ordered components.
    pub fn new(components: Vec<String>) -> Self {
        Self(components)
    }

    /// The ordered components.
    pub fn components(&self) -> &[String] {
        &self.0
    }

    /// The component at `index`, if any.
    pub fn component(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }
}

impl fmt::Display for CellName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(":"))
    }
}

impl From<Vec<&str>> for CellName {
    fn from(components: Vec<&str>) -> Self {
        Self(components.into_iter().map(str::to_string).collect())
    }
}

/// A named cell value with its write timestamp (microseconds).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub name: CellName,
    pub value: Vec<u8>,
    pub timestamp_micros: i64,
}

impl Cell {
    pub fn new(name: CellName, value: Vec<u8>, timestamp_micros: i64) -> Self {
        Self {
            name,
            value,
            timestamp_micros,
        }
    }
}
