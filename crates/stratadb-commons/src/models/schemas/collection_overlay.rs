//! Collection overlay: dynamic per-row collection columns.
//!
//! The overlay is the reserved trailing comparator slot mapping column names
//! to collection-typed values. A table carries at most one overlay, and only
//! when its comparator is composite.

use crate::models::ids::ColumnName;
use crate::models::types::ValueType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from column identifier to collection value type, attached at the
/// final comparator slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CollectionOverlay {
    columns: BTreeMap<ColumnName, ValueType>,
}

impl CollectionOverlay {
    /// Creates an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs or replaces the mapping entry for `column`.
    pub fn insert(&mut self, column: ColumnName, value_type: ValueType) {
        self.columns.insert(column, value_type);
    }

    /// Removes the mapping entry for `column`, returning its type.
    pub fn remove(&mut self, column: &ColumnName) -> Option<ValueType> {
        self.columns.remove(column)
    }

    /// The collection type mapped for `column`, if any.
    pub fn get(&self, column: &ColumnName) -> Option<&ValueType> {
        self.columns.get(column)
    }

    /// True when `column` has a mapping entry.
    pub fn contains(&self, column: &ColumnName) -> bool {
        self.columns.contains_key(column)
    }

    /// True when no columns are mapped.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The full column → collection-type mapping.
    pub fn columns(&self) -> &BTreeMap<ColumnName, ValueType> {
        &self.columns
    }
}
