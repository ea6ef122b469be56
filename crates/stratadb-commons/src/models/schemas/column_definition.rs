//! Definition of a regular (non-key) column.

use crate::models::ids::ColumnName;
use crate::models::types::ValueType;
use serde::{Deserialize, Serialize};

/// Definition of a regular column.
///
/// Key parts and the value alias are described by the schema's validators and
/// alias vectors, not by entries here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column identifier.
    pub column_name: ColumnName,

    /// Current value type; changes only through the compatibility lattice.
    pub value_type: ValueType,
}

impl ColumnDefinition {
    /// Creates a new regular-column definition.
    pub fn new(column_name: ColumnName, value_type: ValueType) -> Self {
        Self {
            column_name,
            value_type,
        }
    }
}
