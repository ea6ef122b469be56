//! Alter operations as a sum type, one variant per kind.

use std::collections::BTreeMap;
use std::fmt;
use stratadb_commons::{ColumnName, TableOptionsUpdate, ValueType};

/// A single structural change request against one table.
///
/// Dispatched by one `apply` match; each variant carries exactly the payload
/// its validation needs.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterOperation {
    /// Add a regular column. Collection types install a collection overlay
    /// entry alongside the column.
    Add {
        column: ColumnName,
        value_type: ValueType,
    },

    /// Change a column's value type. Key parts are replaced positionally and
    /// unconditionally; value alias and regular columns pass the
    /// compatibility lattice.
    Alter {
        column: ColumnName,
        value_type: ValueType,
    },

    /// Drop a regular column or the value alias. A second drop of an
    /// already-removed column finalizes it permanently.
    Drop { column: ColumnName },

    /// Rename key parts or the value alias, old name to new name.
    Rename {
        renames: BTreeMap<ColumnName, ColumnName>,
    },

    /// Update storage options atomically.
    SetOptions { update: TableOptionsUpdate },
}

impl AlterOperation {
    /// Short kind name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            AlterOperation::Add { .. } => "add",
            AlterOperation::Alter { .. } => "alter",
            AlterOperation::Drop { .. } => "drop",
            AlterOperation::Rename { .. } => "rename",
            AlterOperation::SetOptions { .. } => "set-options",
        }
    }
}

impl fmt::Display for AlterOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())
    }
}
