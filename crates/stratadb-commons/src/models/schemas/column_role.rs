//! Column roles within a table schema.

use crate::models::types::ValueType;
use serde::{Deserialize, Serialize};

/// The role a column identifier plays in a table.
///
/// Key-part roles carry their slot position in the owning composite. Only
/// regular columns and the value alias may have their type altered through
/// the compatibility lattice or be dropped; key parts may only be renamed or
/// have their type swapped positionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnRole {
    /// Component `position` of the partition key.
    PartitionKeyPart(usize),
    /// Component `position` of the clustering key.
    ClusteringKeyPart(usize),
    /// The aliased single value column of legacy layouts.
    DefaultValueAlias,
    /// An ordinary, dynamically added column.
    Regular,
}

impl ColumnRole {
    /// True for partition or clustering key parts.
    pub fn is_primary_key_part(&self) -> bool {
        matches!(
            self,
            ColumnRole::PartitionKeyPart(_) | ColumnRole::ClusteringKeyPart(_)
        )
    }

    /// True for roles whose column may be dropped.
    pub fn is_droppable(&self) -> bool {
        matches!(self, ColumnRole::Regular | ColumnRole::DefaultValueAlias)
    }
}

/// A resolved view of a column identifier: its role plus current value type.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn {
    pub role: ColumnRole,
    pub value_type: ValueType,
}
