//! Row mutations: batched cell writes and tombstones.

use crate::cell::{Cell, CellName};
use crate::store_trait::Partition;

/// A single operation inside a row mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellOp {
    /// Insert or update a cell.
    Put(Cell),

    /// Tombstone a single cell.
    DeleteCell {
        name: CellName,
        timestamp_micros: i64,
    },

    /// Tombstone the whole row.
    DeleteRow { timestamp_micros: i64 },
}

/// A write against one row, applied last-write-wins per cell timestamp.
///
/// Mutations are descriptors: building one performs no I/O. The caller
/// submits it to a [`crate::ReplicatedStore`], typically fire-and-forget at a
/// relaxed consistency level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMutation {
    pub partition: Partition,
    pub row_key: String,
    pub ops: Vec<CellOp>,
}

impl RowMutation {
    /// Creates an empty mutation for `row_key` in `partition`.
    pub fn new(partition: Partition, row_key: impl Into<String>) -> Self {
        Self {
            partition,
            row_key: row_key.into(),
            ops: Vec::new(),
        }
    }

    /// Adds a cell upsert.
    pub fn put(mut self, name: CellName, value: Vec<u8>, timestamp_micros: i64) -> Self {
        self.ops.push(CellOp::Put(Cell::new(name, value, timestamp_micros)));
        self
    }

    /// Adds a single-cell tombstone.
    pub fn delete_cell(mut self, name: CellName, timestamp_micros: i64) -> Self {
        self.ops.push(CellOp::DeleteCell {
            name,
            timestamp_micros,
        });
        self
    }

    /// Adds a whole-row tombstone.
    pub fn delete_row(mut self, timestamp_micros: i64) -> Self {
        self.ops.push(CellOp::DeleteRow { timestamp_micros });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_ops() {
        let m = RowMutation::new(Partition::new("meta.registry"), "ks.t.c")
            .put(CellName::from(vec!["tag", ""]), Vec::new(), 1)
            .delete_cell(CellName::from(vec!["tag", "old"]), 2)
            .delete_row(3);
        assert_eq!(m.row_key, "ks.t.c");
        assert_eq!(m.ops.len(), 3);
        assert!(matches!(m.ops[2], CellOp::DeleteRow { timestamp_micros: 3 }));
    }
}
