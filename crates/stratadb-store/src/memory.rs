//! In-memory replicated store with controllable visibility.
//!
//! Used by tests (and single-process tooling) in place of the cluster-backed
//! store. Two switches expose the failure modes the metadata side-channel has
//! to tolerate:
//!
//! - `hold_writes`: accepted mutations are buffered instead of applied,
//!   staging the "asynchronous write not yet visible to a synchronous read"
//!   race; `release_writes` applies the backlog.
//! - `fail_reads`: every read returns `Unavailable`, exercising the
//!   fail-open downgrade paths.

use crate::cell::{Cell, CellName};
use crate::mutation::{CellOp, RowMutation};
use crate::store_trait::{Consistency, Partition, ReplicatedStore, StoreError, StoreResult};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

type Row = BTreeMap<CellName, Cell>;

/// In-memory [`ReplicatedStore`] implementation.
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<HashMap<Partition, BTreeMap<String, Row>>>,
    pending: Mutex<Vec<RowMutation>>,
    hold_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When `hold` is set, accepted mutations are buffered until
    /// [`MemoryStore::release_writes`] runs.
    pub fn hold_writes(&self, hold: bool) {
        self.hold_writes.store(hold, Ordering::SeqCst);
    }

    /// Applies all buffered mutations in submission order and stops holding.
    pub fn release_writes(&self) {
        self.hold_writes.store(false, Ordering::SeqCst);
        let backlog: Vec<RowMutation> = self.pending.lock().drain(..).collect();
        for mutation in backlog {
            self.apply(mutation);
        }
    }

    /// When set, every read fails with `Unavailable`.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of mutations currently buffered.
    pub fn pending_writes(&self) -> usize {
        self.pending.lock().len()
    }

    fn apply(&self, mutation: RowMutation) {
        let mut partitions = self.rows.write();
        let rows = partitions.entry(mutation.partition.clone()).or_default();
        let row = rows.entry(mutation.row_key.clone()).or_default();
        for op in mutation.ops {
            match op {
                CellOp::Put(cell) => {
                    let newer = row
                        .get(&cell.name)
                        .map_or(true, |existing| cell.timestamp_micros >= existing.timestamp_micros);
                    if newer {
                        row.insert(cell.name.clone(), cell);
                    }
                }
                CellOp::DeleteCell {
                    name,
                    timestamp_micros,
                } => {
                    let shadowed = row
                        .get(&name)
                        .map_or(false, |existing| existing.timestamp_micros <= timestamp_micros);
                    if shadowed {
                        row.remove(&name);
                    }
                }
                CellOp::DeleteRow { timestamp_micros } => {
                    row.retain(|_, cell| cell.timestamp_micros > timestamp_micros);
                }
            }
        }
        if row.is_empty() {
            rows.remove(&mutation.row_key);
        }
    }
}

impl ReplicatedStore for MemoryStore {
    fn mutate(&self, mutation: RowMutation, _consistency: Consistency) -> StoreResult<()> {
        if self.hold_writes.load(Ordering::SeqCst) {
            self.pending.lock().push(mutation);
            return Ok(());
        }
        self.apply(mutation);
        Ok(())
    }

    fn read(
        &self,
        partition: &Partition,
        row_key: &str,
        range: (CellName, CellName),
    ) -> StoreResult<Vec<Cell>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "reads disabled by test harness".to_string(),
            ));
        }
        let (low, high) = range;
        let partitions = self.rows.read();
        let cells = partitions
            .get(partition)
            .and_then(|rows| rows.get(row_key))
            .map(|row| {
                row.range(low..=high)
                    .map(|(_, cell)| cell.clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> Partition {
        Partition::new("meta.registry")
    }

    fn full_range() -> (CellName, CellName) {
        (CellName::from(vec![""]), CellName::from(vec!["~"]))
    }

    #[test]
    fn test_put_and_range_read() {
        let store = MemoryStore::new();
        let m = RowMutation::new(meta(), "ks.t")
            .put(CellName::from(vec!["a", "x"]), b"1".to_vec(), 10)
            .put(CellName::from(vec!["b", "x"]), b"2".to_vec(), 10);
        store.mutate(m, Consistency::Any).unwrap();

        let bound = CellName::from(vec!["a", "x"]);
        let cells = store
            .read(&meta(), "ks.t", (bound.clone(), bound))
            .unwrap();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].value, b"1");

        let all = store.read(&meta(), "ks.t", full_range()).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_last_write_wins() {
        let store = MemoryStore::new();
        let name = CellName::from(vec!["a"]);
        store
            .mutate(
                RowMutation::new(meta(), "r").put(name.clone(), b"new".to_vec(), 20),
                Consistency::Any,
            )
            .unwrap();
        // An older write never shadows a newer one.
        store
            .mutate(
                RowMutation::new(meta(), "r").put(name.clone(), b"old".to_vec(), 10),
                Consistency::Any,
            )
            .unwrap();
        let cells = store.read(&meta(), "r", full_range()).unwrap();
        assert_eq!(cells[0].value, b"new");
    }

    #[test]
    fn test_row_tombstone_clears_older_cells() {
        let store = MemoryStore::new();
        store
            .mutate(
                RowMutation::new(meta(), "r").put(CellName::from(vec!["a"]), vec![], 10),
                Consistency::Any,
            )
            .unwrap();
        store
            .mutate(
                RowMutation::new(meta(), "r").delete_row(15),
                Consistency::Any,
            )
            .unwrap();
        assert!(store.read(&meta(), "r", full_range()).unwrap().is_empty());
    }

    #[test]
    fn test_held_writes_are_invisible_until_release() {
        let store = MemoryStore::new();
        store.hold_writes(true);
        store
            .mutate(
                RowMutation::new(meta(), "r").put(CellName::from(vec!["a"]), vec![], 10),
                Consistency::Any,
            )
            .unwrap();
        assert_eq!(store.pending_writes(), 1);
        assert!(store.read(&meta(), "r", full_range()).unwrap().is_empty());

        store.release_writes();
        assert_eq!(store.pending_writes(), 0);
        assert_eq!(store.read(&meta(), "r", full_range()).unwrap().len(), 1);
    }

    #[test]
    fn test_failed_reads_surface_unavailable() {
        let store = MemoryStore::new();
        store.fail_reads(true);
        assert!(store.read(&meta(), "r", full_range()).is_err());
        store.fail_reads(false);
        assert!(store.read(&meta(), "r", full_range()).is_ok());
    }

    #[test]
    fn test_missing_row_reads_empty() {
        let store = MemoryStore::new();
        assert!(store
            .read(&meta(), "nothing-here", full_range())
            .unwrap()
            .is_empty());
    }
}
