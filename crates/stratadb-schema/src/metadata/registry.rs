//! Soft-delete marker registry.
//!
//! A key-existence side-table mapping `(target, tag)` to a small opaque
//! marker, keyed by the dotted target path `keyspace.table.column`. Existence
//! means "this target is currently soft-deleted under this tag": created by
//! Drop, removed by Add-after-Drop (restore). Markers are not versioned;
//! conflicts resolve last-write-wins in the underlying store.

use crate::config::MetadataConfig;
use crate::metadata::timestamp_micros;
use std::sync::Arc;
use stratadb_store::{CellName, Partition, ReplicatedStore, RowMutation};

const ADMIN_TAG_FIELD: &str = "admin_tag";

/// Handle over the registry partition of the replicated store.
#[derive(Clone)]
pub struct MetadataRegistry {
    store: Arc<dyn ReplicatedStore>,
    partition: Partition,
}

impl MetadataRegistry {
    pub fn new(store: Arc<dyn ReplicatedStore>, config: &MetadataConfig) -> Self {
        Self {
            store,
            partition: Partition::new(config.registry_partition()),
        }
    }

    /// Builds the mutation recording that `target` is soft-deleted under
    /// `tag`. The caller submits it fire-and-forget.
    pub fn add(&self, target: &str, tag: &str, marker: &str) -> RowMutation {
        let now = timestamp_micros();
        RowMutation::new(self.partition.clone(), target)
            .put(CellName::from(vec![tag, ""]), Vec::new(), now)
            .put(
                CellName::from(vec![tag, ADMIN_TAG_FIELD]),
                marker.as_bytes().to_vec(),
                now,
            )
    }

    /// Builds the row tombstone clearing every marker for `target`.
    pub fn drop(&self, target: &str) -> RowMutation {
        RowMutation::new(self.partition.clone(), target).delete_row(timestamp_micros())
    }

    /// Best-effort existence query for `(target, tag)`.
    ///
    /// Returns the marker value when present. Any read failure downgrades to
    /// `None`, the conservative "no marker found" outcome, and never
    /// propagates; restore detection and the log gate fail open on staleness.
    pub fn query(&self, target: &str, tag: &str) -> Option<String> {
        let bound = CellName::from(vec![tag, ADMIN_TAG_FIELD]);
        match self.store.read(&self.partition, target, (bound.clone(), bound)) {
            Ok(cells) => cells
                .into_iter()
                .next()
                .map(|cell| String::from_utf8_lossy(&cell.value).into_owned()),
            Err(e) => {
                log::debug!(
                    "registry read for ({}, {}) failed, treating marker as absent: {}",
                    target,
                    tag,
                    e
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tags;
    use stratadb_store::{Consistency, MemoryStore};

    fn registry_over(store: &Arc<MemoryStore>) -> MetadataRegistry {
        let handle: Arc<dyn ReplicatedStore> = Arc::clone(store) as _;
        MetadataRegistry::new(handle, &MetadataConfig::default())
    }

    #[test]
    fn test_add_then_query_roundtrip() {
        let store = Arc::new(MemoryStore::new());
        let registry = registry_over(&store);

        let mutation = registry.add("ks.t.c", tags::ALTER_TABLE_DROP, "");
        store.mutate(mutation, Consistency::Any).unwrap();

        assert!(registry.query("ks.t.c", tags::ALTER_TABLE_DROP).is_some());
        assert!(registry.query("ks.t.c", tags::ALTER_TABLE_ADD).is_none());
        assert!(registry.query("ks.t.other", tags::ALTER_TABLE_DROP).is_none());
    }

    #[test]
    fn test_drop_tombstones_the_row() {
        let store = Arc::new(MemoryStore::new());
        let registry = registry_over(&store);

        store
            .mutate(
                registry.add("ks.t.c", tags::ALTER_TABLE_DROP, "m"),
                Consistency::Any,
            )
            .unwrap();
        assert_eq!(
            registry.query("ks.t.c", tags::ALTER_TABLE_DROP).as_deref(),
            Some("m")
        );

        store
            .mutate(registry.drop("ks.t.c"), Consistency::Any)
            .unwrap();
        assert!(registry.query("ks.t.c", tags::ALTER_TABLE_DROP).is_none());
    }

    #[test]
    fn test_query_fails_open() {
        let store = Arc::new(MemoryStore::new());
        let registry = registry_over(&store);
        store
            .mutate(
                registry.add("ks.t.c", tags::ALTER_TABLE_DROP, ""),
                Consistency::Any,
            )
            .unwrap();

        store.fail_reads(true);
        assert!(registry.query("ks.t.c", tags::ALTER_TABLE_DROP).is_none());
    }
}
