//! Append-only metadata change log.
//!
//! One row per audit target, one entry per accepted mutation that passes the
//! registry gate. Cell names embed the logical timestamp zero-padded to a
//! fixed width so the store's lexicographic cell order is chronological.
//! Entries are never mutated; `drop` produces retention tombstones, not
//! logical deletion of history.

use crate::config::MetadataConfig;
use crate::metadata::{timestamp_micros, MetadataRegistry};
use serde::Serialize;
use std::sync::Arc;
use stratadb_commons::ClientIdentity;
use stratadb_store::{CellName, Partition, ReplicatedStore, RowMutation};

const VALUE_FIELD: &str = "value";

/// Width of the zero-padded timestamp component; fits any `i64` in decimal.
const TIMESTAMP_WIDTH: usize = 20;

/// One audit-trail entry for a target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub timestamp_micros: i64,
    pub client: String,
    pub tag: String,
    pub description: String,
}

/// Handle over the log partition of the replicated store.
#[derive(Clone)]
pub struct MetadataLog {
    store: Arc<dyn ReplicatedStore>,
    registry: MetadataRegistry,
    partition: Partition,
    audit_all: bool,
}

impl MetadataLog {
    pub fn new(
        store: Arc<dyn ReplicatedStore>,
        registry: MetadataRegistry,
        config: &MetadataConfig,
    ) -> Self {
        Self {
            store,
            registry,
            partition: Partition::new(config.log_partition()),
            audit_all: config.audit_all_operations,
        }
    }

    /// Builds the mutation appending one entry for `target`. The embedded
    /// `time_micros` is the entry's logical timestamp and sort key.
    pub fn add(
        &self,
        target: &str,
        time_micros: i64,
        client: &str,
        tag: &str,
        description: &str,
    ) -> RowMutation {
        let now = timestamp_micros();
        RowMutation::new(self.partition.clone(), target)
            .put(entry_cell(time_micros, client, tag, ""), Vec::new(), now)
            .put(
                entry_cell(time_micros, client, tag, VALUE_FIELD),
                description.as_bytes().to_vec(),
                now,
            )
    }

    /// Builds retention tombstones for one entry. History compaction only;
    /// the event itself stays part of the logical record.
    pub fn drop(&self, target: &str, time_micros: i64, client: &str, tag: &str) -> RowMutation {
        let now = timestamp_micros();
        RowMutation::new(self.partition.clone(), target)
            .delete_cell(entry_cell(time_micros, client, tag, ""), now)
            .delete_cell(entry_cell(time_micros, client, tag, VALUE_FIELD), now)
    }

    /// Gated append: writes an entry for `(target, tag)` only when the
    /// registry currently holds a matching marker (or the gate is bypassed
    /// by configuration).
    ///
    /// The gate is a synchronous best-effort read against markers that are
    /// written asynchronously, so it can see a just-submitted marker as
    /// absent; in that case the append is silently skipped. It never blocks
    /// waiting for a marker write to land, so log completeness stays a
    /// best-effort property.
    pub fn append(
        &self,
        target: &str,
        tag: &str,
        client: Option<&ClientIdentity>,
        description: &str,
    ) {
        if !self.audit_all && self.registry.query(target, tag).is_none() {
            log::debug!(
                "no registry marker for ({}, {}); skipping audit entry",
                target,
                tag
            );
            return;
        }
        let client = client.map(|c| c.name().to_string()).unwrap_or_default();
        let mutation = self.add(target, timestamp_micros(), &client, tag, description);
        crate::metadata::submit(&self.store, mutation);
    }

    /// Full history for `target`, oldest first by logical timestamp.
    ///
    /// Best-effort: read failures surface as an empty history, never as an
    /// error.
    pub fn history(&self, target: &str) -> Vec<LogEntry> {
        let range = (CellName::from(vec![""]), CellName::from(vec!["~"]));
        let cells = match self.store.read(&self.partition, target, range) {
            Ok(cells) => cells,
            Err(e) => {
                log::debug!("log read for {} failed, returning empty history: {}", target, e);
                return Vec::new();
            }
        };
        cells
            .into_iter()
            .filter(|cell| cell.name.component(3) == Some(VALUE_FIELD))
            .filter_map(|cell| {
                let timestamp_micros = cell.name.component(0)?.parse::<i64>().ok()?;
                Some(LogEntry {
                    timestamp_micros,
                    client: cell.name.component(1)?.to_string(),
                    tag: cell.name.component(2)?.to_string(),
                    description: String::from_utf8_lossy(&cell.value).into_owned(),
                })
            })
            .collect()
    }
}

fn entry_cell(time_micros: i64, client: &str, tag: &str, field: &str) -> CellName {
    CellName::new(vec![
        format!("{:0width$}", time_micros, width = TIMESTAMP_WIDTH),
        client.to_string(),
        tag.to_string(),
        field.to_string(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tags;
    use stratadb_store::{Consistency, MemoryStore};

    fn log_over(store: &Arc<MemoryStore>, audit_all: bool) -> MetadataLog {
        let handle: Arc<dyn ReplicatedStore> = Arc::clone(store) as _;
        let config = MetadataConfig {
            audit_all_operations: audit_all,
            ..Default::default()
        };
        let registry = MetadataRegistry::new(Arc::clone(&handle), &config);
        MetadataLog::new(handle, registry, &config)
    }

    #[test]
    fn test_history_orders_by_logical_timestamp() {
        let store = Arc::new(MemoryStore::new());
        let log = log_over(&store, false);

        // Written out of order; the store's cell order brings them back.
        for (time, desc) in [(30, "third"), (10, "first"), (20, "second")] {
            store
                .mutate(
                    log.add("ks.t", time, "alice", tags::ALTER_TABLE_DROP, desc),
                    Consistency::Any,
                )
                .unwrap();
        }

        let history = log.history("ks.t");
        assert_eq!(history.len(), 3);
        assert_eq!(
            history.iter().map(|e| e.timestamp_micros).collect::<Vec<_>>(),
            vec![10, 20, 30]
        );
        assert_eq!(history[0].description, "first");
        assert_eq!(history[2].tag, tags::ALTER_TABLE_DROP);
        assert_eq!(history[1].client, "alice");
    }

    #[test]
    fn test_drop_tombstones_one_entry() {
        let store = Arc::new(MemoryStore::new());
        let log = log_over(&store, false);

        store
            .mutate(
                log.add("ks.t", 10, "alice", tags::ALTER_TABLE_DROP, "gone"),
                Consistency::Any,
            )
            .unwrap();
        store
            .mutate(
                log.drop("ks.t", 10, "alice", tags::ALTER_TABLE_DROP),
                Consistency::Any,
            )
            .unwrap();
        assert!(log.history("ks.t").is_empty());
    }

    #[test]
    fn test_history_is_empty_on_read_failure() {
        let store = Arc::new(MemoryStore::new());
        let log = log_over(&store, false);
        store
            .mutate(
                log.add("ks.t", 10, "", tags::ALTER_TABLE_ADD, "x"),
                Consistency::Any,
            )
            .unwrap();

        store.fail_reads(true);
        assert!(log.history("ks.t").is_empty());
    }

    #[tokio::test]
    async fn test_append_skips_without_marker() {
        let store = Arc::new(MemoryStore::new());
        let log = log_over(&store, false);

        log.append("ks.t", tags::ALTER_TABLE_DROP, None, "dropped body");
        tokio::task::yield_now().await;
        assert!(log.history("ks.t").is_empty());
    }

    #[tokio::test]
    async fn test_append_bypasses_gate_when_auditing_all() {
        let store = Arc::new(MemoryStore::new());
        let log = log_over(&store, true);

        let client = ClientIdentity::new("alice");
        log.append("ks.t", tags::ALTER_TABLE_ADD, Some(&client), "added body");
        tokio::task::yield_now().await;

        let history = log.history("ks.t");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].client, "alice");
        assert_eq!(history[0].description, "added body");
    }
}
