//! Shared fixtures for the integration tests.

use std::sync::Arc;
use std::sync::Mutex;
use stratadb_commons::{
    ColumnDefinition, ColumnName, CompositeType, KeyValidator, KeyspaceName, TableName,
    TableSchema, ValueType,
};
use stratadb_schema::{AlterTableEngine, MetadataConfig, SchemaAnnouncer};
use stratadb_store::{MemoryStore, ReplicatedStore};

/// Announcer that records every schema it is handed, for exactly-once checks.
#[derive(Default)]
pub struct RecordingAnnouncer {
    announced: Mutex<Vec<String>>,
}

impl RecordingAnnouncer {
    pub fn count(&self) -> usize {
        self.announced.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<String> {
        self.announced.lock().unwrap().last().cloned()
    }
}

impl SchemaAnnouncer for RecordingAnnouncer {
    fn announce(&self, schema: &TableSchema) {
        self.announced.lock().unwrap().push(schema.qualified_name());
    }
}

/// `ks.events`: uuid partition key `id`, clustering `[int, text]` aliased as
/// `bucket`/`seq`, one regular `body` column, non-compact.
pub fn events_schema() -> TableSchema {
    let mut schema = TableSchema::new(
        KeyspaceName::new("ks"),
        TableName::new("events"),
        KeyValidator::Single(ValueType::Uuid),
        CompositeType::new(vec![ValueType::Int, ValueType::Text]),
        ValueType::Blob,
    );
    schema.partition_key_names = vec![Some(ColumnName::new("id"))];
    schema.clustering_names = vec![Some(ColumnName::new("bucket")), Some(ColumnName::new("seq"))];
    schema.add_regular_column(ColumnDefinition::new(
        ColumnName::new("body"),
        ValueType::Text,
    ));
    schema
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub announcer: Arc<RecordingAnnouncer>,
    pub engine: AlterTableEngine,
}

pub fn harness() -> Harness {
    harness_with(MetadataConfig::default())
}

pub fn harness_with(config: MetadataConfig) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let announcer = Arc::new(RecordingAnnouncer::default());
    let engine = AlterTableEngine::new(
        Arc::clone(&store) as Arc<dyn ReplicatedStore>,
        Arc::clone(&announcer) as Arc<dyn SchemaAnnouncer>,
        &config,
    );
    Harness {
        store,
        announcer,
        engine,
    }
}
