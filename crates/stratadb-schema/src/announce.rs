//! Cluster schema-propagation collaborator.

use stratadb_commons::TableSchema;

/// Broadcasts an accepted schema change to the rest of the cluster.
///
/// Invoked exactly once per successful `apply`. The implementation is
/// expected to block until the change is durably queued for distribution,
/// but the schema layer does not wait for acknowledgement from other nodes.
pub trait SchemaAnnouncer: Send + Sync {
    fn announce(&self, schema: &TableSchema);
}

/// Announcer for single-node and test setups: logs and drops the change.
#[derive(Debug, Default)]
pub struct NoopAnnouncer;

impl SchemaAnnouncer for NoopAnnouncer {
    fn announce(&self, schema: &TableSchema) {
        log::debug!("schema update for {} not propagated (noop announcer)", schema.qualified_name());
    }
}
