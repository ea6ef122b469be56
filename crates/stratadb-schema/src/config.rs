//! Configuration for the metadata side-channel.

use serde::{Deserialize, Serialize};

/// Where metadata rows live and which mutations get audited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Keyspace holding the registry and log partitions.
    #[serde(default = "default_keyspace")]
    pub keyspace: String,

    /// Partition (column family) for soft-delete markers.
    #[serde(default = "default_registry_table")]
    pub registry_table: String,

    /// Partition (column family) for the append-only change log.
    #[serde(default = "default_log_table")]
    pub log_table: String,

    /// Bypass the registry gate so every accepted mutation produces a log
    /// entry, not only those with a matching soft-delete marker.
    ///
    /// With the gate in place (the default), only drop-related events are
    /// ever preceded by a marker, so add/alter/rename/options entries are
    /// skipped; enabling this trades that historical behavior for a complete
    /// audit trail.
    #[serde(default)]
    pub audit_all_operations: bool,
}

fn default_keyspace() -> String {
    "system_metadata".to_string()
}

fn default_registry_table() -> String {
    "registry".to_string()
}

fn default_log_table() -> String {
    "log".to_string()
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            keyspace: default_keyspace(),
            registry_table: default_registry_table(),
            log_table: default_log_table(),
            audit_all_operations: false,
        }
    }
}

impl MetadataConfig {
    /// Partition name for the registry, `keyspace.registry_table`.
    pub fn registry_partition(&self) -> String {
        format!("{}.{}", self.keyspace, self.registry_table)
    }

    /// Partition name for the log, `keyspace.log_table`.
    pub fn log_partition(&self) -> String {
        format!("{}.{}", self.keyspace, self.log_table)
    }
}
