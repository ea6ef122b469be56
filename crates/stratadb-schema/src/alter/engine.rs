//! Validation and application of alter operations.
//!
//! `apply` is pure with respect to the schema: it validates fully, produces a
//! new `TableSchema` value, and only then stages its side effects (registry
//! markers, audit-log entries, the announcement). Durability of the metadata
//! writes is fire-and-forget; the engine never blocks on them and never
//! surfaces their failures to the caller.

use crate::alter::AlterOperation;
use crate::announce::SchemaAnnouncer;
use crate::config::MetadataConfig;
use crate::error::SchemaError;
use crate::metadata::{self, tags, MetadataLog, MetadataRegistry};
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use stratadb_commons::{
    is_compatible, ClientIdentity, ColumnDefinition, ColumnName, ColumnRole, TableOptionsUpdate,
    TableSchema, ValueType,
};
use stratadb_store::{ReplicatedStore, RowMutation};

/// The result of a successful `apply`: the new schema and the human-readable
/// summary recorded in the audit trail.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterOutcome {
    pub schema: TableSchema,
    pub description: String,
}

/// A fully validated operation, ready for side effects.
struct Staged {
    schema: TableSchema,
    description: String,
    registry_ops: Vec<RowMutation>,
    log: LogWrite,
}

enum LogWrite {
    /// Goes through the registry gate in [`MetadataLog::append`].
    Gated { target: String, tag: &'static str },
    /// Written directly, bypassing the gate. Permanent drops only.
    Direct { target: String, tag: &'static str },
}

/// Applies alter operations against table schema snapshots.
///
/// Logically single-writer-per-table: callers serialize concurrent `apply`
/// calls on the same table, the engine holds no locks of its own.
pub struct AlterTableEngine {
    store: Arc<dyn ReplicatedStore>,
    registry: MetadataRegistry,
    log: MetadataLog,
    announcer: Arc<dyn SchemaAnnouncer>,
}

impl AlterTableEngine {
    pub fn new(
        store: Arc<dyn ReplicatedStore>,
        announcer: Arc<dyn SchemaAnnouncer>,
        config: &MetadataConfig,
    ) -> Self {
        let registry = MetadataRegistry::new(Arc::clone(&store), config);
        let log = MetadataLog::new(Arc::clone(&store), registry.clone(), config);
        Self {
            store,
            registry,
            log,
            announcer,
        }
    }

    /// The soft-delete marker registry this engine writes to.
    pub fn registry(&self) -> &MetadataRegistry {
        &self.registry
    }

    /// The audit log this engine appends to.
    pub fn log(&self) -> &MetadataLog {
        &self.log
    }

    /// Validates `op` against `schema` and, on success, returns the new
    /// schema plus the audit description.
    ///
    /// Validation happens fully before any side effect; a failed call leaves
    /// no trace anywhere. On success the registry/log writes are submitted
    /// fire-and-forget and the announcer is invoked exactly once.
    ///
    /// Requires a running tokio runtime for the background submissions.
    pub fn apply(
        &self,
        schema: &TableSchema,
        op: AlterOperation,
        client: Option<&ClientIdentity>,
    ) -> Result<AlterOutcome, SchemaError> {
        let staged = match &op {
            AlterOperation::Add { column, value_type } => {
                self.stage_add(schema, column, value_type)?
            }
            AlterOperation::Alter { column, value_type } => {
                self.stage_alter(schema, column, value_type)?
            }
            AlterOperation::Drop { column } => self.stage_drop(schema, column)?,
            AlterOperation::Rename { renames } => self.stage_rename(schema, renames)?,
            AlterOperation::SetOptions { update } => self.stage_set_options(schema, update)?,
        };

        for mutation in staged.registry_ops {
            metadata::submit(&self.store, mutation);
        }
        match &staged.log {
            LogWrite::Gated { target, tag } => {
                self.log.append(target, tag, client, &staged.description);
            }
            LogWrite::Direct { target, tag } => {
                let client = client.map(|c| c.name().to_string()).unwrap_or_default();
                let mutation = self.log.add(
                    target,
                    metadata::timestamp_micros(),
                    &client,
                    tag,
                    &staged.description,
                );
                metadata::submit(&self.store, mutation);
            }
        }
        self.announcer.announce(&staged.schema);
        log::info!(
            "accepted {} on {}: {}",
            op.kind(),
            staged.schema.qualified_name(),
            staged.description
        );

        Ok(AlterOutcome {
            schema: staged.schema,
            description: staged.description,
        })
    }

    fn stage_add(
        &self,
        schema: &TableSchema,
        column: &ColumnName,
        value_type: &ValueType,
    ) -> Result<Staged, SchemaError> {
        if schema.is_compact {
            return Err(SchemaError::InvalidOperation(format!(
                "cannot add column {} to compact table {}",
                column,
                schema.qualified_name()
            )));
        }
        if let Some(existing) = schema.resolve(column) {
            // The value alias does not block an add, matching the legacy
            // collision rules.
            if existing.role.is_primary_key_part() || existing.role == ColumnRole::Regular {
                return Err(SchemaError::InvalidOperation(format!(
                    "column {} already exists in {}",
                    column,
                    schema.qualified_name()
                )));
            }
        }

        let mut next = schema.clone();
        if value_type.is_collection() {
            next.attach_collection_overlay(column, value_type.clone())?;
        }
        next.add_regular_column(ColumnDefinition::new(column.clone(), value_type.clone()));

        // A lingering soft-delete marker means this add is a restore.
        let target = schema.column_target(column);
        let mut registry_ops = Vec::new();
        if self.registry.query(&target, tags::ALTER_TABLE_DROP).is_some() {
            registry_ops.push(self.registry.drop(&target));
        }

        Ok(Staged {
            schema: next,
            description: format!("column_name={},cql_type={}", column, value_type.cql_name()),
            registry_ops,
            log: LogWrite::Gated {
                target,
                tag: tags::ALTER_TABLE_ADD,
            },
        })
    }

    fn stage_alter(
        &self,
        schema: &TableSchema,
        column: &ColumnName,
        value_type: &ValueType,
    ) -> Result<Staged, SchemaError> {
        let resolved = schema.resolve(column).ok_or_else(|| {
            SchemaError::InvalidOperation(format!(
                "column {} not found in {}",
                column,
                schema.qualified_name()
            ))
        })?;

        let mut next = schema.clone();
        match resolved.role {
            ColumnRole::PartitionKeyPart(position) => {
                if value_type.is_counter() {
                    return Err(SchemaError::InvalidOperation(format!(
                        "counter type cannot back key component {}",
                        column
                    )));
                }
                next.key_validator = schema
                    .key_validator
                    .with_component(position, value_type.clone())?;
            }
            ColumnRole::ClusteringKeyPart(position) => {
                if value_type.is_counter() {
                    return Err(SchemaError::InvalidOperation(format!(
                        "counter type cannot back key component {}",
                        column
                    )));
                }
                next.clustering = schema
                    .clustering
                    .with_component(position, value_type.clone())?;
            }
            ColumnRole::DefaultValueAlias => {
                if !is_compatible(&resolved.value_type, value_type) {
                    return Err(SchemaError::TypeIncompatible {
                        column: column.clone(),
                        old: resolved.value_type,
                        new: value_type.clone(),
                    });
                }
                next.default_value_type = value_type.clone();
            }
            ColumnRole::Regular => {
                if !is_compatible(&resolved.value_type, value_type) {
                    return Err(SchemaError::TypeIncompatible {
                        column: column.clone(),
                        old: resolved.value_type,
                        new: value_type.clone(),
                    });
                }
                next.add_regular_column(ColumnDefinition::new(column.clone(), value_type.clone()));
                // Keep the overlay entry in step with the column type.
                let overlaid = next
                    .collection_overlay
                    .as_ref()
                    .is_some_and(|o| o.contains(column));
                if overlaid {
                    next.attach_collection_overlay(column, value_type.clone())?;
                }
            }
        }

        Ok(Staged {
            schema: next,
            description: format!(
                "Old: {};New: {}",
                resolved.value_type.cql_name(),
                value_type.cql_name()
            ),
            registry_ops: Vec::new(),
            log: LogWrite::Gated {
                target: schema.column_target(column),
                tag: tags::ALTER_TABLE_ALTER,
            },
        })
    }

    fn stage_drop(&self, schema: &TableSchema, column: &ColumnName) -> Result<Staged, SchemaError> {
        if schema.is_compact {
            return Err(SchemaError::InvalidOperation(format!(
                "cannot drop column {} from compact table {}",
                column,
                schema.qualified_name()
            )));
        }
        if !schema.has_composite_comparator() {
            return Err(SchemaError::InvalidOperation(format!(
                "cannot drop column {} from {}: dropping requires a composite comparator",
                column,
                schema.qualified_name()
            )));
        }

        let target = schema.column_target(column);
        match schema.resolve(column) {
            Some(resolved) if resolved.role.is_primary_key_part() => {
                Err(SchemaError::InvalidOperation(format!(
                    "cannot drop primary key component {}",
                    column
                )))
            }
            Some(resolved) => {
                let mut next = schema.clone();
                match resolved.role {
                    ColumnRole::Regular => {
                        next.remove_regular_column(column);
                    }
                    ColumnRole::DefaultValueAlias => {
                        next.value_alias = None;
                    }
                    _ => unreachable!("key parts rejected above"),
                }
                next.record_column_drop(column.clone(), Utc::now());
                Ok(Staged {
                    schema: next,
                    description: format!(
                        "column_name={},cql_type={}",
                        column,
                        resolved.value_type.cql_name()
                    ),
                    registry_ops: vec![self.registry.add(&target, tags::ALTER_TABLE_DROP, "")],
                    log: LogWrite::Gated {
                        target,
                        tag: tags::ALTER_TABLE_DROP,
                    },
                })
            }
            None if self.registry.query(&target, tags::ALTER_TABLE_DROP).is_some() => {
                // Confirming the drop of an already-removed column. Schema
                // untouched apart from the permanent record, and the audit
                // entry skips the gate.
                let mut next = schema.clone();
                next.record_column_drop(column.clone(), Utc::now());
                Ok(Staged {
                    schema: next,
                    description: format!("column_name={},permanent=true", column),
                    registry_ops: Vec::new(),
                    log: LogWrite::Direct {
                        target,
                        tag: tags::ALTER_TABLE_DROP,
                    },
                })
            }
            None => Err(SchemaError::InvalidOperation(format!(
                "column {} not found in {}",
                column,
                schema.qualified_name()
            ))),
        }
    }

    fn stage_rename(
        &self,
        schema: &TableSchema,
        renames: &BTreeMap<ColumnName, ColumnName>,
    ) -> Result<Staged, SchemaError> {
        if renames.is_empty() {
            return Err(SchemaError::InvalidOperation(
                "empty rename batch".to_string(),
            ));
        }

        let mut partition_slots = BTreeSet::new();
        let mut clustering_slots = BTreeSet::new();
        let mut targets_seen = BTreeSet::new();
        let mut resolved = Vec::with_capacity(renames.len());
        for (old, new) in renames {
            let column = schema.resolve(old).ok_or_else(|| {
                SchemaError::InvalidOperation(format!(
                    "column {} not found in {}",
                    old,
                    schema.qualified_name()
                ))
            })?;
            if column.role == ColumnRole::Regular {
                return Err(SchemaError::InvalidOperation(format!(
                    "cannot rename regular column {}",
                    old
                )));
            }
            if schema.resolve(new).is_some() || !targets_seen.insert(new.clone()) {
                return Err(SchemaError::InvalidOperation(format!(
                    "column name {} already in use",
                    new
                )));
            }
            match column.role {
                ColumnRole::PartitionKeyPart(position) => {
                    partition_slots.insert(position);
                }
                ColumnRole::ClusteringKeyPart(position) => {
                    clustering_slots.insert(position);
                }
                _ => {}
            }
            resolved.push((old.clone(), new.clone(), column.role));
        }

        // Legacy-migration constraint: once a batch touches a kind that still
        // has unaliased slots, it must name every one of them.
        let unaliased_partition: BTreeSet<usize> = (0..schema.key_validator.slot_count())
            .filter(|i| schema.partition_key_names.get(*i).map_or(true, |n| n.is_none()))
            .collect();
        if !partition_slots.is_empty() && !unaliased_partition.is_subset(&partition_slots) {
            return Err(SchemaError::AmbiguousRename(format!(
                "partition key of {} has {} unaliased component(s); rename them all in one batch or none",
                schema.qualified_name(),
                unaliased_partition.len()
            )));
        }
        let unaliased_clustering: BTreeSet<usize> = (0..schema.clustering.len())
            .filter(|i| schema.clustering_names.get(*i).map_or(true, |n| n.is_none()))
            .collect();
        if !clustering_slots.is_empty() && !unaliased_clustering.is_subset(&clustering_slots) {
            return Err(SchemaError::AmbiguousRename(format!(
                "clustering key of {} has {} unaliased component(s); rename them all in one batch or none",
                schema.qualified_name(),
                unaliased_clustering.len()
            )));
        }

        let mut next = schema.clone();
        let mut parts = Vec::with_capacity(resolved.len());
        for (old, new, role) in resolved {
            match role {
                ColumnRole::PartitionKeyPart(position) => {
                    next.partition_key_names[position] = Some(new.clone());
                }
                ColumnRole::ClusteringKeyPart(position) => {
                    next.clustering_names[position] = Some(new.clone());
                }
                ColumnRole::DefaultValueAlias => {
                    next.value_alias = Some(new.clone());
                }
                ColumnRole::Regular => unreachable!("regular renames rejected above"),
            }
            parts.push(format!("Renamed {} to {}", old, new));
        }

        Ok(Staged {
            schema: next,
            description: parts.join(";"),
            registry_ops: Vec::new(),
            log: LogWrite::Gated {
                target: schema.qualified_name(),
                tag: tags::ALTER_TABLE_RENAME,
            },
        })
    }

    fn stage_set_options(
        &self,
        schema: &TableSchema,
        update: &TableOptionsUpdate,
    ) -> Result<Staged, SchemaError> {
        update
            .validate()
            .map_err(|e| SchemaError::InvalidOptions(e.to_string()))?;

        let mut next = schema.clone();
        update.apply_to(&mut next.options);

        let description =
            serde_json::to_string(update).unwrap_or_else(|_| update.to_string());
        Ok(Staged {
            schema: next,
            description,
            registry_ops: Vec::new(),
            log: LogWrite::Gated {
                target: schema.qualified_name(),
                tag: tags::ALTER_TABLE_OPTS,
            },
        })
    }
}
