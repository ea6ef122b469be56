//! The complete definition of a table.

use crate::errors::CommonError;
use crate::models::ids::{ColumnName, KeyspaceName, TableName};
use crate::models::schemas::{
    CollectionOverlay, ColumnDefinition, ColumnRole, ResolvedColumn, TableOptions,
};
use crate::models::types::{CompositeType, KeyValidator, ValueType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete definition of a table: key structure, columns, overlay, dropped
/// history, and storage options.
///
/// Mutated exclusively and sequentially by the schema mutation engine; one
/// accepted mutation at a time per table, serialized by the caller. Edit
/// helpers never mutate composite components in place; replacement composites
/// are produced by `CompositeType::with_component` so prior snapshots stay
/// intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub keyspace: KeyspaceName,
    pub table: TableName,

    /// Partition key type(s).
    pub key_validator: KeyValidator,

    /// Per-slot partition key aliases; `None` slots resolve to synthesized
    /// legacy names (`key`, `key2`, ...).
    pub partition_key_names: Vec<Option<ColumnName>>,

    /// Ordered clustering component types (overlay slot excluded).
    pub clustering: CompositeType,

    /// Per-slot clustering aliases; `None` slots resolve to `column1`,
    /// `column2`, ...
    pub clustering_names: Vec<Option<ColumnName>>,

    /// Type of the single value column in legacy layouts.
    pub default_value_type: ValueType,

    /// Explicit name of the value column, if aliased.
    pub value_alias: Option<ColumnName>,

    /// Regular columns.
    pub columns: BTreeMap<ColumnName, ColumnDefinition>,

    /// Collection columns attached at the reserved trailing comparator slot.
    pub collection_overlay: Option<CollectionOverlay>,

    /// Permanently recorded drops, column name to drop time.
    pub dropped_columns: BTreeMap<ColumnName, DateTime<Utc>>,

    pub options: TableOptions,

    /// Legacy non-composite layout; forbids column add/drop and overlays.
    pub is_compact: bool,
}

impl TableSchema {
    /// Creates a non-compact table schema with unaliased key slots, no
    /// regular columns, and default options.
    pub fn new(
        keyspace: KeyspaceName,
        table: TableName,
        key_validator: KeyValidator,
        clustering: CompositeType,
        default_value_type: ValueType,
    ) -> Self {
        let partition_key_names = vec![None; key_validator.slot_count()];
        let clustering_names = vec![None; clustering.len()];
        Self {
            keyspace,
            table,
            key_validator,
            partition_key_names,
            clustering,
            clustering_names,
            default_value_type,
            value_alias: None,
            columns: BTreeMap::new(),
            collection_overlay: None,
            dropped_columns: BTreeMap::new(),
            options: TableOptions::default(),
            is_compact: false,
        }
    }

    /// Fully qualified table name, `keyspace.table`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.keyspace, self.table)
    }

    /// Dotted audit target for one of this table's columns,
    /// `keyspace.table.column`.
    pub fn column_target(&self, column: &ColumnName) -> String {
        format!("{}.{}.{}", self.keyspace, self.table, column)
    }

    /// True when the comparator is composite: multi-component intra-partition
    /// ordering, required for overlays and column drops.
    pub fn has_composite_comparator(&self) -> bool {
        !self.is_compact && !self.clustering.is_empty()
    }

    /// The effective name of partition key slot `index`.
    pub fn partition_key_name(&self, index: usize) -> ColumnName {
        self.partition_key_names
            .get(index)
            .and_then(|n| n.clone())
            .unwrap_or_else(|| default_partition_key_name(index))
    }

    /// The effective name of clustering slot `index`.
    pub fn clustering_name(&self, index: usize) -> ColumnName {
        self.clustering_names
            .get(index)
            .and_then(|n| n.clone())
            .unwrap_or_else(|| default_clustering_name(index))
    }

    /// The effective name of the value column, if the layout has one.
    pub fn value_alias_name(&self) -> Option<ColumnName> {
        if self.value_alias.is_some() {
            return self.value_alias.clone();
        }
        self.is_compact.then(|| ColumnName::new("value"))
    }

    /// Number of explicitly aliased partition key slots.
    pub fn partition_aliased_count(&self) -> usize {
        self.partition_key_names.iter().flatten().count()
    }

    /// Number of explicitly aliased clustering slots.
    pub fn clustering_aliased_count(&self) -> usize {
        self.clustering_names.iter().flatten().count()
    }

    /// Resolves a column identifier to its role and current value type.
    ///
    /// Resolution covers explicit aliases, synthesized legacy names for
    /// unaliased key slots, the value alias, and regular columns.
    pub fn resolve(&self, name: &ColumnName) -> Option<ResolvedColumn> {
        for index in 0..self.key_validator.slot_count() {
            if self.partition_key_name(index) == *name {
                return self.key_validator.component(index).map(|ty| ResolvedColumn {
                    role: ColumnRole::PartitionKeyPart(index),
                    value_type: ty.clone(),
                });
            }
        }
        for index in 0..self.clustering.len() {
            if self.clustering_name(index) == *name {
                return self.clustering.component(index).map(|ty| ResolvedColumn {
                    role: ColumnRole::ClusteringKeyPart(index),
                    value_type: ty.clone(),
                });
            }
        }
        if self.value_alias_name().as_ref() == Some(name) {
            return Some(ResolvedColumn {
                role: ColumnRole::DefaultValueAlias,
                value_type: self.default_value_type.clone(),
            });
        }
        self.columns.get(name).map(|def| ResolvedColumn {
            role: ColumnRole::Regular,
            value_type: def.value_type.clone(),
        })
    }

    /// Installs or replaces the overlay mapping entry for `column`, keeping
    /// the overlay in the final comparator slot.
    pub fn attach_collection_overlay(
        &mut self,
        column: &ColumnName,
        value_type: ValueType,
    ) -> Result<(), CommonError> {
        if self.is_compact {
            return Err(CommonError::invalid_input(
                "compact tables cannot carry collection overlays",
            ));
        }
        if !self.has_composite_comparator() {
            return Err(CommonError::invalid_input(
                "collection overlays require a composite comparator",
            ));
        }
        if !value_type.is_collection() {
            return Err(CommonError::invalid_input(format!(
                "{} is not a collection type",
                value_type
            )));
        }
        self.collection_overlay
            .get_or_insert_with(CollectionOverlay::new)
            .insert(column.clone(), value_type);
        Ok(())
    }

    /// Adds a regular column entry.
    pub fn add_regular_column(&mut self, definition: ColumnDefinition) {
        self.columns
            .insert(definition.column_name.clone(), definition);
    }

    /// Removes a regular column entry, pruning its overlay mapping (and the
    /// overlay itself once empty).
    pub fn remove_regular_column(&mut self, name: &ColumnName) -> Option<ColumnDefinition> {
        let removed = self.columns.remove(name);
        if removed.is_some() {
            if let Some(overlay) = self.collection_overlay.as_mut() {
                overlay.remove(name);
                if overlay.is_empty() {
                    self.collection_overlay = None;
                }
            }
        }
        removed
    }

    /// Records a column drop in the permanent history.
    pub fn record_column_drop(&mut self, name: ColumnName, when: DateTime<Utc>) {
        self.dropped_columns.insert(name, when);
    }
}

fn default_partition_key_name(index: usize) -> ColumnName {
    if index == 0 {
        ColumnName::new("key")
    } else {
        ColumnName::new(format!("key{}", index + 1))
    }
}

fn default_clustering_name(index: usize) -> ColumnName {
    ColumnName::new(format!("column{}", index + 1))
}
