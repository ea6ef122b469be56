//! Data models for the StrataDB schema layer.

pub mod ids;
pub mod schemas;
pub mod types;

pub use ids::{ClientIdentity, ColumnName, KeyspaceName, TableName};
pub use schemas::{
    CollectionOverlay, ColumnDefinition, ColumnRole, ResolvedColumn, TableOptions,
    TableOptionsUpdate, TableSchema,
};
pub use types::{is_compatible, CompositeType, KeyValidator, ValueType};
