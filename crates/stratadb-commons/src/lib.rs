//! # stratadb-commons
//!
//! Shared types for StrataDB's schema layer: type-safe identifier wrappers,
//! the value-type system (compatibility lattice, composite types, collection
//! overlays), and the table schema model mutated by `stratadb-schema`.
//!
//! This crate stays free of heavyweight dependencies so that every other
//! StrataDB crate can depend on it without cycles.
//!
//! ## Type-Safe Wrappers
//!
//! - `KeyspaceName`: keyspace identifier wrapper
//! - `TableName`: table name wrapper
//! - `ColumnName`: column identifier wrapper
//! - `ClientIdentity`: the authenticated client on whose behalf a schema
//!   mutation runs (recorded in the audit trail)

pub mod errors;
pub mod models;

pub use errors::{CommonError, Result};
pub use models::{
    is_compatible, ClientIdentity, CollectionOverlay, ColumnDefinition, ColumnName, ColumnRole,
    CompositeType, KeyValidator, KeyspaceName, ResolvedColumn, TableName, TableOptions,
    TableOptionsUpdate, TableSchema, ValueType,
};
