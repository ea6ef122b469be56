//! # stratadb-schema
//!
//! The schema-mutation engine of StrataDB: validates and applies structural
//! table changes (add/alter/drop/rename columns, storage options) against a
//! [`stratadb_commons::TableSchema`] snapshot, and records a best-effort
//! audit trail of every accepted mutation.
//!
//! ## Control flow
//!
//! A caller hands [`alter::AlterTableEngine::apply`] a schema snapshot and an
//! [`alter::AlterOperation`]. The engine validates fully before touching
//! anything, produces a new schema value, then (for drops) submits a registry
//! soft-delete marker, submits the gated audit-log entry, announces the new
//! schema through the injected [`announce::SchemaAnnouncer`] exactly once,
//! and returns. Durability of the registry/log writes is fire-and-forget at
//! the store's most relaxed consistency level; the engine never blocks on
//! them and never surfaces their failures.
//!
//! The engine is single-writer-per-table: callers serialize concurrent
//! `apply` calls on the same table, the engine holds no locks of its own.

pub mod alter;
pub mod announce;
pub mod config;
pub mod error;
pub mod metadata;

pub use alter::{AlterOperation, AlterOutcome, AlterTableEngine};
pub use announce::{NoopAnnouncer, SchemaAnnouncer};
pub use config::MetadataConfig;
pub use error::SchemaError;
pub use metadata::{MetadataLog, MetadataRegistry};
