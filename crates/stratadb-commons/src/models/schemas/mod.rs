//! Table schema models, the single source of truth for table definitions.
//!
//! `TableSchema` is the complete definition of a table: partition key
//! validator, clustering composite, column map with role tags, collection
//! overlay, dropped-column history, and storage options. It is mutated
//! exclusively and sequentially by the schema mutation engine in
//! `stratadb-schema`; everything here is passive data plus invariant-checked
//! edit helpers.

mod collection_overlay;
mod column_definition;
mod column_role;
mod table_options;
mod table_schema;

pub use collection_overlay::CollectionOverlay;
pub use column_definition::ColumnDefinition;
pub use column_role::{ColumnRole, ResolvedColumn};
pub use table_options::{CachingPolicy, CompactionStrategy, Compression, TableOptions, TableOptionsUpdate};
pub use table_schema::TableSchema;
