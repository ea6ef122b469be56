//! Type-safe identifier wrappers.
//!
//! Ensures keyspace, table, and column names cannot be accidentally swapped
//! at call sites that take several strings.

mod client_identity;
mod column_name;
mod keyspace_name;
mod table_name;

pub use client_identity::ClientIdentity;
pub use column_name::ColumnName;
pub use keyspace_name::KeyspaceName;
pub use table_name::TableName;
