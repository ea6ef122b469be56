//! # stratadb-store
//!
//! Abstraction over the replicated row store that backs StrataDB's metadata
//! side-channel. The schema layer consumes the store through the
//! [`ReplicatedStore`] trait only; the real cluster-backed implementation
//! lives with the storage engine, while [`MemoryStore`] provides an in-process
//! implementation with controllable write visibility for tests.
//!
//! ## Data model
//!
//! A row is addressed by a string key inside a [`Partition`] and holds an
//! ordered map of [`Cell`]s. Cell names are composite: an ordered list of
//! string components compared lexicographically component by component, which
//! is what makes bounded range reads over `(tag, field)` or
//! `(timestamp, client, tag, field)` names work.
//!
//! Writes are [`RowMutation`]s: batches of cell upserts and tombstones with
//! microsecond timestamps, resolved last-write-wins.

pub mod cell;
pub mod memory;
pub mod mutation;
pub mod store_trait;

pub use cell::{Cell, CellName};
pub use memory::MemoryStore;
pub use mutation::{CellOp, RowMutation};
pub use store_trait::{Consistency, Partition, ReplicatedStore, StoreError, StoreResult};
