//! The replicated store collaborator trait.

use crate::cell::{Cell, CellName};
use crate::mutation::RowMutation;
use std::fmt;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by a replicated store.
///
/// The metadata side-channel downgrades every one of these to a best-effort
/// outcome ("marker absent", "history empty"); they exist so real backends
/// can report what went wrong to their own logs.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Not enough replicas were reachable.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The operation did not finish in time.
    #[error("store timeout: {0}")]
    Timeout(String),

    /// Generic I/O failure in the backend.
    #[error("store I/O error: {0}")]
    Io(String),
}

/// A logical partition of rows within the store, such as the metadata
/// registry or the metadata log.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition {
    name: String,
}

impl Partition {
    /// Creates a partition with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the partition name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for Partition {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Consistency level for a store operation.
///
/// The metadata side-channel always uses the most relaxed level available:
/// its writes are fire-and-forget and its reads tolerate staleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consistency {
    /// Accepted by any single node, possibly only as a hint.
    Any,
    One,
    Quorum,
    All,
}

/// The replicated row store the metadata side-channel is built on.
///
/// Implementations must be thread-safe; handles are shared as
/// `Arc<dyn ReplicatedStore>` and passed through every registry/log
/// operation rather than held in process-wide state.
pub trait ReplicatedStore: Send + Sync {
    /// Applies a row mutation at the requested consistency level.
    ///
    /// Callers that need fire-and-forget semantics submit this from a
    /// background task and drop the result.
    fn mutate(&self, mutation: RowMutation, consistency: Consistency) -> StoreResult<()>;

    /// Reads the cells of `row_key` whose names fall within the inclusive
    /// `(low, high)` range, ordered by cell name.
    ///
    /// A missing row reads as an empty cell list, not an error.
    fn read(
        &self,
        partition: &Partition,
        row_key: &str,
        range: (CellName, CellName),
    ) -> StoreResult<Vec<Cell>>;
}
