//! Metadata side-channel: soft-delete registry and append-only change log.
//!
//! Both components piggyback on the generic replicated store. Writes are
//! submitted fire-and-forget at the most relaxed consistency level and reads
//! are best-effort, so a write submitted here is not guaranteed to be visible
//! to a read issued immediately after. Callers (the log gate in particular)
//! tolerate false negatives rather than block on durability.

pub mod log;
pub mod registry;

use chrono::Utc;
use std::sync::Arc;
use stratadb_store::{Consistency, ReplicatedStore, RowMutation};

pub use self::log::{LogEntry, MetadataLog};
pub use self::registry::MetadataRegistry;

/// Audit tags, one per alter kind. Drop's tag doubles as the soft-delete
/// marker tag in the registry.
pub mod tags {
    pub const ALTER_TABLE_ADD: &str = "a_tb_ad";
    pub const ALTER_TABLE_ALTER: &str = "a_tb_al";
    pub const ALTER_TABLE_DROP: &str = "a_tb_d";
    pub const ALTER_TABLE_RENAME: &str = "a_tb_r";
    pub const ALTER_TABLE_OPTS: &str = "a_tb_p";
}

/// Current logical timestamp in microseconds.
pub(crate) fn timestamp_micros() -> i64 {
    Utc::now().timestamp_micros()
}

/// Submits a mutation in the background at the most relaxed consistency
/// level. Never blocks the caller; failures are logged and swallowed.
///
/// Requires a running tokio runtime on the calling thread.
pub fn submit(store: &Arc<dyn ReplicatedStore>, mutation: RowMutation) {
    let store = Arc::clone(store);
    tokio::spawn(async move {
        let row_key = mutation.row_key.clone();
        if let Err(e) = store.mutate(mutation, Consistency::Any) {
            ::log::warn!("background metadata write for {} failed: {}", row_key, e);
        }
    });
}
