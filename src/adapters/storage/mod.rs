//! Storage Adapter
//!
//! Daily JSON snapshots of the enriched token set.

mod snapshot;

pub use snapshot::{DailySnapshot, SnapshotEntry, SnapshotStore, DEFAULT_SNAPSHOT_DIR};
