use serde::{Deserialize, Serialize};

/// Counters describing what a synchronizer has done since it was created.
///
/// `desyncs` counts notifications for curves with no chart entry. In correct
/// operation it stays at zero, so tests assert on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncStats {
    pub inserted: usize,
    pub removed: usize,
    pub in_place_updates: usize,
    pub rebuilds: usize,
    pub resets: usize,
    pub desyncs: usize,
    pub degraded_entries: usize,
    pub widget_errors: usize,
    pub settles: usize,
}
