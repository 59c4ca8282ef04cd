//! Watchlist membership semantics.

use std::collections::BTreeSet;

use crate::types::DbId;

/// Maximum number of projects a single user may watch.
pub const MAX_WATCHLIST_SIZE: i64 = 200;

/// Toggle `project_id` in `watchlist`, returning whether it is now watched.
///
/// Toggling the same id twice always restores the original membership.
pub fn toggle(watchlist: &mut BTreeSet<DbId>, project_id: DbId) -> bool {
    if watchlist.remove(&project_id) {
        false
    } else {
        watchlist.insert(project_id);
        true
    }
}
