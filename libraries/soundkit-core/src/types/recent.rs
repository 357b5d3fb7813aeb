//! Bounded most-recent-first track lists (recently played, playback history)

use crate::types::Track;
use chrono::Utc;

/// Maximum entries kept in the recently-played list
pub const RECENTLY_PLAYED_LIMIT: usize = 50;

/// Maximum entries kept in the playback history
pub const PLAYBACK_HISTORY_LIMIT: usize = 100;

/// Insert `track` at the front of `list`
///
/// Any earlier entry with the same id is dropped, the new entry is stamped
/// with `played_at`, and the list is truncated to `limit`.
pub fn push_recent(list: &mut Vec<Track>, track: &Track, limit: usize) {
    list.retain(|t| t.id != track.id);

    let mut entry = track.clone();
    entry.played_at = Some(Utc::now());
    list.insert(0, entry);

    list.truncate(limit);
}
