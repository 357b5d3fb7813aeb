//! Favorite tracks

use crate::error::Result;
use crate::kv::{self, KEY_DOWNLOADED_SONGS, KEY_FAVORITES};
use chrono::Utc;
use soundkit_core::{DownloadRecord, Track};
use sqlx::SqlitePool;
use tracing::debug;

/// Favorites in the order they were added
pub async fn list(pool: &SqlitePool) -> Result<Vec<Track>> {
    let mut conn = pool.acquire().await?;
    kv::get_list(&mut conn, KEY_FAVORITES).await
}

/// Flip the favorite flag of `track`
///
/// Un-favoriting also drops the track's download record. The downloaded file
/// itself stays on disk.
///
/// Returns the new favorite status.
pub async fn toggle(pool: &SqlitePool, track: &Track) -> Result<bool> {
    let mut tx = pool.begin().await?;
    let mut favorites: Vec<Track> = kv::get_list(&mut tx, KEY_FAVORITES).await?;

    let now_favorite = if favorites.iter().any(|t| t.id == track.id) {
        favorites.retain(|t| t.id != track.id);

        let mut downloads: Vec<DownloadRecord> = kv::get_list(&mut tx, KEY_DOWNLOADED_SONGS).await?;
        let before = downloads.len();
        downloads.retain(|r| r.id() != &track.id);
        if downloads.len() != before {
            debug!(track_id = %track.id, "Dropping download record of un-favorited track");
            kv::set_json(&mut tx, KEY_DOWNLOADED_SONGS, &downloads).await?;
        }
        false
    } else {
        let mut favorite = track.clone();
        favorite.favorited_at = Some(Utc::now());
        favorites.push(favorite);
        true
    };

    kv::set_json(&mut tx, KEY_FAVORITES, &favorites).await?;
    tx.commit().await?;
    Ok(now_favorite)
}
