//! Download records
//!
//! A record maps a track id to the local file it was downloaded to. The store
//! owns the file lifecycle: removing a record deletes the file too.

use crate::error::Result;
use crate::kv::{self, KEY_DOWNLOADED_SONGS, KEY_FAVORITES};
use soundkit_core::{DownloadRecord, Track, TrackId};
use sqlx::SqlitePool;
use std::io::ErrorKind;
use tracing::{debug, info, warn};

/// All download records
pub async fn list(pool: &SqlitePool) -> Result<Vec<DownloadRecord>> {
    let mut conn = pool.acquire().await?;
    kv::get_list(&mut conn, KEY_DOWNLOADED_SONGS).await
}

/// Download record for a track
pub async fn find(pool: &SqlitePool, id: &TrackId) -> Result<Option<DownloadRecord>> {
    Ok(list(pool).await?.into_iter().find(|r| r.id() == id))
}

/// Record a completed download
///
/// An existing record for the same track is replaced.
pub async fn add(pool: &SqlitePool, track: &Track, local_uri: &str) -> Result<DownloadRecord> {
    let record = DownloadRecord::new(track.clone(), local_uri);

    let mut tx = pool.begin().await?;
    let mut records: Vec<DownloadRecord> = kv::get_list(&mut tx, KEY_DOWNLOADED_SONGS).await?;
    records.retain(|r| r.id() != &track.id);
    records.push(record.clone());
    kv::set_json(&mut tx, KEY_DOWNLOADED_SONGS, &records).await?;
    tx.commit().await?;

    info!(track_id = %track.id, path = local_uri, "Recorded download");
    Ok(record)
}

/// Remove a download record, its file, and the track's favorite entry
///
/// Returns true if a record existed.
pub async fn remove(pool: &SqlitePool, id: &TrackId) -> Result<bool> {
    let mut tx = pool.begin().await?;
    let mut records: Vec<DownloadRecord> = kv::get_list(&mut tx, KEY_DOWNLOADED_SONGS).await?;

    let Some(position) = records.iter().position(|r| r.id() == id) else {
        return Ok(false);
    };
    let record = records.remove(position);
    kv::set_json(&mut tx, KEY_DOWNLOADED_SONGS, &records).await?;

    let mut favorites: Vec<Track> = kv::get_list(&mut tx, KEY_FAVORITES).await?;
    let before = favorites.len();
    favorites.retain(|t| &t.id != id);
    if favorites.len() != before {
        kv::set_json(&mut tx, KEY_FAVORITES, &favorites).await?;
    }

    tx.commit().await?;

    delete_file(&record).await;
    info!(track_id = %id, "Removed download");
    Ok(true)
}

/// Remove every download record and file
///
/// Returns the number of records removed.
pub async fn clear(pool: &SqlitePool) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let records: Vec<DownloadRecord> = kv::get_list(&mut tx, KEY_DOWNLOADED_SONGS).await?;
    kv::remove(&mut tx, KEY_DOWNLOADED_SONGS).await?;
    tx.commit().await?;

    for record in &records {
        delete_file(record).await;
    }

    info!(count = records.len(), "Cleared downloads");
    Ok(records.len())
}

// Already-missing files are fine; anything else is logged, the record is gone
// either way.
async fn delete_file(record: &DownloadRecord) {
    match tokio::fs::remove_file(record.path()).await {
        Ok(()) => debug!(path = %record.local_uri, "Deleted downloaded file"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %record.local_uri, error = %e, "Failed to delete downloaded file"),
    }
}
