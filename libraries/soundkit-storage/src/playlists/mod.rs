//! Playlists
//!
//! All playlists live in one JSON array; tracks are embedded by value.

use crate::error::Result;
use crate::kv::{self, KEY_PLAYLISTS};
use soundkit_core::{Playlist, PlaylistId, Track, TrackId};
use sqlx::SqlitePool;
use tracing::info;

/// All playlists
pub async fn list(pool: &SqlitePool) -> Result<Vec<Playlist>> {
    let mut conn = pool.acquire().await?;
    kv::get_list(&mut conn, KEY_PLAYLISTS).await
}

/// Get a playlist by id
pub async fn get(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Playlist>> {
    Ok(list(pool).await?.into_iter().find(|p| &p.id == id))
}

/// Create an empty playlist
pub async fn create(pool: &SqlitePool, name: &str, description: &str) -> Result<Playlist> {
    let playlist = Playlist::new(name, description);

    let mut tx = pool.begin().await?;
    let mut playlists: Vec<Playlist> = kv::get_list(&mut tx, KEY_PLAYLISTS).await?;
    playlists.push(playlist.clone());
    kv::set_json(&mut tx, KEY_PLAYLISTS, &playlists).await?;
    tx.commit().await?;

    info!(playlist_id = %playlist.id, name, "Created playlist");
    Ok(playlist)
}

/// Append `track` to a playlist
///
/// Returns false if the playlist does not exist or already holds the track.
pub async fn add_track(pool: &SqlitePool, id: &PlaylistId, track: &Track) -> Result<bool> {
    let mut tx = pool.begin().await?;
    let mut playlists: Vec<Playlist> = kv::get_list(&mut tx, KEY_PLAYLISTS).await?;

    let added = playlists
        .iter_mut()
        .find(|p| &p.id == id)
        .is_some_and(|p| p.add_track(track.clone()));

    if added {
        kv::set_json(&mut tx, KEY_PLAYLISTS, &playlists).await?;
        tx.commit().await?;
    }
    Ok(added)
}

/// Remove a track from a playlist
///
/// Returns false if the playlist does not exist. Removing a track that is not
/// in the playlist still counts as success.
pub async fn remove_track(pool: &SqlitePool, id: &PlaylistId, track_id: &TrackId) -> Result<bool> {
    let mut tx = pool.begin().await?;
    let mut playlists: Vec<Playlist> = kv::get_list(&mut tx, KEY_PLAYLISTS).await?;

    let Some(playlist) = playlists.iter_mut().find(|p| &p.id == id) else {
        return Ok(false);
    };
    playlist.remove_track(track_id);

    kv::set_json(&mut tx, KEY_PLAYLISTS, &playlists).await?;
    tx.commit().await?;
    Ok(true)
}

/// Delete a playlist (unknown ids are ignored)
pub async fn delete(pool: &SqlitePool, id: &PlaylistId) -> Result<()> {
    let mut tx = pool.begin().await?;
    let mut playlists: Vec<Playlist> = kv::get_list(&mut tx, KEY_PLAYLISTS).await?;
    playlists.retain(|p| &p.id != id);
    kv::set_json(&mut tx, KEY_PLAYLISTS, &playlists).await?;
    tx.commit().await?;
    Ok(())
}
