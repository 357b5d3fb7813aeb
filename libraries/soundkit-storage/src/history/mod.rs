//! Recently played and playback history
//!
//! Both lists are most-recent-first, de-duplicated by track id and capped
//! ([`RECENTLY_PLAYED_LIMIT`], [`PLAYBACK_HISTORY_LIMIT`]).

use crate::error::Result;
use crate::kv::{self, KEY_PLAYBACK_HISTORY, KEY_RECENTLY_PLAYED};
use soundkit_core::{push_recent, Track, PLAYBACK_HISTORY_LIMIT, RECENTLY_PLAYED_LIMIT};
use sqlx::SqlitePool;

async fn list(pool: &SqlitePool, key: &str) -> Result<Vec<Track>> {
    let mut conn = pool.acquire().await?;
    kv::get_list(&mut conn, key).await
}

async fn record(pool: &SqlitePool, key: &str, track: &Track, limit: usize) -> Result<()> {
    let mut tx = pool.begin().await?;
    let mut tracks: Vec<Track> = kv::get_list(&mut tx, key).await?;
    push_recent(&mut tracks, track, limit);
    kv::set_json(&mut tx, key, &tracks).await?;
    tx.commit().await?;
    Ok(())
}

/// Recently played tracks
pub async fn recently_played(pool: &SqlitePool) -> Result<Vec<Track>> {
    list(pool, KEY_RECENTLY_PLAYED).await
}

/// Move `track` to the front of recently played
pub async fn add_recently_played(pool: &SqlitePool, track: &Track) -> Result<()> {
    record(pool, KEY_RECENTLY_PLAYED, track, RECENTLY_PLAYED_LIMIT).await
}

/// Playback history
pub async fn playback_history(pool: &SqlitePool) -> Result<Vec<Track>> {
    list(pool, KEY_PLAYBACK_HISTORY).await
}

/// Move `track` to the front of the playback history
pub async fn add_playback_history(pool: &SqlitePool, track: &Track) -> Result<()> {
    record(pool, KEY_PLAYBACK_HISTORY, track, PLAYBACK_HISTORY_LIMIT).await
}

/// Forget the playback history (recently played is kept)
pub async fn clear_playback_history(pool: &SqlitePool) -> Result<()> {
    let mut conn = pool.acquire().await?;
    kv::remove(&mut conn, KEY_PLAYBACK_HISTORY).await
}
