//! JSON documents in the `kv_store` table
//!
//! Every slice of client state is one JSON document under a fixed key. The
//! helpers take a connection so callers can group a read-modify-write (or a
//! change spanning two keys) in one transaction.

use crate::error::{Result, StorageError};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::SqliteConnection;

/// Playlists (array of playlists)
pub const KEY_PLAYLISTS: &str = "soundkit_playlists";

/// Download records (array)
pub const KEY_DOWNLOADED_SONGS: &str = "soundkit_downloaded_songs";

/// Settings object
pub const KEY_SETTINGS: &str = "soundkit_settings";

/// Recently played tracks, most recent first
pub const KEY_RECENTLY_PLAYED: &str = "soundkit_recently_played";

/// Favorite tracks
pub const KEY_FAVORITES: &str = "soundkit_favorites";

/// Playback history, most recent first
pub const KEY_PLAYBACK_HISTORY: &str = "soundkit_playback_history";

/// Read and decode the document under `key`
///
/// Returns `Ok(None)` if nothing is stored.
pub async fn get_json<T: DeserializeOwned>(
    conn: &mut SqliteConnection,
    key: &str,
) -> Result<Option<T>> {
    let raw: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?")
        .bind(key)
        .fetch_optional(&mut *conn)
        .await?;

    raw.map(|value| serde_json::from_str(&value).map_err(|e| StorageError::serialization(key, &e)))
        .transpose()
}

/// Read a list document, empty when nothing is stored
pub async fn get_list<T: DeserializeOwned>(conn: &mut SqliteConnection, key: &str) -> Result<Vec<T>> {
    Ok(get_json(conn, key).await?.unwrap_or_default())
}

/// Encode and store `value` under `key`, replacing any previous document
pub async fn set_json<T: Serialize + ?Sized>(
    conn: &mut SqliteConnection,
    key: &str,
    value: &T,
) -> Result<()> {
    let encoded = serde_json::to_string(value).map_err(|e| StorageError::serialization(key, &e))?;
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(encoded)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Drop the document under `key`
pub async fn remove(conn: &mut SqliteConnection, key: &str) -> Result<()> {
    sqlx::query("DELETE FROM kv_store WHERE key = ?")
        .bind(key)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
