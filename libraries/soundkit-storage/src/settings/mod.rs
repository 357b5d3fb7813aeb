//! User settings
//!
//! Stored as a single JSON object. Fields missing from the stored document
//! (or a missing document) fall back to [`Settings::default`], and keys this
//! version does not know are ignored.

use crate::error::Result;
use crate::kv::{self, KEY_SETTINGS};
use soundkit_core::Settings;
use sqlx::SqlitePool;

/// Current settings, defaults when nothing is stored
pub async fn get(pool: &SqlitePool) -> Result<Settings> {
    let mut conn = pool.acquire().await?;
    Ok(kv::get_json(&mut conn, KEY_SETTINGS)
        .await?
        .unwrap_or_default())
}

/// Replace the stored settings
pub async fn save(pool: &SqlitePool, settings: &Settings) -> Result<()> {
    let mut conn = pool.acquire().await?;
    kv::set_json(&mut conn, KEY_SETTINGS, settings).await
}
