use crate::{downloads, favorites, history, playlists, settings};
use async_trait::async_trait;
use soundkit_core::{
    storage::PersistenceStore, DownloadRecord, Playlist, PlaylistId, Result, Settings, Track,
    TrackId,
};
use sqlx::SqlitePool;

/// Persistence store backed by `SQLite`
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (or create) the database at `database_url` and bring its schema
    /// up to date
    pub async fn connect(database_url: &str) -> crate::error::Result<Self> {
        let pool = crate::create_pool(database_url).await?;
        crate::run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl PersistenceStore for SqliteStore {
    // Settings
    async fn settings(&self) -> Result<Settings> {
        Ok(settings::get(&self.pool).await?)
    }

    async fn save_settings(&self, value: &Settings) -> Result<()> {
        Ok(settings::save(&self.pool, value).await?)
    }

    // Downloads
    async fn downloaded_tracks(&self) -> Result<Vec<DownloadRecord>> {
        Ok(downloads::list(&self.pool).await?)
    }

    async fn downloaded_track(&self, id: &TrackId) -> Result<Option<DownloadRecord>> {
        Ok(downloads::find(&self.pool, id).await?)
    }

    async fn add_downloaded_track(&self, track: &Track, local_uri: &str) -> Result<DownloadRecord> {
        Ok(downloads::add(&self.pool, track, local_uri).await?)
    }

    async fn remove_downloaded_track(&self, id: &TrackId) -> Result<bool> {
        Ok(downloads::remove(&self.pool, id).await?)
    }

    async fn clear_downloaded_tracks(&self) -> Result<usize> {
        Ok(downloads::clear(&self.pool).await?)
    }

    // Recently played / history
    async fn recently_played(&self) -> Result<Vec<Track>> {
        Ok(history::recently_played(&self.pool).await?)
    }

    async fn add_to_recently_played(&self, track: &Track) -> Result<()> {
        Ok(history::add_recently_played(&self.pool, track).await?)
    }

    async fn playback_history(&self) -> Result<Vec<Track>> {
        Ok(history::playback_history(&self.pool).await?)
    }

    async fn add_to_playback_history(&self, track: &Track) -> Result<()> {
        Ok(history::add_playback_history(&self.pool, track).await?)
    }

    async fn clear_playback_history(&self) -> Result<()> {
        Ok(history::clear_playback_history(&self.pool).await?)
    }

    // Favorites
    async fn favorites(&self) -> Result<Vec<Track>> {
        Ok(favorites::list(&self.pool).await?)
    }

    async fn toggle_favorite(&self, track: &Track) -> Result<bool> {
        Ok(favorites::toggle(&self.pool, track).await?)
    }

    // Playlists
    async fn playlists(&self) -> Result<Vec<Playlist>> {
        Ok(playlists::list(&self.pool).await?)
    }

    async fn create_playlist(&self, name: &str, description: &str) -> Result<Playlist> {
        Ok(playlists::create(&self.pool, name, description).await?)
    }

    async fn add_track_to_playlist(&self, playlist_id: &PlaylistId, track: &Track) -> Result<bool> {
        Ok(playlists::add_track(&self.pool, playlist_id, track).await?)
    }

    async fn remove_track_from_playlist(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
    ) -> Result<bool> {
        Ok(playlists::remove_track(&self.pool, playlist_id, track_id).await?)
    }

    async fn delete_playlist(&self, playlist_id: &PlaylistId) -> Result<()> {
        Ok(playlists::delete(&self.pool, playlist_id).await?)
    }
}
