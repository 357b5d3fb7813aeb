//! Persistence store trait
//!
//! The store is the sole owner of durable records (settings, downloads,
//! history, favorites, playlists). Every method returns plain data; callers
//! never hold references into the store.

use crate::error::Result;
use crate::types::{DownloadRecord, Playlist, PlaylistId, Settings, Track, TrackId};
use async_trait::async_trait;

/// Key-value backed persistence used by the playback engine and front ends
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    // ========================================================================
    // Settings
    // ========================================================================

    /// Current settings (defaults when nothing has been saved)
    async fn settings(&self) -> Result<Settings>;

    /// Replace the stored settings
    async fn save_settings(&self, settings: &Settings) -> Result<()>;

    // ========================================================================
    // Downloads
    // ========================================================================

    /// All download records
    async fn downloaded_tracks(&self) -> Result<Vec<DownloadRecord>>;

    /// Download record for a track, if any
    async fn downloaded_track(&self, id: &TrackId) -> Result<Option<DownloadRecord>> {
        Ok(self
            .downloaded_tracks()
            .await?
            .into_iter()
            .find(|record| record.id() == id))
    }

    /// Record a completed download (replaces an existing record for the id)
    async fn add_downloaded_track(&self, track: &Track, local_uri: &str)
        -> Result<DownloadRecord>;

    /// Delete a download record and its local file
    ///
    /// Returns true if a record existed
    async fn remove_downloaded_track(&self, id: &TrackId) -> Result<bool>;

    /// Delete every download record and local file
    ///
    /// Returns the number of records removed
    async fn clear_downloaded_tracks(&self) -> Result<usize>;

    // ========================================================================
    // Recently played / history
    // ========================================================================

    /// Recently played tracks, most recent first
    async fn recently_played(&self) -> Result<Vec<Track>>;

    /// Record a play in the recently-played list
    async fn add_to_recently_played(&self, track: &Track) -> Result<()>;

    /// Playback history, most recent first
    async fn playback_history(&self) -> Result<Vec<Track>>;

    /// Record a play in the playback history
    async fn add_to_playback_history(&self, track: &Track) -> Result<()>;

    /// Forget the playback history
    async fn clear_playback_history(&self) -> Result<()>;

    // ========================================================================
    // Favorites
    // ========================================================================

    /// Favorite tracks in the order they were added
    async fn favorites(&self) -> Result<Vec<Track>>;

    /// Flip the favorite flag of a track
    ///
    /// Returns the new favorite status
    async fn toggle_favorite(&self, track: &Track) -> Result<bool>;

    /// Whether a track is a favorite
    async fn is_favorite(&self, id: &TrackId) -> Result<bool> {
        Ok(self.favorites().await?.iter().any(|t| &t.id == id))
    }

    // ========================================================================
    // Playlists
    // ========================================================================

    /// All playlists
    async fn playlists(&self) -> Result<Vec<Playlist>>;

    /// Create an empty playlist
    async fn create_playlist(&self, name: &str, description: &str) -> Result<Playlist>;

    /// Add a track to a playlist
    ///
    /// Returns false if the playlist is unknown or already holds the track
    async fn add_track_to_playlist(&self, playlist_id: &PlaylistId, track: &Track)
        -> Result<bool>;

    /// Remove a track from a playlist
    ///
    /// Returns false if the playlist is unknown
    async fn remove_track_from_playlist(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
    ) -> Result<bool>;

    /// Delete a playlist
    async fn delete_playlist(&self, playlist_id: &PlaylistId) -> Result<()>;
}
