//! Wiring of store, transfer and engine for the command-line front end.

use crate::config::CliConfig;
use crate::error::{CliError, Result};
use crate::headless::HeadlessMedia;
use clap::ValueEnum;
use soundkit_core::{
    DownloadRecord, PersistenceStore, Playlist, PlaylistId, ProgressCallback, QualityTier,
    Settings, Track, TrackId,
};
use soundkit_playback::{PlaybackEngine, PlaybackSnapshot, RepeatMode};
use soundkit_storage::SqliteStore;
use soundkit_transfer::HttpFileTransfer;
use std::sync::Arc;
use tracing::{debug, info};

/// A setting that can be changed from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SettingKey {
    AudioQuality,
    DownloadQuality,
    Rewind,
    FastForward,
    Speed,
    Autoplay,
}

/// Result of a headless play
#[derive(Debug, Clone)]
pub struct PlayOutcome {
    pub snapshot: PlaybackSnapshot,

    /// Source handed to the media backend
    pub source: Option<String>,
}

pub struct App {
    store: Arc<SqliteStore>,
    media: Arc<HeadlessMedia>,
    engine: Arc<PlaybackEngine>,
}

impl App {
    /// Open the database and build the engine
    pub async fn open(config: &CliConfig) -> Result<Self> {
        if let Some(path) = config.database_path() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let store = Arc::new(SqliteStore::connect(&config.database_url).await?);
        debug!(url = %config.database_url, "Database ready");

        let transfer = Arc::new(HttpFileTransfer::new(&config.transfer)?);
        let media = Arc::new(HeadlessMedia::new());
        let engine = Arc::new(PlaybackEngine::new(
            config.engine.clone(),
            store.clone(),
            media.clone(),
            transfer,
        ));

        Ok(Self {
            store,
            media,
            engine,
        })
    }

    pub fn engine(&self) -> &Arc<PlaybackEngine> {
        &self.engine
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    // ===== Playback =====

    /// Queue `tracks` and load the one at `start_index`
    ///
    /// Nothing is rendered; the session shows which source was picked and
    /// the play is recorded in history like on a device.
    pub async fn play(
        &self,
        tracks: Vec<Track>,
        start_index: usize,
        repeat: RepeatMode,
        shuffle: bool,
    ) -> Result<PlayOutcome> {
        self.engine.set_repeat(repeat).await;
        self.engine.set_shuffle(shuffle).await;
        self.engine.set_queue(tracks, start_index).await;
        self.engine.play_at(start_index).await?;
        self.engine.process_status_events().await;

        Ok(PlayOutcome {
            snapshot: self.engine.snapshot().await,
            source: self.media.loaded_uri(),
        })
    }

    // ===== Downloads =====

    pub async fn download(
        &self,
        track: &Track,
        on_progress: Option<ProgressCallback>,
    ) -> Result<DownloadRecord> {
        Ok(self.engine.download_track(track, on_progress).await?)
    }

    pub async fn downloads(&self) -> Result<Vec<DownloadRecord>> {
        Ok(self.store.downloaded_tracks().await?)
    }

    pub async fn remove_download(&self, id: &TrackId) -> Result<bool> {
        Ok(self.engine.remove_download(id).await?)
    }

    pub async fn clear_downloads(&self) -> Result<usize> {
        let removed = self.store.clear_downloaded_tracks().await?;
        info!(removed, "Downloads cleared");
        Ok(removed)
    }

    // ===== History / favorites =====

    pub async fn history(&self) -> Result<Vec<Track>> {
        Ok(self.store.playback_history().await?)
    }

    pub async fn clear_history(&self) -> Result<()> {
        Ok(self.store.clear_playback_history().await?)
    }

    pub async fn recently_played(&self) -> Result<Vec<Track>> {
        Ok(self.store.recently_played().await?)
    }

    pub async fn favorites(&self) -> Result<Vec<Track>> {
        Ok(self.store.favorites().await?)
    }

    pub async fn toggle_favorite(&self, track: &Track) -> Result<bool> {
        Ok(self.store.toggle_favorite(track).await?)
    }

    // ===== Settings =====

    pub async fn settings(&self) -> Result<Settings> {
        Ok(self.store.settings().await?)
    }

    /// Change one setting and persist the result
    pub async fn update_setting(&self, key: SettingKey, value: &str) -> Result<Settings> {
        let mut settings = self.store.settings().await?;
        apply_setting(&mut settings, key, value)?;
        self.store.save_settings(&settings).await?;
        info!(?key, value, "Setting updated");
        Ok(settings)
    }

    // ===== Playlists =====

    pub async fn playlists(&self) -> Result<Vec<Playlist>> {
        Ok(self.store.playlists().await?)
    }

    pub async fn create_playlist(&self, name: &str, description: &str) -> Result<Playlist> {
        if name.trim().is_empty() {
            return Err(CliError::InvalidInput(
                "playlist name must not be empty".to_string(),
            ));
        }
        Ok(self.store.create_playlist(name, description).await?)
    }

    /// Add tracks to a playlist, returning how many were new to it
    pub async fn add_to_playlist(&self, id: &PlaylistId, tracks: &[Track]) -> Result<usize> {
        self.require_playlist(id).await?;

        let mut added = 0;
        for track in tracks {
            if self.store.add_track_to_playlist(id, track).await? {
                added += 1;
            }
        }
        Ok(added)
    }

    pub async fn remove_from_playlist(&self, id: &PlaylistId, track_id: &TrackId) -> Result<()> {
        if self.store.remove_track_from_playlist(id, track_id).await? {
            Ok(())
        } else {
            Err(CliError::PlaylistNotFound(id.to_string()))
        }
    }

    pub async fn delete_playlist(&self, id: &PlaylistId) -> Result<()> {
        self.require_playlist(id).await?;
        Ok(self.store.delete_playlist(id).await?)
    }

    async fn require_playlist(&self, id: &PlaylistId) -> Result<()> {
        if self.store.playlists().await?.iter().any(|p| &p.id == id) {
            Ok(())
        } else {
            Err(CliError::PlaylistNotFound(id.to_string()))
        }
    }
}

/// Parse `value` for `key` into `settings`
pub fn apply_setting(settings: &mut Settings, key: SettingKey, value: &str) -> Result<()> {
    let invalid = |expected: &str| {
        CliError::InvalidInput(format!("{key:?} expects {expected}, got '{value}'"))
    };

    match key {
        SettingKey::AudioQuality => {
            settings.audio_quality = value
                .parse::<QualityTier>()
                .map_err(|_| invalid("low, medium or high"))?;
        }
        SettingKey::DownloadQuality => {
            settings.download_quality = value
                .parse::<QualityTier>()
                .map_err(|_| invalid("low, medium or high"))?;
        }
        SettingKey::Rewind => {
            settings.rewind_seconds = value.parse().map_err(|_| invalid("a number of seconds"))?;
        }
        SettingKey::FastForward => {
            settings.fast_forward_seconds =
                value.parse().map_err(|_| invalid("a number of seconds"))?;
        }
        SettingKey::Speed => {
            let rate: f32 = value.parse().map_err(|_| invalid("a positive rate"))?;
            if !rate.is_finite() || rate <= 0.0 {
                return Err(invalid("a positive rate"));
            }
            settings.default_playback_rate = rate;
        }
        SettingKey::Autoplay => {
            settings.autoplay = match value.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => true,
                "false" | "off" | "no" | "0" => false,
                _ => return Err(invalid("on or off")),
            };
        }
    }

    Ok(())
}
