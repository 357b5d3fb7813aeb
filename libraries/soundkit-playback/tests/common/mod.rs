//! Common test collaborators for the playback engine
//!
//! In-memory store, a media backend that records every call, and a transfer
//! that writes small files into a temp directory.

#![allow(dead_code)]

use async_trait::async_trait;
use soundkit_core::{
    push_recent, CoreError, DownloadRecord, FileTransfer, MediaBackend, MediaHandle, MediaOptions,
    MediaStatus, PersistenceStore, Playlist, PlaylistId, ProgressCallback, Result, Settings,
    StatusCallback, Track, TrackId, PLAYBACK_HISTORY_LIMIT, RECENTLY_PLAYED_LIMIT,
};
use soundkit_playback::{EngineConfig, PlaybackEngine, PlaybackSnapshot};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

// ===== Fixtures =====

pub fn track(id: &str) -> Track {
    Track::new(id, format!("Track {id}"))
        .with_artist("Test Artist")
        .with_duration_ms(180_000)
        .with_url("96kbps", format!("https://cdn.test/{id}/96"))
        .with_url("160kbps", format!("https://cdn.test/{id}/160"))
        .with_url("320kbps", format!("https://cdn.test/{id}/320"))
}

pub fn tracks(ids: &[&str]) -> Vec<Track> {
    ids.iter().map(|id| track(id)).collect()
}

pub fn url(id: &str, kbps: u32) -> String {
    format!("https://cdn.test/{id}/{kbps}")
}

pub fn status(position_ms: u64, is_playing: bool) -> MediaStatus {
    MediaStatus {
        position_ms,
        duration_ms: 180_000,
        is_playing,
        just_finished: false,
    }
}

pub fn finished() -> MediaStatus {
    MediaStatus {
        position_ms: 180_000,
        duration_ms: 180_000,
        is_playing: false,
        just_finished: true,
    }
}

// ===== Store =====

#[derive(Default)]
struct StoreInner {
    settings: Settings,
    downloads: Vec<DownloadRecord>,
    recently_played: Vec<Track>,
    history: Vec<Track>,
    favorites: Vec<Track>,
    playlists: Vec<Playlist>,
}

/// In-memory persistence store with failure switches
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<StoreInner>,
    pub fail_settings: AtomicBool,
    pub fail_history: AtomicBool,
    pub fail_downloads: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn update_settings(&self, update: impl FnOnce(&mut Settings)) {
        update(&mut self.inner.lock().unwrap().settings);
    }

    pub fn insert_download(&self, track: &Track, local_uri: &str) {
        self.inner
            .lock()
            .unwrap()
            .downloads
            .push(DownloadRecord::new(track.clone(), local_uri));
    }

    pub fn history_ids(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .history
            .iter()
            .map(|t| t.id.to_string())
            .collect()
    }

    pub fn recent_ids(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .recently_played
            .iter()
            .map(|t| t.id.to_string())
            .collect()
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            Err(CoreError::storage(format!("{what} unavailable")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PersistenceStore for MemoryStore {
    async fn settings(&self) -> Result<Settings> {
        Self::check(&self.fail_settings, "settings")?;
        Ok(self.inner.lock().unwrap().settings.clone())
    }

    async fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.inner.lock().unwrap().settings = settings.clone();
        Ok(())
    }

    async fn downloaded_tracks(&self) -> Result<Vec<DownloadRecord>> {
        Ok(self.inner.lock().unwrap().downloads.clone())
    }

    async fn add_downloaded_track(&self, track: &Track, local_uri: &str) -> Result<DownloadRecord> {
        Self::check(&self.fail_downloads, "downloads")?;
        let record = DownloadRecord::new(track.clone(), local_uri);
        let mut inner = self.inner.lock().unwrap();
        inner.downloads.retain(|r| r.id() != &track.id);
        inner.downloads.push(record.clone());
        Ok(record)
    }

    async fn remove_downloaded_track(&self, id: &TrackId) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.downloads.len();
        inner.downloads.retain(|r| r.id() != id);
        Ok(inner.downloads.len() != before)
    }

    async fn clear_downloaded_tracks(&self) -> Result<usize> {
        let mut inner = self.inner.lock().unwrap();
        let count = inner.downloads.len();
        inner.downloads.clear();
        Ok(count)
    }

    async fn recently_played(&self) -> Result<Vec<Track>> {
        Ok(self.inner.lock().unwrap().recently_played.clone())
    }

    async fn add_to_recently_played(&self, track: &Track) -> Result<()> {
        Self::check(&self.fail_history, "recently played")?;
        push_recent(
            &mut self.inner.lock().unwrap().recently_played,
            track,
            RECENTLY_PLAYED_LIMIT,
        );
        Ok(())
    }

    async fn playback_history(&self) -> Result<Vec<Track>> {
        Ok(self.inner.lock().unwrap().history.clone())
    }

    async fn add_to_playback_history(&self, track: &Track) -> Result<()> {
        Self::check(&self.fail_history, "history")?;
        push_recent(
            &mut self.inner.lock().unwrap().history,
            track,
            PLAYBACK_HISTORY_LIMIT,
        );
        Ok(())
    }

    async fn clear_playback_history(&self) -> Result<()> {
        self.inner.lock().unwrap().history.clear();
        Ok(())
    }

    async fn favorites(&self) -> Result<Vec<Track>> {
        Ok(self.inner.lock().unwrap().favorites.clone())
    }

    async fn toggle_favorite(&self, track: &Track) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        if inner.favorites.iter().any(|t| t.id == track.id) {
            inner.favorites.retain(|t| t.id != track.id);
            Ok(false)
        } else {
            inner.favorites.push(track.clone());
            Ok(true)
        }
    }

    async fn playlists(&self) -> Result<Vec<Playlist>> {
        Ok(self.inner.lock().unwrap().playlists.clone())
    }

    async fn create_playlist(&self, name: &str, description: &str) -> Result<Playlist> {
        let playlist = Playlist::new(name, description);
        self.inner.lock().unwrap().playlists.push(playlist.clone());
        Ok(playlist)
    }

    async fn add_track_to_playlist(&self, playlist_id: &PlaylistId, track: &Track) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner
            .playlists
            .iter_mut()
            .find(|p| &p.id == playlist_id)
            .is_some_and(|p| p.add_track(track.clone())))
    }

    async fn remove_track_from_playlist(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
    ) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner
            .playlists
            .iter_mut()
            .find(|p| &p.id == playlist_id)
            .map(|p| {
                p.remove_track(track_id);
            })
            .is_some())
    }

    async fn delete_playlist(&self, playlist_id: &PlaylistId) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .playlists
            .retain(|p| &p.id != playlist_id);
        Ok(())
    }
}

// ===== Media =====

/// Media backend that records calls and lets tests drive status reports
#[derive(Default)]
pub struct RecordingMedia {
    log: Arc<Mutex<Vec<String>>>,
    callbacks: Mutex<Vec<(String, Arc<StatusCallback>)>>,
    options: Mutex<Vec<MediaOptions>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    entered: Notify,
    failing: Mutex<HashSet<String>>,
    live: Arc<AtomicUsize>,
    live_at_create: Mutex<Vec<usize>>,
    unload_gates: Arc<Mutex<HashMap<String, Arc<Notify>>>>,
    unload_entered: Arc<Notify>,
}

impl RecordingMedia {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every call in order, e.g. `create <uri>`, `play <uri>`, `seek <uri> <ms>`
    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn creates(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| c.strip_prefix("create ").map(str::to_string))
            .collect()
    }

    pub fn last_options(&self) -> Option<MediaOptions> {
        self.options.lock().unwrap().last().copied()
    }

    /// Handles created and not yet unloaded
    pub fn live_handles(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Live handle count seen by each `create`, in call order
    pub fn live_at_create(&self) -> Vec<usize> {
        self.live_at_create.lock().unwrap().clone()
    }

    /// Make `create(uri)` fail
    pub fn fail_uri(&self, uri: &str) {
        self.failing.lock().unwrap().insert(uri.to_string());
    }

    /// Hold `create(uri)` until the returned gate is notified
    pub fn gate_uri(&self, uri: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(uri.to_string(), Arc::clone(&gate));
        gate
    }

    /// Wait until a gated `create` is parked
    pub async fn wait_for_gated_create(&self) {
        self.entered.notified().await;
    }

    /// Hold `unload()` of the handle for `uri` until the returned gate is notified
    pub fn gate_unload(&self, uri: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.unload_gates
            .lock()
            .unwrap()
            .insert(uri.to_string(), Arc::clone(&gate));
        gate
    }

    /// Wait until a gated `unload` is parked
    pub async fn wait_for_gated_unload(&self) {
        self.unload_entered.notified().await;
    }

    /// Send a status report from the handle created for `uri`
    pub fn emit(&self, uri: &str, status: MediaStatus) {
        let callback = self
            .callbacks
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(u, _)| u == uri)
            .map(|(_, cb)| Arc::clone(cb));
        if let Some(callback) = callback {
            callback(status);
        }
    }

    /// Send a status report from the most recent handle
    pub fn emit_latest(&self, status: MediaStatus) {
        let callback = self
            .callbacks
            .lock()
            .unwrap()
            .last()
            .map(|(_, cb)| Arc::clone(cb));
        if let Some(callback) = callback {
            callback(status);
        }
    }
}

#[async_trait]
impl MediaBackend for RecordingMedia {
    async fn create(
        &self,
        uri: &str,
        options: MediaOptions,
        on_status: StatusCallback,
    ) -> Result<Box<dyn MediaHandle>> {
        self.log.lock().unwrap().push(format!("create {uri}"));
        self.live_at_create
            .lock()
            .unwrap()
            .push(self.live.load(Ordering::SeqCst));

        let gate = self.gates.lock().unwrap().get(uri).cloned();
        if let Some(gate) = gate {
            self.entered.notify_one();
            gate.notified().await;
        }

        if self.failing.lock().unwrap().contains(uri) {
            return Err(CoreError::media(format!("cannot open {uri}")));
        }

        self.options.lock().unwrap().push(options);
        self.callbacks
            .lock()
            .unwrap()
            .push((uri.to_string(), Arc::new(on_status)));
        self.live.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(RecordingHandle {
            uri: uri.to_string(),
            log: Arc::clone(&self.log),
            live: Arc::clone(&self.live),
            unloaded: AtomicBool::new(false),
            unload_gates: Arc::clone(&self.unload_gates),
            unload_entered: Arc::clone(&self.unload_entered),
        }))
    }
}

struct RecordingHandle {
    uri: String,
    log: Arc<Mutex<Vec<String>>>,
    live: Arc<AtomicUsize>,
    unloaded: AtomicBool,
    unload_gates: Arc<Mutex<HashMap<String, Arc<Notify>>>>,
    unload_entered: Arc<Notify>,
}

impl RecordingHandle {
    fn record(&self, call: String) -> Result<()> {
        if self.unloaded.load(Ordering::SeqCst) {
            return Err(CoreError::media(format!("{call} on unloaded handle")));
        }
        self.log.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl MediaHandle for RecordingHandle {
    async fn play(&self) -> Result<()> {
        self.record(format!("play {}", self.uri))
    }

    async fn pause(&self) -> Result<()> {
        self.record(format!("pause {}", self.uri))
    }

    async fn set_position(&self, position_ms: u64) -> Result<()> {
        self.record(format!("seek {} {position_ms}", self.uri))
    }

    async fn set_volume(&self, volume: f32) -> Result<()> {
        self.record(format!("volume {} {volume}", self.uri))
    }

    async fn set_rate(&self, rate: f32) -> Result<()> {
        self.record(format!("rate {} {rate}", self.uri))
    }

    async fn unload(&self) -> Result<()> {
        let gate = self.unload_gates.lock().unwrap().get(&self.uri).cloned();
        if let Some(gate) = gate {
            self.unload_entered.notify_one();
            gate.notified().await;
        }
        self.record(format!("unload {}", self.uri))?;
        self.unloaded.store(true, Ordering::SeqCst);
        self.live.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

// ===== Transfer =====

/// Transfer that writes the URL as file content
#[derive(Default)]
pub struct FakeTransfer {
    pub fail: AtomicBool,
    pub urls: Mutex<Vec<String>>,
}

impl FakeTransfer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl FileTransfer for FakeTransfer {
    async fn download(
        &self,
        url: &str,
        destination: &Path,
        on_progress: ProgressCallback,
        cancel: CancellationToken,
    ) -> Result<PathBuf> {
        self.urls.lock().unwrap().push(url.to_string());

        if cancel.is_cancelled() {
            return Err(CoreError::Cancelled);
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::transfer("connection reset"));
        }

        // Deliberately out of range; the engine clamps
        on_progress(-0.25);
        on_progress(0.5);
        on_progress(1.5);

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(destination, url.as_bytes()).await?;
        Ok(destination.to_path_buf())
    }
}

// ===== Harness =====

pub struct Harness {
    pub engine: Arc<PlaybackEngine>,
    pub store: Arc<MemoryStore>,
    pub media: Arc<RecordingMedia>,
    pub transfer: Arc<FakeTransfer>,
    pub snapshots: Arc<Mutex<Vec<PlaybackSnapshot>>>,
    pub dir: tempfile::TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(configure: impl FnOnce(&mut EngineConfig)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = EngineConfig {
            download_dir: dir.path().join("downloads"),
            ..EngineConfig::default()
        };
        configure(&mut config);

        let store = MemoryStore::new();
        let media = RecordingMedia::new();
        let transfer = FakeTransfer::new();
        let engine = Arc::new(PlaybackEngine::new(
            config,
            Arc::clone(&store) as Arc<dyn PersistenceStore>,
            Arc::clone(&media) as Arc<dyn MediaBackend>,
            Arc::clone(&transfer) as Arc<dyn FileTransfer>,
        ));

        let snapshots = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&snapshots);
        engine.add_listener(move |snapshot| sink.lock().unwrap().push(snapshot.clone()));

        Self {
            engine,
            store,
            media,
            transfer,
            snapshots,
            dir,
        }
    }

    pub fn last_snapshot(&self) -> PlaybackSnapshot {
        self.snapshots
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no snapshot published yet")
    }

    pub fn current_id(&self) -> Option<String> {
        self.last_snapshot()
            .current_track
            .map(|t| t.id.to_string())
    }

    /// Drive a status report from the latest handle through the engine
    pub async fn report(&self, status: MediaStatus) {
        self.media.emit_latest(status);
        self.engine.process_status_events().await;
    }
}
