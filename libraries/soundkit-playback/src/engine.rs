//! Playback engine - core orchestration
//!
//! Owns the single media session and the play queue, drives automatic
//! advance, runs downloads, and publishes a snapshot after every mutation.
//!
//! # Session lifecycle
//!
//! ```text
//! Idle ──load_track──▶ Loading ──handle created──▶ Ready (playing | paused)
//!  ▲                      │                            │
//!  └──── load failed ─────┘                            │
//!  └─────────────────────────── stop ──────────────────┘
//! ```
//!
//! Engine state sits behind an async mutex that is never held while a
//! collaborator call is awaited. Every load takes a new generation number and
//! a cancellation token; starting another load (or `stop`) cancels the token
//! and bumps the generation, so status reports from an older handle are
//! dropped. Tearing down the previous handle and creating the next one happen
//! under a separate session lock, so a handle is always unloaded before the
//! next `create` starts.

use crate::{
    error::{PlaybackError, Result},
    listeners::{ListenerRegistry, Subscription},
    queue::{Direction, Queue},
    resolver,
    types::{EngineConfig, PlaybackSnapshot, RepeatMode, SessionState},
    volume::Volume,
};
use soundkit_core::{
    CoreError, DownloadRecord, FileTransfer, MediaBackend, MediaHandle, MediaOptions, MediaStatus,
    PersistenceStore, ProgressCallback, Settings, StatusCallback, Track, TrackId,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Status report tagged with the load that produced it
#[derive(Debug, Clone, Copy)]
struct StatusEvent {
    generation: u64,
    status: MediaStatus,
}

/// Mutable engine state
struct EngineState {
    session: SessionState,
    media: Option<Arc<dyn MediaHandle>>,
    generation: u64,
    load_token: Option<CancellationToken>,

    current_track: Option<Track>,
    is_playing: bool,
    position_ms: u64,
    duration_ms: u64,

    volume: Volume,
    // Set once the user picks a speed; until then each load uses the
    // settings' default rate.
    rate_override: Option<f32>,
    playback_rate: f32,

    repeat: RepeatMode,
    shuffle: bool,
    queue: Queue,
}

impl EngineState {
    fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            session: self.session,
            current_track: self.current_track.clone(),
            is_playing: self.is_playing,
            position_ms: self.position_ms,
            duration_ms: self.duration_ms,
            volume: self.volume.level(),
            playback_rate: self.playback_rate,
            repeat_mode: self.repeat,
            shuffle: self.shuffle,
            queue: self.queue.tracks(),
            current_index: self.queue.current_index(),
        }
    }

    fn clear_session(&mut self) {
        self.session = SessionState::Idle;
        self.current_track = None;
        self.is_playing = false;
        self.position_ms = 0;
        self.duration_ms = 0;
    }

    /// Upper bound for fast-forward; 0 means unknown
    fn known_duration(&self) -> u64 {
        if self.duration_ms > 0 {
            self.duration_ms
        } else {
            self.current_track.as_ref().map_or(0, |t| t.duration_ms)
        }
    }

    fn pick_index(&self, direction: Direction) -> Option<usize> {
        let mut rng = rand::thread_rng();
        self.queue
            .step(direction, self.shuffle, self.repeat, &mut rng)
    }
}

/// Central playback engine
///
/// Construct one per player and share it behind an `Arc`. Collaborators are
/// injected so tests can run several isolated engines side by side.
pub struct PlaybackEngine {
    config: EngineConfig,
    store: Arc<dyn PersistenceStore>,
    media: Arc<dyn MediaBackend>,
    transfer: Arc<dyn FileTransfer>,

    state: Mutex<EngineState>,
    // Held from taking the old handle until the new one is installed
    session_lock: Mutex<()>,
    listeners: ListenerRegistry,

    status_tx: mpsc::UnboundedSender<StatusEvent>,
    status_rx: StdMutex<Option<mpsc::UnboundedReceiver<StatusEvent>>>,
}

impl PlaybackEngine {
    /// Create a new engine
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn PersistenceStore>,
        media: Arc<dyn MediaBackend>,
        transfer: Arc<dyn FileTransfer>,
    ) -> Self {
        let (status_tx, status_rx) = mpsc::unbounded_channel();

        let state = EngineState {
            session: SessionState::Idle,
            media: None,
            generation: 0,
            load_token: None,
            current_track: None,
            is_playing: false,
            position_ms: 0,
            duration_ms: 0,
            volume: Volume::new(config.volume),
            rate_override: None,
            playback_rate: 1.0,
            repeat: config.repeat,
            shuffle: config.shuffle,
            queue: Queue::new(),
        };

        Self {
            config,
            store,
            media,
            transfer,
            state: Mutex::new(state),
            session_lock: Mutex::new(()),
            listeners: ListenerRegistry::new(),
            status_tx,
            status_rx: StdMutex::new(Some(status_rx)),
        }
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ===== Subscriptions =====

    /// Register a snapshot listener
    ///
    /// Listeners run in registration order after every mutation.
    pub fn add_listener<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&PlaybackSnapshot) + Send + Sync + 'static,
    {
        self.listeners.add(listener)
    }

    /// Current state without subscribing
    pub async fn snapshot(&self) -> PlaybackSnapshot {
        self.state.lock().await.snapshot()
    }

    async fn publish(&self) {
        let snapshot = self.state.lock().await.snapshot();
        self.listeners.notify(&snapshot);
    }

    // ===== Loading =====

    /// Load `track` into a fresh media session
    ///
    /// Any existing session is torn down first. The source is the recorded
    /// download when one exists, otherwise a remote URL for the current audio
    /// quality (see [`resolver::select_remote_url`]). On success the play is
    /// recorded in recently-played and history; failures there are logged and
    /// ignored.
    ///
    /// Returns [`PlaybackError::Superseded`] when a newer load or `stop`
    /// overtook this call; the handle it may have created is released.
    pub async fn load_track(&self, track: Track, auto_play: bool) -> Result<()> {
        let (generation, token) = {
            let mut state = self.state.lock().await;
            if let Some(token) = state.load_token.take() {
                token.cancel();
            }
            state.generation += 1;
            let token = CancellationToken::new();
            state.load_token = Some(token.clone());

            state.session = SessionState::Loading;
            state.current_track = Some(track.clone());
            state.is_playing = false;
            state.position_ms = 0;
            state.duration_ms = track.duration_ms;

            (state.generation, token)
        };
        self.publish().await;

        let session = self.session_lock.lock().await;

        let previous = {
            let mut state = self.state.lock().await;
            if state.generation != generation {
                debug!(track_id = %track.id, generation, "Load overtaken before teardown");
                return Err(PlaybackError::Superseded);
            }
            state.media.take()
        };
        if let Some(previous) = previous {
            if let Err(e) = previous.unload().await {
                debug!(error = %e, "Ignoring error while unloading previous session");
            }
        }

        let handle = match self.open_session(&track, auto_play, generation, &token).await {
            Ok(handle) => handle,
            Err(PlaybackError::Superseded) => {
                debug!(track_id = %track.id, generation, "Load cancelled before completion");
                return Err(PlaybackError::Superseded);
            }
            Err(e) => {
                {
                    let mut state = self.state.lock().await;
                    if state.generation == generation {
                        state.clear_session();
                        state.load_token = None;
                    }
                }
                warn!(track_id = %track.id, error = %e, "Failed to load track");
                self.publish().await;
                return Err(e);
            }
        };

        let installed = {
            let mut state = self.state.lock().await;
            if state.generation == generation && !token.is_cancelled() {
                state.media = Some(Arc::clone(&handle));
                state.session = SessionState::Ready;
                state.is_playing = auto_play;
                state.load_token = None;
                true
            } else {
                false
            }
        };

        if !installed {
            debug!(track_id = %track.id, generation, "Load superseded, releasing its handle");
            if let Err(e) = handle.unload().await {
                debug!(error = %e, "Ignoring error while unloading superseded session");
            }
            return Err(PlaybackError::Superseded);
        }
        drop(session);

        info!(track_id = %track.id, name = %track.name, auto_play, "Track loaded");
        self.record_play(&track).await;
        self.publish().await;
        Ok(())
    }

    async fn open_session(
        &self,
        track: &Track,
        auto_play: bool,
        generation: u64,
        token: &CancellationToken,
    ) -> Result<Arc<dyn MediaHandle>> {
        let settings = self.settings().await;

        let source = tokio::select! {
            biased;
            () = token.cancelled() => return Err(PlaybackError::Superseded),
            resolved = resolver::resolve_playable(self.store.as_ref(), track, settings.audio_quality) => resolved?,
        };

        let options = {
            let mut state = self.state.lock().await;
            let rate = state
                .rate_override
                .unwrap_or(settings.default_playback_rate);
            let rate = if rate.is_finite() && rate > 0.0 { rate } else { 1.0 };
            state.playback_rate = rate;
            MediaOptions {
                auto_play,
                rate,
                volume: state.volume.level(),
            }
        };

        debug!(
            track_id = %track.id,
            uri = %source.uri(),
            local = source.is_local(),
            generation,
            "Creating media session"
        );

        let on_status = self.status_callback(generation);
        let handle = tokio::select! {
            biased;
            () = token.cancelled() => return Err(PlaybackError::Superseded),
            created = self.media.create(source.uri(), options, on_status) => {
                created.map_err(PlaybackError::MediaBackend)?
            }
        };

        Ok(Arc::from(handle))
    }

    async fn record_play(&self, track: &Track) {
        if let Err(e) = self.store.add_to_recently_played(track).await {
            warn!(track_id = %track.id, error = %e, "Failed to record recently played");
        }
        if let Err(e) = self.store.add_to_playback_history(track).await {
            warn!(track_id = %track.id, error = %e, "Failed to record playback history");
        }
    }

    /// Reload the current track with the current settings
    ///
    /// Keeps position and play/pause state. Used after the audio quality
    /// setting changes mid-track.
    pub async fn reload_current(&self) -> Result<()> {
        let (track, position_ms, was_playing) = {
            let state = self.state.lock().await;
            let Some(track) = state.current_track.clone() else {
                return Ok(());
            };
            (track, state.position_ms, state.is_playing)
        };

        self.load_track(track, false).await?;
        self.seek_to(position_ms).await?;
        if was_playing {
            self.play().await?;
        }
        Ok(())
    }

    /// Tear down the session
    ///
    /// Cancels an in-flight load and clears current track, position, and
    /// duration. The queue is kept.
    pub async fn stop(&self) {
        {
            let mut state = self.state.lock().await;
            if let Some(token) = state.load_token.take() {
                token.cancel();
            }
            state.generation += 1;
            state.clear_session();
        }

        let _session = self.session_lock.lock().await;
        let handle = self.state.lock().await.media.take();

        if let Some(handle) = handle {
            if let Err(e) = handle.unload().await {
                debug!(error = %e, "Ignoring error while unloading on stop");
            }
        }

        self.publish().await;
    }

    // ===== Transport =====

    async fn active_handle(&self) -> Option<(Arc<dyn MediaHandle>, u64)> {
        let state = self.state.lock().await;
        if state.session != SessionState::Ready {
            return None;
        }
        state
            .media
            .as_ref()
            .map(|handle| (Arc::clone(handle), state.generation))
    }

    /// Apply `update` if the session that served the call is still current
    async fn update_session<F>(&self, generation: u64, update: F)
    where
        F: FnOnce(&mut EngineState),
    {
        {
            let mut state = self.state.lock().await;
            if state.generation != generation || state.media.is_none() {
                return;
            }
            update(&mut state);
        }
        self.publish().await;
    }

    /// Start or resume playback (no-op without a loaded track)
    pub async fn play(&self) -> Result<()> {
        let Some((handle, generation)) = self.active_handle().await else {
            return Ok(());
        };
        handle.play().await.map_err(PlaybackError::MediaBackend)?;
        self.update_session(generation, |state| state.is_playing = true)
            .await;
        Ok(())
    }

    /// Pause playback (no-op without a loaded track)
    pub async fn pause(&self) -> Result<()> {
        let Some((handle, generation)) = self.active_handle().await else {
            return Ok(());
        };
        handle.pause().await.map_err(PlaybackError::MediaBackend)?;
        self.update_session(generation, |state| state.is_playing = false)
            .await;
        Ok(())
    }

    /// Pause when playing, play otherwise
    pub async fn toggle_play_pause(&self) -> Result<()> {
        let is_playing = self.state.lock().await.is_playing;
        if is_playing {
            self.pause().await
        } else {
            self.play().await
        }
    }

    /// Jump to `position_ms`
    ///
    /// The value is forwarded as-is; clamping is up to the caller.
    pub async fn seek_to(&self, position_ms: u64) -> Result<()> {
        let Some((handle, generation)) = self.active_handle().await else {
            return Ok(());
        };
        handle
            .set_position(position_ms)
            .await
            .map_err(PlaybackError::MediaBackend)?;
        self.update_session(generation, |state| state.position_ms = position_ms)
            .await;
        Ok(())
    }

    /// Skip back `seconds` (default: `settings.rewind_seconds`)
    pub async fn rewind(&self, seconds: Option<u32>) -> Result<()> {
        let seconds = match seconds {
            Some(seconds) => seconds,
            None => self.settings().await.rewind_seconds,
        };

        let target = {
            let state = self.state.lock().await;
            if state.media.is_none() {
                return Ok(());
            }
            let target = state
                .position_ms
                .saturating_sub(u64::from(seconds).saturating_mul(1000));
            match state.known_duration() {
                0 => target,
                duration => target.min(duration),
            }
        };

        self.seek_to(target).await
    }

    /// Skip forward `seconds` (default: `settings.fast_forward_seconds`)
    ///
    /// Clamped to the track duration when it is known.
    pub async fn fast_forward(&self, seconds: Option<u32>) -> Result<()> {
        let seconds = match seconds {
            Some(seconds) => seconds,
            None => self.settings().await.fast_forward_seconds,
        };

        let target = {
            let state = self.state.lock().await;
            if state.media.is_none() {
                return Ok(());
            }
            let target = state
                .position_ms
                .saturating_add(u64::from(seconds).saturating_mul(1000));
            match state.known_duration() {
                0 => target,
                duration => target.min(duration),
            }
        };

        self.seek_to(target).await
    }

    /// Set volume (0.0-1.0)
    ///
    /// The value is kept for the next load even when nothing is loaded.
    pub async fn set_volume(&self, level: f32) -> Result<()> {
        let (handle, level) = {
            let mut state = self.state.lock().await;
            state.volume.set_level(level);
            (state.media.clone(), state.volume.level())
        };

        let result = match handle {
            Some(handle) => handle
                .set_volume(level)
                .await
                .map_err(PlaybackError::MediaBackend),
            None => Ok(()),
        };
        self.publish().await;
        result
    }

    /// Set playback rate
    ///
    /// Overrides `settings.default_playback_rate` for the rest of the session.
    pub async fn set_playback_speed(&self, rate: f32) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(PlaybackError::InvalidRate(rate));
        }

        let handle = {
            let mut state = self.state.lock().await;
            state.rate_override = Some(rate);
            state.playback_rate = rate;
            state.media.clone()
        };

        let result = match handle {
            Some(handle) => handle
                .set_rate(rate)
                .await
                .map_err(PlaybackError::MediaBackend),
            None => Ok(()),
        };
        self.publish().await;
        result
    }

    // ===== Queue =====

    /// Replace the queue and move the cursor to `start_index`
    ///
    /// Does not start playback; pair with [`PlaybackEngine::play_at`] or
    /// [`PlaybackEngine::load_track`].
    pub async fn set_queue(&self, tracks: Vec<Track>, start_index: usize) {
        {
            let mut state = self.state.lock().await;
            state.queue.set(tracks, start_index);
        }
        self.publish().await;
    }

    /// Move the cursor to `index` and load that track
    pub async fn play_at(&self, index: usize) -> Result<()> {
        let track = {
            let mut state = self.state.lock().await;
            if !state.queue.set_current(index) {
                return Err(PlaybackError::IndexOutOfBounds(index));
            }
            state
                .queue
                .current()
                .cloned()
                .ok_or(PlaybackError::IndexOutOfBounds(index))?
        };
        self.load_track(track, true).await
    }

    /// Remove the queue entry at `index`
    ///
    /// Removing the current entry first advances with
    /// [`PlaybackEngine::play_next`]; if that leaves the cursor where it was
    /// (end of queue, or shuffle picked the same slot) the session is stopped.
    /// Removing an entry before the cursor keeps the cursor on the same track.
    /// Out-of-bounds indices are ignored, as is a removal whose queue was
    /// replaced or changed while advancing.
    pub async fn remove_from_queue(&self, index: usize) -> Result<Option<Track>> {
        let (tracks, is_current) = {
            let state = self.state.lock().await;
            if index >= state.queue.len() {
                return Ok(None);
            }
            (state.queue.tracks(), index == state.queue.current_index())
        };

        if is_current {
            if let Err(e) = self.play_next().await {
                warn!(index, error = %e, "Advance before removal failed");
            }
        }

        let (removed, orphaned) = {
            let mut state = self.state.lock().await;
            // `index` belongs to the queue seen above
            if !Arc::ptr_eq(&tracks, &state.queue.tracks()) {
                debug!(index, "Queue replaced during removal, ignoring");
                return Ok(None);
            }
            let orphaned = is_current && state.queue.current_index() == index;
            (state.queue.remove(index), orphaned)
        };

        if orphaned {
            self.stop().await;
        } else {
            self.publish().await;
        }
        Ok(removed)
    }

    /// Advance to the next track
    ///
    /// Returns false when there was nothing to advance to.
    pub async fn play_next(&self) -> Result<bool> {
        self.advance(Direction::Forward).await
    }

    /// Go back to the previous track
    ///
    /// Returns false when there was nothing to go back to.
    pub async fn play_previous(&self) -> Result<bool> {
        self.advance(Direction::Backward).await
    }

    async fn advance(&self, direction: Direction) -> Result<bool> {
        let track = {
            let mut state = self.state.lock().await;
            let Some(index) = state.pick_index(direction) else {
                debug!(?direction, "No track to move to");
                return Ok(false);
            };
            state.queue.set_current(index);
            state.queue.get(index).cloned()
        };

        match track {
            Some(track) => {
                self.load_track(track, true).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Set repeat mode
    pub async fn set_repeat(&self, mode: RepeatMode) {
        self.state.lock().await.repeat = mode;
        self.publish().await;
    }

    /// Enable or disable shuffle
    pub async fn set_shuffle(&self, enabled: bool) {
        self.state.lock().await.shuffle = enabled;
        self.publish().await;
    }

    // ===== Media status =====

    fn status_callback(&self, generation: u64) -> StatusCallback {
        let tx = self.status_tx.clone();
        Box::new(move |status| {
            // Receiver gone means the engine is shutting down
            let _ = tx.send(StatusEvent { generation, status });
        })
    }

    /// Drive status reports from a background task
    ///
    /// Returns `None` if the status stream was already claimed. The task ends
    /// once the engine is dropped. Use either this or
    /// [`PlaybackEngine::process_status_events`], not both.
    pub fn spawn_status_listener(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let mut rx = self
            .status_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()?;
        let engine = Arc::downgrade(self);

        Some(tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let Some(engine) = engine.upgrade() else {
                    break;
                };
                engine.handle_status_event(event).await;
            }
            debug!("Status listener finished");
        }))
    }

    /// Apply every queued status report
    ///
    /// Returns the number of reports processed.
    pub async fn process_status_events(&self) -> usize {
        let events: Vec<StatusEvent> = {
            let mut guard = self
                .status_rx
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let Some(rx) = guard.as_mut() else {
                return 0;
            };
            let mut events = Vec::new();
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }
            events
        };

        let count = events.len();
        for event in events {
            self.handle_status_event(event).await;
        }
        count
    }

    async fn handle_status_event(&self, event: StatusEvent) {
        {
            let mut state = self.state.lock().await;
            if state.generation != event.generation || state.media.is_none() {
                return;
            }
            state.position_ms = event.status.position_ms;
            if event.status.duration_ms > 0 {
                state.duration_ms = event.status.duration_ms;
            }
            state.is_playing = event.status.is_playing;
        }
        self.publish().await;

        if event.status.just_finished {
            self.handle_track_end().await;
        }
    }

    async fn handle_track_end(&self) {
        let repeat = self.state.lock().await.repeat;

        let result = if repeat == RepeatMode::One {
            debug!("Track finished, repeating");
            match self.seek_to(0).await {
                Ok(()) => self.play().await,
                Err(e) => Err(e),
            }
        } else {
            let autoplay = self.settings().await.autoplay;
            let advanced = if autoplay {
                self.play_next().await
            } else {
                Ok(false)
            };
            match advanced {
                Ok(true) => Ok(()),
                Ok(false) => {
                    debug!(autoplay, "Track finished, staying at end");
                    let generation = self.state.lock().await.generation;
                    self.update_session(generation, |state| state.is_playing = false)
                        .await;
                    Ok(())
                }
                Err(e) => Err(e),
            }
        };

        if let Err(e) = result {
            warn!(error = %e, "Automatic advance failed");
        }
    }

    // ===== Downloads =====

    /// Download `track` for offline playback
    ///
    /// See [`PlaybackEngine::download_track_with_cancel`].
    pub async fn download_track(
        &self,
        track: &Track,
        on_progress: Option<ProgressCallback>,
    ) -> Result<DownloadRecord> {
        self.download_track_with_cancel(track, on_progress, CancellationToken::new())
            .await
    }

    /// Download `track`, abortable through `cancel`
    ///
    /// The URL follows `settings.download_quality` with the same fallback as
    /// playback. Progress is reported as a fraction in `[0, 1]`. The file is
    /// fetched to a staging path and only moved over [`Self::download_path`]
    /// after its record is written, so a failed re-download leaves the earlier
    /// file and record as they were. Downloads never touch the queue.
    pub async fn download_track_with_cancel(
        &self,
        track: &Track,
        on_progress: Option<ProgressCallback>,
        cancel: CancellationToken,
    ) -> Result<DownloadRecord> {
        let settings = self.settings().await;
        let url = resolver::resolve_download(track, settings.download_quality)?
            .url
            .clone();
        let destination = self.download_path(&track.id);

        info!(
            track_id = %track.id,
            quality = %settings.download_quality,
            dest = %destination.display(),
            "Downloading track"
        );

        let progress: ProgressCallback = Box::new(move |fraction| {
            if let Some(callback) = &on_progress {
                if fraction.is_finite() {
                    callback(fraction.clamp(0.0, 1.0));
                }
            }
        });

        // Staged next to the destination so a previous download keeps its
        // file until the new record is written
        let staging = staging_path(&destination);
        let staged = self
            .transfer
            .download(&url, &staging, progress, cancel)
            .await
            .map_err(|e| match e {
                CoreError::Cancelled => PlaybackError::Cancelled,
                other => PlaybackError::Transfer(other),
            })?;

        if !self.transfer.file_exists(&staged).await {
            return Err(PlaybackError::Transfer(CoreError::transfer(format!(
                "downloaded file missing: {}",
                staged.display()
            ))));
        }

        let local_uri = destination.to_string_lossy().into_owned();
        let record = match self.store.add_downloaded_track(track, &local_uri).await {
            Ok(record) => record,
            Err(e) => {
                warn!(track_id = %track.id, error = %e, "Failed to record download, discarding file");
                discard(&staged).await;
                return Err(PlaybackError::Persistence(e));
            }
        };

        if let Err(e) = tokio::fs::rename(&staged, &destination).await {
            warn!(track_id = %track.id, error = %e, "Failed to move download into place");
            discard(&staged).await;
            if !self.transfer.file_exists(&destination).await {
                if let Err(remove_err) = self.store.remove_downloaded_track(&track.id).await {
                    warn!(track_id = %track.id, error = %remove_err, "Could not drop record without file");
                }
            }
            return Err(PlaybackError::Transfer(CoreError::Io(e)));
        }

        info!(track_id = %track.id, path = %local_uri, "Track downloaded");
        Ok(record)
    }

    /// Delete a downloaded track's record and file
    pub async fn remove_download(&self, id: &TrackId) -> Result<bool> {
        self.store
            .remove_downloaded_track(id)
            .await
            .map_err(PlaybackError::Persistence)
    }

    /// Local path a track downloads to
    pub fn download_path(&self, id: &TrackId) -> PathBuf {
        self.config
            .download_dir
            .join(format!("{}.mp3", sanitize_file_component(id.as_str())))
    }

    // ===== Settings =====

    /// Settings as stored right now; defaults when the store cannot be read
    async fn settings(&self) -> Settings {
        match self.store.settings().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "Failed to read settings, using defaults");
                Settings::default()
            }
        }
    }
}

fn staging_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".pending");
    destination.with_file_name(name)
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        debug!(path = %path.display(), error = %e, "Could not remove discarded download");
    }
}

fn sanitize_file_component(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}
