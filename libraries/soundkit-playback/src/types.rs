//! Core types for the playback engine

use serde::{Deserialize, Serialize};
use soundkit_core::Track;
use std::path::PathBuf;
use std::sync::Arc;

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the queue ends
    #[default]
    #[serde(rename = "none")]
    Off,

    /// Loop the current track
    One,

    /// Loop the entire queue
    All,
}

/// Lifecycle of the single audio session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    /// No track loaded
    #[default]
    Idle,

    /// Resolving a source / creating the media handle
    Loading,

    /// Handle exists (playing or paused)
    Ready,
}

/// Published engine state
///
/// A fresh value is built after every mutation. The queue is shared with the
/// engine through an `Arc` but is never mutated in place once published.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    /// Session lifecycle
    pub session: SessionState,

    /// Track owning the session (None when idle)
    pub current_track: Option<Track>,

    /// Whether audio is playing
    pub is_playing: bool,

    /// Position in milliseconds
    pub position_ms: u64,

    /// Duration in milliseconds
    pub duration_ms: u64,

    /// Volume in 0.0..=1.0
    pub volume: f32,

    /// Playback rate
    pub playback_rate: f32,

    /// Repeat mode
    pub repeat_mode: RepeatMode,

    /// Shuffle enabled
    pub shuffle: bool,

    /// Queued tracks
    pub queue: Arc<Vec<Track>>,

    /// Cursor into `queue` (meaningless when the queue is empty)
    pub current_index: usize,
}

impl PlaybackSnapshot {
    /// Track under the queue cursor
    pub fn queued_track(&self) -> Option<&Track> {
        self.queue.get(self.current_index)
    }
}

/// Configuration for the playback engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory downloaded files are written to (default: "downloads")
    pub download_dir: PathBuf,

    /// Initial volume (0.0-1.0, default: 1.0)
    pub volume: f32,

    /// Initial shuffle flag (default: false)
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("downloads"),
            volume: 1.0,
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}

/// Format milliseconds as `m:ss`
pub fn format_time(milliseconds: u64) -> String {
    let total_seconds = milliseconds / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes}:{seconds:02}")
}
