//! Platform collaborator traits for SoundKit
//!
//! The engine consumes a media backend (the platform's audio session) and a
//! file transfer capability (resumable HTTP download). Both are provided by
//! the hosting application.

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Options applied when a media handle is created
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaOptions {
    /// Start playing as soon as the source is loaded
    pub auto_play: bool,

    /// Playback rate (1.0 = normal speed)
    pub rate: f32,

    /// Volume in 0.0..=1.0
    pub volume: f32,
}

/// Status report delivered by a media handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MediaStatus {
    /// Current position in milliseconds
    pub position_ms: u64,

    /// Total duration in milliseconds (0 while unknown)
    pub duration_ms: u64,

    /// Whether audio is currently playing
    pub is_playing: bool,

    /// Set once when the track reached its natural end
    pub just_finished: bool,
}

/// Callback invoked by the backend at a cadence of its choosing
pub type StatusCallback = Box<dyn Fn(MediaStatus) + Send + Sync>;

/// Callback receiving download progress as a fraction in `[0, 1]`
pub type ProgressCallback = Box<dyn Fn(f32) + Send + Sync>;

/// Platform media primitive
///
/// Creates one handle per loaded source.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Load `uri` and return a handle to the new session
    ///
    /// # Errors
    /// Returns an error if the source cannot be loaded
    async fn create(
        &self,
        uri: &str,
        options: MediaOptions,
        on_status: StatusCallback,
    ) -> Result<Box<dyn MediaHandle>>;
}

/// A loaded media session
#[async_trait]
pub trait MediaHandle: Send + Sync {
    /// Start or resume playback
    async fn play(&self) -> Result<()>;

    /// Pause playback
    async fn pause(&self) -> Result<()>;

    /// Jump to a position in milliseconds
    async fn set_position(&self, position_ms: u64) -> Result<()>;

    /// Set volume (0.0..=1.0)
    async fn set_volume(&self, volume: f32) -> Result<()>;

    /// Set playback rate
    async fn set_rate(&self, rate: f32) -> Result<()>;

    /// Release the session; the handle must not be used afterwards
    async fn unload(&self) -> Result<()>;
}

/// Resumable download of a remote URL to a local path
#[async_trait]
pub trait FileTransfer: Send + Sync {
    /// Download `url` to `destination`
    ///
    /// Returns the final local path. Implementations must not leave a file at
    /// the destination when they fail or observe `cancel`.
    ///
    /// # Errors
    /// Returns an error if the transfer fails or is cancelled
    async fn download(
        &self,
        url: &str,
        destination: &Path,
        on_progress: ProgressCallback,
        cancel: CancellationToken,
    ) -> Result<PathBuf>;

    /// Whether a completed file exists at `path`
    async fn file_exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }
}
