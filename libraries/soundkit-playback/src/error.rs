//! Error types for the playback engine

use soundkit_core::{CoreError, TrackId};
use thiserror::Error;

/// Playback errors
///
/// Every public engine operation reports failures through this type; nothing
/// panics or escapes the engine boundary in another form.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No local file and no usable remote URL for the track
    #[error("No playable source for track {track_id}")]
    NoPlayableSource { track_id: TrackId },

    /// No usable remote URL to download the track from
    #[error("No download source for track {track_id}")]
    NoDownloadSource { track_id: TrackId },

    /// Media backend rejected a call
    #[error("Media backend error: {0}")]
    MediaBackend(#[source] CoreError),

    /// Download failed or was interrupted
    #[error("Transfer error: {0}")]
    Transfer(#[source] CoreError),

    /// Persistence store read/write failed
    #[error("Persistence error: {0}")]
    Persistence(#[source] CoreError),

    /// A newer `load_track` call took over before this one finished
    #[error("Load superseded by a newer request")]
    Superseded,

    /// Operation cancelled through its token
    #[error("Operation cancelled")]
    Cancelled,

    /// Queue index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Playback rate must be finite and positive
    #[error("Invalid playback rate: {0}")]
    InvalidRate(f32),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
