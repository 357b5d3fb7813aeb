//! SoundKit Core
//!
//! Platform-agnostic domain types, collaborator traits, and error handling for
//! SoundKit.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Settings`, `DownloadRecord`, `Playlist`
//! - **Collaborator Traits**: `PersistenceStore`, `MediaBackend`, `FileTransfer`
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! The playback engine only ever talks to the outside world through the
//! traits defined here, so platform code (media session, file system, key-value
//! store) stays out of the engine.
//!
//! # Example
//!
//! ```rust
//! use soundkit_core::types::Track;
//!
//! let track = Track::new("song-1", "Intro")
//!     .with_artist("Artist")
//!     .with_url("96kbps", "https://cdn.example.com/song-1_96.mp4")
//!     .with_url("320kbps", "https://cdn.example.com/song-1_320.mp4");
//!
//! let bitrates: Vec<_> = track.urls.iter().filter_map(|u| u.bitrate_kbps()).collect();
//! assert_eq!(bitrates, vec![96, 320]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use storage::PersistenceStore;
pub use traits::{
    FileTransfer, MediaBackend, MediaHandle, MediaOptions, MediaStatus, ProgressCallback,
    StatusCallback,
};

pub use types::{
    push_recent, AlbumRef, DownloadRecord, Playlist, PlaylistId, QualityTier, Settings, Track,
    TrackId, TrackUrl, PLAYBACK_HISTORY_LIMIT, RECENTLY_PLAYED_LIMIT,
};
