//! CLI error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Could not read tracks from {path}: {message}")]
    TrackFile { path: String, message: String },

    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    #[error(transparent)]
    Playback(#[from] soundkit_playback::PlaybackError),

    #[error(transparent)]
    Core(#[from] soundkit_core::CoreError),

    #[error(transparent)]
    Storage(#[from] soundkit_storage::StorageError),

    #[error(transparent)]
    Transfer(#[from] soundkit_transfer::TransferError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
