//! Error types for HTTP file transfer.

use thiserror::Error;

/// Errors that can occur while downloading a file.
#[derive(Error, Debug)]
pub enum TransferError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server returned {status} for {url}")]
    Status { status: u16, url: String },

    /// URL could not be parsed or uses an unsupported scheme
    #[error("Invalid download URL: {0}")]
    InvalidUrl(String),

    /// IO error while writing the file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Download was cancelled
    #[error("Download cancelled")]
    Cancelled,
}

/// Result type for transfer operations.
pub type Result<T> = std::result::Result<T, TransferError>;

impl From<TransferError> for soundkit_core::CoreError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::Cancelled => soundkit_core::CoreError::Cancelled,
            other => soundkit_core::CoreError::transfer(other.to_string()),
        }
    }
}
