//! HTTP file transfer for SoundKit.
//!
//! Implements [`soundkit_core::FileTransfer`] on top of `reqwest`, streaming
//! response bodies to disk with progress reporting and cooperative
//! cancellation.
//!
//! # Example
//!
//! ```ignore
//! use soundkit_transfer::{HttpFileTransfer, TransferConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let transfer = HttpFileTransfer::new(&TransferConfig::default())?;
//! let path = transfer
//!     .fetch(
//!         "https://cdn.example.com/track-160.mp3",
//!         Path::new("downloads/track.mp3"),
//!         &|fraction| println!("{:.0}%", fraction * 100.0),
//!         &CancellationToken::new(),
//!     )
//!     .await?;
//! ```

pub mod config;
pub mod download;
pub mod error;

pub use config::TransferConfig;
pub use download::HttpFileTransfer;
pub use error::{Result, TransferError};
