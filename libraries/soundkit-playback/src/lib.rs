//! SoundKit - Playback Engine
//!
//! Drives a single audio session for the SoundKit client.
//!
//! This crate provides:
//! - A play queue with shuffle and repeat (off, one, all)
//! - Load / play / pause / seek / rate / volume on one media session
//! - Automatic advance when a track finishes
//! - Offline downloads with quality fallback
//! - Snapshot listeners notified after every state change
//!
//! # Architecture
//!
//! The engine owns no platform code. Audio output, persistence, and file
//! transfer are injected through the traits in `soundkit-core`
//! ([`MediaBackend`](soundkit_core::MediaBackend),
//! [`PersistenceStore`](soundkit_core::PersistenceStore),
//! [`FileTransfer`](soundkit_core::FileTransfer)).
//!
//! Status reports from the media backend land on an internal channel. Drive
//! them either with [`PlaybackEngine::spawn_status_listener`] or, in tests,
//! with [`PlaybackEngine::process_status_events`].
//!
//! # Example
//!
//! ```rust,no_run
//! use soundkit_playback::{EngineConfig, PlaybackEngine, RepeatMode};
//! use soundkit_core::{FileTransfer, MediaBackend, PersistenceStore, Track};
//! use std::sync::Arc;
//!
//! # async fn run(
//! #     store: Arc<dyn PersistenceStore>,
//! #     media: Arc<dyn MediaBackend>,
//! #     transfer: Arc<dyn FileTransfer>,
//! # ) -> soundkit_playback::Result<()> {
//! let engine = Arc::new(PlaybackEngine::new(EngineConfig::default(), store, media, transfer));
//! engine.spawn_status_listener();
//!
//! engine.add_listener(|snapshot| {
//!     println!("playing={} at {}ms", snapshot.is_playing, snapshot.position_ms);
//! });
//!
//! let tracks = vec![
//!     Track::new("a", "First").with_url("160kbps", "https://cdn.example/a-160.mp3"),
//!     Track::new("b", "Second").with_url("96kbps", "https://cdn.example/b-96.mp3"),
//! ];
//! engine.set_queue(tracks, 0).await;
//! engine.set_repeat(RepeatMode::All).await;
//! engine.play_at(0).await?;
//! engine.play_next().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod listeners;
pub mod queue;
pub mod resolver;
pub mod shuffle;
pub mod types;
pub mod volume;

pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use listeners::{Listener, Subscription};
pub use queue::{Direction, Queue};
pub use resolver::{select_remote_url, ResolvedSource};
pub use types::{format_time, EngineConfig, PlaybackSnapshot, RepeatMode, SessionState};
pub use volume::Volume;
