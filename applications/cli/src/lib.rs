//! SoundKit CLI Library
//!
//! Command-line front end over the playback engine: downloads, history,
//! favorites, settings and playlists against a local `SQLite` database, plus
//! a headless play that resolves sources without rendering audio.
//!
//! This library exposes the components for testing purposes.

pub mod app;
pub mod config;
pub mod error;
pub mod headless;
pub mod tracks;

pub use app::{apply_setting, App, PlayOutcome, SettingKey};
pub use config::CliConfig;
pub use error::{CliError, Result};
pub use headless::HeadlessMedia;
pub use tracks::{parse_tracks, read_tracks};
