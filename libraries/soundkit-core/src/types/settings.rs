//! User settings read by the playback engine

use crate::types::QualityTier;
use serde::{Deserialize, Serialize};

/// Playback and download preferences
///
/// Stored as one JSON document. Missing fields fall back to their defaults so
/// documents written by older clients still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Tier used when streaming
    pub audio_quality: QualityTier,

    /// Tier used when downloading
    pub download_quality: QualityTier,

    /// Seconds skipped back by `rewind` (default: 10)
    #[serde(alias = "rewindDuration")]
    pub rewind_seconds: u32,

    /// Seconds skipped forward by `fast_forward` (default: 10)
    #[serde(alias = "fastForwardDuration")]
    pub fast_forward_seconds: u32,

    /// Rate applied to new tracks unless changed in-session (default: 1.0)
    #[serde(alias = "playbackSpeed")]
    pub default_playback_rate: f32,

    /// Advance to the next queued track when one ends (default: true)
    pub autoplay: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            audio_quality: QualityTier::Medium,
            download_quality: QualityTier::Medium,
            rewind_seconds: 10,
            fast_forward_seconds: 10,
            default_playback_rate: 1.0,
            autoplay: true,
        }
    }
}
