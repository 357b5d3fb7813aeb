//! Track domain type

use crate::types::{QualityTier, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Album a track belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRef {
    /// Catalog album identifier
    pub id: String,

    /// Album name
    pub name: String,
}

/// A remote, quality-tagged source URL for a track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackUrl {
    /// Quality label as delivered by the catalog (e.g. "160kbps")
    pub quality: String,

    /// Remote URL
    pub url: String,
}

impl TrackUrl {
    /// Create a new quality-tagged URL
    pub fn new(quality: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            quality: quality.into(),
            url: url.into(),
        }
    }

    /// Bitrate encoded in the quality label
    ///
    /// Accepts bitrate labels ("320kbps", "96 kbps") and tier names
    /// ("high", "medium", "low"). Returns `None` for anything else.
    pub fn bitrate_kbps(&self) -> Option<u32> {
        let label = self.quality.trim().to_ascii_lowercase();

        if let Ok(tier) = label.parse::<QualityTier>() {
            return Some(tier.bitrate_kbps());
        }

        label
            .strip_suffix("kbps")
            .and_then(|digits| digits.trim().parse::<u32>().ok())
    }

    /// Whether the URL is usable at all
    pub fn is_usable(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// A playable song as fetched from the catalog
///
/// Catalog fields are immutable once fetched. The client only ever fills in
/// `local_uri` and the timestamp fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Display name
    pub name: String,

    /// Artist names, primary artist first
    #[serde(default)]
    pub artists: Vec<String>,

    /// Album reference
    #[serde(default)]
    pub album: Option<AlbumRef>,

    /// Track duration in milliseconds
    #[serde(default)]
    pub duration_ms: u64,

    /// Quality-tagged remote URLs
    #[serde(default, rename = "downloadUrl")]
    pub urls: Vec<TrackUrl>,

    /// Local file once downloaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_uri: Option<String>,

    /// When the track was downloaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloaded_at: Option<DateTime<Utc>>,

    /// When the track was last played
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub played_at: Option<DateTime<Utc>>,

    /// When the track was marked favorite
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorited_at: Option<DateTime<Utc>>,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(id: impl Into<TrackId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            artists: Vec::new(),
            album: None,
            duration_ms: 0,
            urls: Vec::new(),
            local_uri: None,
            downloaded_at: None,
            played_at: None,
            favorited_at: None,
        }
    }

    /// Add an artist
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artists.push(artist.into());
        self
    }

    /// Set the album
    #[must_use]
    pub fn with_album(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.album = Some(AlbumRef {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    /// Set the duration in milliseconds
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Add a quality-tagged remote URL
    #[must_use]
    pub fn with_url(mut self, quality: impl Into<String>, url: impl Into<String>) -> Self {
        self.urls.push(TrackUrl::new(quality, url));
        self
    }

    /// Get the track duration as a Duration
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Artists joined for display ("A, B")
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }
}
