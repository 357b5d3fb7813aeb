//! Playlist domain type

use crate::types::{PlaylistId, Track, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User playlist stored locally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Tracks in insertion order
    #[serde(default, rename = "songs")]
    pub tracks: Vec<Track>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    /// Create a new empty playlist
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PlaylistId::generate(),
            name: name.into(),
            description: description.into(),
            tracks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the playlist already holds a track
    pub fn contains(&self, id: &TrackId) -> bool {
        self.tracks.iter().any(|t| &t.id == id)
    }

    /// Append a track unless already present
    ///
    /// Returns true if the track was added
    pub fn add_track(&mut self, track: Track) -> bool {
        if self.contains(&track.id) {
            return false;
        }
        self.tracks.push(track);
        self.updated_at = Utc::now();
        true
    }

    /// Remove a track by id
    ///
    /// Returns true if something was removed
    pub fn remove_track(&mut self, id: &TrackId) -> bool {
        let before = self.tracks.len();
        self.tracks.retain(|t| &t.id != id);
        self.updated_at = Utc::now();
        self.tracks.len() != before
    }
}
