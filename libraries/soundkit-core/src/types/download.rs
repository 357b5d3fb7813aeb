//! Downloaded track records

use crate::types::{Track, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Durable mapping from a track to its downloaded local file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRecord {
    /// Track as it was when downloaded
    pub track: Track,

    /// Local file path
    pub local_uri: String,

    /// When the download completed
    pub downloaded_at: DateTime<Utc>,
}

impl DownloadRecord {
    /// Create a record stamped with the current time
    pub fn new(track: Track, local_uri: impl Into<String>) -> Self {
        Self {
            track,
            local_uri: local_uri.into(),
            downloaded_at: Utc::now(),
        }
    }

    /// Track identifier
    pub fn id(&self) -> &TrackId {
        &self.track.id
    }

    /// Local path
    pub fn path(&self) -> &Path {
        Path::new(&self.local_uri)
    }

    /// Copy of the track with the client-side download fields filled in
    pub fn downloaded_track(&self) -> Track {
        let mut track = self.track.clone();
        track.local_uri = Some(self.local_uri.clone());
        track.downloaded_at = Some(self.downloaded_at);
        track
    }
}
