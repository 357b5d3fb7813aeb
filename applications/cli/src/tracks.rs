//! Reading catalog tracks from JSON files.

use crate::error::{CliError, Result};
use serde::Deserialize;
use soundkit_core::Track;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum TrackFile {
    Many(Vec<Track>),
    One(Box<Track>),
}

/// Parse one track or an array of tracks in the catalog's JSON format
pub fn parse_tracks(json: &str) -> std::result::Result<Vec<Track>, serde_json::Error> {
    Ok(match serde_json::from_str::<TrackFile>(json)? {
        TrackFile::Many(tracks) => tracks,
        TrackFile::One(track) => vec![*track],
    })
}

/// Read tracks from `path`
pub async fn read_tracks(path: &Path) -> Result<Vec<Track>> {
    let file_error = |message: String| CliError::TrackFile {
        path: path.display().to_string(),
        message,
    };

    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| file_error(e.to_string()))?;
    let tracks = parse_tracks(&json).map_err(|e| file_error(e.to_string()))?;

    if tracks.is_empty() {
        return Err(file_error("no tracks in file".to_string()));
    }
    Ok(tracks)
}
