//! Track source resolution
//!
//! Turns a track plus a quality tier into something the media backend can
//! load: the downloaded file when one is recorded, otherwise a remote URL.

use crate::error::{PlaybackError, Result};
use soundkit_core::{PersistenceStore, QualityTier, Track, TrackUrl};
use tracing::{debug, warn};

/// Where a playable URI came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSource {
    /// Previously downloaded file
    Local(String),

    /// Remote URL picked by quality
    Remote(String),
}

impl ResolvedSource {
    /// URI to hand to the media backend
    pub fn uri(&self) -> &str {
        match self {
            ResolvedSource::Local(uri) | ResolvedSource::Remote(uri) => uri,
        }
    }

    /// Whether the source is a local file
    pub fn is_local(&self) -> bool {
        matches!(self, ResolvedSource::Local(_))
    }
}

/// Pick a remote URL for `tier`
///
/// Order of preference:
/// 1. the exact tier bitrate
/// 2. lower bitrates, highest first
/// 3. higher bitrates, lowest first
/// 4. URLs whose label carries no bitrate, in catalog order
///
/// A missing exact tier therefore never prevents playback as long as any
/// usable URL exists.
pub fn select_remote_url(track: &Track, tier: QualityTier) -> Option<&TrackUrl> {
    let target = tier.bitrate_kbps();
    let usable = || track.urls.iter().filter(|u| u.is_usable());

    if let Some(exact) = usable().find(|u| u.bitrate_kbps() == Some(target)) {
        return Some(exact);
    }

    let lower = usable()
        .filter_map(|u| u.bitrate_kbps().filter(|b| *b < target).map(|b| (b, u)))
        .max_by_key(|(b, _)| *b)
        .map(|(_, u)| u);
    if lower.is_some() {
        return lower;
    }

    let higher = usable()
        .filter_map(|u| u.bitrate_kbps().map(|b| (b, u)))
        .min_by_key(|(b, _)| *b)
        .map(|(_, u)| u);
    if higher.is_some() {
        return higher;
    }

    usable().next()
}

/// Resolve a playable source for `track`
///
/// A download record in the store always wins, regardless of `tier`. A store
/// read failure is logged and resolution falls through to the remote URLs.
pub async fn resolve_playable(
    store: &dyn PersistenceStore,
    track: &Track,
    tier: QualityTier,
) -> Result<ResolvedSource> {
    match store.downloaded_track(&track.id).await {
        Ok(Some(record)) if !record.local_uri.is_empty() => {
            debug!(track_id = %track.id, uri = %record.local_uri, "Resolved downloaded file");
            return Ok(ResolvedSource::Local(record.local_uri));
        }
        Ok(_) => {}
        Err(e) => {
            warn!(track_id = %track.id, error = %e, "Download lookup failed, trying remote sources");
        }
    }

    if let Some(local) = track.local_uri.as_deref().filter(|uri| !uri.is_empty()) {
        return Ok(ResolvedSource::Local(local.to_string()));
    }

    select_remote_url(track, tier)
        .map(|u| {
            debug!(track_id = %track.id, quality = %u.quality, requested = %tier, "Resolved remote URL");
            ResolvedSource::Remote(u.url.clone())
        })
        .ok_or_else(|| PlaybackError::NoPlayableSource {
            track_id: track.id.clone(),
        })
}

/// Pick the URL to download `track` from
pub fn resolve_download(track: &Track, tier: QualityTier) -> Result<&TrackUrl> {
    select_remote_url(track, tier).ok_or_else(|| PlaybackError::NoDownloadSource {
        track_id: track.id.clone(),
    })
}
