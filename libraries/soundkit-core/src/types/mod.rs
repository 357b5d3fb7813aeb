mod download;
mod ids;
mod playlist;
mod quality;
mod recent;
mod settings;
mod track;

pub use download::DownloadRecord;
pub use ids::{PlaylistId, TrackId};
pub use playlist::Playlist;
pub use quality::QualityTier;
pub use recent::{push_recent, PLAYBACK_HISTORY_LIMIT, RECENTLY_PLAYED_LIMIT};
pub use settings::Settings;
pub use track::{AlbumRef, Track, TrackUrl};
