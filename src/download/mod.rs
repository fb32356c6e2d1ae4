pub mod bridge;
pub mod engine;
pub mod manager;
pub mod progress;
pub mod protocol;
pub mod quality;

pub use bridge::PythonBridgeDownloader;
pub use engine::{DownloadError, DownloadJob, DownloadOutcome, Downloader};
pub use manager::DownloadManager;
pub use progress::{ProgressCollector, ProgressSink};
pub use quality::AudioQuality;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub const TRACK_TEMPLATE: &str = "Tracks/{artist_name} - {track_title}{track_explicit}";

pub const ALBUM_TEMPLATE: &str = "Albums/{album_artist} - {album_title}{album_explicit}/{track_volume_num_optional}{album_track_num}. {artist_name} - {track_title}{album_explicit}";

pub const PLAYLIST_TEMPLATE: &str =
    "Playlists/{playlist_name}/{list_pos}. {artist_name} - {track_title}";

/// Unit a download operation targets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Track,
    Album,
    Playlist,
}

impl MediaKind {
    /// Naming template the downloader uses to lay files out on disk
    pub fn file_template(&self) -> &'static str {
        match self {
            MediaKind::Track => TRACK_TEMPLATE,
            MediaKind::Album => ALBUM_TEMPLATE,
            MediaKind::Playlist => PLAYLIST_TEMPLATE,
        }
    }

    /// Whether the multi-item entry point of the downloader applies
    pub fn is_collection(&self) -> bool {
        !matches!(self, MediaKind::Track)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Track => write!(f, "track"),
            MediaKind::Album => write!(f, "album"),
            MediaKind::Playlist => write!(f, "playlist"),
        }
    }
}

/// A caller's download request, immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRequest {
    pub media_id: String,
    pub kind: MediaKind,
    pub quality: String,
    pub output_path: Option<PathBuf>,
    pub include_videos: bool,
}

impl DownloadRequest {
    pub fn new(kind: MediaKind, media_id: impl Into<String>, quality: impl Into<String>) -> Self {
        Self {
            media_id: media_id.into(),
            kind,
            quality: quality.into(),
            output_path: None,
            include_videos: false,
        }
    }

    pub fn track(media_id: impl Into<String>, quality: impl Into<String>) -> Self {
        Self::new(MediaKind::Track, media_id, quality)
    }

    pub fn album(media_id: impl Into<String>, quality: impl Into<String>) -> Self {
        Self::new(MediaKind::Album, media_id, quality)
    }

    pub fn playlist(media_id: impl Into<String>, quality: impl Into<String>) -> Self {
        Self::new(MediaKind::Playlist, media_id, quality)
    }

    /// Override the output base path. Empty strings are ignored.
    pub fn with_output_path(mut self, output_path: Option<String>) -> Self {
        self.output_path = output_path
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        self
    }

    /// Only meaningful for playlists
    pub fn with_videos(mut self, include_videos: bool) -> Self {
        self.include_videos = include_videos;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_per_kind() {
        assert_eq!(
            MediaKind::Track.file_template(),
            "Tracks/{artist_name} - {track_title}{track_explicit}"
        );
        assert!(MediaKind::Album.file_template().starts_with("Albums/{album_artist}"));
        assert!(MediaKind::Playlist.file_template().contains("{list_pos}"));
        assert!(!MediaKind::Track.is_collection());
        assert!(MediaKind::Playlist.is_collection());
    }

    #[test]
    fn test_request_builder() {
        let request = DownloadRequest::playlist("abc-123", "HiRes")
            .with_output_path(Some("/tmp/music".to_string()))
            .with_videos(true);

        assert_eq!(request.kind, MediaKind::Playlist);
        assert_eq!(request.output_path, Some(PathBuf::from("/tmp/music")));
        assert!(request.include_videos);

        let request = DownloadRequest::track("1", "HiFi").with_output_path(Some("  ".into()));
        assert_eq!(request.output_path, None);
    }
}
