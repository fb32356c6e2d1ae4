//! Tool bodies. Every handler receives an authenticated session and
//! returns the text shown to the client, failures included.

pub mod discovery;
pub mod download;
pub mod favorites;
pub mod info;
pub mod playlist;
pub mod search;
pub mod user;

use std::fmt::Display;
use std::sync::Arc;

use crate::config::Config;
use crate::download::DownloadManager;
use crate::tidal::{LazySessionProvider, SessionProvider};

pub use discovery::{handle_artist_radio, handle_similar_artists, handle_track_lyrics};
pub use download::{
    handle_download_album, handle_download_playlist, handle_download_settings,
    handle_download_track,
};
pub use favorites::{handle_favorites, handle_favorites_summary};
pub use info::{
    handle_album_details, handle_artist_albums, handle_artist_details, handle_playlist_details,
    handle_track_details,
};
pub use playlist::{handle_my_playlists, handle_playlist_items};
pub use search::handle_search;
pub use user::{handle_subscription_info, handle_user_profile};

/// Everything a tool call may touch
#[derive(Clone)]
pub struct ToolContext {
    pub sessions: Arc<dyn SessionProvider>,
    pub downloads: DownloadManager,
}

impl ToolContext {
    pub fn new(sessions: Arc<dyn SessionProvider>, downloads: DownloadManager) -> Self {
        Self {
            sessions,
            downloads,
        }
    }

    /// Context backed by the real TIDAL session and the Python download helper
    pub fn from_config(config: &Config) -> Self {
        let sessions = Arc::new(LazySessionProvider::from_token_file(config.tidal.clone()));
        let downloader = Arc::new(crate::download::PythonBridgeDownloader::new(&config.bridge));
        let downloads = DownloadManager::new(downloader, config.download.clone());
        Self::new(sessions, downloads)
    }
}

/// Turn a fallible tool body into its text response
pub(crate) fn report<E: Display>(action: &str, result: Result<String, E>) -> String {
    result.unwrap_or_else(|e| format!("✗ Failed to {action}: {e}"))
}

/// `m:ss`
pub(crate) fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// `Hh Mm`
pub(crate) fn format_long_duration(seconds: u64) -> String {
    format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
}

pub(crate) fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

pub(crate) fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durations() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(245), "4:05");
        assert_eq!(format_long_duration(3 * 3600 + 25 * 60 + 59), "3h 25m");
        assert_eq!(format_long_duration(59), "0h 0m");
    }

    #[test]
    fn test_report_wraps_errors() {
        let failed: Result<String, String> = Err("boom".to_string());
        assert_eq!(report("get thing", failed), "✗ Failed to get thing: boom");
        assert_eq!(report::<String>("x", Ok("fine".into())), "fine");
    }

    #[test]
    fn test_optional_fields() {
        assert_eq!(or_na::<u32>(None), "N/A");
        assert_eq!(or_na(Some(3)), "3");
        assert_eq!(yes_no(true), "Yes");
    }
}
