use tracing::info;

use crate::download::DownloadManager;
use crate::tidal::Session;

pub async fn handle_download_track(
    downloads: &DownloadManager,
    session: &Session,
    track_id: &str,
    quality: &str,
    output_path: Option<String>,
) -> String {
    info!("Downloading track {} at {}", track_id, quality);
    downloads
        .download_track(session, track_id, quality, output_path)
        .await
}

pub async fn handle_download_album(
    downloads: &DownloadManager,
    session: &Session,
    album_id: &str,
    quality: &str,
    output_path: Option<String>,
) -> String {
    info!("Downloading album {} at {}", album_id, quality);
    downloads
        .download_album(session, album_id, quality, output_path)
        .await
}

pub async fn handle_download_playlist(
    downloads: &DownloadManager,
    session: &Session,
    playlist_id: &str,
    quality: &str,
    output_path: Option<String>,
    include_videos: bool,
) -> String {
    info!(
        "Downloading playlist {} at {} (videos: {})",
        playlist_id, quality, include_videos
    );
    downloads
        .download_playlist(session, playlist_id, quality, output_path, include_videos)
        .await
}

/// Current session quality, download location and the quality labels
pub fn handle_download_settings(downloads: &DownloadManager, session: &Session) -> String {
    format!(
        "=== TIDAL DOWNLOAD SETTINGS ===\n\n\
         Current Quality: {}\n\
         Default Location: {}\n\n\
         Available Quality Options:\n\
         - Low: 320 kbps AAC\n\
         - HiFi/Lossless: FLAC 16-bit/44.1kHz (CD Quality)\n\
         - HiRes/Master: FLAC up to 24-bit/192kHz (Studio Master)\n\n\
         Note: Actual quality depends on your TIDAL subscription tier.\n\
         - TIDAL HiFi: Up to 'HiFi' quality (16-bit/44.1kHz)\n\
         - TIDAL HiFi Plus: Up to 'HiRes' quality (24-bit/192kHz)\n\n\
         Downloads include:\n\
         ✓ Full metadata (artist, album, title, etc.)\n\
         ✓ Album artwork\n\
         ✓ Lyrics (when available)\n\
         ✓ Playlist files (m3u)\n\
         ✓ Proper folder organization",
        session.audio_quality.description(),
        downloads.default_base_path().display()
    )
}
