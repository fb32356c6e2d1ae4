use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::engine::{DownloadError, DownloadJob, DownloadOutcome, Downloader};
use super::progress::ProgressCollector;
use super::{DownloadRequest, MediaKind, quality};
use crate::config::DownloadConfig;
use crate::tidal::Session;

/// Display fields for the success message of a collection download
#[derive(Debug, Clone, PartialEq)]
struct CollectionInfo {
    title: String,
    owner: String,
    items: Option<u32>,
}

impl CollectionInfo {
    fn unknown(kind: MediaKind) -> Self {
        let owner = match kind {
            MediaKind::Playlist => "Unknown",
            _ => "Unknown Artist",
        };
        Self {
            title: "Unknown".to_string(),
            owner: owner.to_string(),
            items: None,
        }
    }
}

/// Runs download requests against a [`Downloader`] and renders the outcome.
///
/// Each call owns a fresh [`ProgressCollector`] and always ends in a text
/// report; errors never escape.
#[derive(Clone)]
pub struct DownloadManager {
    downloader: Arc<dyn Downloader>,
    config: DownloadConfig,
}

impl DownloadManager {
    pub fn new(downloader: Arc<dyn Downloader>, config: DownloadConfig) -> Self {
        Self { downloader, config }
    }

    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Base directory used when a request carries no override
    pub fn default_base_path(&self) -> PathBuf {
        self.config.resolved_base_path()
    }

    pub async fn download_track(
        &self,
        session: &Session,
        track_id: &str,
        quality: &str,
        output_path: Option<String>,
    ) -> String {
        let request = DownloadRequest::track(track_id, quality).with_output_path(output_path);
        self.download(session, request).await
    }

    pub async fn download_album(
        &self,
        session: &Session,
        album_id: &str,
        quality: &str,
        output_path: Option<String>,
    ) -> String {
        let request = DownloadRequest::album(album_id, quality).with_output_path(output_path);
        self.download(session, request).await
    }

    pub async fn download_playlist(
        &self,
        session: &Session,
        playlist_id: &str,
        quality: &str,
        output_path: Option<String>,
        include_videos: bool,
    ) -> String {
        let request = DownloadRequest::playlist(playlist_id, quality)
            .with_output_path(output_path)
            .with_videos(include_videos);
        self.download(session, request).await
    }

    /// Execute one download request and describe the result
    pub async fn download(&self, session: &Session, request: DownloadRequest) -> String {
        let download_id = format!("{}_{}", request.kind, &Uuid::new_v4().to_string()[..8]);

        match self.execute(session, &request, &download_id).await {
            Ok(report) => report,
            Err(e) => {
                warn!("Download {} failed: {}", download_id, e);
                format!("✗ Download failed: {e}")
            }
        }
    }

    async fn execute(
        &self,
        session: &Session,
        request: &DownloadRequest,
        download_id: &str,
    ) -> Result<String, DownloadError> {
        let audio_quality = quality::resolve(&request.quality);
        let base_path = request
            .output_path
            .clone()
            .unwrap_or_else(|| self.default_base_path());

        info!(
            "Starting download {}: {} {} at {} into {}",
            download_id,
            request.kind,
            request.media_id,
            audio_quality,
            base_path.display()
        );

        let mut progress = ProgressCollector::new();
        let job = DownloadJob {
            media_id: request.media_id.clone(),
            kind: request.kind,
            base_path: base_path.clone(),
            file_template: request.kind.file_template().to_string(),
            quality: audio_quality,
            skip_existing: true,
            video_download: request.include_videos,
            download_delay: self.config.download_delay,
        };

        let outcome = if request.kind.is_collection() {
            self.downloader
                .download_items(session, &job, &mut progress)
                .await?
        } else {
            self.downloader
                .download_item(session, &job, &mut progress)
                .await?
        };

        debug!(
            "Download {} finished with {} progress lines, {} completed",
            download_id,
            progress.entries().len(),
            progress.completed()
        );

        let progress_section = progress_section(&progress);

        let report = match (request.kind, outcome) {
            (MediaKind::Track, DownloadOutcome::Completed { path: Some(path) }) => format!(
                "✓ Track downloaded successfully!\n\n\
                 File: {}\n\
                 Quality: {}\n\
                 Location: {}\n\n\
                 The track has been saved with full metadata, cover art, and lyrics (if available).{}",
                path.display(),
                request.quality,
                base_path.display(),
                progress_section
            ),
            (MediaKind::Album, DownloadOutcome::Completed { .. }) => {
                let album = self.collection_info(session, request).await;
                format!(
                    "✓ Album downloaded successfully!\n\n\
                     Album: {}\n\
                     Artist: {}\n\
                     Tracks: {}\n\
                     Quality: {}\n\
                     Location: {}/\n\n\
                     All tracks have been saved with full metadata, cover art, and lyrics (if available).\n\
                     A playlist file has been created for the album.{}",
                    album.title,
                    album.owner,
                    count_or_unknown(album.items),
                    request.quality,
                    join_display(&base_path, &format!("Albums/{} - {}", album.owner, album.title)),
                    progress_section
                )
            }
            (MediaKind::Playlist, DownloadOutcome::Completed { .. }) => {
                let playlist = self.collection_info(session, request).await;
                format!(
                    "✓ Playlist downloaded successfully!\n\n\
                     Playlist: {}\n\
                     Creator: {}\n\
                     Items: {}\n\
                     Quality: {}\n\
                     Location: {}/\n\n\
                     All tracks have been saved with full metadata.\n\
                     A playlist file (m3u) has been created.{}",
                    playlist.title,
                    playlist.owner,
                    count_or_unknown(playlist.items),
                    request.quality,
                    join_display(&base_path, &format!("Playlists/{}", playlist.title)),
                    progress_section
                )
            }
            (kind, _) => {
                info!("Download {} produced nothing", download_id);
                format!("✗ Failed to download {kind} ({kind} may not be available or invalid ID)")
            }
        };

        Ok(report)
    }

    /// Cosmetic metadata for the success message; lookup failures degrade
    async fn collection_info(&self, session: &Session, request: &DownloadRequest) -> CollectionInfo {
        let catalog = session.catalog();
        let looked_up = match request.kind {
            MediaKind::Album => catalog.album(&request.media_id).await.map(|album| CollectionInfo {
                owner: album.artist_name().to_string(),
                title: album.title,
                items: Some(album.number_of_tracks),
            }),
            MediaKind::Playlist => {
                catalog
                    .playlist(&request.media_id)
                    .await
                    .map(|playlist| CollectionInfo {
                        owner: playlist.creator_name().unwrap_or("Unknown").to_string(),
                        items: Some(playlist.item_count()),
                        title: playlist.title,
                    })
            }
            MediaKind::Track => return CollectionInfo::unknown(request.kind),
        };

        looked_up.unwrap_or_else(|e| {
            warn!(
                "Metadata lookup for {} {} failed: {}",
                request.kind, request.media_id, e
            );
            CollectionInfo::unknown(request.kind)
        })
    }
}

fn progress_section(progress: &ProgressCollector) -> String {
    let summary = progress.summarize();
    if summary.is_empty() {
        String::new()
    } else {
        format!("\n\nDownload Progress:\n{summary}")
    }
}

fn count_or_unknown(count: Option<u32>) -> String {
    count.map_or_else(|| "Unknown".to_string(), |n| n.to_string())
}

fn join_display(base: &Path, relative: &str) -> String {
    base.join(relative).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_section_omitted_when_empty() {
        let progress = ProgressCollector::new();
        assert_eq!(progress_section(&progress), "");
    }

    #[test]
    fn test_progress_section_heading() {
        use crate::download::ProgressSink;

        let mut progress = ProgressCollector::new();
        progress.record("Downloaded item 'Song A'.");
        assert_eq!(
            progress_section(&progress),
            "\n\nDownload Progress:\nSong A"
        );
    }

    #[test]
    fn test_unknown_collection_info() {
        assert_eq!(CollectionInfo::unknown(MediaKind::Album).owner, "Unknown Artist");
        assert_eq!(CollectionInfo::unknown(MediaKind::Playlist).owner, "Unknown");
        assert_eq!(count_or_unknown(None), "Unknown");
        assert_eq!(count_or_unknown(Some(12)), "12");
    }

    #[test]
    fn test_join_display() {
        assert_eq!(
            join_display(Path::new("/music"), "Playlists/Chill"),
            "/music/Playlists/Chill"
        );
    }
}
