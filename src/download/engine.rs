use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use super::progress::ProgressSink;
use super::{AudioQuality, MediaKind};
use crate::tidal::Session;

/// Errors raised by a downloader.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("failed to start downloader: {0}")]
    Spawn(String),

    #[error("downloader protocol error: {0}")]
    Protocol(#[from] super::protocol::ProtocolError),

    #[error("{0}")]
    Failed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything the external downloader needs for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadJob {
    pub media_id: String,
    pub kind: MediaKind,
    pub base_path: PathBuf,
    pub file_template: String,
    pub quality: AudioQuality,
    pub skip_existing: bool,
    /// Multi-item only: also fetch videos of a playlist
    pub video_download: bool,
    /// Multi-item only: pause between items
    pub download_delay: bool,
}

/// Result of a download call that did not error.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadOutcome {
    Completed { path: Option<PathBuf> },
    /// The downloader finished without producing anything
    Unavailable,
}

/// The external download library.
///
/// Threading, retries and file I/O live behind this seam. Every progress line
/// the library emits must be forwarded to `progress`.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download a single track or video.
    async fn download_item(
        &self,
        session: &Session,
        job: &DownloadJob,
        progress: &mut dyn ProgressSink,
    ) -> Result<DownloadOutcome, DownloadError>;

    /// Download every item of an album or playlist.
    async fn download_items(
        &self,
        session: &Session,
        job: &DownloadJob,
        progress: &mut dyn ProgressSink,
    ) -> Result<DownloadOutcome, DownloadError>;
}
