//! Downloader backed by the tidal-dl-ng Python library.
//!
//! The embedded helper script drives `tidal_dl_ng.download.Download` and
//! reports back over stdout using the JSON-lines format in
//! [`super::protocol`]. Log lines of the library become progress
//! notifications; nothing from the child reaches our own stdout.

use async_trait::async_trait;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use super::engine::{DownloadError, DownloadJob, DownloadOutcome, Downloader};
use super::progress::ProgressSink;
use super::protocol::{HelperEvent, parse_line};
use crate::config::BridgeConfig;
use crate::tidal::Session;

const HELPER_SOURCE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/scripts/tidal_dl_helper.py"
));

const HELPER_FILE_NAME: &str = "tidal_dl_helper.py";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Item,
    Items,
}

impl Mode {
    fn as_arg(&self) -> &'static str {
        match self {
            Mode::Item => "item",
            Mode::Items => "items",
        }
    }
}

pub struct PythonBridgeDownloader {
    python: String,
    script_override: Option<PathBuf>,
    script_dir: Option<PathBuf>,
}

impl PythonBridgeDownloader {
    pub fn new(config: &BridgeConfig) -> Self {
        let script_dir = ProjectDirs::from("", "", "tidal-mcp").map(|d| d.cache_dir().to_path_buf());

        Self {
            python: config.python.clone(),
            script_override: config.script_path.clone(),
            script_dir,
        }
    }

    /// Path of the helper script, deploying the embedded copy if needed
    async fn script_path(&self) -> Result<PathBuf, DownloadError> {
        if let Some(path) = &self.script_override {
            return Ok(path.clone());
        }

        let dir = self
            .script_dir
            .clone()
            .ok_or_else(|| DownloadError::Spawn("no cache directory for helper script".into()))?;
        let path = dir.join(HELPER_FILE_NAME);

        deploy_helper(&dir, &path).await?;
        Ok(path)
    }

    fn build_command(
        &self,
        script: &Path,
        session: &Session,
        job: &DownloadJob,
        mode: Mode,
    ) -> Command {
        let mut cmd = Command::new(&self.python);
        cmd.arg(script)
            .arg("--mode")
            .arg(mode.as_arg())
            .arg("--media-id")
            .arg(&job.media_id)
            .arg("--media-type")
            .arg(job.kind.to_string())
            .arg("--path-base")
            .arg(&job.base_path)
            .arg("--file-template")
            .arg(&job.file_template)
            .arg("--quality")
            .arg(job.quality.as_api_str())
            .env("PYTHONUNBUFFERED", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // The helper logs in with the same credentials as this session
        if let Some(token_file) = session.token_file() {
            cmd.arg("--token-file").arg(token_file);
        }
        if job.skip_existing {
            cmd.arg("--skip-existing");
        }
        if mode == Mode::Items {
            if job.video_download {
                cmd.arg("--video-download");
            }
            if job.download_delay {
                cmd.arg("--download-delay");
            }
        }
        cmd
    }

    async fn run(
        &self,
        session: &Session,
        job: &DownloadJob,
        mode: Mode,
        progress: &mut dyn ProgressSink,
    ) -> Result<DownloadOutcome, DownloadError> {
        let script = self.script_path().await?;
        let mut child = self
            .build_command(&script, session, job, mode)
            .spawn()
            .map_err(|e| DownloadError::Spawn(format!("{}: {e}", self.python)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DownloadError::Spawn("missing stdout pipe".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| DownloadError::Spawn("missing stderr pipe".into()))?;

        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Err(e) = BufReader::new(stderr).read_to_end(&mut buf).await {
                debug!("Failed to read helper stderr: {e}");
            }
            buf
        });

        let mut outcome = None;
        let mut failure = None;
        let mut lines = BufReader::new(stdout).lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            match parse_line(&line) {
                Ok(HelperEvent::Log { message }) => progress.record(&message),
                Ok(HelperEvent::Complete { path }) => {
                    outcome = Some(DownloadOutcome::Completed { path });
                }
                Ok(HelperEvent::Unavailable { reason }) => {
                    debug!("Helper reported unavailable: {:?}", reason);
                    outcome = Some(DownloadOutcome::Unavailable);
                }
                Ok(HelperEvent::Error { message }) => failure = Some(message),
                Err(e) => debug!("Ignoring non-protocol helper output ({e}): {line}"),
            }
        }

        let status = child.wait().await?;
        let stderr_buf = stderr_task.await.unwrap_or_default();
        let stderr_text = String::from_utf8_lossy(&stderr_buf).trim().to_string();

        if let Some(message) = failure {
            return Err(DownloadError::Failed(message));
        }

        if !status.success() {
            let reason = if stderr_text.is_empty() {
                format!("download helper exited with {status}")
            } else {
                last_line(&stderr_text).to_string()
            };
            return Err(DownloadError::Failed(reason));
        }

        if !stderr_text.is_empty() {
            debug!("Helper stderr: {stderr_text}");
        }

        Ok(outcome.unwrap_or_else(|| {
            warn!("Download helper exited without a result line");
            DownloadOutcome::Unavailable
        }))
    }
}

#[async_trait]
impl Downloader for PythonBridgeDownloader {
    async fn download_item(
        &self,
        session: &Session,
        job: &DownloadJob,
        progress: &mut dyn ProgressSink,
    ) -> Result<DownloadOutcome, DownloadError> {
        debug!(user_id = session.user_id, media_id = %job.media_id, "Running single-item download");
        self.run(session, job, Mode::Item, progress).await
    }

    async fn download_items(
        &self,
        session: &Session,
        job: &DownloadJob,
        progress: &mut dyn ProgressSink,
    ) -> Result<DownloadOutcome, DownloadError> {
        debug!(user_id = session.user_id, media_id = %job.media_id, "Running multi-item download");
        self.run(session, job, Mode::Items, progress).await
    }
}

/// Write the embedded helper unless an identical copy is already in place
async fn deploy_helper(dir: &Path, path: &Path) -> Result<(), DownloadError> {
    if let Ok(existing) = tokio::fs::read_to_string(path).await {
        if existing == HELPER_SOURCE {
            return Ok(());
        }
    }

    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(path, HELPER_SOURCE).await?;
    debug!("Deployed download helper to {}", path.display());
    Ok(())
}

/// Python tracebacks end with the actual exception line
fn last_line(text: &str) -> &str {
    text.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or(text).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::{AudioQuality, MediaKind};
    use crate::tidal::TidalApiClient;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn session() -> Session {
        let catalog =
            TidalApiClient::new("http://localhost", "token", "US", Duration::from_secs(1)).unwrap();
        Session::new(1, "US", AudioQuality::HighLossless, Arc::new(catalog))
    }

    fn job(kind: MediaKind) -> DownloadJob {
        DownloadJob {
            media_id: "42".to_string(),
            kind,
            base_path: PathBuf::from("/music"),
            file_template: kind.file_template().to_string(),
            quality: AudioQuality::HiResLossless,
            skip_existing: true,
            video_download: true,
            download_delay: true,
        }
    }

    fn args_of(cmd: &Command) -> Vec<String> {
        cmd.as_std()
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_item_command_omits_collection_flags() {
        let bridge = PythonBridgeDownloader::new(&BridgeConfig::default());
        let cmd = bridge.build_command(
            Path::new("helper.py"),
            &session(),
            &job(MediaKind::Track),
            Mode::Item,
        );
        let args = args_of(&cmd);

        assert!(args.contains(&"--skip-existing".to_string()));
        assert!(args.contains(&"HI_RES_LOSSLESS".to_string()));
        assert!(!args.contains(&"--video-download".to_string()));
        assert!(!args.contains(&"--download-delay".to_string()));
        assert!(!args.contains(&"--token-file".to_string()));
    }

    #[test]
    fn test_command_forwards_session_token_file() {
        let bridge = PythonBridgeDownloader::new(&BridgeConfig::default());
        let session = session().with_token_file("/home/me/.config/tidal_dl_ng/token.json");
        let cmd =
            bridge.build_command(Path::new("helper.py"), &session, &job(MediaKind::Album), Mode::Items);
        let args = args_of(&cmd);

        let flag = args.iter().position(|a| a == "--token-file").unwrap();
        assert_eq!(args[flag + 1], "/home/me/.config/tidal_dl_ng/token.json");
    }

    #[test]
    fn test_items_command_passes_collection_flags() {
        let bridge = PythonBridgeDownloader::new(&BridgeConfig::default());
        let cmd =
            bridge.build_command(
                Path::new("helper.py"),
                &session(),
                &job(MediaKind::Playlist),
                Mode::Items,
            );
        let args = args_of(&cmd);

        assert!(args.contains(&"items".to_string()));
        assert!(args.contains(&"playlist".to_string()));
        assert!(args.contains(&"--video-download".to_string()));
        assert!(args.contains(&"--download-delay".to_string()));
    }

    #[tokio::test]
    async fn test_deploy_helper_writes_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(HELPER_FILE_NAME);

        deploy_helper(dir.path(), &path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), HELPER_SOURCE);

        deploy_helper(dir.path(), &path).await.unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_last_line_of_traceback() {
        let text = "Traceback (most recent call last):\n  File \"x\"\nRuntimeError: network error\n";
        assert_eq!(last_line(text), "RuntimeError: network error");
    }
}
