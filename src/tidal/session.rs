use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::client::{Catalog, CatalogError, TidalApiClient};
use crate::config::TidalConfig;
use crate::download::AudioQuality;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("not authenticated with TIDAL: {0}")]
    NotAuthenticated(String),

    #[error("failed to read token file {path:?}: {reason}")]
    TokenFile { path: PathBuf, reason: String },

    #[error("failed to establish TIDAL session: {0}")]
    Catalog(#[from] CatalogError),
}

/// An authenticated TIDAL session. Catalog access goes through it.
pub struct Session {
    pub user_id: u64,
    pub country_code: String,
    pub audio_quality: AudioQuality,
    token_file: Option<PathBuf>,
    catalog: Arc<dyn Catalog>,
}

impl Session {
    pub fn new(
        user_id: u64,
        country_code: impl Into<String>,
        audio_quality: AudioQuality,
        catalog: Arc<dyn Catalog>,
    ) -> Self {
        Self {
            user_id,
            country_code: country_code.into(),
            audio_quality,
            token_file: None,
            catalog,
        }
    }

    /// Remember the credential file this session was built from
    pub fn with_token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = Some(path.into());
        self
    }

    /// Credential file downloads must authenticate with
    pub fn token_file(&self) -> Option<&Path> {
        self.token_file.as_deref()
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("country_code", &self.country_code)
            .field("audio_quality", &self.audio_quality)
            .field("token_file", &self.token_file)
            .finish_non_exhaustive()
    }
}

/// Hands out the process-wide session, creating it on first use.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn session(&self) -> Result<Arc<Session>, SessionError>;
}

/// Builds a fresh session. Called at most once per successful login.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn establish(&self) -> Result<Arc<Session>, SessionError>;
}

/// Caches the first session its factory produces.
///
/// Concurrent callers wait on the same construction. A failed attempt leaves
/// the cell empty so a later login is picked up without restarting the
/// server.
pub struct LazySessionProvider {
    factory: Box<dyn SessionFactory>,
    cell: OnceCell<Arc<Session>>,
}

impl LazySessionProvider {
    pub fn new(factory: impl SessionFactory + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            cell: OnceCell::new(),
        }
    }

    /// Provider backed by the tidal-dl-ng token file
    pub fn from_token_file(config: TidalConfig) -> Self {
        Self::new(TokenFileLogin::new(config))
    }
}

#[async_trait]
impl SessionProvider for LazySessionProvider {
    async fn session(&self) -> Result<Arc<Session>, SessionError> {
        self.cell
            .get_or_try_init(|| self.factory.establish())
            .await
            .map(Arc::clone)
    }
}

/// Credentials stored by `tidal-dl-ng login`.
#[derive(Debug, Deserialize)]
struct StoredToken {
    #[serde(default)]
    token_type: Option<String>,
    access_token: Option<String>,
    #[serde(default)]
    expiry_time: Option<f64>,
}

/// Logs in with the token file written by `tidal-dl-ng login`.
pub struct TokenFileLogin {
    config: TidalConfig,
}

impl TokenFileLogin {
    pub fn new(config: TidalConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionFactory for TokenFileLogin {
    async fn establish(&self) -> Result<Arc<Session>, SessionError> {
        let token_path = self.config.token_path().ok_or_else(|| {
            SessionError::NotAuthenticated("no token file location could be determined".into())
        })?;

        let access_token = read_access_token(&token_path, Utc::now()).await?;
        let timeout = Duration::from_secs(self.config.request_timeout_secs);

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CatalogError::from)?;

        let info = TidalApiClient::fetch_session_info(&http, &self.config.api_base, &access_token)
            .await
            .map_err(|e| match e {
                CatalogError::Unauthorized(status) => SessionError::NotAuthenticated(format!(
                    "stored token was rejected (HTTP {status})"
                )),
                other => SessionError::Catalog(other),
            })?;

        let audio_quality =
            AudioQuality::from_api_str(&self.config.audio_quality).unwrap_or_else(|| {
                warn!(
                    "Unknown audio quality '{}' in config, using LOSSLESS",
                    self.config.audio_quality
                );
                AudioQuality::HighLossless
            });

        let catalog = TidalApiClient::new(
            &self.config.api_base,
            &access_token,
            &info.country_code,
            timeout,
        )?;

        info!(
            user_id = info.user_id,
            country = %info.country_code,
            "TIDAL session established"
        );

        let session = Session::new(
            info.user_id,
            info.country_code,
            audio_quality,
            Arc::new(catalog),
        )
        .with_token_file(token_path);

        Ok(Arc::new(session))
    }
}

/// Load the access token from disk, rejecting missing or expired tokens
async fn read_access_token(path: &Path, now: DateTime<Utc>) -> Result<String, SessionError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SessionError::NotAuthenticated(format!(
                "no token file at {}",
                path.display()
            )));
        }
        Err(e) => {
            return Err(SessionError::TokenFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };

    let token: StoredToken =
        serde_json::from_str(&content).map_err(|e| SessionError::TokenFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let access_token = token
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| SessionError::NotAuthenticated("token file has no access token".into()))?;

    if let Some(expiry) = token.expiry_time.and_then(|t| DateTime::from_timestamp(t as i64, 0)) {
        if expiry <= now {
            return Err(SessionError::NotAuthenticated(format!(
                "access token expired at {}",
                expiry.format("%Y-%m-%d %H:%M UTC")
            )));
        }
    }

    debug!(
        "Loaded {} token from {}",
        token.token_type.as_deref().unwrap_or("Bearer"),
        path.display()
    );
    Ok(access_token)
}
