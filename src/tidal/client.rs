use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::models::{
    Album, Artist, ArtistBio, Favorite, Lyrics, Page, Playlist, PlaylistEntry, SearchResults,
    SessionInfo, Track, User,
};

/// Errors returned by catalog lookups.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("TIDAL rejected the credentials (HTTP {0})")]
    Unauthorized(u16),

    #[error("TIDAL API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Which slice of an artist's discography to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumFilter {
    Albums,
    EpsSingles,
    Other,
}

impl AlbumFilter {
    fn query_value(&self) -> Option<&'static str> {
        match self {
            AlbumFilter::Albums => None,
            AlbumFilter::EpsSingles => Some("EPSINGLES"),
            AlbumFilter::Other => Some("COMPILATIONS"),
        }
    }
}

/// Media types a search can be restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Artists,
    Albums,
    Tracks,
    Playlists,
    Videos,
}

impl SearchKind {
    pub const ALL: [SearchKind; 5] = [
        SearchKind::Artists,
        SearchKind::Albums,
        SearchKind::Tracks,
        SearchKind::Playlists,
        SearchKind::Videos,
    ];

    /// Parse the `media_type` filter accepted by the search tool
    pub fn from_filter(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "track" => Some(SearchKind::Tracks),
            "album" => Some(SearchKind::Albums),
            "artist" => Some(SearchKind::Artists),
            "playlist" => Some(SearchKind::Playlists),
            "video" => Some(SearchKind::Videos),
            _ => None,
        }
    }

    fn api_name(&self) -> &'static str {
        match self {
            SearchKind::Artists => "ARTISTS",
            SearchKind::Albums => "ALBUMS",
            SearchKind::Tracks => "TRACKS",
            SearchKind::Playlists => "PLAYLISTS",
            SearchKind::Videos => "VIDEOS",
        }
    }
}

/// Collections a user can mark as favourite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteKind {
    Tracks,
    Albums,
    Artists,
    Playlists,
    Videos,
}

impl FavoriteKind {
    /// Parse the singular `media_type` accepted by the favourites tool
    pub fn from_media_type(value: &str) -> Option<Self> {
        match value {
            "track" => Some(FavoriteKind::Tracks),
            "album" => Some(FavoriteKind::Albums),
            "artist" => Some(FavoriteKind::Artists),
            "playlist" => Some(FavoriteKind::Playlists),
            "video" => Some(FavoriteKind::Videos),
            _ => None,
        }
    }

    fn path(&self) -> &'static str {
        match self {
            FavoriteKind::Tracks => "tracks",
            FavoriteKind::Albums => "albums",
            FavoriteKind::Artists => "artists",
            FavoriteKind::Playlists => "playlists",
            FavoriteKind::Videos => "videos",
        }
    }
}

/// One page of favourites, typed by collection
#[derive(Debug, Clone, PartialEq)]
pub enum Favorites {
    Tracks(Page<Track>),
    Albums(Page<Album>),
    Artists(Page<Artist>),
    Playlists(Page<Playlist>),
    Videos(Page<Track>),
}

impl Favorites {
    pub fn total(&self) -> usize {
        match self {
            Favorites::Tracks(page) | Favorites::Videos(page) => page.total(),
            Favorites::Albums(page) => page.total(),
            Favorites::Artists(page) => page.total(),
            Favorites::Playlists(page) => page.total(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Favorites::Tracks(page) | Favorites::Videos(page) => page.items.is_empty(),
            Favorites::Albums(page) => page.items.is_empty(),
            Favorites::Artists(page) => page.items.is_empty(),
            Favorites::Playlists(page) => page.items.is_empty(),
        }
    }
}

/// Read access to the TIDAL catalog on behalf of one authenticated user.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn track(&self, id: &str) -> Result<Track, CatalogError>;
    /// Videos share the track shape, minus the album
    async fn video(&self, id: &str) -> Result<Track, CatalogError>;
    async fn album(&self, id: &str) -> Result<Album, CatalogError>;
    async fn album_tracks(&self, id: &str, limit: u32) -> Result<Page<Track>, CatalogError>;
    async fn playlist(&self, id: &str) -> Result<Playlist, CatalogError>;
    async fn playlist_items(
        &self,
        id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<PlaylistEntry>, CatalogError>;
    async fn artist(&self, id: &str) -> Result<Artist, CatalogError>;
    async fn artist_bio(&self, id: &str) -> Result<ArtistBio, CatalogError>;
    async fn artist_top_tracks(&self, id: &str, limit: u32) -> Result<Vec<Track>, CatalogError>;
    async fn artist_albums(
        &self,
        id: &str,
        filter: AlbumFilter,
        limit: u32,
    ) -> Result<Page<Album>, CatalogError>;
    async fn search(
        &self,
        query: &str,
        kinds: &[SearchKind],
        limit: u32,
    ) -> Result<SearchResults, CatalogError>;
    async fn user(&self, user_id: u64) -> Result<User, CatalogError>;
    async fn user_playlists(
        &self,
        user_id: u64,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Playlist>, CatalogError>;
    async fn favorites(
        &self,
        user_id: u64,
        kind: FavoriteKind,
        limit: u32,
        offset: u32,
    ) -> Result<Favorites, CatalogError>;
    async fn track_lyrics(&self, id: &str) -> Result<Lyrics, CatalogError>;
    async fn similar_artists(&self, id: &str, limit: u32) -> Result<Page<Artist>, CatalogError>;
    async fn artist_radio(&self, id: &str, limit: u32) -> Result<Page<Track>, CatalogError>;
}

/// Catalog backed by the TIDAL v1 REST API.
pub struct TidalApiClient {
    http: Client,
    api_base: String,
    access_token: String,
    country_code: String,
}

impl TidalApiClient {
    pub fn new(
        api_base: &str,
        access_token: &str,
        country_code: &str,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tidal-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            country_code: country_code.to_string(),
        })
    }

    /// Fetch the session bound to an access token. Used once while the
    /// session is being established, before a country code is known.
    pub async fn fetch_session_info(
        http: &Client,
        api_base: &str,
        access_token: &str,
    ) -> Result<SessionInfo, CatalogError> {
        let url = format!("{}/sessions", api_base.trim_end_matches('/'));
        let response = http.get(&url).bearer_auth(access_token).send().await?;
        decode(response, "session", "current").await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        kind: &'static str,
        id: &str,
    ) -> Result<T, CatalogError> {
        let url = format!("{}/{}", self.api_base, path.trim_start_matches('/'));
        debug!("GET {} {:?}", url, query);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("countryCode", self.country_code.as_str())])
            .query(query)
            .send()
            .await?;

        decode(response, kind, id).await
    }
}

async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    kind: &'static str,
    id: &str,
) -> Result<T, CatalogError> {
    let status = response.status();

    match status {
        StatusCode::NOT_FOUND => Err(CatalogError::NotFound {
            kind,
            id: id.to_string(),
        }),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(CatalogError::Unauthorized(status.as_u16()))
        }
        s if !s.is_success() => {
            let body = response.text().await.unwrap_or_default();
            Err(CatalogError::Api {
                status: s.as_u16(),
                message: api_error_message(&body),
            })
        }
        _ => {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| CatalogError::Decode(format!("{kind}: {e}")))
        }
    }
}

/// Pull `userMessage` out of an API error body, or fall back to the raw body
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("userMessage").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl Catalog for TidalApiClient {
    async fn track(&self, id: &str) -> Result<Track, CatalogError> {
        self.get(&format!("tracks/{id}"), &[], "track", id).await
    }

    async fn video(&self, id: &str) -> Result<Track, CatalogError> {
        self.get(&format!("videos/{id}"), &[], "video", id).await
    }

    async fn album(&self, id: &str) -> Result<Album, CatalogError> {
        self.get(&format!("albums/{id}"), &[], "album", id).await
    }

    async fn album_tracks(&self, id: &str, limit: u32) -> Result<Page<Track>, CatalogError> {
        self.get(
            &format!("albums/{id}/tracks"),
            &[("limit", limit.to_string())],
            "album",
            id,
        )
        .await
    }

    async fn playlist(&self, id: &str) -> Result<Playlist, CatalogError> {
        self.get(&format!("playlists/{id}"), &[], "playlist", id).await
    }

    async fn playlist_items(
        &self,
        id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<PlaylistEntry>, CatalogError> {
        self.get(
            &format!("playlists/{id}/items"),
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
            "playlist",
            id,
        )
        .await
    }

    async fn artist(&self, id: &str) -> Result<Artist, CatalogError> {
        self.get(&format!("artists/{id}"), &[], "artist", id).await
    }

    async fn artist_bio(&self, id: &str) -> Result<ArtistBio, CatalogError> {
        self.get(&format!("artists/{id}/bio"), &[], "artist bio", id)
            .await
    }

    async fn artist_top_tracks(&self, id: &str, limit: u32) -> Result<Vec<Track>, CatalogError> {
        let page: Page<Track> = self
            .get(
                &format!("artists/{id}/toptracks"),
                &[("limit", limit.to_string())],
                "artist",
                id,
            )
            .await?;
        Ok(page.items)
    }

    async fn artist_albums(
        &self,
        id: &str,
        filter: AlbumFilter,
        limit: u32,
    ) -> Result<Page<Album>, CatalogError> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(value) = filter.query_value() {
            query.push(("filter", value.to_string()));
        }
        self.get(&format!("artists/{id}/albums"), &query, "artist", id)
            .await
    }

    async fn search(
        &self,
        query: &str,
        kinds: &[SearchKind],
        limit: u32,
    ) -> Result<SearchResults, CatalogError> {
        let types = kinds
            .iter()
            .map(SearchKind::api_name)
            .collect::<Vec<_>>()
            .join(",");

        self.get(
            "search",
            &[
                ("query", query.to_string()),
                ("types", types),
                ("limit", limit.to_string()),
            ],
            "search",
            query,
        )
        .await
    }

    async fn user(&self, user_id: u64) -> Result<User, CatalogError> {
        let id = user_id.to_string();
        self.get(&format!("users/{id}"), &[], "user", &id).await
    }

    async fn user_playlists(
        &self,
        user_id: u64,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Playlist>, CatalogError> {
        let id = user_id.to_string();
        self.get(
            &format!("users/{id}/playlists"),
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
            "user",
            &id,
        )
        .await
    }

    async fn favorites(
        &self,
        user_id: u64,
        kind: FavoriteKind,
        limit: u32,
        offset: u32,
    ) -> Result<Favorites, CatalogError> {
        let id = user_id.to_string();
        let path = format!("users/{id}/favorites/{}", kind.path());
        let query = [("limit", limit.to_string()), ("offset", offset.to_string())];

        let favorites = match kind {
            FavoriteKind::Tracks => Favorites::Tracks(
                self.get::<Page<Favorite<Track>>>(&path, &query, "favorites", &id)
                    .await?
                    .into_items(),
            ),
            FavoriteKind::Albums => Favorites::Albums(
                self.get::<Page<Favorite<Album>>>(&path, &query, "favorites", &id)
                    .await?
                    .into_items(),
            ),
            FavoriteKind::Artists => Favorites::Artists(
                self.get::<Page<Favorite<Artist>>>(&path, &query, "favorites", &id)
                    .await?
                    .into_items(),
            ),
            FavoriteKind::Playlists => Favorites::Playlists(
                self.get::<Page<Favorite<Playlist>>>(&path, &query, "favorites", &id)
                    .await?
                    .into_items(),
            ),
            FavoriteKind::Videos => Favorites::Videos(
                self.get::<Page<Favorite<Track>>>(&path, &query, "favorites", &id)
                    .await?
                    .into_items(),
            ),
        };

        Ok(favorites)
    }

    async fn track_lyrics(&self, id: &str) -> Result<Lyrics, CatalogError> {
        self.get(&format!("tracks/{id}/lyrics"), &[], "lyrics", id)
            .await
    }

    async fn similar_artists(&self, id: &str, limit: u32) -> Result<Page<Artist>, CatalogError> {
        self.get(
            &format!("artists/{id}/similar"),
            &[("limit", limit.to_string())],
            "artist",
            id,
        )
        .await
    }

    async fn artist_radio(&self, id: &str, limit: u32) -> Result<Page<Track>, CatalogError> {
        self.get(
            &format!("artists/{id}/radio"),
            &[("limit", limit.to_string())],
            "artist radio",
            id,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_kind_filters() {
        assert_eq!(SearchKind::from_filter("Track"), Some(SearchKind::Tracks));
        assert_eq!(SearchKind::from_filter("playlist"), Some(SearchKind::Playlists));
        assert_eq!(SearchKind::from_filter("mix"), None);
    }

    #[test]
    fn test_api_error_message_extraction() {
        assert_eq!(
            api_error_message(r#"{"status": 400, "userMessage": "Bad id"}"#),
            "Bad id"
        );
        assert_eq!(api_error_message("  gateway timeout \n"), "gateway timeout");
    }

    #[test]
    fn test_favorite_kinds() {
        assert_eq!(FavoriteKind::from_media_type("album"), Some(FavoriteKind::Albums));
        assert_eq!(FavoriteKind::from_media_type("mix"), None);
        assert_eq!(FavoriteKind::Videos.path(), "videos");

        let empty = Favorites::Artists(Page::default());
        assert!(empty.is_empty());
        assert_eq!(empty.total(), 0);
    }

    #[test]
    fn test_album_filter_query() {
        assert_eq!(AlbumFilter::Albums.query_value(), None);
        assert_eq!(AlbumFilter::EpsSingles.query_value(), Some("EPSINGLES"));
    }

    #[test]
    fn test_client_trims_base_url() {
        let client = TidalApiClient::new(
            "https://api.tidal.com/v1/",
            "token",
            "US",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.api_base, "https://api.tidal.com/v1");
    }
}
