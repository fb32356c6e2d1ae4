//! Routes `tools/call` requests to their handlers.
//!
//! Arguments are decoded first, then the session guard runs, and only then
//! does the tool body execute. A missing login therefore stops every tool
//! before it touches the catalog or the downloader.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::registry;
use crate::error::{ToolError, ToolResult};
use crate::handlers::{self, ToolContext};
use crate::tidal::Session;

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(default)]
    media_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrackArgs {
    #[serde(deserialize_with = "string_or_number")]
    track_id: String,
}

#[derive(Debug, Deserialize)]
struct AlbumArgs {
    #[serde(deserialize_with = "string_or_number")]
    album_id: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistArgs {
    #[serde(deserialize_with = "string_or_number")]
    playlist_id: String,
}

#[derive(Debug, Deserialize)]
struct ArtistDetailsArgs {
    #[serde(deserialize_with = "string_or_number")]
    artist_id: String,
    #[serde(default = "default_true")]
    include_top_tracks: bool,
}

#[derive(Debug, Deserialize)]
struct ArtistAlbumsArgs {
    #[serde(deserialize_with = "string_or_number")]
    artist_id: String,
    #[serde(default = "default_album_type")]
    album_type: String,
    #[serde(default = "default_album_limit")]
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct PageArgs {
    #[serde(default = "default_page_limit")]
    limit: u32,
    #[serde(default)]
    offset: u32,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemsArgs {
    #[serde(deserialize_with = "string_or_number")]
    playlist_id: String,
    #[serde(default = "default_page_limit")]
    limit: u32,
    #[serde(default)]
    offset: u32,
}

#[derive(Debug, Deserialize)]
struct FavoritesArgs {
    media_type: String,
    #[serde(default = "default_page_limit")]
    limit: u32,
    #[serde(default)]
    offset: u32,
}

#[derive(Debug, Deserialize)]
struct SimilarArtistsArgs {
    #[serde(deserialize_with = "string_or_number")]
    artist_id: String,
    #[serde(default = "default_similar_limit")]
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct ArtistRadioArgs {
    #[serde(deserialize_with = "string_or_number")]
    artist_id: String,
    #[serde(default = "default_page_limit")]
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct DownloadTrackArgs {
    #[serde(deserialize_with = "string_or_number")]
    track_id: String,
    #[serde(default)]
    quality: Option<String>,
    #[serde(default)]
    output_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DownloadAlbumArgs {
    #[serde(deserialize_with = "string_or_number")]
    album_id: String,
    #[serde(default)]
    quality: Option<String>,
    #[serde(default)]
    output_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DownloadPlaylistArgs {
    #[serde(deserialize_with = "string_or_number")]
    playlist_id: String,
    #[serde(default)]
    quality: Option<String>,
    #[serde(default)]
    output_path: Option<String>,
    #[serde(default)]
    include_videos: bool,
}

fn default_true() -> bool {
    true
}
fn default_album_type() -> String {
    "all".to_string()
}
fn default_album_limit() -> u32 {
    50
}
fn default_page_limit() -> u32 {
    50
}
fn default_similar_limit() -> u32 {
    10
}

/// IDs are strings on the wire, but clients often send numbers
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

/// A decoded tool invocation
#[derive(Debug)]
enum ToolCall {
    Search(SearchArgs),
    TrackDetails(TrackArgs),
    AlbumDetails(AlbumArgs),
    ArtistDetails(ArtistDetailsArgs),
    ArtistAlbums(ArtistAlbumsArgs),
    PlaylistDetails(PlaylistArgs),
    MyPlaylists(PageArgs),
    PlaylistItems(PlaylistItemsArgs),
    Favorites(FavoritesArgs),
    FavoritesSummary,
    TrackLyrics(TrackArgs),
    SimilarArtists(SimilarArtistsArgs),
    ArtistRadio(ArtistRadioArgs),
    UserProfile,
    SubscriptionInfo,
    DownloadSettings,
    DownloadTrack(DownloadTrackArgs),
    DownloadAlbum(DownloadAlbumArgs),
    DownloadPlaylist(DownloadPlaylistArgs),
}

impl ToolCall {
    fn parse(name: &str, arguments: Value) -> ToolResult<Self> {
        if registry::find(name).is_none() {
            return Err(ToolError::UnknownTool(name.to_string()));
        }

        let arguments = match arguments {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        let call = match name {
            "search_tidal" => ToolCall::Search(parse_args(arguments)?),
            "get_track_details" => ToolCall::TrackDetails(parse_args(arguments)?),
            "get_album_details" => ToolCall::AlbumDetails(parse_args(arguments)?),
            "get_artist_details" => ToolCall::ArtistDetails(parse_args(arguments)?),
            "get_artist_albums" => ToolCall::ArtistAlbums(parse_args(arguments)?),
            "get_playlist_details" => ToolCall::PlaylistDetails(parse_args(arguments)?),
            "get_my_playlists" => ToolCall::MyPlaylists(parse_args(arguments)?),
            "get_playlist_items" => ToolCall::PlaylistItems(parse_args(arguments)?),
            "get_favorites" => ToolCall::Favorites(parse_args(arguments)?),
            "get_favorites_summary" => ToolCall::FavoritesSummary,
            "get_track_lyrics" => ToolCall::TrackLyrics(parse_args(arguments)?),
            "get_similar_artists" => ToolCall::SimilarArtists(parse_args(arguments)?),
            "get_artist_radio" => ToolCall::ArtistRadio(parse_args(arguments)?),
            "get_user_profile" => ToolCall::UserProfile,
            "get_subscription_info" => ToolCall::SubscriptionInfo,
            "get_download_settings" => ToolCall::DownloadSettings,
            "download_track" => ToolCall::DownloadTrack(parse_args(arguments)?),
            "download_album" => ToolCall::DownloadAlbum(parse_args(arguments)?),
            "download_playlist" => ToolCall::DownloadPlaylist(parse_args(arguments)?),
            other => return Err(ToolError::UnknownTool(other.to_string())),
        };

        Ok(call)
    }
}

fn parse_args<T: DeserializeOwned>(arguments: Value) -> ToolResult<T> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Run one tool and return its text.
///
/// `Err` is reserved for problems outside the tool body: unknown tools, bad
/// arguments and a missing or broken session.
#[instrument(skip(ctx, arguments))]
pub async fn call_tool(ctx: &ToolContext, name: &str, arguments: Value) -> ToolResult<String> {
    let call = ToolCall::parse(name, arguments)?;
    let session = authenticate(ctx).await?;

    debug!("Dispatching {:?}", call);
    Ok(run(ctx, &session, call).await)
}

/// The guard every tool passes before its body runs
async fn authenticate(ctx: &ToolContext) -> ToolResult<Arc<Session>> {
    ctx.sessions.session().await.map_err(ToolError::from)
}

async fn run(ctx: &ToolContext, session: &Session, call: ToolCall) -> String {
    let default_quality = ctx.downloads.config().default_quality.as_str();

    match call {
        ToolCall::Search(args) => {
            handlers::handle_search(session, &args.query, args.media_type.as_deref()).await
        }
        ToolCall::TrackDetails(args) => handlers::handle_track_details(session, &args.track_id).await,
        ToolCall::AlbumDetails(args) => handlers::handle_album_details(session, &args.album_id).await,
        ToolCall::ArtistDetails(args) => {
            handlers::handle_artist_details(session, &args.artist_id, args.include_top_tracks).await
        }
        ToolCall::ArtistAlbums(args) => {
            handlers::handle_artist_albums(session, &args.artist_id, &args.album_type, args.limit)
                .await
        }
        ToolCall::PlaylistDetails(args) => {
            handlers::handle_playlist_details(session, &args.playlist_id).await
        }
        ToolCall::MyPlaylists(args) => {
            handlers::handle_my_playlists(session, args.limit, args.offset).await
        }
        ToolCall::PlaylistItems(args) => {
            handlers::handle_playlist_items(session, &args.playlist_id, args.limit, args.offset)
                .await
        }
        ToolCall::Favorites(args) => {
            handlers::handle_favorites(session, &args.media_type, args.limit, args.offset).await
        }
        ToolCall::FavoritesSummary => handlers::handle_favorites_summary(session).await,
        ToolCall::TrackLyrics(args) => handlers::handle_track_lyrics(session, &args.track_id).await,
        ToolCall::SimilarArtists(args) => {
            handlers::handle_similar_artists(session, &args.artist_id, args.limit).await
        }
        ToolCall::ArtistRadio(args) => {
            handlers::handle_artist_radio(session, &args.artist_id, args.limit).await
        }
        ToolCall::UserProfile => handlers::handle_user_profile(session).await,
        ToolCall::SubscriptionInfo => handlers::handle_subscription_info(session),
        ToolCall::DownloadSettings => handlers::handle_download_settings(&ctx.downloads, session),
        ToolCall::DownloadTrack(args) => {
            handlers::handle_download_track(
                &ctx.downloads,
                session,
                &args.track_id,
                args.quality.as_deref().unwrap_or(default_quality),
                args.output_path,
            )
            .await
        }
        ToolCall::DownloadAlbum(args) => {
            handlers::handle_download_album(
                &ctx.downloads,
                session,
                &args.album_id,
                args.quality.as_deref().unwrap_or(default_quality),
                args.output_path,
            )
            .await
        }
        ToolCall::DownloadPlaylist(args) => {
            handlers::handle_download_playlist(
                &ctx.downloads,
                session,
                &args.playlist_id,
                args.quality.as_deref().unwrap_or(default_quality),
                args.output_path,
                args.include_videos,
            )
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_applies_defaults() {
        let call = ToolCall::parse("get_artist_details", json!({"artist_id": 42})).unwrap();
        match call {
            ToolCall::ArtistDetails(args) => {
                assert_eq!(args.artist_id, "42");
                assert!(args.include_top_tracks);
            }
            other => panic!("unexpected call {other:?}"),
        }

        let call = ToolCall::parse("get_artist_albums", json!({"artist_id": "7"})).unwrap();
        match call {
            ToolCall::ArtistAlbums(args) => {
                assert_eq!(args.album_type, "all");
                assert_eq!(args.limit, 50);
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[test]
    fn test_parse_no_argument_tools() {
        assert!(matches!(
            ToolCall::parse("get_user_profile", Value::Null),
            Ok(ToolCall::UserProfile)
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_tools_and_bad_arguments() {
        assert!(matches!(
            ToolCall::parse("get_mixes", json!({})),
            Err(ToolError::UnknownTool(_))
        ));
        assert!(matches!(
            ToolCall::parse("download_track", json!({})),
            Err(ToolError::InvalidArguments(_))
        ));
        assert!(matches!(
            ToolCall::parse("download_track", json!({"track_id": [1]})),
            Err(ToolError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_paging_defaults() {
        match ToolCall::parse("get_my_playlists", Value::Null).unwrap() {
            ToolCall::MyPlaylists(args) => assert_eq!((args.limit, args.offset), (50, 0)),
            other => panic!("unexpected call {other:?}"),
        }

        match ToolCall::parse("get_similar_artists", json!({"artist_id": 3})).unwrap() {
            ToolCall::SimilarArtists(args) => assert_eq!(args.limit, 10),
            other => panic!("unexpected call {other:?}"),
        }

        match ToolCall::parse("get_artist_radio", json!({"artist_id": "3"})).unwrap() {
            ToolCall::ArtistRadio(args) => assert_eq!(args.limit, 50),
            other => panic!("unexpected call {other:?}"),
        }

        match ToolCall::parse(
            "get_playlist_items",
            json!({"playlist_id": "abc", "limit": 5, "offset": 10}),
        )
        .unwrap()
        {
            ToolCall::PlaylistItems(args) => {
                assert_eq!(args.playlist_id, "abc");
                assert_eq!((args.limit, args.offset), (5, 10));
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[test]
    fn test_favorites_require_media_type() {
        assert!(matches!(
            ToolCall::parse("get_favorites", json!({})),
            Err(ToolError::InvalidArguments(_))
        ));
        // Unsupported values reach the handler, which answers with text
        assert!(matches!(
            ToolCall::parse("get_favorites", json!({"media_type": "mix"})),
            Ok(ToolCall::Favorites(_))
        ));
    }

    #[test]
    fn test_download_playlist_arguments() {
        let call = ToolCall::parse(
            "download_playlist",
            json!({"playlist_id": "abc", "include_videos": true, "output_path": "/tmp"}),
        )
        .unwrap();

        match call {
            ToolCall::DownloadPlaylist(args) => {
                assert!(args.include_videos);
                assert_eq!(args.quality, None);
                assert_eq!(args.output_path.as_deref(), Some("/tmp"));
            }
            other => panic!("unexpected call {other:?}"),
        }
    }
}
