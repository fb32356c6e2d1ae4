//! Typed views of the TIDAL catalog responses.
//!
//! Every field the API may omit is an `Option` (or defaults), so callers never
//! test for attribute presence.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtistRef {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlbumRef {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
}

/// A track or a video. Videos carry no album.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub track_number: Option<u32>,
    #[serde(default)]
    pub volume_number: Option<u32>,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub isrc: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub audio_quality: Option<String>,
    #[serde(default)]
    pub stream_ready: Option<bool>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub artist: Option<ArtistRef>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub album: Option<AlbumRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub number_of_tracks: u32,
    #[serde(default)]
    pub number_of_volumes: Option<u32>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default, rename = "type")]
    pub album_type: Option<String>,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub upc: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub audio_quality: Option<String>,
    #[serde(default)]
    pub stream_ready: Option<bool>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub artist: Option<ArtistRef>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaylistCreator {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub uuid: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub creator: Option<PlaylistCreator>,
    #[serde(default)]
    pub number_of_tracks: u32,
    #[serde(default)]
    pub number_of_videos: u32,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub public_playlist: Option<bool>,
    #[serde(default, rename = "type")]
    pub playlist_type: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// One row of a playlist listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaylistEntry {
    pub item: Track,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artist {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Row of a favourites listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Favorite<T> {
    pub item: T,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lyrics {
    #[serde(default)]
    pub lyrics_provider: Option<String>,
    /// Plain text
    #[serde(default)]
    pub lyrics: Option<String>,
    /// LRC lines, `[mm:ss.xx] text`
    #[serde(default)]
    pub subtitles: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtistBio {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Paged list envelope used by most collection endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total_number_of_items: Option<u32>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_number_of_items: None,
        }
    }
}

impl<T> Page<T> {
    /// Total reported by the API, or the number of items received
    pub fn total(&self) -> usize {
        self.total_number_of_items
            .map(|n| n as usize)
            .unwrap_or(self.items.len())
    }
}

impl<T> Page<Favorite<T>> {
    /// Drop the favourite wrapper around every row
    pub fn into_items(self) -> Page<T> {
        Page {
            items: self.items.into_iter().map(|f| f.item).collect(),
            total_number_of_items: self.total_number_of_items,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResults {
    #[serde(default)]
    pub artists: Option<Page<Artist>>,
    #[serde(default)]
    pub albums: Option<Page<Album>>,
    #[serde(default)]
    pub tracks: Option<Page<Track>>,
    #[serde(default)]
    pub playlists: Option<Page<Playlist>>,
    #[serde(default)]
    pub videos: Option<Page<Track>>,
}

/// Response of the `/sessions` endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    #[serde(default)]
    pub session_id: Option<String>,
    pub user_id: u64,
    pub country_code: String,
}

impl Track {
    /// Main artist name, falling back to the first credited artist
    pub fn artist_name(&self) -> &str {
        self.artist
            .as_ref()
            .or_else(|| self.artists.first())
            .map(|a| a.name.as_str())
            .unwrap_or("Unknown Artist")
    }

    /// Title including the version suffix, e.g. `Song (Remastered)`
    pub fn display_title(&self) -> String {
        match self.version.as_deref() {
            Some(version) if !version.is_empty() && !self.title.contains(version) => {
                format!("{} ({})", self.title, version)
            }
            _ => self.title.clone(),
        }
    }

    pub fn album_title(&self) -> &str {
        self.album
            .as_ref()
            .map(|a| a.title.as_str())
            .unwrap_or("Unknown Album")
    }
}

impl Album {
    pub fn artist_name(&self) -> &str {
        self.artist
            .as_ref()
            .or_else(|| self.artists.first())
            .map(|a| a.name.as_str())
            .unwrap_or("Unknown Artist")
    }
}

impl Playlist {
    pub fn creator_name(&self) -> Option<&str> {
        self.creator.as_ref().and_then(|c| c.name.as_deref())
    }

    /// Tracks plus videos
    pub fn item_count(&self) -> u32 {
        self.number_of_tracks + self.number_of_videos
    }
}

impl User {
    /// First and last name joined, if either is present
    pub fn full_name(&self) -> Option<String> {
        let joined = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_parses_with_missing_fields() {
        let track: Track = serde_json::from_str(
            r#"{"id": 1, "title": "Intro", "artists": [{"id": 7, "name": "Someone"}]}"#,
        )
        .unwrap();

        assert_eq!(track.duration, 0);
        assert!(track.album.is_none());
        assert_eq!(track.artist_name(), "Someone");
        assert_eq!(track.album_title(), "Unknown Album");
    }

    #[test]
    fn test_album_parses_release_date() {
        let album: Album = serde_json::from_str(
            r#"{"id": 10, "title": "Record", "numberOfTracks": 12, "releaseDate": "2021-03-05", "type": "ALBUM"}"#,
        )
        .unwrap();

        assert_eq!(album.number_of_tracks, 12);
        assert_eq!(album.release_date, NaiveDate::from_ymd_opt(2021, 3, 5));
        assert_eq!(album.album_type.as_deref(), Some("ALBUM"));
        assert_eq!(album.artist_name(), "Unknown Artist");
    }

    #[test]
    fn test_playlist_counts_and_creator() {
        let playlist: Playlist = serde_json::from_str(
            r#"{"uuid": "abc", "title": "Mix", "numberOfTracks": 10, "numberOfVideos": 2, "creator": {"id": 0}}"#,
        )
        .unwrap();

        assert_eq!(playlist.item_count(), 12);
        assert_eq!(playlist.creator_name(), None);
    }

    #[test]
    fn test_display_title_with_version() {
        let track: Track =
            serde_json::from_str(r#"{"id": 1, "title": "Song", "version": "Live"}"#).unwrap();
        assert_eq!(track.display_title(), "Song (Live)");
    }

    #[test]
    fn test_favorites_unwrap_items() {
        let page: Page<Favorite<Artist>> = serde_json::from_str(
            r#"{"items": [{"created": "2024-01-01", "item": {"id": 3, "name": "Band"}}], "totalNumberOfItems": 40}"#,
        )
        .unwrap();

        let artists = page.into_items();
        assert_eq!(artists.items[0].name, "Band");
        assert_eq!(artists.total(), 40);
    }

    #[test]
    fn test_lyrics_fields() {
        let lyrics: Lyrics = serde_json::from_str(
            r#"{"trackId": 1, "lyricsProvider": "MusixMatch", "subtitles": "[00:01.00] Hi"}"#,
        )
        .unwrap();
        assert_eq!(lyrics.lyrics_provider.as_deref(), Some("MusixMatch"));
        assert!(lyrics.lyrics.is_none());
    }

    #[test]
    fn test_user_full_name() {
        let user: User = serde_json::from_str(r#"{"id": 5, "firstName": "Ada"}"#).unwrap();
        assert_eq!(user.full_name().as_deref(), Some("Ada"));

        let anonymous: User = serde_json::from_str(r#"{"id": 6}"#).unwrap();
        assert_eq!(anonymous.full_name(), None);
    }
}
