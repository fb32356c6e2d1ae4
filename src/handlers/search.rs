use tracing::debug;

use super::{format_duration, report};
use crate::tidal::url::looks_like_url;
use crate::tidal::{
    Album, Artist, CatalogError, Page, Playlist, SearchKind, Session, Track, UrlMediaKind,
    browse_url, parse_media_url,
};

/// Results shown per section
const SECTION_LIMIT: usize = 10;

/// Results requested per media type
const SEARCH_LIMIT: u32 = 50;

pub async fn handle_search(session: &Session, query: &str, media_type: Option<&str>) -> String {
    if looks_like_url(query) {
        return lookup_url(session, query)
            .await
            .unwrap_or_else(|e| format!("Error parsing URL: {e}"));
    }

    let kinds: Vec<SearchKind> = match media_type.and_then(SearchKind::from_filter) {
        Some(kind) => vec![kind],
        None => SearchKind::ALL.to_vec(),
    };

    debug!("Searching for {:?} in {:?}", query, kinds);

    let result = session
        .catalog()
        .search(query, &kinds, SEARCH_LIMIT)
        .await
        .map(|results| {
            let mut out = Vec::new();
            push_section(&mut out, "ARTISTS", results.artists, format_artist);
            push_section(&mut out, "ALBUMS", results.albums, format_album);
            push_section(&mut out, "TRACKS", results.tracks, format_track);
            push_section(&mut out, "VIDEOS", results.videos, format_video);
            push_section(&mut out, "PLAYLISTS", results.playlists, format_playlist);

            if out.is_empty() {
                "No results found.".to_string()
            } else {
                out.join("\n")
            }
        });

    report("search TIDAL", result)
}

async fn lookup_url(session: &Session, url: &str) -> Result<String, CatalogError> {
    let link = parse_media_url(url)
        .ok_or_else(|| CatalogError::Decode(format!("no TIDAL media reference in '{url}'")))?;
    let catalog = session.catalog();

    let text = match link.kind {
        UrlMediaKind::Track => {
            format!("Found track:\n{}", format_track(&catalog.track(&link.id).await?, 1))
        }
        UrlMediaKind::Video => {
            format!("Found video:\n{}", format_video(&catalog.video(&link.id).await?, 1))
        }
        UrlMediaKind::Album => {
            format!("Found album:\n{}", format_album(&catalog.album(&link.id).await?, 1))
        }
        UrlMediaKind::Artist => format!(
            "Found artist:\n{}",
            format_artist(&catalog.artist(&link.id).await?, 1)
        ),
        UrlMediaKind::Playlist => format!(
            "Found playlist:\n{}",
            format_playlist(&catalog.playlist(&link.id).await?, 1)
        ),
        UrlMediaKind::Mix => format!(
            "Found: mix {}\n   URL: {}",
            link.id,
            browse_url("mix", &link.id)
        ),
    };

    Ok(text)
}

fn push_section<T>(
    out: &mut Vec<String>,
    title: &str,
    page: Option<Page<T>>,
    format: fn(&T, usize) -> String,
) {
    let Some(page) = page else { return };
    if page.items.is_empty() {
        return;
    }

    out.push(format!("\n=== {title} ==="));
    out.extend(
        page.items
            .iter()
            .take(SECTION_LIMIT)
            .enumerate()
            .map(|(i, item)| format(item, i + 1)),
    );

    let total = page.total().max(page.items.len());
    if total > SECTION_LIMIT {
        out.push(format!("\n... and {} more results", total - SECTION_LIMIT));
    }
}

fn explicit_tag(explicit: bool) -> &'static str {
    if explicit { " [EXPLICIT]" } else { "" }
}

fn share_url(url: Option<&str>, kind: &str, id: impl std::fmt::Display) -> String {
    url.map(str::to_string)
        .unwrap_or_else(|| browse_url(kind, id))
}

fn format_track(track: &Track, index: usize) -> String {
    format!(
        "{index}. {} - {} ({}) [{}]{}\n   URL: {}",
        track.artist_name(),
        track.display_title(),
        track.album_title(),
        format_duration(track.duration),
        explicit_tag(track.explicit),
        share_url(track.url.as_deref(), "track", track.id)
    )
}

fn format_video(video: &Track, index: usize) -> String {
    format!(
        "{index}. {} - {} [{}]{}\n   URL: {}",
        video.artist_name(),
        video.display_title(),
        format_duration(video.duration),
        explicit_tag(video.explicit),
        share_url(video.url.as_deref(), "video", video.id)
    )
}

fn format_album(album: &Album, index: usize) -> String {
    format!(
        "{index}. {} - {} ({} tracks){}\n   URL: {}",
        album.artist_name(),
        album.title,
        album.number_of_tracks,
        explicit_tag(album.explicit),
        share_url(album.url.as_deref(), "album", album.id)
    )
}

fn format_artist(artist: &Artist, index: usize) -> String {
    format!(
        "{index}. {}\n   URL: {}",
        artist.name,
        share_url(artist.url.as_deref(), "artist", artist.id)
    )
}

fn format_playlist(playlist: &Playlist, index: usize) -> String {
    format!(
        "{index}. {} by {} ({} items)\n   {}\n   URL: {}",
        playlist.title,
        playlist.creator_name().unwrap_or("Unknown"),
        playlist.item_count(),
        playlist.description.as_deref().unwrap_or(""),
        share_url(playlist.url.as_deref(), "playlist", &playlist.uuid)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tidal::{AlbumRef, ArtistRef};

    fn track(id: u64, title: &str) -> Track {
        Track {
            id,
            title: title.to_string(),
            version: None,
            duration: 185,
            track_number: Some(1),
            volume_number: Some(1),
            explicit: true,
            isrc: None,
            copyright: None,
            audio_quality: None,
            stream_ready: None,
            url: None,
            artist: Some(ArtistRef {
                id: 9,
                name: "Band".to_string(),
            }),
            artists: Vec::new(),
            album: Some(AlbumRef {
                id: 5,
                title: "Record".to_string(),
                release_date: None,
            }),
        }
    }

    #[test]
    fn test_format_track_line() {
        assert_eq!(
            format_track(&track(1, "Song"), 3),
            "3. Band - Song (Record) [3:05] [EXPLICIT]\n   URL: https://tidal.com/browse/track/1"
        );
    }

    #[test]
    fn test_section_is_capped() {
        let page = Page {
            items: (0..12).map(|i| track(i, "Song")).collect(),
            total_number_of_items: Some(40),
        };

        let mut out = Vec::new();
        push_section(&mut out, "TRACKS", Some(page), format_track);

        assert_eq!(out[0], "\n=== TRACKS ===");
        assert_eq!(out.len(), 1 + SECTION_LIMIT + 1);
        assert_eq!(out.last().unwrap(), "\n... and 30 more results");
    }

    #[test]
    fn test_empty_section_is_skipped() {
        let mut out = Vec::new();
        push_section::<Track>(&mut out, "TRACKS", Some(Page::default()), format_track);
        push_section::<Track>(&mut out, "VIDEOS", None, format_video);
        assert!(out.is_empty());
    }
}
