use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static MEDIA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/(track|album|artist|playlist|video|mix)/([0-9A-Za-z-]+)")
        .expect("media url pattern is valid")
});

/// Kind of media a TIDAL share URL points to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlMediaKind {
    Track,
    Album,
    Artist,
    Playlist,
    Video,
    Mix,
}

impl fmt::Display for UrlMediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UrlMediaKind::Track => "track",
            UrlMediaKind::Album => "album",
            UrlMediaKind::Artist => "artist",
            UrlMediaKind::Playlist => "playlist",
            UrlMediaKind::Video => "video",
            UrlMediaKind::Mix => "mix",
        };
        write!(f, "{name}")
    }
}

/// Media reference extracted from a share URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLink {
    pub kind: UrlMediaKind,
    pub id: String,
}

/// Whether a search query should be treated as a URL
pub fn looks_like_url(query: &str) -> bool {
    query.contains("http")
}

/// Parse `https://tidal.com/browse/track/123?u` style links.
///
/// Query strings, fragments and a trailing `/u` share suffix are ignored.
pub fn parse_media_url(url: &str) -> Option<MediaLink> {
    let cleaned = clean_url_ending(url);
    let caps = MEDIA_URL.captures(cleaned)?;

    let kind = match caps[1].to_ascii_lowercase().as_str() {
        "track" => UrlMediaKind::Track,
        "album" => UrlMediaKind::Album,
        "artist" => UrlMediaKind::Artist,
        "playlist" => UrlMediaKind::Playlist,
        "video" => UrlMediaKind::Video,
        _ => UrlMediaKind::Mix,
    };

    Some(MediaLink {
        kind,
        id: caps[2].to_string(),
    })
}

fn clean_url_ending(url: &str) -> &str {
    let url = url.trim();
    let url = url.split(['?', '#']).next().unwrap_or(url);
    let url = url.strip_suffix("/u").unwrap_or(url);
    url.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_browse_track_url() {
        let link = parse_media_url("https://tidal.com/browse/track/77646169?u").unwrap();
        assert_eq!(link.kind, UrlMediaKind::Track);
        assert_eq!(link.id, "77646169");
    }

    #[test]
    fn test_parse_playlist_uuid() {
        let link = parse_media_url(
            "https://listen.tidal.com/playlist/36ea71a8-445e-41a4-82ab-6628c581535d/u",
        )
        .unwrap();
        assert_eq!(link.kind, UrlMediaKind::Playlist);
        assert_eq!(link.id, "36ea71a8-445e-41a4-82ab-6628c581535d");
    }

    #[test]
    fn test_non_media_url() {
        assert!(parse_media_url("https://tidal.com/pricing").is_none());
        assert!(looks_like_url("https://tidal.com"));
        assert!(!looks_like_url("daft punk"));
    }
}
