use tracing::debug;

use super::report;
use crate::tidal::{CatalogError, Lyrics, Page, Session, Track};

const SYNCED_LINE_LIMIT: usize = 100;
const STATIC_CHAR_LIMIT: usize = 2000;

pub async fn handle_track_lyrics(session: &Session, track_id: &str) -> String {
    report("get lyrics", track_lyrics(session, track_id).await)
}

async fn track_lyrics(session: &Session, track_id: &str) -> Result<String, CatalogError> {
    let catalog = session.catalog();
    let track = catalog.track(track_id).await?;

    let lyrics = match catalog.track_lyrics(track_id).await {
        Ok(lyrics) => lyrics,
        Err(CatalogError::NotFound { .. }) => {
            return Ok(format!(
                "✗ No lyrics available for '{}' by {}",
                track.title,
                track.artist_name()
            ));
        }
        Err(e) => return Err(e),
    };

    let Some((lyrics_type, text)) = lyrics_body(&lyrics) else {
        return Ok(format!(
            "✗ Lyrics data available but in unknown format for '{}'",
            track.title
        ));
    };

    Ok(format!(
        "=== {}: {} ===\n\
         Artist: {}\n\
         Album: {}\n\n\
         {}\n\n\
         Provider: {}\n",
        lyrics_type.to_uppercase(),
        track.title,
        track.artist_name(),
        track.album_title(),
        text,
        lyrics.lyrics_provider.as_deref().unwrap_or("TIDAL")
    ))
}

/// Synced lyrics win over plain text when both are present
fn lyrics_body(lyrics: &Lyrics) -> Option<(&'static str, String)> {
    if let Some(subtitles) = lyrics.subtitles.as_deref().filter(|s| !s.trim().is_empty()) {
        let lines: Vec<&str> = subtitles.lines().filter(|l| !l.trim().is_empty()).collect();
        let mut text = lines
            .iter()
            .take(SYNCED_LINE_LIMIT)
            .map(|l| synced_line(l))
            .collect::<Vec<_>>()
            .join("\n");
        if lines.len() > SYNCED_LINE_LIMIT {
            text.push_str(&format!(
                "\n... and {} more lines",
                lines.len() - SYNCED_LINE_LIMIT
            ));
        }
        return Some(("Synced Lyrics", text));
    }

    let plain = lyrics.lyrics.as_deref().filter(|s| !s.trim().is_empty())?;
    let text = match plain.char_indices().nth(STATIC_CHAR_LIMIT) {
        Some((cut, _)) => format!("{}\n\n... (truncated)", &plain[..cut]),
        None => plain.to_string(),
    };
    Some(("Static Lyrics", text))
}

/// `[01:02.50] words` becomes `[01:02] words`
fn synced_line(line: &str) -> String {
    match line.trim().strip_prefix('[').and_then(|rest| rest.split_once(']')) {
        Some((stamp, words)) => {
            let stamp = stamp.split('.').next().unwrap_or(stamp);
            format!("[{}] {}", stamp, words.trim())
        }
        None => line.trim().to_string(),
    }
}

pub async fn handle_similar_artists(session: &Session, artist_id: &str, limit: u32) -> String {
    report(
        "get similar artists",
        similar_artists(session, artist_id, limit).await,
    )
}

async fn similar_artists(
    session: &Session,
    artist_id: &str,
    limit: u32,
) -> Result<String, CatalogError> {
    let catalog = session.catalog();
    let artist = catalog.artist(artist_id).await?;
    let similar = empty_if_missing(catalog.similar_artists(artist_id, limit).await)?;

    if similar.items.is_empty() {
        return Ok(format!("✗ No similar artists found for {}", artist.name));
    }

    let listing: Vec<String> = similar
        .items
        .iter()
        .take(limit as usize)
        .enumerate()
        .map(|(i, a)| format!("{:2}. {} (ID: {})", i + 1, a.name, a.id))
        .collect();

    Ok(format!(
        "=== SIMILAR TO {} ===\n\n\
         {}\n\n\
         Tip: Use get_artist_details with any of these artist IDs to learn more!\n",
        artist.name.to_uppercase(),
        listing.join("\n")
    ))
}

pub async fn handle_artist_radio(session: &Session, artist_id: &str, limit: u32) -> String {
    report("get artist radio", artist_radio(session, artist_id, limit).await)
}

async fn artist_radio(session: &Session, artist_id: &str, limit: u32) -> Result<String, CatalogError> {
    let catalog = session.catalog();
    let artist = catalog.artist(artist_id).await?;
    let radio: Page<Track> = empty_if_missing(catalog.artist_radio(artist_id, limit).await)?;

    if radio.items.is_empty() {
        return Ok(format!("✗ No radio available for {}", artist.name));
    }

    let listing: Vec<String> = radio
        .items
        .iter()
        .take(limit as usize)
        .enumerate()
        .map(|(i, t)| format!("{:2}. {} - {}", i + 1, t.title, t.artist_name()))
        .collect();

    Ok(format!(
        "=== {} RADIO ===\n\n\
         Mix of tracks inspired by {}\n\
         Total tracks: {}\n\n\
         {}\n\n\
         Tip: These are curated tracks similar to {}'s style!\n",
        artist.name.to_uppercase(),
        artist.name,
        radio.total(),
        listing.join("\n"),
        artist.name
    ))
}

/// TIDAL answers 404 when an artist has no mix or no neighbours
fn empty_if_missing<T>(result: Result<Page<T>, CatalogError>) -> Result<Page<T>, CatalogError> {
    match result {
        Err(CatalogError::NotFound { kind, id }) => {
            debug!("No {} data for {}", kind, id);
            Ok(Page::default())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synced_lines_drop_hundredths() {
        assert_eq!(synced_line("[01:02.50] Hello there "), "[01:02] Hello there");
        assert_eq!(synced_line("[00:00]"), "[00:00] ");
        assert_eq!(synced_line("no stamp"), "no stamp");
    }

    #[test]
    fn test_synced_lyrics_are_capped() {
        let subtitles = (0..105)
            .map(|i| format!("[00:{:02}.00] line {}", i % 60, i))
            .collect::<Vec<_>>()
            .join("\n");
        let lyrics = Lyrics {
            subtitles: Some(subtitles),
            lyrics: Some("plain".into()),
            ..Default::default()
        };

        let (kind, text) = lyrics_body(&lyrics).unwrap();
        assert_eq!(kind, "Synced Lyrics");
        assert!(text.starts_with("[00:00] line 0\n"));
        assert!(text.ends_with("\n... and 5 more lines"));
        assert!(!text.contains("line 100"));
    }

    #[test]
    fn test_static_lyrics_are_truncated() {
        let lyrics = Lyrics {
            lyrics: Some("é".repeat(2500)),
            ..Default::default()
        };

        let (kind, text) = lyrics_body(&lyrics).unwrap();
        assert_eq!(kind, "Static Lyrics");
        assert!(text.ends_with("\n\n... (truncated)"));
        assert_eq!(text.chars().filter(|c| *c == 'é').count(), 2000);
    }

    #[test]
    fn test_empty_lyrics_have_no_body() {
        assert!(lyrics_body(&Lyrics::default()).is_none());
        let blank = Lyrics {
            subtitles: Some("  ".into()),
            lyrics: Some(String::new()),
            ..Default::default()
        };
        assert!(lyrics_body(&blank).is_none());
    }

    #[test]
    fn test_not_found_becomes_empty_page() {
        let missing: Result<Page<Track>, _> = Err(CatalogError::NotFound {
            kind: "artist",
            id: "9".into(),
        });
        assert!(empty_if_missing(missing).unwrap().items.is_empty());

        let failed: Result<Page<Track>, _> = Err(CatalogError::Unauthorized(401));
        assert!(empty_if_missing(failed).is_err());
    }
}
