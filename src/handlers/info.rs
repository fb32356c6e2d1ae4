use tracing::debug;

use super::{format_duration, format_long_duration, or_na, report, yes_no};
use crate::tidal::{AlbumFilter, CatalogError, Session, browse_url};

const ALBUM_TRACK_PREVIEW: usize = 20;
const PLAYLIST_TRACK_PREVIEW: usize = 15;
const TOP_TRACKS: u32 = 10;
const BIO_LIMIT: usize = 500;

/// Upper bound for listings we page through in one request
const LISTING_LIMIT: u32 = 100;

pub async fn handle_track_details(session: &Session, track_id: &str) -> String {
    report("get track details", track_details(session, track_id).await)
}

async fn track_details(session: &Session, track_id: &str) -> Result<String, CatalogError> {
    let track = session.catalog().track(track_id).await?;

    // Album totals only come with the full album
    let album = match &track.album {
        Some(album_ref) => session
            .catalog()
            .album(&album_ref.id.to_string())
            .await
            .inspect_err(|e| debug!("Album lookup for track {} failed: {}", track.id, e))
            .ok(),
        None => None,
    };

    let release_date = album
        .as_ref()
        .and_then(|a| a.release_date)
        .or_else(|| track.album.as_ref().and_then(|a| a.release_date));

    Ok(format!(
        "=== TRACK DETAILS ===\n\n\
         Title: {}\n\
         Artist: {}\n\
         Album: {}\n\n\
         Duration: {}\n\
         Track Number: {} / {}\n\
         Volume Number: {}\n\n\
         Audio Quality: {}\n\
         Available: {}\n\
         Explicit: {}\n\n\
         ISRC: {}\n\
         Copyright: {}\n\
         Release Date: {}\n\n\
         Album ID: {}\n\
         Artist ID: {}\n\
         Track ID: {}\n\n\
         TIDAL URL: {}\n",
        track.display_title(),
        track.artist_name(),
        track.album_title(),
        format_duration(track.duration),
        or_na(track.track_number),
        or_na(album.as_ref().map(|a| a.number_of_tracks)),
        or_na(track.volume_number),
        or_na(track.audio_quality.as_deref()),
        yes_no(track.stream_ready.unwrap_or(false)),
        yes_no(track.explicit),
        or_na(track.isrc.as_deref()),
        or_na(track.copyright.as_deref()),
        or_na(release_date),
        or_na(track.album.as_ref().map(|a| a.id)),
        or_na(track.artist.as_ref().or(track.artists.first()).map(|a| a.id)),
        track.id,
        browse_url("track", track.id)
    ))
}

pub async fn handle_album_details(session: &Session, album_id: &str) -> String {
    report("get album details", album_details(session, album_id).await)
}

async fn album_details(session: &Session, album_id: &str) -> Result<String, CatalogError> {
    let catalog = session.catalog();
    let album = catalog.album(album_id).await?;
    let tracks = catalog.album_tracks(album_id, LISTING_LIMIT).await?;

    let mut track_list: Vec<String> = tracks
        .items
        .iter()
        .take(ALBUM_TRACK_PREVIEW)
        .enumerate()
        .map(|(i, t)| {
            format!(
                "  {:2}. {} ({})",
                i + 1,
                t.display_title(),
                format_duration(t.duration)
            )
        })
        .collect();

    let total = tracks.total().max(tracks.items.len());
    if total > ALBUM_TRACK_PREVIEW {
        track_list.push(format!(
            "  ... and {} more tracks",
            total - ALBUM_TRACK_PREVIEW
        ));
    }

    Ok(format!(
        "=== ALBUM DETAILS ===\n\n\
         Title: {}\n\
         Artist: {}\n\n\
         Release Date: {}\n\
         Number of Tracks: {}\n\
         Number of Volumes: {}\n\
         Total Duration: {} minutes\n\n\
         Type: {}\n\
         Explicit: {}\n\
         Available: {}\n\n\
         UPC: {}\n\
         Copyright: {}\n\
         Audio Quality: {}\n\n\
         Tracklist:\n{}\n\n\
         Album ID: {}\n\
         Artist ID: {}\n\n\
         TIDAL URL: {}\n",
        album.title,
        album.artist_name(),
        or_na(album.release_date),
        album.number_of_tracks,
        album.number_of_volumes.unwrap_or(1),
        album.duration / 60,
        or_na(album.album_type.as_deref()),
        yes_no(album.explicit),
        yes_no(album.stream_ready.unwrap_or(false)),
        or_na(album.upc.as_deref()),
        or_na(album.copyright.as_deref()),
        or_na(album.audio_quality.as_deref()),
        track_list.join("\n"),
        album.id,
        or_na(album.artist.as_ref().or(album.artists.first()).map(|a| a.id)),
        browse_url("album", album.id)
    ))
}

pub async fn handle_artist_details(
    session: &Session,
    artist_id: &str,
    include_top_tracks: bool,
) -> String {
    report(
        "get artist details",
        artist_details(session, artist_id, include_top_tracks).await,
    )
}

/// Only the artist lookup itself can fail; every extra section degrades to
/// nothing or zero.
async fn artist_details(
    session: &Session,
    artist_id: &str,
    include_top_tracks: bool,
) -> Result<String, CatalogError> {
    let catalog = session.catalog();
    let artist = catalog.artist(artist_id).await?;

    let bio_text = match catalog.artist_bio(artist_id).await {
        Ok(bio) => bio
            .text
            .filter(|t| !t.is_empty())
            .map(|text| format!("\nBiography:\n{}\n", truncate(&text, BIO_LIMIT)))
            .unwrap_or_default(),
        Err(e) => {
            debug!("No bio for artist {}: {}", artist_id, e);
            String::new()
        }
    };

    let mut top_tracks_text = String::new();
    if include_top_tracks {
        match catalog.artist_top_tracks(artist_id, TOP_TRACKS).await {
            Ok(tracks) if !tracks.is_empty() => {
                let lines: Vec<String> = tracks
                    .iter()
                    .take(TOP_TRACKS as usize)
                    .enumerate()
                    .map(|(i, t)| format!("  {:2}. {} - {}", i + 1, t.display_title(), t.album_title()))
                    .collect();
                top_tracks_text = format!("\nTop Tracks:\n{}\n", lines.join("\n"));
            }
            Ok(_) => {}
            Err(e) => debug!("No top tracks for artist {}: {}", artist_id, e),
        }
    }

    let albums_count = catalog
        .artist_albums(artist_id, AlbumFilter::Albums, LISTING_LIMIT)
        .await
        .map(|page| page.total())
        .unwrap_or(0);
    let eps_count = catalog
        .artist_albums(artist_id, AlbumFilter::EpsSingles, LISTING_LIMIT)
        .await
        .map(|page| page.total())
        .unwrap_or(0);

    Ok(format!(
        "=== ARTIST DETAILS ===\n\n\
         Name: {}\n\
         Artist ID: {}\n\
         {}\n\
         Discography:\n  \
         Albums: {}\n  \
         EPs & Singles: {}\n\
         {}\n\
         TIDAL URL: {}\n",
        artist.name,
        artist.id,
        bio_text,
        albums_count,
        eps_count,
        top_tracks_text,
        browse_url("artist", artist.id)
    ))
}

pub async fn handle_artist_albums(
    session: &Session,
    artist_id: &str,
    album_type: &str,
    limit: u32,
) -> String {
    report(
        "get artist albums",
        artist_albums(session, artist_id, album_type, limit).await,
    )
}

async fn artist_albums(
    session: &Session,
    artist_id: &str,
    album_type: &str,
    limit: u32,
) -> Result<String, CatalogError> {
    let catalog = session.catalog();
    let artist = catalog.artist(artist_id).await?;

    let (type_label, albums) = match album_type {
        "albums" => (
            "Albums",
            catalog
                .artist_albums(artist_id, AlbumFilter::Albums, limit)
                .await?
                .items,
        ),
        "eps_singles" => (
            "EPs & Singles",
            catalog
                .artist_albums(artist_id, AlbumFilter::EpsSingles, limit)
                .await?
                .items,
        ),
        "other" => (
            "Compilations & Other",
            catalog
                .artist_albums(artist_id, AlbumFilter::Other, limit)
                .await?
                .items,
        ),
        _ => {
            let mut all = catalog
                .artist_albums(artist_id, AlbumFilter::Albums, limit)
                .await?
                .items;
            all.extend(
                catalog
                    .artist_albums(artist_id, AlbumFilter::EpsSingles, limit)
                    .await?
                    .items,
            );
            ("All Releases", all)
        }
    };

    if albums.is_empty() {
        return Ok(format!(
            "✗ No {} found for {}",
            type_label.to_lowercase(),
            artist.name
        ));
    }

    let listing: Vec<String> = albums
        .iter()
        .take(limit as usize)
        .enumerate()
        .map(|(i, album)| {
            format!(
                "{:3}. {} ({})\n     {} tracks | ID: {}",
                i + 1,
                album.title,
                or_na(album.release_date.map(|d| d.format("%Y"))),
                album.number_of_tracks,
                album.id
            )
        })
        .collect();

    Ok(format!(
        "=== {} BY {} ===\n\nTotal: {} releases\n\n{}\n",
        type_label.to_uppercase(),
        artist.name.to_uppercase(),
        albums.len(),
        listing.join("\n")
    ))
}

pub async fn handle_playlist_details(session: &Session, playlist_id: &str) -> String {
    report(
        "get playlist details",
        playlist_details(session, playlist_id).await,
    )
}

async fn playlist_details(session: &Session, playlist_id: &str) -> Result<String, CatalogError> {
    let catalog = session.catalog();
    let playlist = catalog.playlist(playlist_id).await?;
    let entries = catalog.playlist_items(playlist_id, LISTING_LIMIT, 0).await?;

    let mut track_list: Vec<String> = entries
        .items
        .iter()
        .take(PLAYLIST_TRACK_PREVIEW)
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "  {:3}. {} - {}",
                i + 1,
                entry.item.display_title(),
                entry.item.artist_name()
            )
        })
        .collect();

    let listed = entries.total().max(entries.items.len());
    if listed > PLAYLIST_TRACK_PREVIEW {
        track_list.push(format!(
            "  ... and {} more tracks",
            listed - PLAYLIST_TRACK_PREVIEW
        ));
    }

    // The playlist reports its own total; fall back to summing what we fetched
    let total_seconds = if playlist.duration > 0 {
        u64::from(playlist.duration)
    } else {
        entries.items.iter().map(|e| u64::from(e.item.duration)).sum()
    };

    Ok(format!(
        "=== PLAYLIST DETAILS ===\n\n\
         Title: {}\n\
         Creator: {}\n\
         Description: {}\n\n\
         Number of Tracks: {}\n\
         Duration: {}\n\
         Public: {}\n\
         Type: {}\n\n\
         Created: {}\n\
         Last Updated: {}\n\n\
         Preview Tracks:\n{}\n\n\
         Playlist ID: {}\n\
         TIDAL URL: {}\n",
        playlist.title,
        playlist.creator_name().unwrap_or("Unknown"),
        playlist
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("No description"),
        playlist.number_of_tracks,
        format_long_duration(total_seconds),
        yes_no(playlist.public_playlist.unwrap_or(false)),
        or_na(playlist.playlist_type.as_deref()),
        or_na(playlist.created.as_deref()),
        or_na(playlist.last_updated.as_deref()),
        track_list.join("\n"),
        playlist.uuid,
        browse_url("playlist", &playlist.uuid)
    ))
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("ééééé", 2), "éé...");
    }
}
