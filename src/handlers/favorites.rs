use super::{format_duration, report};
use crate::tidal::{CatalogError, FavoriteKind, Favorites, Session, browse_url};

const MEDIA_TYPES: &str = "track, album, artist, playlist, video";

pub async fn handle_favorites(session: &Session, media_type: &str, limit: u32, offset: u32) -> String {
    let Some(kind) = FavoriteKind::from_media_type(media_type) else {
        return format!("✗ Invalid media type: {media_type}. Must be one of: {MEDIA_TYPES}");
    };

    report(
        "get favorites",
        favorites(session, media_type, kind, limit, offset).await,
    )
}

async fn favorites(
    session: &Session,
    media_type: &str,
    kind: FavoriteKind,
    limit: u32,
    offset: u32,
) -> Result<String, CatalogError> {
    let page = session
        .catalog()
        .favorites(session.user_id, kind, limit, offset)
        .await?;

    if page.is_empty() {
        return Ok(format!("You don't have any favorite {media_type}s yet!"));
    }

    let total = page.total();
    let mut lines = vec![
        format!("=== YOUR FAVORITE {}S ===", media_type.to_uppercase()),
        format!("Total: {total}"),
        String::new(),
    ];

    let first = offset as usize + 1;
    let limit = limit as usize;
    match &page {
        Favorites::Tracks(page) => {
            for (idx, track) in (first..).zip(page.items.iter().take(limit)) {
                lines.push(format!("{}. {} - {}", idx, track.artist_name(), track.title));
                lines.push(format!(
                    "   Album: {} | Duration: {}{}",
                    track.album_title(),
                    format_duration(track.duration),
                    explicit(track.explicit)
                ));
                lines.push(format!("   ID: {} | URL: {}", track.id, browse_url("track", track.id)));
                lines.push(String::new());
            }
        }
        Favorites::Albums(page) => {
            for (idx, album) in (first..).zip(page.items.iter().take(limit)) {
                lines.push(format!("{}. {} - {}", idx, album.artist_name(), album.title));
                lines.push(format!(
                    "   Tracks: {}{}",
                    album.number_of_tracks,
                    explicit(album.explicit)
                ));
                lines.push(format!("   ID: {} | URL: {}", album.id, browse_url("album", album.id)));
                lines.push(String::new());
            }
        }
        Favorites::Artists(page) => {
            for (idx, artist) in (first..).zip(page.items.iter().take(limit)) {
                lines.push(format!("{}. {}", idx, artist.name));
                lines.push(format!("   ID: {} | URL: {}", artist.id, browse_url("artist", artist.id)));
                lines.push(String::new());
            }
        }
        Favorites::Playlists(page) => {
            for (idx, playlist) in (first..).zip(page.items.iter().take(limit)) {
                lines.push(format!(
                    "{}. {} by {}",
                    idx,
                    playlist.title,
                    playlist.creator_name().unwrap_or("Unknown")
                ));
                lines.push(format!("   Items: {}", playlist.item_count()));
                lines.push(format!(
                    "   ID: {} | URL: {}",
                    playlist.uuid,
                    browse_url("playlist", &playlist.uuid)
                ));
                lines.push(String::new());
            }
        }
        Favorites::Videos(page) => {
            for (idx, video) in (first..).zip(page.items.iter().take(limit)) {
                lines.push(format!("{}. {} - {}", idx, video.artist_name(), video.title));
                lines.push(format!(
                    "   Duration: {}{}",
                    format_duration(video.duration),
                    explicit(video.explicit)
                ));
                lines.push(format!("   ID: {} | URL: {}", video.id, browse_url("video", video.id)));
                lines.push(String::new());
            }
        }
    }

    let shown_through = offset as usize + limit;
    if total > shown_through {
        lines.push(format!("... and {} more {}s", total - shown_through, media_type));
    }

    Ok(lines.join("\n"))
}

fn explicit(flag: bool) -> &'static str {
    if flag { " [EXPLICIT]" } else { "" }
}

pub async fn handle_favorites_summary(session: &Session) -> String {
    report("get favorites summary", favorites_summary(session).await)
}

async fn favorites_summary(session: &Session) -> Result<String, CatalogError> {
    // One row per collection is enough to read its total
    let mut counts = Vec::with_capacity(4);
    for kind in [
        FavoriteKind::Tracks,
        FavoriteKind::Albums,
        FavoriteKind::Artists,
        FavoriteKind::Playlists,
    ] {
        let page = session.catalog().favorites(session.user_id, kind, 1, 0).await?;
        counts.push(page.total());
    }

    Ok(format!(
        "=== YOUR FAVORITES SUMMARY ===\n\n\
         Tracks: {}\n\
         Albums: {}\n\
         Artists: {}\n\
         Playlists: {}\n\n\
         Use get_favorites to view items in each category.",
        counts[0], counts[1], counts[2], counts[3]
    ))
}
