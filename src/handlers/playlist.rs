use super::{format_duration, report};
use crate::tidal::{CatalogError, Playlist, PlaylistEntry, Session, browse_url};

pub async fn handle_my_playlists(session: &Session, limit: u32, offset: u32) -> String {
    report("get playlists", my_playlists(session, limit, offset).await)
}

async fn my_playlists(session: &Session, limit: u32, offset: u32) -> Result<String, CatalogError> {
    let page = session
        .catalog()
        .user_playlists(session.user_id, limit, offset)
        .await?;

    if page.items.is_empty() && page.total() == 0 {
        return Ok("You don't have any playlists yet.".to_string());
    }

    let mut lines = vec!["=== YOUR PLAYLISTS ===".to_string(), String::new()];
    for (idx, playlist) in (offset as usize + 1..).zip(page.items.iter().take(limit as usize)) {
        lines.extend(playlist_lines(idx, playlist));
        lines.push(String::new());
    }

    let shown_through = offset as usize + limit as usize;
    if page.total() > shown_through {
        lines.push(format!(
            "... and {} more playlists",
            page.total() - shown_through
        ));
    }

    Ok(lines.join("\n"))
}

fn playlist_lines(idx: usize, playlist: &Playlist) -> Vec<String> {
    let visibility = if playlist.public_playlist.unwrap_or(false) {
        "Public"
    } else {
        "Private"
    };

    let mut lines = vec![
        format!("{}. {}", idx, playlist.title),
        format!("   Items: {} | {}", playlist.item_count(), visibility),
        format!("   ID: {}", playlist.uuid),
        format!("   URL: {}", browse_url("playlist", &playlist.uuid)),
    ];
    if let Some(description) = playlist.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("   Description: {description}"));
    }
    lines
}

pub async fn handle_playlist_items(
    session: &Session,
    playlist_id: &str,
    limit: u32,
    offset: u32,
) -> String {
    report(
        "get playlist items",
        playlist_items(session, playlist_id, limit, offset).await,
    )
}

async fn playlist_items(
    session: &Session,
    playlist_id: &str,
    limit: u32,
    offset: u32,
) -> Result<String, CatalogError> {
    let catalog = session.catalog();
    let playlist = catalog.playlist(playlist_id).await?;
    let entries = catalog.playlist_items(playlist_id, limit, offset).await?;
    let total = playlist.item_count() as usize;

    let mut lines = vec![
        format!("Playlist: {}", playlist.title),
        format!("By: {}", playlist.creator_name().unwrap_or("Unknown")),
        format!("Total items: {total}"),
        format!(
            "Description: {}",
            playlist
                .description
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or("(none)")
        ),
        format!("URL: {}", browse_url("playlist", &playlist.uuid)),
        String::new(),
        "=== TRACKS ===".to_string(),
    ];

    for (idx, entry) in (offset as usize + 1..).zip(entries.items.iter().take(limit as usize)) {
        lines.push(entry_line(idx, entry));
    }

    let shown_through = offset as usize + limit as usize;
    if total > shown_through {
        lines.push(format!("\n... and {} more items", total - shown_through));
    }

    Ok(lines.join("\n"))
}

fn entry_line(idx: usize, entry: &PlaylistEntry) -> String {
    let item = &entry.item;
    if entry.kind == "video" {
        return format!("{}. {}", idx, item.title);
    }

    format!(
        "{}. {} - {} [{}]{}",
        idx,
        item.artist_name(),
        item.title,
        format_duration(item.duration),
        if item.explicit { " [EXPLICIT]" } else { "" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: &str, explicit: bool) -> PlaylistEntry {
        serde_json::from_value(serde_json::json!({
            "type": kind,
            "item": {
                "id": 5,
                "title": "Song",
                "duration": 125,
                "explicit": explicit,
                "artist": {"id": 1, "name": "Band"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_entry_lines_by_kind() {
        assert_eq!(entry_line(3, &entry("track", true)), "3. Band - Song [2:05] [EXPLICIT]");
        assert_eq!(entry_line(1, &entry("track", false)), "1. Band - Song [2:05]");
        assert_eq!(entry_line(7, &entry("video", false)), "7. Song");
    }

    #[test]
    fn test_playlist_lines_skip_empty_description() {
        let playlist: Playlist = serde_json::from_value(serde_json::json!({
            "uuid": "abc",
            "title": "Mine",
            "numberOfTracks": 4,
            "numberOfVideos": 1,
            "publicPlaylist": true,
            "description": ""
        }))
        .unwrap();

        let lines = playlist_lines(2, &playlist);
        assert_eq!(lines[0], "2. Mine");
        assert_eq!(lines[1], "   Items: 5 | Public");
        assert_eq!(lines[3], "   URL: https://tidal.com/browse/playlist/abc");
        assert_eq!(lines.len(), 4);
    }
}
