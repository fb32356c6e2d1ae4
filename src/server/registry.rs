//! Tool catalog advertised through `tools/list`.
//!
//! Schemas are written out by hand so every property carries an explicit
//! `type` and description.

use rmcp::model::{JsonObject, Tool};
use serde_json::{Value, json};
use std::sync::Arc;

pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: fn() -> Value,
}

impl ToolSpec {
    pub fn to_tool(&self) -> Tool {
        let schema = match (self.input_schema)() {
            Value::Object(map) => map,
            _ => JsonObject::new(),
        };
        Tool::new(self.name, self.description, Arc::new(schema))
    }
}

const QUALITY_DESCRIPTION: &str =
    "Audio quality: Low, High, HiFi, Lossless, HiRes or Master (default: HiFi)";

pub const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "search_tidal",
        description: "Search TIDAL for tracks, albums, artists, playlists or videos. Also accepts a TIDAL URL.",
        input_schema: search_schema,
    },
    ToolSpec {
        name: "get_track_details",
        description: "Get detailed information about a track",
        input_schema: track_id_schema,
    },
    ToolSpec {
        name: "get_album_details",
        description: "Get detailed information about an album, including its tracklist",
        input_schema: album_id_schema,
    },
    ToolSpec {
        name: "get_artist_details",
        description: "Get artist biography, discography counts and top tracks",
        input_schema: artist_details_schema,
    },
    ToolSpec {
        name: "get_artist_albums",
        description: "List an artist's albums, EPs and singles, or other releases",
        input_schema: artist_albums_schema,
    },
    ToolSpec {
        name: "get_playlist_details",
        description: "Get detailed information about a playlist",
        input_schema: playlist_id_schema,
    },
    ToolSpec {
        name: "get_my_playlists",
        description: "List your own TIDAL playlists",
        input_schema: page_schema,
    },
    ToolSpec {
        name: "get_playlist_items",
        description: "Get the tracks and videos in a playlist, one page at a time",
        input_schema: playlist_items_schema,
    },
    ToolSpec {
        name: "get_favorites",
        description: "Get your favorite tracks, albums, artists, playlists or videos",
        input_schema: favorites_schema,
    },
    ToolSpec {
        name: "get_favorites_summary",
        description: "Count your favorites by type",
        input_schema: empty_schema,
    },
    ToolSpec {
        name: "get_track_lyrics",
        description: "Get lyrics for a track (synced or static)",
        input_schema: track_id_schema,
    },
    ToolSpec {
        name: "get_similar_artists",
        description: "Get artists similar to a given artist",
        input_schema: similar_artists_schema,
    },
    ToolSpec {
        name: "get_artist_radio",
        description: "Get a mix of tracks inspired by an artist",
        input_schema: artist_radio_schema,
    },
    ToolSpec {
        name: "get_user_profile",
        description: "Get the profile of the logged in TIDAL user",
        input_schema: empty_schema,
    },
    ToolSpec {
        name: "get_subscription_info",
        description: "Get subscription tier and audio quality limits",
        input_schema: empty_schema,
    },
    ToolSpec {
        name: "get_download_settings",
        description: "Get current download quality, location and quality options",
        input_schema: empty_schema,
    },
    ToolSpec {
        name: "download_track",
        description: "Download a track from TIDAL",
        input_schema: download_track_schema,
    },
    ToolSpec {
        name: "download_album",
        description: "Download every track of an album from TIDAL",
        input_schema: download_album_schema,
    },
    ToolSpec {
        name: "download_playlist",
        description: "Download every item of a playlist from TIDAL",
        input_schema: download_playlist_schema,
    },
];

pub fn find(name: &str) -> Option<&'static ToolSpec> {
    TOOLS.iter().find(|tool| tool.name == name)
}

/// Everything `tools/list` returns
pub fn tools() -> Vec<Tool> {
    TOOLS.iter().map(ToolSpec::to_tool).collect()
}

fn empty_schema() -> Value {
    json!({
        "type": "object",
        "properties": {}
    })
}

fn id_schema(field: &str, description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            field: {
                "type": "string",
                "description": description
            }
        },
        "required": [field]
    })
}

fn track_id_schema() -> Value {
    id_schema("track_id", "TIDAL track ID")
}

fn album_id_schema() -> Value {
    id_schema("album_id", "TIDAL album ID")
}

fn playlist_id_schema() -> Value {
    id_schema("playlist_id", "TIDAL playlist UUID")
}

fn limit_property(default: u32) -> Value {
    json!({
        "type": "integer",
        "minimum": 1,
        "description": format!("Maximum number of results (default: {default})")
    })
}

fn offset_property() -> Value {
    json!({
        "type": "integer",
        "minimum": 0,
        "description": "Pagination offset (default: 0)"
    })
}

fn page_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "limit": limit_property(50),
            "offset": offset_property()
        }
    })
}

fn playlist_items_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "playlist_id": {
                "type": "string",
                "description": "TIDAL playlist UUID"
            },
            "limit": limit_property(50),
            "offset": offset_property()
        },
        "required": ["playlist_id"]
    })
}

fn favorites_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "media_type": {
                "type": "string",
                "enum": ["track", "album", "artist", "playlist", "video"],
                "description": "Type of favorites to list"
            },
            "limit": limit_property(50),
            "offset": offset_property()
        },
        "required": ["media_type"]
    })
}

fn artist_limit_schema(default_limit: u32) -> Value {
    json!({
        "type": "object",
        "properties": {
            "artist_id": {
                "type": "string",
                "description": "TIDAL artist ID"
            },
            "limit": limit_property(default_limit)
        },
        "required": ["artist_id"]
    })
}

fn similar_artists_schema() -> Value {
    artist_limit_schema(10)
}

fn artist_radio_schema() -> Value {
    artist_limit_schema(50)
}

fn search_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "Search query or TIDAL URL"
            },
            "media_type": {
                "type": ["string", "null"],
                "enum": ["track", "album", "artist", "playlist", "video", null],
                "description": "Restrict results to one media type"
            }
        },
        "required": ["query"]
    })
}

fn artist_details_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "artist_id": {
                "type": "string",
                "description": "TIDAL artist ID"
            },
            "include_top_tracks": {
                "type": "boolean",
                "description": "Include the artist's top tracks (default: true)"
            }
        },
        "required": ["artist_id"]
    })
}

fn artist_albums_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "artist_id": {
                "type": "string",
                "description": "TIDAL artist ID"
            },
            "album_type": {
                "type": "string",
                "enum": ["all", "albums", "eps_singles", "other"],
                "description": "Kind of releases to list (default: all)"
            },
            "limit": {
                "type": "integer",
                "minimum": 1,
                "description": "Maximum number of releases (default: 50)"
            }
        },
        "required": ["artist_id"]
    })
}

fn download_properties(id_field: &str, id_description: &str) -> serde_json::Map<String, Value> {
    let mut properties = serde_json::Map::new();
    properties.insert(
        id_field.to_string(),
        json!({ "type": "string", "description": id_description }),
    );
    properties.insert(
        "quality".to_string(),
        json!({ "type": "string", "description": QUALITY_DESCRIPTION }),
    );
    properties.insert(
        "output_path".to_string(),
        json!({
            "type": ["string", "null"],
            "description": "Base directory for the download (default: ~/Music/TIDAL)"
        }),
    );
    properties
}

fn download_track_schema() -> Value {
    json!({
        "type": "object",
        "properties": download_properties("track_id", "TIDAL track ID"),
        "required": ["track_id"]
    })
}

fn download_album_schema() -> Value {
    json!({
        "type": "object",
        "properties": download_properties("album_id", "TIDAL album ID"),
        "required": ["album_id"]
    })
}

fn download_playlist_schema() -> Value {
    let mut properties = download_properties("playlist_id", "TIDAL playlist UUID");
    properties.insert(
        "include_videos".to_string(),
        json!({
            "type": "boolean",
            "description": "Also download music videos (default: false)"
        }),
    );

    json!({
        "type": "object",
        "properties": properties,
        "required": ["playlist_id"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tool_names_are_unique() {
        let names: HashSet<_> = TOOLS.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), TOOLS.len());
    }

    #[test]
    fn test_every_schema_is_an_object() {
        for tool in TOOLS {
            let schema = (tool.input_schema)();
            assert_eq!(schema["type"], "object", "{}", tool.name);
            assert!(schema["properties"].is_object(), "{}", tool.name);
        }
    }

    #[test]
    fn test_download_schemas() {
        let schema = find("download_playlist").map(|t| (t.input_schema)()).unwrap();
        assert_eq!(schema["required"][0], "playlist_id");
        assert_eq!(schema["properties"]["include_videos"]["type"], "boolean");
        assert!(schema["properties"]["quality"].is_object());
    }

    #[test]
    fn test_paged_schemas() {
        let schema = find("get_favorites").map(|t| (t.input_schema)()).unwrap();
        assert_eq!(schema["required"][0], "media_type");
        assert_eq!(schema["properties"]["media_type"]["enum"].as_array().unwrap().len(), 5);

        let schema = find("get_similar_artists").map(|t| (t.input_schema)()).unwrap();
        assert_eq!(
            schema["properties"]["limit"]["description"],
            "Maximum number of results (default: 10)"
        );
        assert!(find("get_my_playlists").map(|t| (t.input_schema)()).unwrap()["required"].is_null());
    }

    #[test]
    fn test_tools_carry_schemas() {
        let tools = tools();
        assert_eq!(tools.len(), 19);
        assert_eq!(tools[0].name, "search_tidal");
        assert_eq!(tools[0].input_schema["required"][0], "query");
        assert!(find("get_mixes").is_none());
    }
}
