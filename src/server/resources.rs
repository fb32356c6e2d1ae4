//! Read-only views of the logged in account, exposed as MCP resources.

use rmcp::model::{AnnotateAble, RawResource, Resource};
use thiserror::Error;
use tracing::debug;

use crate::error::ToolError;
use crate::handlers::{self, ToolContext};
use crate::tidal::SessionError;

pub const AUTH_STATUS: &str = "tidal://auth/status";
pub const USER_PROFILE: &str = "tidal://user/profile";
pub const USER_PLAYLISTS: &str = "tidal://user/playlists";
pub const USER_FAVORITES: &str = "tidal://user/favorites";

/// The playlists resource lists more than the tool does by default
const PLAYLIST_RESOURCE_LIMIT: u32 = 100;

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Unknown resource: {0}")]
    NotFound(String),
}

pub fn list_resources() -> Vec<Resource> {
    vec![
        text_resource(
            AUTH_STATUS,
            "Authentication Status",
            "Check TIDAL authentication status and get setup instructions",
        ),
        text_resource(
            USER_PROFILE,
            "User Profile",
            "View your TIDAL user profile and subscription information",
        ),
        text_resource(USER_PLAYLISTS, "My Playlists", "View all your TIDAL playlists"),
        text_resource(
            USER_FAVORITES,
            "Favorites Summary",
            "Summary of your TIDAL favorites (tracks, albums, artists, playlists)",
        ),
    ]
}

fn text_resource(uri: &str, name: &str, description: &str) -> Resource {
    RawResource {
        uri: uri.into(),
        name: name.into(),
        title: Some(name.into()),
        description: Some(description.into()),
        mime_type: Some("text/plain".into()),
        size: None,
        icons: None,
        meta: None,
    }
    .no_annotation()
}

/// Read a resource by URI.
///
/// Account resources need a session; without one they carry the same
/// message a tool call would.
pub async fn read(ctx: &ToolContext, uri: &str) -> Result<String, ResourceError> {
    debug!(uri = %uri, "Reading resource");

    if uri == AUTH_STATUS {
        return Ok(auth_status(ctx).await);
    }
    if ![USER_PROFILE, USER_PLAYLISTS, USER_FAVORITES].contains(&uri) {
        return Err(ResourceError::NotFound(uri.to_string()));
    }

    let session = match ctx.sessions.session().await {
        Ok(session) => session,
        Err(e) => return Ok(ToolError::from(e).to_string()),
    };

    let text = match uri {
        USER_PROFILE => format!(
            "{}\n\n{}\n\n{}",
            handlers::handle_user_profile(&session).await,
            "=".repeat(50),
            handlers::handle_subscription_info(&session)
        ),
        USER_PLAYLISTS => {
            handlers::handle_my_playlists(&session, PLAYLIST_RESOURCE_LIMIT, 0).await
        }
        _ => handlers::handle_favorites_summary(&session).await,
    };

    Ok(text)
}

async fn auth_status(ctx: &ToolContext) -> String {
    match ctx.sessions.session().await {
        Ok(session) => format!(
            "✓ Authenticated with TIDAL\n\n\
             User ID: {}\n\
             Session: Active\n\n\
             You can now use the search_tidal tool to search for music on TIDAL!\n",
            session.user_id
        ),
        Err(SessionError::NotAuthenticated(reason)) => format!(
            "✗ Not authenticated with TIDAL ({reason})\n\n\
             To authenticate, run the following command in your terminal:\n\n    \
             tidal-dl-ng login\n\n\
             This will guide you through the TIDAL login process. \
             The next request picks up the new login.\n"
        ),
        Err(e) => format!("✗ Failed to connect to TIDAL: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resources_are_plain_text() {
        let resources = list_resources();
        let uris: Vec<&str> = resources.iter().map(|r| r.uri.as_str()).collect();
        assert_eq!(uris, [AUTH_STATUS, USER_PROFILE, USER_PLAYLISTS, USER_FAVORITES]);
        assert!(resources
            .iter()
            .all(|r| r.mime_type.as_deref() == Some("text/plain")));
    }
}
