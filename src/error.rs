use thiserror::Error;

use crate::tidal::SessionError;

/// Errors raised while dispatching a tool call.
///
/// Failures inside a tool body never show up here; tools report those as
/// text.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error(
        "✗ Not authenticated with TIDAL. Run `tidal-dl-ng login` first to authenticate. ({0})"
    )]
    AuthenticationRequired(String),

    #[error("✗ Failed to connect to TIDAL: {0}")]
    SessionUnavailable(SessionError),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

impl ToolError {
    /// Whether this error is reported to the client as a tool result rather
    /// than a protocol error
    pub fn is_tool_result(&self) -> bool {
        matches!(
            self,
            ToolError::AuthenticationRequired(_) | ToolError::SessionUnavailable(_)
        )
    }
}

impl From<SessionError> for ToolError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::NotAuthenticated(reason) => ToolError::AuthenticationRequired(reason),
            other => ToolError::SessionUnavailable(other),
        }
    }
}

pub type ToolResult<T> = std::result::Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_authenticated_maps_to_auth_required() {
        let error = ToolError::from(SessionError::NotAuthenticated("no token".into()));
        assert!(matches!(error, ToolError::AuthenticationRequired(_)));
        assert!(error.is_tool_result());
        assert!(error.to_string().starts_with("✗ Not authenticated with TIDAL"));
        assert!(error.to_string().contains("tidal-dl-ng login"));
    }

    #[test]
    fn test_argument_errors_are_protocol_errors() {
        assert!(!ToolError::UnknownTool("nope".into()).is_tool_result());
        assert!(!ToolError::InvalidArguments("missing".into()).is_tool_result());
    }
}
