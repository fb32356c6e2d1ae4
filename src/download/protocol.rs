//! Wire format between the embedded download helper and [`super::bridge`].
//!
//! Each stdout line of the helper is one JSON object with a `status` field:
//!
//! ```json
//! {"status": "log", "message": "Downloaded item 'Song A'."}
//! {"status": "complete", "path": "/music/Tracks/Artist - Song A.flac"}
//! {"status": "unavailable", "reason": "track not streamable"}
//! {"status": "error", "message": "network error"}
//! ```

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("unknown status: {0}")]
    UnknownStatus(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelperEvent {
    /// A progress line from the download library's logger
    Log { message: String },
    Complete { path: Option<PathBuf> },
    Unavailable { reason: Option<String> },
    Error { message: String },
}

#[derive(Deserialize)]
struct RawEnvelope {
    status: String,
    message: Option<String>,
    path: Option<String>,
    reason: Option<String>,
}

pub fn parse_line(line: &str) -> Result<HelperEvent, ProtocolError> {
    let envelope: RawEnvelope = serde_json::from_str(line)?;

    match envelope.status.as_str() {
        "log" => Ok(HelperEvent::Log {
            message: envelope.message.ok_or(ProtocolError::MissingField("message"))?,
        }),
        "complete" => Ok(HelperEvent::Complete {
            path: envelope.path.filter(|p| !p.is_empty()).map(PathBuf::from),
        }),
        "unavailable" => Ok(HelperEvent::Unavailable {
            reason: envelope.reason,
        }),
        "error" => Ok(HelperEvent::Error {
            message: envelope
                .message
                .unwrap_or_else(|| "download helper reported an error".to_string()),
        }),
        other => Err(ProtocolError::UnknownStatus(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log() {
        let event = parse_line(r#"{"status": "log", "message": "Downloaded item 'A'"}"#).unwrap();
        assert_eq!(
            event,
            HelperEvent::Log {
                message: "Downloaded item 'A'".to_string()
            }
        );
    }

    #[test]
    fn test_parse_complete_without_path() {
        let event = parse_line(r#"{"status": "complete", "path": ""}"#).unwrap();
        assert_eq!(event, HelperEvent::Complete { path: None });
    }

    #[test]
    fn test_log_requires_message() {
        assert!(matches!(
            parse_line(r#"{"status": "log"}"#),
            Err(ProtocolError::MissingField("message"))
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            parse_line("Traceback (most recent call last):"),
            Err(ProtocolError::InvalidJson(_))
        ));
        assert!(matches!(
            parse_line(r#"{"status": "paused"}"#),
            Err(ProtocolError::UnknownStatus(_))
        ));
    }
}
