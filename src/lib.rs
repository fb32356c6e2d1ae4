pub mod config;
pub mod download;
pub mod error;
pub mod handlers;
pub mod server;
pub mod tidal;

// Re-export commonly used types for easier access in tests
pub use config::{Config, ConfigManager};
pub use download::{
    AudioQuality, DownloadManager, DownloadRequest, Downloader, ProgressCollector, ProgressSink,
};
pub use error::ToolError;
pub use handlers::ToolContext;
pub use tidal::{Session, SessionError, SessionProvider};
