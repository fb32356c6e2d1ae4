//! MCP server: tool registry, dispatch and resources behind an rmcp handler.

pub mod dispatch;
pub mod handler;
pub mod registry;
pub mod resources;
pub mod stdio;

pub use dispatch::call_tool;
pub use handler::TidalServer;

pub const SERVER_NAME: &str = "tidal-mcp";
