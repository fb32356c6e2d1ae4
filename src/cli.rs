use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tidal-mcp")]
#[command(about = "MCP server exposing TIDAL search, metadata and downloads as tools")]
#[command(long_about = "
tidal-mcp speaks the Model Context Protocol over stdio and exposes TIDAL catalog
lookups and tidal-dl-ng downloads as tools. Log in once with `tidal-dl-ng login`;
the saved token is picked up automatically.

Examples:
  tidal-mcp                          # Serve MCP on stdin/stdout
  tidal-mcp tools                    # List available tools
  tidal-mcp call search_tidal --args '{\"query\": \"Daft Punk\"}'
  tidal-mcp config show              # Print the active configuration
")]
#[command(version)]
pub struct Cli {
    /// Override config file path
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<String>,

    /// Enable debug logging (written to stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve MCP over stdin/stdout
    Serve,

    /// List the tools this server provides
    Tools,

    /// Run a single tool and print its output
    Call {
        /// Tool name (e.g., search_tidal, download_track)
        tool: String,

        #[arg(short, long, value_name = "JSON", default_value = "{}")]
        #[arg(help = "Tool arguments as a JSON object")]
        args: String,
    },

    /// Manage configuration
    #[command(visible_alias = "cfg")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Write a sample configuration next to the active one
    Sample,

    /// Validate configuration
    #[command(visible_alias = "check")]
    Validate,
}

impl Cli {
    /// Validate CLI arguments and show helpful error messages
    pub fn validate(&self) -> Result<(), String> {
        if let Some(Commands::Call { tool, args }) = &self.command {
            if tool.trim().is_empty() {
                return Err("Tool name cannot be empty".to_string());
            }
            match serde_json::from_str::<serde_json::Value>(args) {
                Ok(value) if value.is_object() => {}
                Ok(_) => return Err("--args must be a JSON object".to_string()),
                Err(e) => return Err(format!("--args is not valid JSON: {e}")),
            }
        }
        Ok(())
    }

    /// Whether stdout is reserved for protocol frames
    pub fn is_serving(&self) -> bool {
        matches!(self.command, None | Some(Commands::Serve))
    }
}
