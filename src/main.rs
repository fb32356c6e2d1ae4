mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ConfigAction};
use std::path::PathBuf;
use std::process;
use tidal_mcp::handlers::ToolContext;
use tidal_mcp::server::{self, registry};
use tidal_mcp::ConfigManager;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Validate CLI arguments first
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    // Logs always go to stderr: stdout is the MCP channel when serving
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tidal_mcp={default_level},warn")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!args.is_serving())
        .init();

    let config_manager = match &args.config {
        Some(path) => ConfigManager::from_path(PathBuf::from(path))?,
        None => ConfigManager::new()?,
    };

    let is_config_command = matches!(args.command, Some(Commands::Config { .. }));
    if !is_config_command {
        if let Err(e) = config_manager.validate() {
            eprintln!("Configuration validation failed: {}", e);
            eprintln!("Run 'tidal-mcp config validate' after fixing {:?}", config_manager.config_file());
            process::exit(1);
        }
    }

    match args.command {
        None | Some(Commands::Serve) => {
            let ctx = ToolContext::from_config(config_manager.config());
            server::stdio::run(ctx).await?;
        }
        Some(Commands::Tools) => {
            for tool in registry::TOOLS {
                println!("{:<24} {}", tool.name, tool.description);
            }
        }
        Some(Commands::Call { tool, args }) => {
            let arguments: serde_json::Value =
                serde_json::from_str(&args).context("Failed to parse --args")?;
            let ctx = ToolContext::from_config(config_manager.config());

            match server::call_tool(&ctx, &tool, arguments).await {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    eprintln!("{}", e);
                    process::exit(1);
                }
            }
        }
        Some(Commands::Config { action }) => handle_config(&config_manager, action)?,
    }

    Ok(())
}

fn handle_config(config_manager: &ConfigManager, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let content = toml::to_string_pretty(config_manager.config())
                .context("Failed to serialize config")?;
            println!("⚙️  Current configuration ({:?}):\n", config_manager.config_file());
            println!("{}", content);
        }
        ConfigAction::Path => {
            println!("{}", config_manager.config_file().display());
        }
        ConfigAction::Sample => {
            let sample = config_manager.create_sample_config()?;
            println!("✅ Sample configuration written to {}", sample.display());
        }
        ConfigAction::Validate => match config_manager.validate() {
            Ok(()) => println!("✅ Configuration is valid"),
            Err(e) => {
                eprintln!("❌ Configuration validation failed: {}", e);
                process::exit(1);
            }
        },
    }

    Ok(())
}
