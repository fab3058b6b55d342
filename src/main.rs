mod config;
mod database;
mod entities;
mod error;
mod http_server;
mod logging;
mod services;
#[cfg(test)]
mod test_utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{
    config::Config, database::Database, http_server::app::HttpServerConfig,
    logging::setup_logging,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "PLAYLIST_MANAGER_CONFIG")]
    config: Option<PathBuf>,

    /// Console log level (default: info)
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// File log level (default: debug)
    #[arg(long, default_value = "debug", global = true)]
    log_file_level: log::LevelFilter,

    /// Path to log file
    #[arg(long, env = "PLAYLIST_MANAGER_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the catalog HTTP API
    Serve {
        /// The port to run the server on
        #[arg(short, long, default_value = "3000", env = "PLAYLIST_MANAGER_HTTP_PORT")]
        port: u16,
    },
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_logging(args.log_level, args.log_file.clone(), args.log_file_level)?;

    log::debug!("Playlist manager starting");

    match args.command {
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                log::debug!("Creating default config");
                let path = Config::create_default()?;
                println!("{}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
        Commands::Serve { port } => {
            log::debug!("Loading configuration");
            let config = {
                if let Some(config) = args.config {
                    Config::from_file(&config)
                } else {
                    Config::load()
                }
            }
            .with_context(|| "Failed to load playlist-manager config")?;

            let database = Database::open(&config.database_path()).await?;

            log::info!("Starting HTTP server on port: {}", port);
            http_server::app::start(HttpServerConfig { port, database }).await?;
        }
    }

    Ok(())
}
