mod config;
mod database;
mod entities;
mod http_server;
mod logging;
mod seed;
mod services;
#[cfg(test)]
mod test_utils;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{config::Config, database::Database, logging::setup_logging};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "FYYUR_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Console log level (default: info)
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// File log level (default: debug)
    #[arg(long, default_value = "debug", global = true)]
    log_file_level: log::LevelFilter,

    /// Path to log file
    #[arg(long, env = "FYYUR_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the Fyyur site over HTTP
    Serve {
        /// The port to run the server on (default: config `port`, else 5000)
        #[arg(short, long, env = "FYYUR_HTTP_PORT")]
        port: Option<u16>,
    },
    /// Load the sample venues, artists and shows into an empty database
    Seed,
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

    log::debug!("Fyyur starting");

    if let Commands::Config(command) = &args.command {
        match command {
            ConfigCommands::CreateDefault => {
                let path = Config::create_default()?;
                println!("{}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No config directory available on this platform"),
            },
        }
        return Ok(());
    }

    log::debug!("Loading configuration");
    let config = {
        if let Some(config) = &args.config {
            Config::from_file(config)
        } else {
            Config::load()
        }
    }
    .with_context(|| "Failed to load fyyur config")?;

    log::debug!("Opening database at: {}", config.database_path().display());
    let database = Database::open(&config.database_path()).await?;

    match args.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or_else(|| config.port());
            log::info!("Starting HTTP server on port {}", port);
            http_server::app::start(port, database).await?;
        }
        Commands::Seed => match seed::seed(Arc::new(database)).await? {
            Some(summary) => println!(
                "Seeded {} venues, {} artists and {} shows",
                summary.venues, summary.artists, summary.shows
            ),
            None => println!("Database already contains venues, nothing seeded"),
        },
        Commands::Config(_) => {}
    }

    Ok(())
}
