//! Race results CLI
//!
//! Runs the HTTP endpoint, or fetches a single race from the command line.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use race_results::{
    error::Result,
    models::{Config, RaceQuery},
    pipeline,
    server::{self, AppState},
    services::{DocumentFetcher, HttpFetcher, RaceExtractor},
};

/// race-results - Grand Prix results from Wikipedia race reports
#[derive(Parser, Debug)]
#[command(
    name = "race-results",
    version,
    about = "Grand Prix finishing positions and retirements from Wikipedia"
)]

struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the race results endpoint
    Serve {
        /// Address to listen on (overrides server.bind_addr)
        #[arg(long)]
        bind: Option<String>,

        /// Include extraction diagnostics in responses
        #[arg(long)]
        debug: bool,
    },

    /// Fetch one race and print its results as JSON
    Fetch {
        /// Season year
        #[arg(long)]
        year: u32,

        /// Race name as in the page title, e.g. "Miami"
        #[arg(long)]
        race: String,

        /// Parse a saved page instead of downloading it
        #[arg(long)]
        file: Option<PathBuf>,

        /// Include extraction diagnostics
        #[arg(long)]
        debug: bool,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load(&cli.config);
    let level = loaded
        .as_ref()
        .map_or_else(|_| "info".to_string(), |c| c.logging.level.clone());
    init_logging(cli.verbose, &level);

    let mut config = loaded.unwrap_or_else(|e| {
        log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        );
        Config::default()
    });

    match cli.command {
        Command::Serve { bind, debug } => {
            if let Some(bind) = bind {
                config.server.bind_addr = bind;
            }
            config.server.debug |= debug;
            config.validate()?;

            let state = AppState::from_config(&config)?;
            server::serve(&config.server.bind_addr, state).await?;
        }

        Command::Fetch {
            year,
            race,
            file,
            debug,
        } => {
            let query = RaceQuery::new(year, race);
            let extractor = RaceExtractor::new(&config.extractor)?;
            let fetcher = HttpFetcher::new(&config.fetcher)?;

            let extraction = match file {
                Some(path) => {
                    let url = fetcher.source_url(&query);
                    pipeline::run_file(&extractor, &path, &url).await?
                }
                None => pipeline::run_query(&fetcher, &extractor, &query).await?,
            };

            let response = server::RaceResultsResponse {
                result: extraction.result,
                debug: (debug || config.server.debug).then_some(extraction.diagnostics),
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Command::Validate => pipeline::run_validate(&config)?,
    }

    Ok(())
}
