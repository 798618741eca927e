use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::eyre;
use commands::films::FilmQuery;
use commands::{clear, config, films, stats, sync, Workspace};
use film_sync_config::PathManager;
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "reelrecall")]
#[command(about = "ReelRecall - Keep a local copy of your Letterboxd watch history")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Database file (overrides the configured location)
    #[arg(long = "db", global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a profile's watched films into the local database
    #[command(long_about = "Walk every page of the profile's films listing, then fetch the detail page of each film not yet stored. Films already in the database are skipped, so reruns only fetch what is new.")]
    Sync {
        /// Letterboxd username (defaults to the configured one)
        username: Option<String>,
    },
    /// List every stored film, most recently added first
    List,
    /// Search stored films by title
    Search {
        /// Case-insensitive title fragment
        query: String,
    },
    /// List films rated at least MIN stars
    Rated {
        /// Minimum rating, 0 to 5 in half-star steps
        min: f64,
    },
    /// List films released in YEAR
    Year {
        year: u32,
    },
    /// Show collection statistics
    Stats,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Clear stored data
    Clear {
        /// Delete every stored film
        #[arg(long, action = ArgAction::SetTrue)]
        database: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Set the default Letterboxd username
    SetUsername {
        username: String,
    },
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing configuration file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let workspace = Workspace::load(PathManager::default(), cli.db.clone())?;

    logging::init_logging(cli.verbose, cli.quiet, workspace.config.logging.file.as_deref())
        .map_err(|e| eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Sync { username } => sync::run_sync(username, &workspace, &output).await,
        Commands::List => films::run_films(FilmQuery::All, &workspace, &output),
        Commands::Search { query } => films::run_films(FilmQuery::Title(query), &workspace, &output),
        Commands::Rated { min } => films::run_films(FilmQuery::MinRating(min), &workspace, &output),
        Commands::Year { year } => films::run_films(FilmQuery::Year(year), &workspace, &output),
        Commands::Stats => stats::run_stats(&workspace, &output),
        Commands::Config { cmd } => config::run_config(cmd, &workspace, &output),
        Commands::Clear { database } => clear::run_clear(database, &workspace, &output),
    }
}
