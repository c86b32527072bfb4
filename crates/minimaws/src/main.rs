//! `minimaws` entry point.
//!
//! Browses a machine-info database built from the emulator's machine list.
//! The `serve` command runs the read-only HTML front-end; the `list*`
//! commands print plain-text listings for a glob pattern.
//!
//! Logs go to stderr so listings can be piped.

mod config;
mod error;
mod listing;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use minimaws_db::DatabasePool;
use minimaws_web::{AppState, AssetResolver, DEFAULT_ASSETS_DIR, MimeRegistry, WebError};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::MinimawsConfig;
use crate::error::AppError;
use crate::listing::Listing;

#[derive(Debug, Parser)]
#[command(name = "minimaws", version)]
#[command(about = "Browse a machine-info database", long_about = None)]
struct Cli {
    /// Configuration file (default: minimaws.yaml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Machine database file
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTML front-end
    Serve(ServeArgs),
    /// List short names and descriptions
    Listfull(PatternArgs),
    /// List short names and source files
    Listsource(PatternArgs),
    /// List clones and their parents
    Listclones(PatternArgs),
    /// List machines sharing a source file with a match
    Listbrothers(PatternArgs),
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Base URI for generated links
    #[arg(long)]
    public_uri: Option<String>,

    /// Directory served under /static
    #[arg(long)]
    assets: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct PatternArgs {
    /// Glob pattern matched against short names
    #[arg(default_value = "*")]
    pattern: String,
}

/// Application entry point.
///
/// Initializes logging, loads configuration, then runs the requested
/// command. Listings exit with status 1 when nothing matched.
///
/// # Errors
///
/// Returns an error if configuration, the database, or the server fails.
#[tokio::main]
async fn main() -> Result<ExitCode, AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = MinimawsConfig::load(cli.config.as_deref())?;
    if let Some(database) = cli.database {
        config.database.path = database;
    }

    match cli.command {
        Command::Serve(args) => {
            apply_serve_args(&mut config, args);
            serve(&config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Listfull(args) => list(&config, Listing::Full, &args.pattern).await,
        Command::Listsource(args) => list(&config, Listing::Source, &args.pattern).await,
        Command::Listclones(args) => list(&config, Listing::Clones, &args.pattern).await,
        Command::Listbrothers(args) => list(&config, Listing::Brothers, &args.pattern).await,
    }
}

fn apply_serve_args(config: &mut MinimawsConfig, args: ServeArgs) {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(public_uri) = args.public_uri {
        config.server.public_uri = Some(public_uri);
    }
    if let Some(assets) = args.assets {
        config.assets.directory = Some(assets);
    }
}

async fn serve(config: &MinimawsConfig) -> Result<(), AppError> {
    let db = DatabasePool::connect(&config.database.database_config()).await?;

    let mime = Arc::new(MimeRegistry::load(config.assets.mime_types.as_deref()));
    let assets_dir = config
        .assets
        .directory
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR));
    info!(assets = %assets_dir.display(), "Serving static assets");
    let assets = AssetResolver::new(assets_dir, mime);

    let mut state = AppState::new(db.clone(), assets).map_err(WebError::from)?;
    if let Some(public_uri) = &config.server.public_uri {
        state = state.with_public_uri(public_uri.as_str());
    }

    let result = minimaws_web::start_server(&config.server.server_config(), Arc::new(state)).await;
    db.close().await;
    Ok(result?)
}

async fn list(config: &MinimawsConfig, listing: Listing, pattern: &str) -> Result<ExitCode, AppError> {
    let db = DatabasePool::connect(&config.database.database_config()).await?;

    let mut buf = Vec::new();
    let found = listing.run(&db, pattern, &mut buf).await?;
    db.close().await;

    let mut out = std::io::stdout().lock();
    out.write_all(&buf)?;
    out.flush()?;

    if found {
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{}", listing.no_match_message(pattern));
        Ok(ExitCode::FAILURE)
    }
}
