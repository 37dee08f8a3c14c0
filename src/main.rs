use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use surfmap::api::{self, AppState};
use surfmap::config::SurfConfig;
use surfmap::feed::{refresh_all, spawn_refresh_loop, MapFeed};
use surfmap::merge_feature_collections;
use surfmap::models::FeatureCollection;
use surfmap::source::{read_collection_file, SourceClient};

#[derive(Parser)]
#[command(name = "surfmap")]
#[command(about = "Merged buoy and surf spot GeoJSON for the map")]
struct Cli {
    /// Path to config.json (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the map feed server
    Serve {
        /// Port for HTTP API
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Fetch both sources once and print the merged collection
    Fetch {
        #[arg(long)]
        pretty: bool,
    },
    /// Merge two local GeoJSON files and print the result
    Merge {
        /// Buoy FeatureCollection file
        buoys: PathBuf,
        /// Spot FeatureCollection file
        spots: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
}

/// Initialize tracing with output to stderr (for fetch/merge) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "surfmap=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // fetch/merge print JSON on stdout
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn print_collection(collection: &FeatureCollection, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(collection)?
    } else {
        serde_json::to_string(collection)?
    };
    println!("{}", json);
    Ok(())
}

async fn serve(config: SurfConfig) -> anyhow::Result<()> {
    let client = SourceClient::new(config.endpoints(), config.request_timeout())?;
    let feed = MapFeed::new();

    refresh_all(&client, &feed).await;
    let refresher = spawn_refresh_loop(client.clone(), feed.clone(), config.refresh_interval());

    let app = api::create_router(AppState::new(feed, client, config.featured_spots.clone()));

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", config.port)).await?;
    tracing::info!("surfmap listening on http://127.0.0.1:{}", config.port);

    let result = axum::serve(listener, app).await;
    refresher.abort();
    result?;
    Ok(())
}

async fn fetch(config: SurfConfig, pretty: bool) -> anyhow::Result<()> {
    let client = SourceClient::new(config.endpoints(), config.request_timeout())?;
    let feed = MapFeed::new();
    refresh_all(&client, &feed).await;

    let merged = feed
        .merged()
        .context("No merged collection: a source failed or returned no feature collection")?;
    print_collection(&merged, pretty)
}

fn merge(buoys: &Path, spots: &Path, pretty: bool) -> anyhow::Result<()> {
    let buoys = read_collection_file(buoys)?;
    let spots = read_collection_file(spots)?;

    let merged = merge_feature_collections(buoys.as_ref(), spots.as_ref())
        .context("No merged collection: both files must hold a FeatureCollection")?;
    print_collection(&merged, pretty)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = matches!(
        cli.command,
        Some(Commands::Fetch { .. } | Commands::Merge { .. })
    );
    init_tracing(use_stderr);

    match cli.command {
        Some(Commands::Serve { port }) => {
            let mut config = SurfConfig::load(cli.config.as_deref())?;
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await?;
        }
        Some(Commands::Fetch { pretty }) => {
            let config = SurfConfig::load(cli.config.as_deref())?;
            fetch(config, pretty).await?;
        }
        Some(Commands::Merge {
            buoys,
            spots,
            pretty,
        }) => {
            merge(&buoys, &spots, pretty)?;
        }
        None => {
            let config = SurfConfig::load(cli.config.as_deref())?;
            serve(config).await?;
        }
    }

    Ok(())
}
