//! Command-line interface for fetching Overture Maps data.
//!
//! This binary is a thin façade over [`overture_core`]: it parses arguments,
//! configures logging, and delegates to the client. The core contract has no
//! CLI of its own; this surface exists for quick inspection of releases.
//!
//! # Available Commands
//!
//! - `types` - List the feature types in the Overture catalog
//! - `fetch` - Fetch features intersecting a bounding box and print a summary

mod display;

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_log::LogTracer;
use tracing_subscriber::FmtSubscriber;

use overture_core::catalog::feature_types;
use overture_core::store::DEFAULT_RELEASE;
use overture_core::{BoundingBox, ConnectOptions, OvertureClient};

#[derive(Parser)]
#[command(
    name = "overture",
    version,
    about = "Fetch Overture Maps vector data by bounding box",
    long_about = "Fetches GeoParquet feature data from the public Overture Maps release \
                  bucket, scoped to a bounding box, and reports on the resulting \
                  spatially enabled table."
)]
struct Cli {
    /// Enable verbose (INFO level) logging output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug (DEBUG level) logging output with detailed diagnostics.
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the Overture CLI.
#[derive(Subcommand)]
enum Commands {
    /// Lists the feature types available in the Overture catalog.
    Types,

    /// Fetches features of one type intersecting a bounding box.
    Fetch {
        /// Overture feature type to retrieve (e.g. "segment").
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        overture_type: String,

        /// Bounding box as "minx,miny,maxx,maxy" in geographic coordinates.
        #[arg(short, long, value_name = "BBOX")]
        bbox: String,

        /// Release to read from.
        #[arg(long, value_name = "RELEASE", default_value = DEFAULT_RELEASE)]
        release: String,

        /// Timeout in seconds for establishing a connection.
        #[arg(long, value_name = "SECONDS")]
        connect_timeout: Option<u64>,

        /// Timeout in seconds for a complete request.
        #[arg(long, value_name = "SECONDS")]
        request_timeout: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity flags
    let log_level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    // Bridge logs from the `log` crate to the `tracing` ecosystem.
    LogTracer::init()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Types => handle_types(),
        Commands::Fetch {
            overture_type,
            bbox,
            release,
            connect_timeout,
            request_timeout,
        } => {
            handle_fetch(
                &overture_type,
                &bbox,
                &release,
                connect_timeout,
                request_timeout,
            )
            .await?;
        },
    }

    Ok(())
}

fn handle_types() {
    println!("{}", display::render_feature_types(feature_types()));
}

async fn handle_fetch(
    overture_type: &str,
    bbox: &str,
    release: &str,
    connect_timeout: Option<u64>,
    request_timeout: Option<u64>,
) -> Result<()> {
    let bbox: BoundingBox = bbox.parse()?;

    let mut options = ConnectOptions::new();
    if let Some(seconds) = connect_timeout {
        options = options.with_connect_timeout(Duration::from_secs(seconds));
    }
    if let Some(seconds) = request_timeout {
        options = options.with_request_timeout(Duration::from_secs(seconds));
    }

    info!("Fetching '{overture_type}' from release '{release}' within {bbox}");
    let client = OvertureClient::connect(release, options)?;
    let table = client.fetch_bbox(overture_type, bbox).await?;

    println!("{}", display::render_fetch_summary(overture_type, &table));
    Ok(())
}
