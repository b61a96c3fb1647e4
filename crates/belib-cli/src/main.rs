use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use belib_cli::commands::decode::{handle_decode, DecodeArgs};
use belib_cli::commands::districts::handle_districts;
use belib_cli::commands::locate::{handle_locate, LocateArgs};
use belib_cli::commands::nearest::{handle_nearest, NearestArgs};
use belib_cli::commands::route::{handle_route, RouteArgs};
use belib_cli::commands::stations::{handle_stations, StationsArgs};
use belib_cli::commands::stats::handle_stats;
use belib_cli::commands::CommandContext;
use belib_cli::output::OutputFormat;
use belib_lib::Error as LibError;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Find the nearest Belib' charging station in Paris"
)]
struct Cli {
    /// Station dataset CSV (file or directory). Defaults to
    /// BELIB_DATASET_PATH, then the platform data directory.
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// JSON file configuring the geocoding and routing services.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Geocode an address, find the nearest station and route to it.
    Nearest(NearestArgs),
    /// Find the nearest station to coordinates.
    Locate(LocateArgs),
    /// Fetch a driving route between two coordinates.
    Route(RouteArgs),
    /// List stations, optionally for one district.
    Stations(StationsArgs),
    /// List districts with their station counts.
    Districts,
    /// Show dataset statistics.
    Stats,
    /// Decode an encoded polyline.
    Decode(DecodeArgs),
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = CommandContext {
        dataset: cli.dataset,
        config: cli.config,
        format: cli.format,
    };

    match cli.command {
        Command::Nearest(args) => handle_nearest(&ctx, &args),
        Command::Locate(args) => handle_locate(&ctx, &args),
        Command::Route(args) => handle_route(&ctx, &args),
        Command::Stations(args) => handle_stations(&ctx, &args),
        Command::Districts => handle_districts(&ctx),
        Command::Stats => handle_stats(&ctx),
        Command::Decode(args) => handle_decode(&ctx, &args),
    }
}

/// Service outages are reported without a failing exit status; everything
/// else is an error.
fn report(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<LibError>() {
        Some(lib) if lib.is_recoverable() => {
            tracing::warn!(error = %lib, "external service failure");
            match lib {
                LibError::NoRouteFound { .. } => eprintln!("{lib}."),
                _ => eprintln!("{lib}. Please try again later."),
            }
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
