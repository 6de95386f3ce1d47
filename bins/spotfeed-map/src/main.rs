//! spotfeed-map: cluster map markers from the command line.
//!
//! Runs the same grid clustering the map view uses, so QA can check what a
//! given region will show without launching the app.

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use serde::Serialize;
use spotfeed_core::config::Config;
use spotfeed_core::error::exit_codes;
use spotfeed_core::{Error, ErrorCode, ResultExt};
use spotfeed_geo::{parse_markers, ClusterResult, Coordinate, GridClusterer, Marker, Viewport};
use spotfeed_telemetry::{TelemetryConfig, Timer};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Parser)]
#[command(name = "spotfeed-map")]
#[command(about = "Cluster map markers for a viewport")]
#[command(version)]
struct Cli {
    /// Path to a spotfeed.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the grid divisor from the config
    #[arg(long, global = true)]
    divisor: Option<f64>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster markers for one viewport
    Cluster {
        /// JSON file with an array of markers
        markers: PathBuf,
        /// Viewport as LAT,LON,LAT_DELTA,LON_DELTA
        #[arg(long, value_parser = parse_viewport, allow_hyphen_values = true)]
        viewport: Viewport,
    },
    /// Cluster markers for the same center at several spans (zoom levels)
    Levels {
        /// JSON file with an array of markers
        markers: PathBuf,
        /// Center as LAT,LON
        #[arg(long, value_parser = parse_center, allow_hyphen_values = true)]
        center: Coordinate,
        /// Span in degrees, used for both axes; repeat for more levels
        #[arg(long = "span", required = true)]
        spans: Vec<f64>,
    },
}

#[derive(Serialize)]
struct LevelOutput<'a> {
    span: f64,
    #[serde(flatten)]
    result: ClusterResult<&'a Marker>,
}

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    let exit_code = match run(cli) {
        Ok(()) => exit_codes::SUCCESS,
        Err(err) => report_error(&err, json),
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    init_logging(&config, cli.verbose)?;

    let clusterer = match cli.divisor {
        Some(divisor) => GridClusterer::with_divisor(divisor)
            .map_err(Error::from)
            .context("While reading --divisor")?,
        None => config.clusterer()?,
    };

    match cli.command {
        Commands::Cluster { markers, viewport } => {
            let markers = load_markers(&markers)?;
            if viewport.is_degenerate() {
                warn!(span = ?viewport.span, "Degenerate viewport, every marker will be solo");
            }

            let timer = Timer::start("cluster");
            let result = clusterer.cluster(&viewport, &markers);
            timer.stop();

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&viewport, &result);
            }
        }

        Commands::Levels {
            markers,
            center,
            spans,
        } => {
            let markers = load_markers(&markers)?;
            let viewports: Vec<Viewport> = spans
                .iter()
                .map(|span| Viewport::new(center.latitude, center.longitude, *span, *span))
                .collect();

            let timer = Timer::start("cluster_levels");
            let levels = clusterer.cluster_levels(&viewports, &markers);
            timer.stop();

            if cli.json {
                let output: Vec<LevelOutput<'_>> = spans
                    .iter()
                    .zip(levels)
                    .map(|(span, result)| LevelOutput { span: *span, result })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                for (viewport, result) in viewports.iter().zip(&levels) {
                    print_result(viewport, result);
                }
            }
        }
    }

    Ok(())
}

fn init_logging(config: &Config, verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => config.schema.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    spotfeed_telemetry::init_with_config(TelemetryConfig {
        json: config.schema.logging.json,
        ..TelemetryConfig::with_level(level)
    })
}

/// Prints a failed run as a coloured line or, with `--json`, an error report
/// on stdout. Returns the process exit code.
fn report_error(err: &anyhow::Error, json: bool) -> i32 {
    let internal;
    let error = match err.downcast_ref::<Error>() {
        Some(error) => error,
        None => {
            internal = Error::new(ErrorCode::Internal, format!("{err:#}"));
            &internal
        }
    };

    if json {
        match serde_json::to_string_pretty(&error.to_report()) {
            Ok(report) => println!("{report}"),
            Err(_) => eprintln!("{error}"),
        }
    } else {
        eprintln!("{} {error}", "error:".red().bold());
    }

    error.code.exit_code()
}

fn load_markers(path: &Path) -> spotfeed_core::Result<Vec<Marker>> {
    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Failed to read {}", path.display()))?;
    let markers = parse_markers(&content)
        .map_err(Error::from)
        .context(format!("Failed to parse {}", path.display()))
        .with_suggestion("Expected a JSON array of markers with id, latitude and longitude")?;

    for marker in &markers {
        if let Err(e) = marker.validate() {
            warn!(error = %e, "Marker outside valid coordinate range");
        }
    }

    Ok(markers)
}

fn print_result(viewport: &Viewport, result: &ClusterResult<&Marker>) {
    println!();
    let header = format!(
        "Viewport ({:.5}, {:.5}) span {} x {}",
        viewport.center.latitude,
        viewport.center.longitude,
        viewport.span.latitude_delta,
        viewport.span.longitude_delta
    );
    println!("{}", header.bold());
    println!("{}", "─".repeat(header.chars().count()));

    for group in &result.clustered {
        println!(
            "{} {} at ({:.5}, {:.5}), {} markers, radius {:.2} km",
            "●".green(),
            group.id,
            group.coordinate.latitude,
            group.coordinate.longitude,
            group.count,
            group.radius_km()
        );
    }
    for marker in &result.solo {
        println!(
            "{} {} at ({:.5}, {:.5})",
            "○".blue(),
            marker.id,
            marker.latitude,
            marker.longitude
        );
    }

    println!(
        "{}",
        format!(
            "{} markers → {} clusters, {} solo ({} pins)",
            result.len(),
            result.clustered.len(),
            result.solo.len(),
            result.pin_count()
        )
        .dimmed()
    );
}

fn parse_numbers<const N: usize>(value: &str, shape: &str) -> Result<[f64; N], String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {shape}, got `{value}`"));
    }

    let mut numbers = [0.0; N];
    for (slot, part) in numbers.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("`{part}` is not a number (expected {shape})"))?;
    }
    Ok(numbers)
}

fn parse_viewport(value: &str) -> Result<Viewport, String> {
    let [lat, lon, dlat, dlon] = parse_numbers::<4>(value, "LAT,LON,LAT_DELTA,LON_DELTA")?;
    Ok(Viewport::new(lat, lon, dlat, dlon))
}

fn parse_center(value: &str) -> Result<Coordinate, String> {
    let [lat, lon] = parse_numbers::<2>(value, "LAT,LON")?;
    Ok(Coordinate::new(lat, lon))
}
