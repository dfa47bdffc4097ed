//! # pattern-cli
//!
//! Command-line interface for the pattern engine: loads sample files, runs
//! the analyses and prints JSON.

mod input;

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use pattern_facade::prelude::*;
use serde::Serialize;
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::input::LoadedSeries;

#[derive(Parser)]
#[command(name = "pattern")]
#[command(about = "Time series pattern recognition CLI", long_about = None)]
struct Cli {
    /// Engine configuration file (TOML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write JSON output to a file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Input file (CSV or JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Restrict to these series (repeatable; default: all)
    #[arg(short, long)]
    series: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Descriptive statistics per series
    Summary {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Detect trends, cycles, seasonality and correlations
    Patterns {
        #[command(flatten)]
        input: InputArgs,

        /// Include the aggregate report
        #[arg(long)]
        report: bool,
    },

    /// Scan for anomalies against a trailing window
    Anomalies {
        #[command(flatten)]
        input: InputArgs,

        /// Baseline window length (default: derived from series length)
        #[arg(short, long)]
        window: Option<usize>,

        /// Threshold in standard deviations
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// Project each series forward
    Forecast {
        #[command(flatten)]
        input: InputArgs,

        /// Number of steps to forecast
        #[arg(long, default_value = "10")]
        horizon: usize,
    },

    /// Pairwise Pearson correlation
    Correlate {
        #[command(flatten)]
        input: InputArgs,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("invalid configuration in {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// Build an engine and feed it the selected series from the input file.
fn load_engine(config: EngineConfig, args: &InputArgs) -> Result<(PatternEngine, Vec<String>)> {
    let engine = PatternEngine::new(config).context("failed to build engine")?;
    let loaded = input::load(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    for name in &args.series {
        if !loaded.iter().any(|s| &s.id == name) {
            bail!("series '{}' not found in {}", name, args.input.display());
        }
    }

    let mut selected = Vec::new();
    for series in loaded {
        if !args.series.is_empty() && !args.series.contains(&series.id) {
            continue;
        }
        ingest(&engine, &series)?;
        selected.push(series.id);
    }
    info!(series = selected.len(), "input ingested");
    Ok((engine, selected))
}

fn ingest(engine: &PatternEngine, series: &LoadedSeries) -> Result<()> {
    for (timestamp, value) in &series.points {
        let result = match timestamp {
            Some(ts) => engine.ingest_at(&series.id, *value, *ts),
            None => engine.ingest(&series.id, *value),
        };
        result.with_context(|| format!("failed to ingest series '{}'", series.id))?;
    }
    Ok(())
}

fn write_output<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            serde_json::to_writer_pretty(&mut file, value).context("failed to write JSON")?;
            eprintln!("Results written to {}", path.display());
        }
        None => println!(
            "{}",
            serde_json::to_string_pretty(value).context("failed to encode JSON")?
        ),
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let output = cli.output.as_deref();

    match cli.command {
        Commands::Summary { input } => {
            let (engine, ids) = load_engine(config, &input)?;
            let summaries: Vec<StatisticalSummary> =
                ids.iter().map(|id| engine.get_summary(id)).collect();
            write_output(&summaries, output)
        }

        Commands::Patterns { input, report } => {
            let (engine, ids) = load_engine(config, &input)?;
            let patterns: Vec<Pattern> = ids
                .iter()
                .flat_map(|id| engine.detect_patterns(id))
                .collect();
            if report {
                write_output(
                    &json!({ "patterns": patterns, "report": engine.report() }),
                    output,
                )
            } else {
                write_output(&patterns, output)
            }
        }

        Commands::Anomalies {
            input,
            window,
            threshold,
        } => {
            let (engine, ids) = load_engine(config, &input)?;
            let mut results = serde_json::Map::new();
            for id in &ids {
                let anomalies = engine
                    .scan_anomalies(id, window, threshold)
                    .with_context(|| format!("anomaly scan failed for '{}'", id))?;
                results.insert(id.clone(), serde_json::to_value(anomalies)?);
            }
            write_output(&results, output)
        }

        Commands::Forecast { input, horizon } => {
            let (engine, ids) = load_engine(config, &input)?;
            let mut forecasts: Vec<ForecastResult> = Vec::with_capacity(ids.len());
            for id in &ids {
                engine.detect_patterns(id);
                forecasts.push(
                    engine
                        .forecast(id, horizon)
                        .with_context(|| format!("forecast failed for '{}'", id))?,
                );
            }
            write_output(&forecasts, output)
        }

        Commands::Correlate { input } => {
            let (engine, ids) = load_engine(config, &input)?;
            if ids.len() < 2 {
                bail!("correlation needs at least two series, found {}", ids.len());
            }
            let matrix: Vec<CorrelationResult> = engine.correlation_matrix(&ids);
            write_output(&matrix, output)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
