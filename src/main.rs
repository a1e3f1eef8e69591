//! CLI entry point for the EV registration insights tool.
//!
//! Loads a registration dataset, applies the requested filters, and emits
//! every chart-ready aggregate as JSON or CSV.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ev_insights::{
    config::AppConfig,
    dashboard::Dashboard,
    dataset::{self, Dataset},
    fetch::BasicClient,
    filter::Predicate,
    output::{export_csv, print_pretty, write_json},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ev_insights")]
#[command(
    about = "Aggregate an electric vehicle registration dataset into chart data",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// Only include this model year
    #[arg(long)]
    year: Option<i32>,

    /// Only include this city
    #[arg(long)]
    city: Option<String>,

    /// Only include this make
    #[arg(long)]
    make: Option<String>,

    /// Only include this electric vehicle type
    #[arg(long)]
    vehicle_type: Option<String>,
}

impl FilterArgs {
    fn predicates(self) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        if let Some(year) = self.year {
            predicates.push(Predicate::Year(year));
        }
        if let Some(city) = self.city {
            predicates.push(Predicate::City(city));
        }
        if let Some(make) = self.make {
            predicates.push(Predicate::Make(make));
        }
        if let Some(kind) = self.vehicle_type {
            predicates.push(Predicate::VehicleType(kind));
        }
        predicates
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print every aggregate for the selected filters as JSON
    Summary {
        /// Path or URL of the dataset (defaults to $EV_DATASET)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Write JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the distinct years, cities, makes and vehicle types to filter on
    Options {
        /// Path or URL of the dataset (defaults to $EV_DATASET)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,
    },
    /// Write one CSV per aggregate for the selected filters
    Export {
        /// Path or URL of the dataset (defaults to $EV_DATASET)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Directory to write the CSV files into
        #[arg(short = 'd', long, default_value = "aggregates")]
        output_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/ev_insights.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ev_insights.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::Summary {
            source,
            filters,
            output,
        } => {
            let dashboard = open_dashboard(&config, source, filters.predicates()).await?;
            let view = dashboard.view();
            print_pretty(&view);

            write_json(output.as_deref(), &view)?;
        }
        Commands::Options { source } => {
            let dataset = load_dataset(&config, source).await?;
            let options = dataset.options();

            info!(
                years = options.years.len(),
                cities = options.cities.len(),
                makes = options.makes.len(),
                vehicle_types = options.vehicle_types.len(),
                "Filter options"
            );
            write_json(None, options)?;
        }
        Commands::Export {
            source,
            filters,
            output_dir,
        } => {
            let dashboard = open_dashboard(&config, source, filters.predicates()).await?;
            let view = dashboard.view();

            info!(
                filtered = view.filtered_records,
                total = view.total_records,
                "Exporting aggregates"
            );
            export_csv(&output_dir, &view)?;
        }
    }

    Ok(())
}

/// Loads the dataset and applies the requested selection.
async fn open_dashboard(
    config: &AppConfig,
    source: Option<String>,
    predicates: Vec<Predicate>,
) -> Result<Dashboard> {
    let dataset = load_dataset(config, source).await?;
    let mut dashboard = Dashboard::with_limits(dataset, config.limits());

    for predicate in predicates {
        dashboard.select(predicate);
    }
    Ok(dashboard)
}

/// Resolves the source (argument, then `$EV_DATASET`) and loads it.
#[tracing::instrument(skip(config))]
async fn load_dataset(config: &AppConfig, source: Option<String>) -> Result<Dataset> {
    let source = source
        .or_else(|| std::env::var("EV_DATASET").ok())
        .context("no dataset given: pass FILE_OR_URL or set EV_DATASET")?;

    let client = BasicClient::new(config.request_timeout(), config.connect_timeout())?;

    match dataset::load(&client, &source).await {
        Ok(dataset) => Ok(dataset),
        Err(e) => {
            error!(source = %source, error = %e, "Dataset load failed");
            Err(e).with_context(|| format!("loading {source}"))
        }
    }
}
