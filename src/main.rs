//! CLI entry point for the underemployment analyzer.
//!
//! Provides subcommands for running the College Scorecard underemployment
//! analysis pipeline and for pulling BLS employment time series into a
//! tidy CSV.

mod infra;
mod services;

use crate::infra::bls::client::{BlsClient, EMPLOYMENT_SERIES, YOUTH_SERIES};
use crate::services::timeseries_api::TimeSeriesApi;
use anyhow::{Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use underemployment_analyzer::analyzers::pipeline::{AnalysisOptions, run_complete_analysis};
use underemployment_analyzer::fetch::{BasicClient, auth::UrlParam, fetch_bytes};
use underemployment_analyzer::model::InstitutionRecord;
use underemployment_analyzer::{loader, output, prepare, report};

#[derive(Parser)]
#[command(name = "underemployment_analyzer")]
#[command(about = "Underemployment and career trajectories analysis over College Scorecard data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full underemployment analysis over a Scorecard CSV
    Analyze {
        /// Path to a College Scorecard CSV file, or a URL to fetch it from
        #[arg(value_name = "FILE_OR_URL")]
        data_path: String,

        /// Directory to save analysis outputs
        #[arg(short, long, default_value = "reports")]
        output_dir: String,

        /// Also export the dataset prepared for causal analysis
        #[arg(long, default_value_t = false)]
        export_causal: bool,

        /// Minimum qualifying institutions for a field-risk row
        #[arg(long, default_value_t = 10)]
        min_institutions: usize,

        /// Minimum degree share for a field to count at an institution
        #[arg(long, default_value_t = 0.10)]
        field_threshold: f64,

        /// Number of completion-rate quantile buckets
        #[arg(short, long, default_value_t = 4)]
        quartiles: usize,
    },
    /// Fetch BLS employment time series into a tidy CSV
    FetchEmployment {
        /// First year of data to request
        #[arg(long, default_value_t = 2000)]
        start_year: i32,

        /// Last year of data to request
        #[arg(long, default_value_t = 2024)]
        end_year: i32,

        /// Fetch the youth (16-24) series instead of the headline set
        #[arg(long, default_value_t = false)]
        youth: bool,

        /// CSV file to write observations to
        #[arg(short, long, default_value = "data/employment.csv")]
        output: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/underemployment_analyzer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("underemployment_analyzer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    // any unexpected failure is logged with context and exits non-zero
    if let Err(e) = run(cli).await {
        error!(error = ?e, "Run failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            data_path,
            output_dir,
            export_causal,
            min_institutions,
            field_threshold,
            quartiles,
        } => {
            let opts = AnalysisOptions {
                min_institutions,
                field_threshold,
                quartiles,
            };
            analyze(&data_path, &output_dir, export_causal, &opts).await
        }
        Commands::FetchEmployment {
            start_year,
            end_year,
            youth,
            output,
        } => fetch_employment(start_year, end_year, youth, &output).await,
    }
}

/// Loads Scorecard rows from a local file path or fetches them over HTTP.
///
/// With `SCORECARD_API_KEY` set, the key is appended as the `api_key`
/// query parameter api.data.gov expects.
#[tracing::instrument(fields(source = %source))]
async fn fetch_records(source: &str) -> Result<Vec<InstitutionRecord>> {
    if !source.starts_with("http") {
        return loader::load_records(Path::new(source));
    }

    let client = BasicClient::new();
    let bytes = match std::env::var("SCORECARD_API_KEY") {
        Ok(key) => fetch_bytes(&UrlParam::api_key(client, key), source).await?,
        Err(_) => fetch_bytes(&client, source).await?,
    };
    loader::read_records(bytes.as_slice())
}

/// Loads, prepares, analyzes, and writes every artifact for one run.
#[tracing::instrument(skip(opts), fields(data_path, output_dir))]
async fn analyze(
    data_path: &str,
    output_dir: &str,
    export_causal: bool,
    opts: &AnalysisOptions,
) -> Result<()> {
    let records = fetch_records(data_path).await?;
    let data = prepare::prepare(records);
    let results = run_complete_analysis(&data, opts);

    println!("{}", report::render_report(&results));

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
    let output_dir = Path::new(output_dir);

    let report_path = output_dir.join(format!("underemployment_analysis_{timestamp}.txt"));
    report::write_report(&report_path, &results)?;

    output::export_detailed_results(&output_dir.join("detailed_results"), &timestamp, &results)?;

    if export_causal {
        let causal_path = output_dir.join(format!("causal_analysis_data_{timestamp}.csv"));
        output::export_causal_analysis(&causal_path, &data)?;
    }

    info!(output_dir = %output_dir.display(), "Analysis complete");
    Ok(())
}

/// Pulls the selected BLS series and writes them as tidy CSV rows.
#[tracing::instrument(fields(start_year, end_year, youth, output))]
async fn fetch_employment(start_year: i32, end_year: i32, youth: bool, output: &str) -> Result<()> {
    let api_key = std::env::var("BLS_API_KEY").ok();
    if api_key.is_none() {
        info!("BLS_API_KEY not set, using unregistered rate limits");
    }

    let series = if youth { YOUTH_SERIES } else { EMPLOYMENT_SERIES };
    let ids: Vec<&str> = series.iter().map(|(_, id)| *id).collect();

    let client = BlsClient::new(api_key);
    let observations = client.fetch_series(&ids, start_year, end_year).await?;

    if observations.is_empty() {
        bail!("BLS returned no observations for the requested series");
    }

    output::write_table(Path::new(output), &observations)?;
    info!(
        observations = observations.len(),
        output, "Employment data collected"
    );
    Ok(())
}
