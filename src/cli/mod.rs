//! Command-line parsing.
//!
//! Every setting can also come from the environment (or a `.env` file), which
//! is how the server is usually configured in deployment.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::PipelineConfig;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "weather-trend",
    version,
    about = "Hourly weather history, a linear temperature trend, charts and a PDF report"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the web front-end (default).
    Serve(ServeArgs),
    /// Run the pipeline once for a city and print a summary.
    Report(ReportArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    /// City to report on (empty = Karachi).
    #[arg(short, long, default_value = "")]
    pub city: String,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

/// Options shared by every subcommand that runs the pipeline.
#[derive(Debug, Args, Clone)]
pub struct PipelineArgs {
    /// Geocoder search endpoint (Nominatim-compatible).
    #[arg(long, env = "GEOCODER_URL", default_value = PipelineConfig::DEFAULT_GEOCODER_URL)]
    pub geocoder_url: String,

    /// Hourly archive endpoint (Open-Meteo-compatible).
    #[arg(long, env = "ARCHIVE_URL", default_value = PipelineConfig::DEFAULT_ARCHIVE_URL)]
    pub archive_url: String,

    /// Directory for cached upstream responses.
    #[arg(long, env = "CACHE_DIR", default_value = ".cache")]
    pub cache_dir: PathBuf,

    /// Cache time-to-live in seconds.
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = 3600)]
    pub cache_ttl_secs: u64,

    /// Directory for generated charts and reports.
    #[arg(long, env = "ARTIFACT_DIR", default_value = "artifacts")]
    pub artifact_dir: PathBuf,

    /// Finished reports kept on disk; older ones are deleted after each run.
    #[arg(long, env = "MAX_REPORTS", default_value_t = 20)]
    pub max_reports: usize,

    /// Days of hourly history to request.
    #[arg(long, env = "HISTORY_DAYS", default_value_t = 14)]
    pub history_days: i64,

    /// Hours between the feature row and the predicted temperature (0 = same hour).
    #[arg(long, env = "TARGET_LAG_HOURS", default_value_t = 0)]
    pub target_lag_hours: usize,
}
