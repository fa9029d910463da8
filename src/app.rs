//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initializes logging
//! - parses CLI arguments
//! - either serves the web front-end or runs one report in the terminal

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::{Command, PipelineArgs, ReportArgs, ServeArgs};
use crate::domain::{PipelineConfig, max_history_days};
use crate::error::AppError;
use crate::web::{AppState, build_router};

pub mod pipeline;

/// Entry point for the `weather-trend` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    // `weather-trend` and `weather-trend --port 8080` behave like `weather-trend serve ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Serve(args) => handle_serve(args),
        Command::Report(args) => handle_report(args),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_trend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

fn handle_serve(args: ServeArgs) -> Result<(), AppError> {
    let config = pipeline_config_from_args(&args.pipeline)?;
    let ip: std::net::IpAddr = args
        .host
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST '{}': {e}", args.host)))?;
    let addr = SocketAddr::new(ip, args.port);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let app = build_router(AppState::new(config));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Starting server on {addr}");
        axum::serve(listener, app).await?;
        Ok::<(), AppError>(())
    })
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let config = pipeline_config_from_args(&args.pipeline)?;
    let today = chrono::Local::now().date_naive();
    let run = pipeline::run_pipeline(&config, &args.city, today)?;

    println!("{}", crate::report::format_summary(&run.report));
    println!("Chart:  {}", run.report.chart_path.display());
    println!("Report: {}", run.pdf_path.display());
    Ok(())
}

pub fn pipeline_config_from_args(args: &PipelineArgs) -> Result<PipelineConfig, AppError> {
    let max_days = max_history_days();
    if !(1..=max_days).contains(&args.history_days) {
        return Err(AppError::Config(format!(
            "history days must be between 1 and {max_days}, got {}",
            args.history_days
        )));
    }
    if args.max_reports < 1 {
        return Err(AppError::Config("max reports must be >= 1".to_string()));
    }
    if args.geocoder_url.trim().is_empty() || args.archive_url.trim().is_empty() {
        return Err(AppError::Config("upstream URLs must not be empty".to_string()));
    }

    Ok(PipelineConfig {
        geocoder_url: args.geocoder_url.clone(),
        archive_url: args.archive_url.clone(),
        cache_dir: args.cache_dir.clone(),
        cache_ttl: Duration::from_secs(args.cache_ttl_secs),
        artifact_dir: args.artifact_dir.clone(),
        history_days: args.history_days,
        target_lag_hours: args.target_lag_hours,
        max_reports: args.max_reports,
        ..PipelineConfig::default()
    })
}

/// Rewrite argv so the binary defaults to `serve`.
///
/// Rules:
/// - `weather-trend`                      -> `weather-trend serve`
/// - `weather-trend --port 8080 ...`      -> `weather-trend serve --port 8080 ...`
/// - `weather-trend --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("serve".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "serve".to_string());
    }
    argv
}
