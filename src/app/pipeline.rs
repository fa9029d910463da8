//! Shared pipeline used by both the web handlers and the `report` subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! resolve -> fetch -> normalize -> fit -> predict -> chart -> PDF
//!
//! The front-ends only decide how to present the result (HTML vs terminal).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::data::{CachedClient, fetch_hourly, history_window, normalize_hourly, resolve_location};
use crate::domain::{
    CHART_FILENAME, DateWindow, HourlyVariable, Location, PipelineConfig, REPORT_FILENAME,
    TemperatureStats, WeatherTable,
};
use crate::error::AppError;
use crate::fit::{Prediction, TrainOptions, TrainedModel, predict_latest, train};
use crate::plot::render_history_chart;
use crate::report::{Report, format_accuracy, format_temperature, write_pdf};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Identifier of the artifact directory for this run.
    pub report_id: Uuid,
    pub location: Location,
    pub table: WeatherTable,
    pub trained: TrainedModel,
    pub prediction: Prediction,
    pub report: Report,
    pub pdf_path: PathBuf,
}

/// Directory holding the chart and PDF of one run.
pub fn report_dir(artifact_dir: &Path, report_id: Uuid) -> PathBuf {
    artifact_dir.join(report_id.to_string())
}

/// Path of the PDF generated by run `report_id`.
pub fn report_pdf_path(artifact_dir: &Path, report_id: Uuid) -> PathBuf {
    report_dir(artifact_dir, report_id).join(REPORT_FILENAME)
}

/// Create `dir`, fill it with `render`, and remove it again if rendering fails.
fn with_run_dir<T>(
    dir: &Path,
    render: impl FnOnce(&Path) -> Result<T, AppError>,
) -> Result<T, AppError> {
    fs::create_dir_all(dir)?;
    render(dir).inspect_err(|_| {
        if let Err(e) = fs::remove_dir_all(dir) {
            warn!(dir = %dir.display(), "failed to remove incomplete report: {e}");
        }
    })
}

/// Delete all but the newest `keep` finished reports under `artifact_dir`.
///
/// Only directories named by a report id and holding a PDF count, so runs
/// still in progress are never touched. Returns the number removed.
pub fn prune_reports(artifact_dir: &Path, keep: usize) -> Result<usize, AppError> {
    let mut finished: Vec<Uuid> = Vec::new();
    for entry in fs::read_dir(artifact_dir)? {
        let entry = entry?;
        let Some(id) = entry
            .file_name()
            .to_str()
            .and_then(|name| Uuid::parse_str(name).ok())
        else {
            continue;
        };
        if report_pdf_path(artifact_dir, id).is_file() {
            finished.push(id);
        }
    }

    // v7 ids sort by creation time.
    finished.sort_unstable();
    let excess = finished.len().saturating_sub(keep);
    for id in &finished[..excess] {
        fs::remove_dir_all(report_dir(artifact_dir, *id))?;
    }
    Ok(excess)
}

/// Execute the full pipeline for `city`, with `today` anchoring the history window.
///
/// Blocking: performs network I/O, the fit, and file writes on the calling thread.
pub fn run_pipeline(
    config: &PipelineConfig,
    city: &str,
    today: NaiveDate,
) -> Result<RunOutput, AppError> {
    let client = CachedClient::new(config)?;

    // 1) Resolve the city.
    let location = resolve_location(&client, &config.geocoder_url, city)?;

    // 2) Fetch the hourly history.
    let window = history_window(today, config.history_days);
    let payload = fetch_hourly(
        &client,
        &config.archive_url,
        location.coordinate,
        window,
        &HourlyVariable::ALL,
    )?;

    run_with_payload(config, location, window, &payload)
}

/// Execute the pipeline from an already-fetched archive payload.
pub fn run_with_payload(
    config: &PipelineConfig,
    location: Location,
    window: DateWindow,
    payload: &serde_json::Value,
) -> Result<RunOutput, AppError> {
    // 3) Normalize into a forward-filled table.
    let table = normalize_hourly(payload)?;
    let stats = TemperatureStats::from_table(&table)
        .ok_or_else(|| AppError::MalformedPayload("no temperature values returned".to_string()))?;

    // 4) Fit and score.
    let options = TrainOptions {
        target_lag_hours: config.target_lag_hours,
        test_fraction: config.test_fraction,
        seed: config.split_seed,
    };
    let trained = train(&table, &options)?;

    // 5) Forecast from the latest row.
    let prediction = predict_latest(&trained.model, &table)?;

    // 6) + 7) Render artifacts into a directory owned by this run.
    let report_id = Uuid::now_v7();
    let dir = report_dir(&config.artifact_dir, report_id);
    let (report, pdf_path) = with_run_dir(&dir, |dir| {
        let chart_path = dir.join(CHART_FILENAME);
        render_history_chart(&table, &chart_path)?;

        let report = Report {
            city: location.name.clone(),
            coordinate: location.coordinate,
            window,
            accuracy: trained.accuracy,
            prediction,
            stats,
            n_rows: table.len(),
            chart_path,
        };
        let pdf_path = dir.join(REPORT_FILENAME);
        write_pdf(&report, &pdf_path)?;
        Ok((report, pdf_path))
    })?;

    match prune_reports(&config.artifact_dir, config.max_reports) {
        Ok(0) => {}
        Ok(removed) => info!(removed, "pruned old reports"),
        Err(e) => warn!("failed to prune old reports: {e}"),
    }

    info!(
        city = %location.name,
        %report_id,
        accuracy = %format_accuracy(trained.accuracy),
        prediction = %format_temperature(prediction.temperature),
        "pipeline finished"
    );

    Ok(RunOutput {
        report_id,
        location,
        table,
        trained,
        prediction,
        report,
        pdf_path,
    })
}
