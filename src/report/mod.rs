//! Reporting: the report model, terminal formatting, and PDF output.

use std::path::PathBuf;

use crate::domain::{Coordinate, DateWindow, TemperatureStats};
use crate::fit::Prediction;

pub mod format;
pub mod pdf;

pub use format::{format_accuracy, format_summary, format_temperature};
pub use pdf::write_pdf;

/// Everything shown in a generated report.
#[derive(Debug, Clone)]
pub struct Report {
    pub city: String,
    pub coordinate: Coordinate,
    pub window: DateWindow,
    /// Held-out R².
    pub accuracy: f64,
    pub prediction: Prediction,
    pub stats: TemperatureStats,
    /// Rows in the normalized table.
    pub n_rows: usize,
    /// Rendered chart embedded in the PDF.
    pub chart_path: PathBuf,
}
