//! Text formatting shared by the terminal output, the web pages and the PDF.
//!
//! Keeping number formatting in one place means the web page, the PDF and
//! the CLI always agree on precision.

use crate::report::Report;

/// R² with two decimals.
pub fn format_accuracy(r2: f64) -> String {
    format!("{r2:.2}")
}

/// Temperature with two decimals (no unit).
pub fn format_temperature(celsius: f64) -> String {
    format!("{celsius:.2}")
}

/// Multi-line run summary for the terminal.
pub fn format_summary(report: &Report) -> String {
    let mut out = String::new();

    out.push_str("=== weather-trend - Hourly Temperature Trend ===\n");
    out.push_str(&format!("City: {}\n", report.city));
    out.push_str(&format!(
        "Coordinate: {:.4}, {:.4}\n",
        report.coordinate.latitude, report.coordinate.longitude
    ));
    out.push_str(&format!(
        "Window: {} .. {} ({} hourly rows)\n",
        report.window.start, report.window.end, report.n_rows
    ));
    out.push('\n');
    out.push_str(&format!(
        "Model accuracy (R², held-out): {}\n",
        format_accuracy(report.accuracy)
    ));
    out.push_str(&format!(
        "Predicted temperature: {} °C (from {})\n",
        format_temperature(report.prediction.temperature),
        report.prediction.based_on.format("%Y-%m-%d %H:%M"),
    ));
    out.push_str(&format!(
        "Temperature min/mean/max: {} / {} / {} °C\n",
        format_temperature(report.stats.min),
        format_temperature(report.stats.mean),
        format_temperature(report.stats.max),
    ));

    out
}
