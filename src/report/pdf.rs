//! PDF report writer.
//!
//! Layout (A4, portrait): title, a block of key figures, then the history
//! chart scaled to the text width. Text uses the built-in Helvetica fonts and
//! stays ASCII so no font embedding is needed.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use printpdf::image_crate::{self, ImageFormat};
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument};
use tracing::info;

use crate::domain::HourlyVariable;
use crate::error::AppError;
use crate::plot::chart::{CHART_HEIGHT, CHART_WIDTH};
use crate::report::Report;
use crate::report::format::{format_accuracy, format_temperature};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_MM: f32 = 8.0;
const IMAGE_DPI: f32 = 300.0;

/// Write `report` as a PDF to `path`, replacing any existing file.
pub fn write_pdf(report: &Report, path: &Path) -> Result<(), AppError> {
    let title = format!("Weather Prediction Insights for {}", report.city);
    let (doc, page, layer) = PdfDocument::new(
        title.as_str(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Report",
    );
    let layer = doc.get_page(page).get_layer(layer);

    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_err)?;
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;

    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;
    layer.use_text(title.as_str(), 18.0, Mm(MARGIN_MM), Mm(y), &bold);
    y -= LINE_MM * 1.5;

    for line in report_lines(report) {
        layer.use_text(line, 12.0, Mm(MARGIN_MM), Mm(y), &regular);
        y -= LINE_MM;
    }

    // Chart: scaled to the text width, placed below the figures.
    let bytes = fs::read(&report.chart_path)?;
    let decoded = image_crate::load_from_memory_with_format(&bytes, ImageFormat::Png)
        .map_err(|e| AppError::Pdf(format!("cannot decode chart image: {e}")))?;

    let natural_width_mm = CHART_WIDTH as f32 / IMAGE_DPI * 25.4;
    let scale = (PAGE_WIDTH_MM - 2.0 * MARGIN_MM) / natural_width_mm;
    let height_mm = CHART_HEIGHT as f32 / IMAGE_DPI * 25.4 * scale;
    let bottom = (y - LINE_MM - height_mm).max(MARGIN_MM);

    Image::from_dynamic_image(&decoded).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN_MM)),
            translate_y: Some(Mm(bottom)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    );

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    doc.save(&mut BufWriter::new(file)).map_err(pdf_err)?;

    info!(path = %path.display(), "report written");
    Ok(())
}

/// Body lines of the report, in display order.
pub fn report_lines(report: &Report) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Location: {:.4}, {:.4}",
            report.coordinate.latitude, report.coordinate.longitude
        ),
        format!(
            "History: {} to {} ({} hourly rows)",
            report.window.start, report.window.end, report.n_rows
        ),
        format!("Model accuracy (R2 on held-out data): {}", format_accuracy(report.accuracy)),
        format!(
            "Predicted temperature: {} C",
            format_temperature(report.prediction.temperature)
        ),
        format!(
            "Minimum temperature: {} C",
            format_temperature(report.stats.min)
        ),
        format!("Mean temperature: {} C", format_temperature(report.stats.mean)),
        format!(
            "Maximum temperature: {} C",
            format_temperature(report.stats.max)
        ),
    ];
    lines.push("Chart panels, top to bottom (x axis: hours, grid lines mark days):".to_string());
    lines.extend(
        HourlyVariable::ALL
            .iter()
            .map(|var| format!("  {} ({})", var.display_name(), ascii_unit(*var))),
    );
    lines
}

/// Built-in PDF fonts cover ASCII only.
fn ascii_unit(var: HourlyVariable) -> &'static str {
    match var {
        HourlyVariable::Temperature => "C",
        _ => var.unit(),
    }
}

fn pdf_err(e: printpdf::Error) -> AppError {
    AppError::Pdf(e.to_string())
}
