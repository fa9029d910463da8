//! Hourly history chart: three stacked panels sharing one time axis.
//!
//! Panels (top to bottom): temperature, relative humidity, wind speed.
//! The x axis is hours since the first row so all three panels line up.
//!
//! Nothing here draws text: plotters is built without a font backend and its
//! fallback font panics on use. Vertical grid lines mark whole days and the
//! panel captions are printed in the PDF.

use std::path::Path;

use chrono::NaiveDateTime;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::domain::{HourlyVariable, WeatherTable};
use crate::error::AppError;

pub const CHART_WIDTH: u32 = 1200;
pub const CHART_HEIGHT: u32 = 900;

const HOURS_PER_DAY: f64 = 24.0;
const GRID_LEVELS: usize = 4;

/// Render the table to a PNG at `path`, replacing any existing file.
pub fn render_history_chart(table: &WeatherTable, path: &Path) -> Result<(), AppError> {
    let (Some(origin), Some(last)) = (table.first_timestamp(), table.last_timestamp()) else {
        return Err(AppError::Render("cannot chart an empty table".to_string()));
    };
    let x_max = hours_since(origin, last).max(1.0);

    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let panels = root.split_evenly((HourlyVariable::ALL.len(), 1));
    for (panel, var) in panels.iter().zip(HourlyVariable::ALL) {
        let series: Vec<(f64, f64)> = table
            .rows
            .iter()
            .filter_map(|r| r.value(var).map(|v| (hours_since(origin, r.timestamp), v)))
            .collect();
        draw_panel(panel, var, &series, x_max).map_err(render_err)?;
    }

    root.present().map_err(render_err)?;
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    var: HourlyVariable,
    series: &[(f64, f64)],
    x_max: f64,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (y0, y1) = y_bounds(series);

    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .build_cartesian_2d(0.0..x_max, y0..y1)?;

    let grid = RGBColor(220, 220, 220);
    let day_lines = (1..)
        .map(|d| d as f64 * HOURS_PER_DAY)
        .take_while(|x| *x < x_max)
        .map(|x| PathElement::new(vec![(x, y0), (x, y1)], grid.stroke_width(1)));
    chart.draw_series(day_lines)?;

    let level_lines = (1..GRID_LEVELS)
        .map(|i| y0 + (y1 - y0) * i as f64 / GRID_LEVELS as f64)
        .map(|y| PathElement::new(vec![(0.0, y), (x_max, y)], grid.stroke_width(1)));
    chart.draw_series(level_lines)?;

    chart.draw_series(std::iter::once(Rectangle::new(
        [(0.0, y0), (x_max, y1)],
        BLACK.stroke_width(1),
    )))?;

    chart.draw_series(LineSeries::new(series.iter().copied(), &series_color(var)))?;
    Ok(())
}

fn series_color(var: HourlyVariable) -> RGBColor {
    match var {
        HourlyVariable::Temperature => RGBColor(214, 39, 40),
        HourlyVariable::Humidity => RGBColor(31, 119, 180),
        HourlyVariable::WindSpeed => RGBColor(44, 160, 44),
    }
}

fn hours_since(origin: NaiveDateTime, t: NaiveDateTime) -> f64 {
    t.signed_duration_since(origin).num_minutes() as f64 / 60.0
}

/// Padded y range; flat or empty series still get a non-degenerate axis.
fn y_bounds(series: &[(f64, f64)]) -> (f64, f64) {
    let lo = series.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let hi = series.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    if hi - lo < 1e-9 {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

fn render_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> AppError {
    AppError::Render(e.to_string())
}
