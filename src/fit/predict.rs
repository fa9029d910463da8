//! Point forecast from the most recent observation.

use chrono::NaiveDateTime;

use crate::domain::WeatherTable;
use crate::error::AppError;
use crate::fit::trend::TrendModel;

/// A single forecast value and the row it was computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Timestamp of the feature row used.
    pub based_on: NaiveDateTime,
    /// Predicted temperature in °C.
    pub temperature: f64,
}

/// Apply `model` to the latest complete row of `table`.
///
/// This reuses the latest known feature vector; it is not a multi-step forecast.
pub fn predict_latest(model: &TrendModel, table: &WeatherTable) -> Result<Prediction, AppError> {
    let row = table
        .last_complete()
        .ok_or_else(|| AppError::FitFailed("no complete row to predict from".to_string()))?;
    let features = row
        .features()
        .ok_or_else(|| AppError::FitFailed("latest row has missing features".to_string()))?;

    let temperature = model.predict(&features);
    if !temperature.is_finite() {
        return Err(AppError::FitFailed("non-finite prediction".to_string()));
    }

    Ok(Prediction {
        based_on: row.timestamp,
        temperature,
    })
}
