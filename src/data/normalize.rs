//! Raw hourly JSON → [`WeatherTable`].
//!
//! The archive returns columnar data:
//!
//! ```text
//! "hourly": {
//!   "time":           ["2025-01-01T00:00", ...],
//!   "temperature_2m": [12.3, null, ...],
//!   ...
//! }
//! ```
//!
//! Each column is forward-filled independently. No interpolation, no outlier
//! handling, no timezone conversion (the provider already applied `timezone=auto`).

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::domain::{HourlyRow, HourlyVariable, WeatherTable};
use crate::error::AppError;

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Replace each missing value with the closest preceding present value.
///
/// A leading gap has no predecessor and stays `None`.
pub fn forward_fill(values: &mut [Option<f64>]) {
    let mut last = None;
    for v in values.iter_mut() {
        match v {
            Some(x) => last = Some(*x),
            None => *v = last,
        }
    }
}

/// Build a forward-filled table from the full archive payload.
pub fn normalize_hourly(payload: &Value) -> Result<WeatherTable, AppError> {
    let hourly = payload
        .get("hourly")
        .and_then(Value::as_object)
        .ok_or_else(|| AppError::MalformedPayload("missing 'hourly' object".to_string()))?;

    let times = hourly
        .get("time")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::MalformedPayload("missing 'hourly.time' array".to_string()))?;

    if times.is_empty() {
        return Err(AppError::MalformedPayload("no hourly rows returned".to_string()));
    }

    let timestamps = times
        .iter()
        .map(parse_timestamp)
        .collect::<Result<Vec<_>, _>>()?;

    let mut columns = Vec::with_capacity(HourlyVariable::ALL.len());
    for var in HourlyVariable::ALL {
        let mut column = parse_column(hourly.get(var.api_name()), var)?;
        if column.len() != timestamps.len() {
            return Err(AppError::MalformedPayload(format!(
                "column '{}' has {} values for {} timestamps",
                var.api_name(),
                column.len(),
                timestamps.len()
            )));
        }
        forward_fill(&mut column);
        columns.push(column);
    }

    let rows = timestamps
        .into_iter()
        .enumerate()
        .map(|(i, timestamp)| HourlyRow {
            timestamp,
            temperature: columns[0][i],
            humidity: columns[1][i],
            wind_speed: columns[2][i],
        })
        .collect();

    Ok(WeatherTable { rows })
}

fn parse_timestamp(raw: &Value) -> Result<NaiveDateTime, AppError> {
    let s = raw
        .as_str()
        .ok_or_else(|| AppError::MalformedPayload(format!("non-string timestamp {raw}")))?;
    NaiveDateTime::parse_from_str(s, TIME_FORMAT)
        .map_err(|e| AppError::MalformedPayload(format!("invalid timestamp '{s}': {e}")))
}

fn parse_column(raw: Option<&Value>, var: HourlyVariable) -> Result<Vec<Option<f64>>, AppError> {
    let values = raw.and_then(Value::as_array).ok_or_else(|| {
        AppError::MalformedPayload(format!("missing 'hourly.{}' array", var.api_name()))
    })?;

    values
        .iter()
        .map(|v| match v {
            Value::Null => Ok(None),
            Value::Number(n) => Ok(n.as_f64().filter(|x| x.is_finite())),
            other => Err(AppError::MalformedPayload(format!(
                "non-numeric value {other} in '{}'",
                var.api_name()
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn forward_fill_uses_nearest_preceding_value() {
        let mut v = vec![None, Some(1.0), None, None, Some(4.0), None];
        forward_fill(&mut v);
        assert_eq!(v, vec![None, Some(1.0), Some(1.0), Some(1.0), Some(4.0), Some(4.0)]);
    }

    #[test]
    fn forward_fill_all_missing_stays_missing() {
        let mut v = vec![None, None];
        forward_fill(&mut v);
        assert_eq!(v, vec![None, None]);
    }

    #[test]
    fn normalize_builds_filled_rows() {
        let payload = json!({
            "latitude": 24.86,
            "hourly": {
                "time": ["2025-01-01T00:00", "2025-01-01T01:00", "2025-01-01T02:00"],
                "temperature_2m": [null, 15.5, null],
                "relative_humidity_2m": [60, null, 62],
                "wind_speed_10m": [5.0, 6.0, null]
            }
        });

        let table = normalize_hourly(&payload).unwrap();
        assert_eq!(table.len(), 3);

        assert_eq!(table.rows[0].temperature, None);
        assert_eq!(table.rows[2].temperature, Some(15.5));
        assert_eq!(table.rows[1].humidity, Some(60.0));
        assert_eq!(table.rows[2].wind_speed, Some(6.0));
        assert_eq!(
            table.rows[1].timestamp.format("%Y-%m-%d %H:%M").to_string(),
            "2025-01-01 01:00"
        );
    }

    #[test]
    fn normalize_rejects_malformed_payloads() {
        let cases = [
            json!({}),
            json!({"hourly": {"time": []}}),
            json!({"hourly": {"time": ["2025-01-01T00:00"], "temperature_2m": [1.0]}}),
            json!({"hourly": {
                "time": ["2025-01-01T00:00"],
                "temperature_2m": [1.0, 2.0],
                "relative_humidity_2m": [1.0],
                "wind_speed_10m": [1.0]
            }}),
            json!({"hourly": {
                "time": ["yesterday"],
                "temperature_2m": [1.0],
                "relative_humidity_2m": [1.0],
                "wind_speed_10m": [1.0]
            }}),
            json!({"hourly": {
                "time": ["2025-01-01T00:00"],
                "temperature_2m": ["warm"],
                "relative_humidity_2m": [1.0],
                "wind_speed_10m": [1.0]
            }}),
        ];

        for payload in cases {
            let err = normalize_hourly(&payload).unwrap_err();
            assert!(matches!(err, AppError::MalformedPayload(_)), "{payload}: {err}");
        }
    }
}
