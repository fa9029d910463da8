//! Shared domain types.
//!
//! These types are kept small and plain so they can be:
//!
//! - passed between pipeline stages without conversion
//! - built by hand in tests (synthetic tables, fixed coordinates)
//! - rendered by both the web pages and the terminal summary

use std::path::PathBuf;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// City used when the form is submitted empty.
pub const DEFAULT_CITY: &str = "Karachi";

/// Hardcoded coordinate for [`DEFAULT_CITY`]; the geocoder is not consulted for it.
pub const DEFAULT_COORDINATE: Coordinate = Coordinate {
    latitude: 24.8607,
    longitude: 67.0011,
};

/// Attachment name of the generated report.
pub const REPORT_FILENAME: &str = "weather_prediction_insights.pdf";

/// File name of the rendered chart inside a report directory.
pub const CHART_FILENAME: &str = "weather_plots.png";

/// Earliest date the archive API serves.
pub fn archive_floor() -> NaiveDate {
    NaiveDate::from_ymd_opt(1940, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Latest date requested from the archive API.
pub fn archive_ceiling() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 8).unwrap_or(NaiveDate::MAX)
}

/// Longest history window that fits between the archive bounds.
pub fn max_history_days() -> i64 {
    archive_ceiling()
        .signed_duration_since(archive_floor())
        .num_days()
}

/// Geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// A resolved location: the name shown to the user plus its coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub coordinate: Coordinate,
}

/// Hourly variables requested from the archive API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HourlyVariable {
    Temperature,
    Humidity,
    WindSpeed,
}

impl HourlyVariable {
    pub const ALL: [HourlyVariable; 3] = [
        HourlyVariable::Temperature,
        HourlyVariable::Humidity,
        HourlyVariable::WindSpeed,
    ];

    /// Column name used by the Open-Meteo API.
    pub fn api_name(self) -> &'static str {
        match self {
            HourlyVariable::Temperature => "temperature_2m",
            HourlyVariable::Humidity => "relative_humidity_2m",
            HourlyVariable::WindSpeed => "wind_speed_10m",
        }
    }

    /// Human-readable label for charts and reports.
    pub fn display_name(self) -> &'static str {
        match self {
            HourlyVariable::Temperature => "Temperature",
            HourlyVariable::Humidity => "Relative humidity",
            HourlyVariable::WindSpeed => "Wind speed",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            HourlyVariable::Temperature => "°C",
            HourlyVariable::Humidity => "%",
            HourlyVariable::WindSpeed => "km/h",
        }
    }
}

/// Inclusive date range requested from the archive API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One hour of observations. `None` means the provider had no value.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRow {
    pub timestamp: NaiveDateTime,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
}

impl HourlyRow {
    pub fn value(&self, var: HourlyVariable) -> Option<f64> {
        match var {
            HourlyVariable::Temperature => self.temperature,
            HourlyVariable::Humidity => self.humidity,
            HourlyVariable::WindSpeed => self.wind_speed,
        }
    }

    /// Feature vector `[temperature, humidity, wind_speed]`, if every value is present.
    pub fn features(&self) -> Option<[f64; 3]> {
        Some([self.temperature?, self.humidity?, self.wind_speed?])
    }
}

/// Normalized hourly history, ordered by timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherTable {
    pub rows: Vec<HourlyRow>,
}

impl WeatherTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, var: HourlyVariable) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.value(var)).collect()
    }

    /// The most recent row that has all three features.
    pub fn last_complete(&self) -> Option<&HourlyRow> {
        self.rows.iter().rev().find(|r| r.features().is_some())
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.rows.first().map(|r| r.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.rows.last().map(|r| r.timestamp)
    }
}

/// Min / mean / max over the present temperature values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureStats {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

impl TemperatureStats {
    /// Returns `None` when the table has no temperature values at all.
    pub fn from_table(table: &WeatherTable) -> Option<Self> {
        let values: Vec<f64> = table
            .rows
            .iter()
            .filter_map(|r| r.temperature)
            .filter(|v| v.is_finite())
            .collect();
        if values.is_empty() {
            return None;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        Some(Self { min, mean, max })
    }
}

/// Everything one pipeline run needs to know about the outside world.
///
/// Built once from CLI flags / environment and passed explicitly to each
/// stage; nothing here is global.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Nominatim-compatible search endpoint.
    pub geocoder_url: String,
    /// Open-Meteo-compatible archive endpoint.
    pub archive_url: String,
    /// Directory holding cached upstream responses.
    pub cache_dir: PathBuf,
    /// How long a cached response stays valid.
    pub cache_ttl: Duration,
    /// Directory under which per-report artifact directories are created.
    pub artifact_dir: PathBuf,
    /// Number of finished report directories kept under `artifact_dir`.
    pub max_reports: usize,
    /// Length of the requested history window in days.
    pub history_days: i64,
    /// Hours between the feature row and the target temperature (0 = same row).
    pub target_lag_hours: usize,
    /// Seed for the train/test shuffle.
    pub split_seed: u64,
    /// Fraction of usable rows held out for scoring.
    pub test_fraction: f64,
}

impl PipelineConfig {
    pub const DEFAULT_GEOCODER_URL: &'static str = "https://nominatim.openstreetmap.org/search";
    pub const DEFAULT_ARCHIVE_URL: &'static str = "https://archive-api.open-meteo.com/v1/archive";
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            geocoder_url: Self::DEFAULT_GEOCODER_URL.to_string(),
            archive_url: Self::DEFAULT_ARCHIVE_URL.to_string(),
            cache_dir: PathBuf::from(".cache"),
            cache_ttl: Duration::from_secs(3600),
            artifact_dir: PathBuf::from("artifacts"),
            max_reports: 20,
            history_days: 14,
            target_lag_hours: 0,
            split_seed: 42,
            test_fraction: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(h: u32, t: Option<f64>, rh: Option<f64>, ws: Option<f64>) -> HourlyRow {
        let ts = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap();
        HourlyRow {
            timestamp: ts,
            temperature: t,
            humidity: rh,
            wind_speed: ws,
        }
    }

    #[test]
    fn last_complete_skips_trailing_gaps() {
        let table = WeatherTable {
            rows: vec![
                row(0, Some(10.0), Some(50.0), Some(3.0)),
                row(1, Some(11.0), Some(55.0), Some(4.0)),
                row(2, Some(12.0), None, Some(5.0)),
            ],
        };
        let last = table.last_complete().unwrap();
        assert_eq!(last.features(), Some([11.0, 55.0, 4.0]));
    }

    #[test]
    fn temperature_stats_ignore_missing_values() {
        let table = WeatherTable {
            rows: vec![
                row(0, None, Some(50.0), Some(3.0)),
                row(1, Some(10.0), Some(50.0), Some(3.0)),
                row(2, Some(20.0), Some(50.0), Some(3.0)),
            ],
        };
        let stats = TemperatureStats::from_table(&table).unwrap();
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 20.0);
        assert!((stats.mean - 15.0).abs() < 1e-12);

        assert!(TemperatureStats::from_table(&WeatherTable::default()).is_none());
    }
}
