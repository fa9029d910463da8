//! Open-Meteo archive API integration (hourly history).

use chrono::{Duration, NaiveDate};
use tracing::info;

use crate::data::client::CachedClient;
use crate::domain::{Coordinate, DateWindow, HourlyVariable, archive_ceiling, archive_floor};
use crate::error::AppError;

/// History window ending "today", clamped into the range the archive serves.
///
/// The window is anchored at the clamped end date, so `start <= end` holds
/// even when `today` lies past the ceiling.
pub fn history_window(today: NaiveDate, days: i64) -> DateWindow {
    let floor = archive_floor();
    let ceiling = archive_ceiling();

    let end = today.clamp(floor, ceiling);
    let start = Duration::try_days(days.max(0))
        .and_then(|span| end.checked_sub_signed(span))
        .unwrap_or(floor)
        .clamp(floor, ceiling);

    DateWindow { start, end }
}

/// Fetch the raw hourly payload for `coordinate` over `window`.
pub fn fetch_hourly(
    client: &CachedClient,
    archive_url: &str,
    coordinate: Coordinate,
    window: DateWindow,
    variables: &[HourlyVariable],
) -> Result<serde_json::Value, AppError> {
    let hourly = variables
        .iter()
        .map(|v| v.api_name())
        .collect::<Vec<_>>()
        .join(",");

    info!(
        lat = coordinate.latitude,
        lon = coordinate.longitude,
        start = %window.start,
        end = %window.end,
        "requesting hourly history"
    );

    client.get_json(
        archive_url,
        &[
            ("latitude", coordinate.latitude.to_string()),
            ("longitude", coordinate.longitude.to_string()),
            ("start_date", window.start.format("%Y-%m-%d").to_string()),
            ("end_date", window.end.format("%Y-%m-%d").to_string()),
            ("hourly", hourly),
            ("timezone", "auto".to_string()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn window_inside_range_is_untouched() {
        let w = history_window(d(2024, 6, 20), 14);
        assert_eq!(w.start, d(2024, 6, 6));
        assert_eq!(w.end, d(2024, 6, 20));
    }

    #[test]
    fn window_past_ceiling_is_anchored_at_ceiling() {
        let w = history_window(d(2026, 10, 19), 14);
        assert_eq!(w.end, d(2025, 1, 8));
        assert_eq!(w.start, d(2024, 12, 25));
    }

    #[test]
    fn window_before_floor_is_clamped() {
        let w = history_window(d(1939, 5, 1), 14);
        assert_eq!(w.start, d(1940, 1, 1));
        assert_eq!(w.end, d(1940, 1, 1));

        let w = history_window(d(1940, 1, 5), 14);
        assert_eq!(w.start, d(1940, 1, 1));
        assert_eq!(w.end, d(1940, 1, 5));
    }

    #[test]
    fn window_always_within_bounds_and_ordered() {
        let mut today = d(1935, 1, 1);
        while today < d(2030, 1, 1) {
            let w = history_window(today, 14);
            assert!(w.start >= archive_floor());
            assert!(w.end <= archive_ceiling());
            assert!(w.start <= w.end);
            today += Duration::days(97);
        }
    }

    #[test]
    fn oversized_span_falls_back_to_floor() {
        for days in [1_000_000, i64::MAX] {
            let w = history_window(d(2024, 6, 20), days);
            assert_eq!(w.start, archive_floor());
            assert_eq!(w.end, d(2024, 6, 20));
        }
    }
}
