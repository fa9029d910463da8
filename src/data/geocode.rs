//! City name → coordinate, via a Nominatim-compatible search API.

use serde::Deserialize;
use tracing::info;

use crate::data::client::CachedClient;
use crate::domain::{Coordinate, DEFAULT_CITY, DEFAULT_COORDINATE, Location};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

/// Location served without a geocoder round trip: empty input or the default city.
pub fn default_location(city: &str) -> Option<Location> {
    let city = city.trim();
    if city.is_empty() || city.eq_ignore_ascii_case(DEFAULT_CITY) {
        return Some(Location {
            name: DEFAULT_CITY.to_string(),
            coordinate: DEFAULT_COORDINATE,
        });
    }
    None
}

/// Resolve a free-text city name. The first geocoder match wins.
pub fn resolve_location(
    client: &CachedClient,
    geocoder_url: &str,
    city: &str,
) -> Result<Location, AppError> {
    if let Some(location) = default_location(city) {
        return Ok(location);
    }

    let city = city.trim();
    let results: Vec<SearchResult> = client.get_json(
        geocoder_url,
        &[
            ("q", city.to_string()),
            ("format", "json".to_string()),
            ("limit", "1".to_string()),
        ],
    )?;

    let first = results
        .into_iter()
        .next()
        .ok_or_else(|| AppError::LocationNotFound {
            city: city.to_string(),
        })?;

    let coordinate = Coordinate {
        latitude: parse_degrees(&first.lat, "lat")?,
        longitude: parse_degrees(&first.lon, "lon")?,
    };
    info!(city, lat = coordinate.latitude, lon = coordinate.longitude, "geocoded");

    Ok(Location {
        name: city.to_string(),
        coordinate,
    })
}

fn parse_degrees(raw: &str, field: &str) -> Result<f64, AppError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::MalformedPayload(format!("invalid geocoder {field} '{raw}'")))
}
