//! Upstream data: geocoding, hourly history fetch, and normalization.

pub mod archive;
pub mod cache;
pub mod client;
pub mod geocode;
pub mod normalize;

pub use archive::{fetch_hourly, history_window};
pub use cache::ResponseCache;
pub use client::CachedClient;
pub use geocode::{default_location, resolve_location};
pub use normalize::{forward_fill, normalize_hourly};
