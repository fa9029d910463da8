//! Blocking HTTP client with a response cache in front of it.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::data::cache::ResponseCache;
use crate::domain::PipelineConfig;
use crate::error::AppError;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("weather-trend/", env!("CARGO_PKG_VERSION"));

pub struct CachedClient {
    client: Client,
    cache: ResponseCache,
}

impl CachedClient {
    pub fn new(config: &PipelineConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            cache: ResponseCache::new(&config.cache_dir, config.cache_ttl),
        })
    }

    /// GET `url` with `query` and parse the JSON body.
    ///
    /// The full URL (query included) is the cache key. Only successful
    /// responses are cached.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let request = self.client.get(url).query(query).build()?;
        let key = request.url().to_string();

        if let Some(body) = self.cache.get(&key) {
            debug!(url = %key, "cache hit");
            return parse_body(&body);
        }

        info!(url = %key, "fetching");
        let resp = self.client.execute(request)?;
        let status = resp.status();
        let body = resp.text()?;

        if !status.is_success() {
            warn!(url = %key, status = status.as_u16(), "upstream request failed");
            return Err(AppError::FetchFailed {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = parse_body(&body)?;
        if let Err(e) = self.cache.put(&key, &body) {
            warn!(url = %key, "failed to write cache entry: {e}");
        }
        Ok(parsed)
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, AppError> {
    serde_json::from_str(body)
        .map_err(|e| AppError::MalformedPayload(format!("invalid JSON body: {e}")))
}
