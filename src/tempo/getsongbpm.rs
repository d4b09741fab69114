//! GetSongBPM search client.
//!
//! Queries `https://api.getsongbpm.com/search/` with a free-text lookup and
//! takes the first search result as the answer. There is no similarity
//! check between the result and the queried track.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use super::provider::{LookupError, TempoProvider};
use crate::error::{AppError, Result};

/// Search endpoint of the GetSongBPM API.
pub const GETSONGBPM_API_URL: &str = "https://api.getsongbpm.com/search/";

/// Placeholder value that counts as "no key configured".
pub const PLACEHOLDER_API_KEY: &str = "YOUR_GETSONGBPM_API_KEY";

/// Per-request timeout for tempo lookups.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

/// Blocking client for the GetSongBPM search API.
pub struct GetSongBpmClient {
    http: reqwest::blocking::Client,
    api_key: Option<String>,
    base_url: String,
}

impl GetSongBpmClient {
    /// Creates a client. `api_key` of None leaves the client unconfigured.
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::transport("Creating GetSongBPM HTTP client", e))?;

        Ok(Self {
            http,
            api_key,
            base_url: GETSONGBPM_API_URL.to_string(),
        })
    }

    /// Overrides the search endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl TempoProvider for GetSongBpmClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn lookup(&self, query: &str) -> std::result::Result<Option<f64>, LookupError> {
        let api_key = self.api_key.as_deref().ok_or(LookupError::Unconfigured)?;

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("api_key", api_key), ("type", "song"), ("lookup", query)])
            .send()
            .map_err(|e| LookupError::Transport(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        match status {
            404 => return Err(LookupError::NotFound),
            401 | 403 => return Err(LookupError::Unauthorized(status)),
            _ if !response.status().is_success() => return Err(LookupError::Http(status)),
            _ => {}
        }

        let body = response
            .text()
            .map_err(|e| LookupError::Transport(e.without_url().to_string()))?;
        parse_search_body(&body)
    }
}

/// Extracts the first result's tempo from a search response body.
///
/// Results are read from `search_results`, falling back to `search`. A body
/// without a non-empty result array, or whose first result has no tempo,
/// yields `Ok(None)`. The tempo may be a string or a number.
pub fn parse_search_body(body: &str) -> std::result::Result<Option<f64>, LookupError> {
    let data: Value =
        serde_json::from_str(body).map_err(|e| LookupError::Malformed(e.to_string()))?;

    let results = data
        .get("search_results")
        .or_else(|| data.get("search"))
        .and_then(Value::as_array);

    let Some(first) = results.and_then(|r| r.first()) else {
        debug!("No search results in GetSongBPM response: {}", data);
        return Ok(None);
    };

    match first.get("tempo") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(None);
            }
            let bpm = raw
                .parse::<f64>()
                .map_err(|e| LookupError::Malformed(format!("tempo {:?}: {}", raw, e)))?;
            finite(bpm)
        }
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| LookupError::Malformed(format!("tempo {}", n)))
            .and_then(finite),
        Some(other) => Err(LookupError::Malformed(format!("tempo {}", other))),
    }
}

fn finite(bpm: f64) -> std::result::Result<Option<f64>, LookupError> {
    if bpm.is_finite() {
        Ok(Some(bpm))
    } else {
        Err(LookupError::Malformed(format!("tempo {}", bpm)))
    }
}
