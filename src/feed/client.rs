use std::path::Path;

use anyhow::Context as _;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde_json::Value;

use crate::{
    config::settings::FeedSettings,
    foundation::error::{NeoError, NeoResult},
};

/// The feed's `near_earth_objects` mapping: calendar date string to untyped per-object records.
///
/// Iterates in response document order; date keys are not sorted.
pub type RawFeed = IndexMap<String, Vec<Value>>;

/// Date window for one feed request. An absent `end_date` is left to the server default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeedRequest {
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl FeedRequest {
    pub fn new(start_date: NaiveDate, end_date: Option<NaiveDate>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }
}

/// Query parameters for `req`, in wire order. `end_date` is omitted when unset.
pub fn feed_query(req: &FeedRequest, api_key: &str) -> Vec<(&'static str, String)> {
    let mut q = Vec::with_capacity(3);
    q.push(("start_date", req.start_date.format("%Y-%m-%d").to_string()));
    if let Some(end) = req.end_date {
        q.push(("end_date", end.format("%Y-%m-%d").to_string()));
    }
    q.push(("api_key", api_key.to_string()));
    q
}

/// Decode a feed response body and pull out its `near_earth_objects` field.
pub fn parse_feed(body: &str) -> NeoResult<RawFeed> {
    let mut doc: Value = serde_json::from_str(body)
        .map_err(|e| NeoError::serde(format!("decode feed response: {e}")))?;
    let neos = doc
        .get_mut("near_earth_objects")
        .map(Value::take)
        .ok_or_else(|| NeoError::feed("response has no `near_earth_objects` field"))?;
    serde_json::from_value(neos)
        .map_err(|e| NeoError::feed(format!("`near_earth_objects` is not a date-keyed map: {e}")))
}

/// Read the API key from a plaintext credentials file.
pub fn read_api_key(path: &Path) -> NeoResult<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read api key '{}'", path.display()))?;
    let key = raw.trim();
    if key.is_empty() {
        return Err(NeoError::validation(format!(
            "api key file '{}' is empty",
            path.display()
        )));
    }
    Ok(key.to_string())
}

/// Blocking client for the NEO feed endpoint. One request per call, no retries.
#[derive(Debug)]
pub struct FeedClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

impl FeedClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> NeoResult<Self> {
        // The run blocks on the fetch for as long as the server takes.
        let http = reqwest::blocking::Client::builder()
            .timeout(None::<std::time::Duration>)
            .build()
            .context("build feed http client")?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    /// Build a client for the configured endpoint, reading the key from `api_key_path`.
    pub fn from_settings(settings: &FeedSettings) -> NeoResult<Self> {
        let api_key = read_api_key(&settings.api_key_path)?;
        Self::new(settings.endpoint.clone(), api_key)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[tracing::instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub fn fetch(&self, req: &FeedRequest) -> NeoResult<RawFeed> {
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&feed_query(req, &self.api_key))
            .send()
            .map_err(|e| NeoError::feed(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(NeoError::feed(format!(
                "endpoint returned {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = resp
            .text()
            .map_err(|e| NeoError::feed(format!("read response body: {e}")))?;
        let feed = parse_feed(&body)?;
        tracing::info!(dates = feed.len(), bytes = body.len(), "fetched NEO feed");
        Ok(feed)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/feed/client.rs"]
mod tests;
