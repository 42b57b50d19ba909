use chrono::NaiveDate;
use serde_json::Value;

use crate::{
    feed::client::RawFeed,
    foundation::error::{NeoError, NeoResult},
};

/// One close-approach object with every field the report needs.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct NormalizedNeo {
    pub name: String,
    pub id: String,
    /// Estimated minimum diameter in meters, rounded to 2 decimals.
    pub min_diam_m: f64,
    /// Estimated maximum diameter in meters, rounded to 2 decimals.
    pub max_diam_m: f64,
    pub speed_kmh: i64,
    pub miss_distance_km: i64,
    /// `YYYY-MM-DD`, as reported by the feed.
    pub approach_date: String,
}

/// First and last date key of a feed response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    /// Span over `YYYY-MM-DD` keys. Fails on zero keys or on a key that is not a date.
    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> NeoResult<Self> {
        let mut span: Option<Self> = None;
        for key in keys {
            let d = NaiveDate::parse_from_str(key, "%Y-%m-%d").map_err(|e| {
                NeoError::validation(format!("feed date key '{key}' is not YYYY-MM-DD: {e}"))
            })?;
            span = Some(match span {
                None => Self { start: d, end: d },
                Some(s) => Self {
                    start: s.start.min(d),
                    end: s.end.max(d),
                },
            });
        }
        span.ok_or_else(|| NeoError::validation("feed contains no dates; cannot compute span"))
    }

    pub fn subtitle(&self) -> String {
        format!("from {} to {}", self.start, self.end)
    }
}

/// Result of flattening a [`RawFeed`].
#[derive(Clone, Debug, PartialEq)]
pub struct Extraction {
    /// Kept records in response order of the date keys, then record order within each date.
    pub neos: Vec<NormalizedNeo>,
    pub span: DateSpan,
    /// Records skipped because a required field was missing or unreadable.
    pub dropped: usize,
}

/// Read the required fields of one raw record, or `None` if any is missing.
///
/// Velocity and miss distance come from the first close-approach entry; the feed encodes them
/// as decimal strings, but plain JSON numbers are accepted too.
pub fn normalize_record(record: &Value) -> Option<NormalizedNeo> {
    let name = record.get("name")?.as_str()?.to_string();
    let id = match record.get("id")? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let min_diam = record
        .pointer("/estimated_diameter/meters/estimated_diameter_min")?
        .as_f64()?;
    let max_diam = record
        .pointer("/estimated_diameter/meters/estimated_diameter_max")?
        .as_f64()?;

    let approach = record.pointer("/close_approach_data/0")?;
    let speed = decimal(approach.pointer("/relative_velocity/kilometers_per_hour")?)?;
    let miss = decimal(approach.pointer("/miss_distance/kilometers")?)?;
    let approach_date = approach.get("close_approach_date")?.as_str()?.to_string();

    Some(NormalizedNeo {
        name,
        id,
        min_diam_m: round_to(min_diam, 2),
        max_diam_m: round_to(max_diam, 2),
        speed_kmh: speed.round_ties_even() as i64,
        miss_distance_km: miss.round_ties_even() as i64,
        approach_date,
    })
}

/// Flatten a feed into normalized records and its date span.
#[tracing::instrument(skip(raw), fields(dates = raw.len()))]
pub fn extract(raw: &RawFeed) -> NeoResult<Extraction> {
    let span = DateSpan::from_keys(raw.keys().map(String::as_str))?;

    let mut neos = Vec::new();
    let mut dropped = 0usize;
    for (date, records) in raw {
        for (idx, record) in records.iter().enumerate() {
            match normalize_record(record) {
                Some(neo) => neos.push(neo),
                None => {
                    dropped += 1;
                    tracing::debug!(%date, idx, "skipping record with missing fields");
                }
            }
        }
    }

    tracing::info!(
        kept = neos.len(),
        dropped,
        start = %span.start,
        end = %span.end,
        "extracted NEO records"
    );
    Ok(Extraction {
        neos,
        span,
        dropped,
    })
}

fn decimal(v: &Value) -> Option<f64> {
    let x = match v {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    x.is_finite().then_some(x)
}

fn round_to(x: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (x * scale).round_ties_even() / scale
}

#[cfg(test)]
#[path = "../../tests/unit/feed/extract.rs"]
mod tests;
