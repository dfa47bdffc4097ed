//! Sample file loading.
//!
//! CSV files carry one column per series with the series id as header. An
//! optional `timestamp` column (RFC 3339) stamps every row. JSON files are
//! a bare array of numbers, an object of `id -> [numbers]`, or either of
//! those nested under a `"series"` key.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

/// Name given to a series read from a bare JSON array.
pub const DEFAULT_SERIES: &str = "series";

/// One series read from a file, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSeries {
    pub id: String,
    pub points: Vec<(Option<DateTime<Utc>>, f64)>,
}

impl LoadedSeries {
    fn from_values(id: String, values: Vec<f64>) -> Self {
        Self {
            id,
            points: values.into_iter().map(|v| (None, v)).collect(),
        }
    }
}

#[derive(Deserialize)]
struct NamedSeries {
    id: String,
    values: Vec<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SeriesPayload {
    Values(Vec<f64>),
    Listed(Vec<NamedSeries>),
    Map(BTreeMap<String, Vec<f64>>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonInput {
    Wrapped { series: SeriesPayload },
    Bare(SeriesPayload),
}

/// Load every series in `path`, picking the format from the extension.
pub fn load(path: &Path) -> Result<Vec<LoadedSeries>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let series = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        _ => load_csv(path).or_else(|_| load_json(path))?,
    };
    if series.is_empty() {
        bail!("no series found in {}", path.display());
    }
    debug!(path = %path.display(), series = series.len(), "input loaded");
    Ok(series)
}

pub fn load_csv(path: &Path) -> Result<Vec<LoadedSeries>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));
    let headers = reader
        .headers()
        .with_context(|| format!("failed to read CSV header of {}", path.display()))?
        .clone();

    let timestamp_col = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("timestamp"));
    let mut series: Vec<LoadedSeries> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != timestamp_col)
        .map(|(_, h)| LoadedSeries {
            id: h.trim().to_string(),
            points: Vec::new(),
        })
        .collect();

    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to read CSV row {}", row + 1))?;
        let timestamp = match timestamp_col.and_then(|c| record.get(c)) {
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(raw.trim())
                    .with_context(|| format!("row {}: bad timestamp '{}'", row + 1, raw))?
                    .with_timezone(&Utc),
            ),
            None => None,
        };

        let cells = record
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != timestamp_col)
            .map(|(_, cell)| cell);
        for (target, cell) in series.iter_mut().zip(cells) {
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            let value: f64 = cell.parse().with_context(|| {
                format!("row {}, column '{}': '{}' is not a number", row + 1, target.id, cell)
            })?;
            target.points.push((timestamp, value));
        }
    }

    Ok(series)
}

pub fn load_json(path: &Path) -> Result<Vec<LoadedSeries>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let input: JsonInput = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| anyhow!("{}: unsupported JSON layout ({})", path.display(), e))?;

    let payload = match input {
        JsonInput::Wrapped { series } | JsonInput::Bare(series) => series,
    };
    Ok(match payload {
        SeriesPayload::Values(values) => {
            vec![LoadedSeries::from_values(DEFAULT_SERIES.to_string(), values)]
        }
        SeriesPayload::Listed(list) => list
            .into_iter()
            .map(|s| LoadedSeries::from_values(s.id, s.values))
            .collect(),
        SeriesPayload::Map(map) => map
            .into_iter()
            .map(|(id, values)| LoadedSeries::from_values(id, values))
            .collect(),
    })
}
