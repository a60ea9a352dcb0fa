//! Response envelope normalization
//!
//! Backends wrap table rows in a handful of envelope shapes. The first
//! envelope whose rows path holds an array wins; anything else yields no rows.

use serde::Serialize;
use serde_json::Value;

/// Known response envelope shapes, in match priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Envelope {
    /// `{ "response": { "mainResult": [...] } }`
    ResponseMainResult,
    /// `{ "mainResult": [...] }`
    MainResult,
    /// `{ "data": [...] }`
    Data,
    /// `[...]`
    Bare,
}

impl Envelope {
    pub const ALL: [Envelope; 4] = [
        Envelope::ResponseMainResult,
        Envelope::MainResult,
        Envelope::Data,
        Envelope::Bare,
    ];

    /// Path to the object holding the rows and the total
    fn container_path(&self) -> &'static [&'static str] {
        match self {
            Envelope::ResponseMainResult => &["response"],
            Envelope::MainResult | Envelope::Data | Envelope::Bare => &[],
        }
    }

    fn rows_field(&self) -> Option<&'static str> {
        match self {
            Envelope::ResponseMainResult | Envelope::MainResult => Some("mainResult"),
            Envelope::Data => Some("data"),
            Envelope::Bare => None,
        }
    }

    /// Borrow the rows array if `raw` has this shape
    pub fn rows<'a>(&self, raw: &'a Value) -> Option<&'a Vec<Value>> {
        let container = value_at(raw, self.container_path())?;
        let rows = match self.rows_field() {
            Some(field) => container.get(field)?,
            None => container,
        };
        rows.as_array()
    }

    fn total(&self, raw: &Value) -> Option<u64> {
        let container = value_at(raw, self.container_path())?;
        TOTAL_FIELDS
            .iter()
            .find_map(|field| container.get(*field).and_then(as_count))
    }
}

const TOTAL_FIELDS: [&str; 3] = ["total", "totalCount", "count"];

/// Rows and total extracted from a raw response
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedResponse {
    pub rows: Vec<Value>,
    pub total: u64,
    pub envelope: Option<Envelope>,
}

/// Walk object fields along `path`
pub fn value_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, field| current.get(*field))
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn matching_envelope(raw: &Value) -> Option<(Envelope, &Vec<Value>)> {
    Envelope::ALL
        .iter()
        .find_map(|envelope| envelope.rows(raw).map(|rows| (*envelope, rows)))
}

/// Extract table rows from any known envelope, defaulting to empty
pub fn extract_rows(raw: &Value) -> Vec<Value> {
    matching_envelope(raw)
        .map(|(_, rows)| rows.clone())
        .unwrap_or_default()
}

/// Extract the server-side total from the matching envelope
pub fn extract_total(raw: &Value) -> Option<u64> {
    matching_envelope(raw).and_then(|(envelope, _)| envelope.total(raw))
}

/// Extract rows and total; the total defaults to the row count
pub fn normalize_response(raw: &Value) -> NormalizedResponse {
    match matching_envelope(raw) {
        Some((envelope, rows)) => NormalizedResponse {
            total: envelope.total(raw).unwrap_or(rows.len() as u64),
            rows: rows.clone(),
            envelope: Some(envelope),
        },
        None => NormalizedResponse::default(),
    }
}
