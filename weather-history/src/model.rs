use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{HistoryError, Result};

/// A flat JSON object, keys kept in insertion order.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `lat,lon`, as the provider expects it in `q`.
    pub fn as_query(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }
}

/// One location, one inclusive date range.
///
/// The provider serves at most 35 days per call; longer ranges are the
/// caller's problem (see [`HistoryRequest::MAX_SPAN_DAYS`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRequest {
    pub coordinate: Coordinate,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl HistoryRequest {
    pub const MAX_SPAN_DAYS: i64 = 35;

    pub fn new(lat: f64, lon: f64, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            coordinate: Coordinate::new(lat, lon),
            start,
            end,
        }
    }

    /// Number of calendar days covered, both ends included.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn exceeds_provider_limit(&self) -> bool {
        self.span_days() > Self::MAX_SPAN_DAYS
    }
}

/// The provider's JSON answer, untouched.
///
/// Expected shape: `{ "data": { "weather": [ <daily record>, ... ] } }`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawWeatherDocument(Value);

impl RawWeatherDocument {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// The daily records under `data.weather`.
    pub fn days(&self) -> Result<&[Value]> {
        self.0
            .get("data")
            .and_then(|data| data.get("weather"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| HistoryError::malformed("expected an array at data.weather"))
    }
}

impl From<Value> for RawWeatherDocument {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// A daily record with its astronomy entry merged in and the nested
/// `astronomy`/`hourly` lists gone.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedDailyRow {
    /// Join key.
    pub date: String,
    /// Every other daily and astronomy field.
    pub fields: Record,
}

/// One hourly observation tagged with the day it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedHourlyRow {
    /// The owning day's `date`.
    pub date: String,
    /// Hourly scalars, `weatherDesc` unwrapped, `weatherIconUrl` dropped.
    pub fields: Record,
}

/// One output row: hourly fields, then daily fields, then the derived
/// timestamps and the caller's id. Serialises as a single flat object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(flatten)]
    pub fields: Record,
    pub utc_datetime: String,
    pub local_datetime: String,
    pub id: String,
}

impl ResultRow {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HourlyTable {
    rows: Vec<ResultRow>,
}

impl HourlyTable {
    pub fn new(rows: Vec<ResultRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultRow> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<ResultRow> {
        self.rows
    }

    /// Column names in first-seen order, derived columns last.
    pub fn columns(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut columns: Vec<String> = self
            .rows
            .iter()
            .flat_map(|row| row.fields.keys())
            .filter(|key| seen.insert(*key))
            .cloned()
            .collect();

        columns.extend(["utc_datetime", "local_datetime", "id"].map(String::from));
        columns
    }
}

impl IntoIterator for HourlyTable {
    type Item = ResultRow;
    type IntoIter = std::vec::IntoIter<ResultRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a HourlyTable {
    type Item = &'a ResultRow;
    type IntoIter = std::slice::Iter<'a, ResultRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
