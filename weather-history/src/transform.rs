use std::collections::{HashMap, HashSet};

use chrono_tz::Tz;
use serde_json::Value;

use crate::{
    error::{HistoryError, Result},
    model::{
        FlattenedDailyRow, FlattenedHourlyRow, HourlyTable, RawWeatherDocument, Record, ResultRow,
    },
    timestamp::{derive_timestamp, format_timestamp},
    timezone::{TimezoneResolver, TzfResolver, resolve_timezone},
};

pub mod daily;
pub mod hourly;

#[cfg(test)]
pub(crate) mod fixtures;

pub use daily::flatten_daily;
pub use hourly::flatten_hourly;

/// Source columns consumed by the timestamp columns and left out of the output.
const TIMESTAMP_SOURCE_COLUMNS: [&str; 4] = ["date", "time", "UTCdate", "UTCtime"];

/// Suffixes for a column name present on both sides of the join.
const HOURLY_COLLISION_SUFFIX: &str = "_x";
const DAILY_COLLISION_SUFFIX: &str = "_y";

/// Reshapes provider documents into [`HourlyTable`]s using one timezone
/// resolver for every call.
#[derive(Debug)]
pub struct Transformer<R = TzfResolver> {
    resolver: R,
}

impl<R: TimezoneResolver> Transformer<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn transform(
        &self,
        document: &RawWeatherDocument,
        lat: f64,
        lon: f64,
        id: &str,
    ) -> Result<HourlyTable> {
        transform(document, lat, lon, id, &self.resolver)
    }
}

impl Default for Transformer<TzfResolver> {
    fn default() -> Self {
        Self::new(TzfResolver::new())
    }
}

/// One row per hourly entry in `document`, each carrying its day's daily and
/// astronomy fields, `utc_datetime`, `local_datetime` and `id`.
///
/// Rows come out in day order, then hour order. Any failing day or hour
/// fails the whole call.
pub fn transform(
    document: &RawWeatherDocument,
    lat: f64,
    lon: f64,
    id: &str,
    resolver: &dyn TimezoneResolver,
) -> Result<HourlyTable> {
    let days = document.days()?;

    let mut daily_rows = Vec::with_capacity(days.len());
    let mut hourly_rows = Vec::new();
    for day in days {
        daily_rows.push(flatten_daily(day)?);
        for hour in flatten_hourly(day)? {
            hourly_rows.push(hour?);
        }
    }

    let daily_by_date = index_by_date(&daily_rows);
    let tz = resolve_timezone(resolver, lat, lon);

    let rows = hourly_rows
        .into_iter()
        .map(|hour| {
            let day = join(&daily_by_date, &hour.date)?;
            build_row(hour, day, tz, id)
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        "Transformed {} days into {} hourly rows for '{id}' ({tz})",
        daily_rows.len(),
        rows.len()
    );

    Ok(HourlyTable::new(rows))
}

/// The `date` of a daily record, as a string.
pub(crate) fn record_date<'a>(record: &'a Record, context: &str) -> Result<&'a str> {
    match record.get("date") {
        Some(Value::String(date)) => Ok(date.as_str()),
        Some(other) => Err(HistoryError::malformed(format!(
            "'date' of {context} is {other}, expected a string"
        ))),
        None => Err(HistoryError::missing("date", context)),
    }
}

fn index_by_date(rows: &[FlattenedDailyRow]) -> HashMap<&str, Vec<&FlattenedDailyRow>> {
    let mut index: HashMap<&str, Vec<&FlattenedDailyRow>> = HashMap::new();
    for row in rows {
        index.entry(row.date.as_str()).or_default().push(row);
    }
    index
}

fn join<'a>(
    index: &HashMap<&str, Vec<&'a FlattenedDailyRow>>,
    date: &str,
) -> Result<&'a FlattenedDailyRow> {
    match index.get(date).map(Vec::as_slice) {
        Some([day]) => Ok(*day),
        other => Err(HistoryError::Join {
            date: date.to_string(),
            matches: other.map_or(0, <[_]>::len),
        }),
    }
}

fn build_row(
    hour: FlattenedHourlyRow,
    day: &FlattenedDailyRow,
    tz: Tz,
    id: &str,
) -> Result<ResultRow> {
    let utc_date = text_field(&hour.fields, "UTCdate", &hour.date)?;
    let utc_time = text_field(&hour.fields, "UTCtime", &hour.date)?;
    let local_time = text_field(&hour.fields, "time", &hour.date)?;

    let utc_datetime = derive_timestamp(&utc_date, &utc_time, Tz::UTC)?;
    let local_datetime = derive_timestamp(&hour.date, &local_time, tz)?;

    let hourly: Vec<(String, Value)> = hour
        .fields
        .into_iter()
        .filter(|(key, _)| !TIMESTAMP_SOURCE_COLUMNS.contains(&key.as_str()))
        .collect();

    let shared: HashSet<String> = hourly
        .iter()
        .filter(|(key, _)| day.fields.contains_key(key))
        .map(|(key, _)| key.clone())
        .collect();
    let column = |key: &String, suffix: &str| {
        if shared.contains(key) {
            format!("{key}{suffix}")
        } else {
            key.clone()
        }
    };

    let fields: Record = hourly
        .iter()
        .map(|(key, value)| (column(key, HOURLY_COLLISION_SUFFIX), value.clone()))
        .chain(
            day.fields
                .iter()
                .map(|(key, value)| (column(key, DAILY_COLLISION_SUFFIX), value.clone())),
        )
        .collect();

    Ok(ResultRow {
        fields,
        utc_datetime: format_timestamp(&utc_datetime),
        local_datetime: format_timestamp(&local_datetime),
        id: id.to_string(),
    })
}

/// Date and hour-code fields arrive as strings, hour codes occasionally as
/// bare integers.
fn text_field(fields: &Record, name: &str, date: &str) -> Result<String> {
    match fields.get(name) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(Value::Number(number)) => Ok(number.to_string()),
        Some(other) => Err(HistoryError::malformed(format!(
            "'{name}' of hourly record on {date} is {other}, expected a string"
        ))),
        None => Err(HistoryError::missing(name, format!("hourly record on {date}"))),
    }
}
