use serde_json::Value;

use crate::{
    error::{HistoryError, Result},
    model::{FlattenedHourlyRow, Record},
    transform::record_date,
};

/// Lazily flatten every `hourly` entry of a daily record, in source order.
///
/// Each row gets the owning day's `date`, loses `weatherIconUrl`, and has
/// `weatherDesc` unwrapped from `[{ "value": ... }]` to the bare value.
pub fn flatten_hourly(
    day: &Value,
) -> Result<impl Iterator<Item = Result<FlattenedHourlyRow>> + '_> {
    let record = day
        .as_object()
        .ok_or_else(|| HistoryError::malformed("daily record is not a JSON object"))?;
    let date = record_date(record, "daily record")?;

    let hours = record
        .get("hourly")
        .and_then(Value::as_array)
        .ok_or_else(|| HistoryError::missing("hourly", format!("daily record {date}")))?;

    Ok(hours
        .iter()
        .enumerate()
        .map(move |(index, hour)| flatten_hour(hour, date, index)))
}

fn flatten_hour(hour: &Value, date: &str, index: usize) -> Result<FlattenedHourlyRow> {
    let record = hour.as_object().ok_or_else(|| {
        HistoryError::malformed(format!("hourly entry {index} of {date} is not a JSON object"))
    })?;

    let description = record
        .get("weatherDesc")
        .and_then(Value::as_array)
        .and_then(|entries| entries.first())
        .and_then(|entry| entry.get("value"))
        .ok_or_else(|| {
            HistoryError::missing("weatherDesc", format!("hourly entry {index} of {date}"))
        })?;

    let fields: Record = record
        .iter()
        .filter_map(|(key, value)| match key.as_str() {
            "weatherIconUrl" | "date" => None,
            "weatherDesc" => Some((key.clone(), description.clone())),
            _ => Some((key.clone(), value.clone())),
        })
        .collect();

    Ok(FlattenedHourlyRow {
        date: date.to_string(),
        fields,
    })
}
