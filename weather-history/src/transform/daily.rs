use serde_json::Value;

use crate::{
    error::{HistoryError, Result},
    model::{FlattenedDailyRow, Record},
    transform::record_date,
};

/// Flatten one daily record: merge its first `astronomy` entry into the top
/// level and leave out the nested `astronomy` and `hourly` lists.
///
/// Astronomy fields overwrite daily fields of the same name. Astronomy
/// entries after the first are ignored.
pub fn flatten_daily(day: &Value) -> Result<FlattenedDailyRow> {
    let record = day
        .as_object()
        .ok_or_else(|| HistoryError::malformed("daily record is not a JSON object"))?;
    let date = record_date(record, "daily record")?;

    let astronomy = record
        .get("astronomy")
        .and_then(Value::as_array)
        .and_then(|entries| entries.first())
        .and_then(Value::as_object)
        .ok_or_else(|| HistoryError::missing("astronomy", format!("daily record {date}")))?;

    let mut fields: Record = record
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "date" | "astronomy" | "hourly"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    fields.extend(
        astronomy
            .iter()
            .filter(|(key, _)| key.as_str() != "date")
            .map(|(key, value)| (key.clone(), value.clone())),
    );

    Ok(FlattenedDailyRow {
        date: date.to_string(),
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::fixtures::{astronomy, day};
    use serde_json::json;

    #[test]
    fn astronomy_is_merged_to_top_level() {
        let row = flatten_daily(&day("2023-01-01", vec![])).unwrap();

        assert_eq!(row.date, "2023-01-01");
        assert_eq!(row.fields["maxtempC"], "8");
        assert_eq!(row.fields["sunrise"], "08:06 AM");
        assert_eq!(row.fields["moon_phase"], "Waxing Crescent");
        assert!(!row.fields.contains_key("astronomy"));
        assert!(!row.fields.contains_key("hourly"));
        assert!(!row.fields.contains_key("date"));
    }

    #[test]
    fn astronomy_wins_on_collision_and_extras_are_ignored() {
        let mut record = day("2023-01-01", vec![]);
        record["sunHour"] = json!("7.0");
        record["astronomy"] = json!([
            { "sunHour": "8.5", "sunrise": "08:00 AM" },
            { "sunrise": "never used" }
        ]);

        let row = flatten_daily(&record).unwrap();

        assert_eq!(row.fields["sunHour"], "8.5");
        assert_eq!(row.fields["sunrise"], "08:00 AM");
    }

    #[test]
    fn missing_or_empty_astronomy_is_an_error() {
        let mut record = day("2023-01-01", vec![]);
        record
            .as_object_mut()
            .expect("fixture is an object")
            .remove("astronomy");
        let err = flatten_daily(&record).unwrap_err();
        assert!(matches!(
            err,
            HistoryError::MissingField { ref field, .. } if field == "astronomy"
        ));

        record["astronomy"] = json!([]);
        let err = flatten_daily(&record).unwrap_err();
        assert!(matches!(
            err,
            HistoryError::MissingField { ref field, .. } if field == "astronomy"
        ));
    }

    #[test]
    fn missing_date_is_an_error() {
        let record = json!({ "astronomy": [astronomy()], "hourly": [] });
        let err = flatten_daily(&record).unwrap_err();
        assert!(matches!(err, HistoryError::MissingField { ref field, .. } if field == "date"));
    }
}
