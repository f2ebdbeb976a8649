//! Turning the provider's `date` + hour-code pairs into zoned timestamps.
//!
//! Hour codes are hundreds notation on a 24h clock: `"0"` is midnight,
//! `"300"` is 03:00, `"1500"` is 15:00.

use chrono::{
    DateTime, LocalResult, NaiveDate, NaiveDateTime, Offset, SecondsFormat, TimeDelta, TimeZone,
};
use chrono_tz::Tz;

use crate::error::{HistoryError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Hour of day encoded by `hour_code`, truncating the minutes part.
pub fn hour_of_day(date: &str, hour_code: &str) -> Result<u32> {
    let code: i64 = hour_code
        .trim()
        .parse()
        .map_err(|_| invalid(date, hour_code, "hour code is not an integer"))?;

    let hour = code / 100;
    if !(0..=23).contains(&hour) {
        return Err(invalid(date, hour_code, format!("hour {hour} is outside 0..=23")));
    }

    Ok(hour as u32)
}

/// `date` at the hour encoded by `hour_code`, minute and second zero, as wall
/// clock time in `tz`.
///
/// A fall-back hour that occurs twice resolves to the later, standard-time
/// instant. A wall time that falls in a spring-forward gap is read with the
/// offset in force before the gap, which lands it just past the transition.
pub fn derive_timestamp(date: &str, hour_code: &str, tz: Tz) -> Result<DateTime<Tz>> {
    let day = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|e| invalid(date, hour_code, format!("invalid date: {e}")))?;
    let hour = hour_of_day(date, hour_code)?;

    let naive = day
        .and_hms_opt(hour, 0, 0)
        .ok_or_else(|| invalid(date, hour_code, "unrepresentable time"))?;

    Ok(localize(naive, tz))
}

/// RFC 3339, whole seconds, explicit numeric offset (never `Z`).
pub fn format_timestamp(timestamp: &DateTime<Tz>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, false)
}

fn localize(naive: NaiveDateTime, tz: Tz) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(_, latest) => latest,
        LocalResult::None => {
            let before = tz
                .offset_from_utc_datetime(&(naive - TimeDelta::days(1)))
                .fix();
            let utc = naive - TimeDelta::seconds(i64::from(before.local_minus_utc()));
            tz.from_utc_datetime(&utc)
        }
    }
}

fn invalid(date: &str, code: &str, reason: impl Into<String>) -> HistoryError {
    HistoryError::InvalidTimeCode {
        date: date.to_string(),
        code: code.to_string(),
        reason: reason.into(),
    }
}
