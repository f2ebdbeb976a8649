//! Trimmed-down World Weather Online records for tests.

use serde_json::{Value, json};

use crate::model::RawWeatherDocument;

const ICON_URL: &str =
    "https://cdn.worldweatheronline.com/images/wsymbols01_png_64/wsymbol_0001_sunny.png";

pub(crate) fn astronomy() -> Value {
    json!({
        "sunrise": "08:06 AM",
        "sunset": "04:01 PM",
        "moonrise": "01:10 PM",
        "moonset": "04:57 AM",
        "moon_phase": "Waxing Crescent",
        "moon_illumination": "62"
    })
}

pub(crate) fn hour(time: &str, utc_date: &str, utc_time: &str) -> Value {
    json!({
        "time": time,
        "tempC": "5",
        "windspeedKmph": "10",
        "winddir16Point": "SW",
        "weatherCode": "113",
        "weatherIconUrl": [{ "value": ICON_URL }],
        "weatherDesc": [{ "value": "Clear" }],
        "pressure": "1016",
        "uvIndex": "1",
        "UTCdate": utc_date,
        "UTCtime": utc_time,
        "isdaytime": "no"
    })
}

pub(crate) fn day(date: &str, hours: Vec<Value>) -> Value {
    json!({
        "date": date,
        "astronomy": [astronomy()],
        "maxtempC": "8",
        "mintempC": "1",
        "avgtempC": "4",
        "totalSnow_cm": "0.0",
        "sunHour": "7.0",
        "uvIndex": "2",
        "hourly": hours
    })
}

pub(crate) fn document(days: Vec<Value>) -> RawWeatherDocument {
    RawWeatherDocument::new(json!({
        "data": {
            "request": [{ "type": "LatLon", "query": "Lat 40.71 and Lon -74.01" }],
            "weather": days
        }
    }))
}
