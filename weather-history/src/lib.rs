//! Historical hourly weather for a single point, flattened into rows.
//!
//! This crate defines:
//! - Configuration (API key, endpoint) loaded from TOML and the environment
//! - A provider abstraction plus the World Weather Online implementation
//! - The transformation of the provider's nested daily/hourly JSON into an
//!   [`HourlyTable`] with `utc_datetime` and `local_datetime` columns
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use weather_history::{Config, HistoryRequest, HourlyHistory, WorldWeatherOnlineProvider};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let provider = WorldWeatherOnlineProvider::from_config(&Config::load()?)?;
//! let history = HourlyHistory::with_default_resolver(provider);
//!
//! let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();
//! let table = history
//!     .hourly_table(&HistoryRequest::new(40.7128, -74.0060, start, end), "nyc")
//!     .await?;
//! println!("{}", serde_json::to_string_pretty(&table)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod provider;
pub mod timestamp;
pub mod timezone;
pub mod transform;

pub use config::Config;
pub use error::{HistoryError, Result};
pub use history::HourlyHistory;
pub use model::{
    Coordinate, FlattenedDailyRow, FlattenedHourlyRow, HistoryRequest, HourlyTable,
    RawWeatherDocument, Record, ResultRow,
};
pub use provider::{WeatherHistoryProvider, WorldWeatherOnlineProvider};
pub use timestamp::{derive_timestamp, format_timestamp};
pub use timezone::{FixedTimezone, TimezoneResolver, TzfResolver, resolve_timezone};
pub use transform::{Transformer, flatten_daily, flatten_hourly, transform};
