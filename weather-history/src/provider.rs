use crate::{HistoryRequest, RawWeatherDocument, error::Result};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod worldweatheronline;

pub use worldweatheronline::WorldWeatherOnlineProvider;

/// Source of raw historical weather documents.
///
/// Implementations return the provider's JSON as-is; all interpretation
/// happens in [`transform`](crate::transform()).
#[async_trait]
pub trait WeatherHistoryProvider: Send + Sync + Debug {
    async fn fetch_history(&self, request: &HistoryRequest) -> Result<RawWeatherDocument>;
}

#[async_trait]
impl<P: WeatherHistoryProvider + ?Sized> WeatherHistoryProvider for Box<P> {
    async fn fetch_history(&self, request: &HistoryRequest) -> Result<RawWeatherDocument> {
        (**self).fetch_history(request).await
    }
}

/// Cut a response body down to something that fits in an error message.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
