use async_trait::async_trait;
use reqwest::Client;

use crate::{
    Config, HistoryRequest, RawWeatherDocument,
    error::{HistoryError, Result},
    provider::truncate_body,
};

use super::WeatherHistoryProvider;

pub const DEFAULT_BASE_URL: &str =
    "https://api.worldweatheronline.com/premium/v1/past-weather.ashx";

const DATE_FORMAT: &str = "%Y-%m-%d";
const EXTRA_FIELDS: &str = "localObsTime,utcDateTime,isDayTime";
/// Hourly resolution.
const TIME_PERIOD_HOURS: &str = "1";

/// World Weather Online "past weather" endpoint.
///
/// Serves at most 35 days per request. Longer ranges are sent anyway (with
/// a warning) and truncated or rejected upstream.
#[derive(Debug, Clone)]
pub struct WorldWeatherOnlineProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WorldWeatherOnlineProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?;
        Ok(Self::with_base_url(
            api_key.to_owned(),
            config.base_url.clone(),
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The request URL carries the API key, so it is stripped from the error.
    fn fetch_error(&self, source: reqwest::Error) -> HistoryError {
        HistoryError::Fetch {
            url: self.base_url.clone(),
            source: source.without_url(),
        }
    }

    fn query(&self, request: &HistoryRequest) -> Vec<(&'static str, String)> {
        vec![
            ("key", self.api_key.clone()),
            ("q", request.coordinate.as_query()),
            ("format", "json".to_string()),
            ("extra", EXTRA_FIELDS.to_string()),
            ("date", request.start.format(DATE_FORMAT).to_string()),
            ("enddate", request.end.format(DATE_FORMAT).to_string()),
            ("tp", TIME_PERIOD_HOURS.to_string()),
        ]
    }
}

#[async_trait]
impl WeatherHistoryProvider for WorldWeatherOnlineProvider {
    async fn fetch_history(&self, request: &HistoryRequest) -> Result<RawWeatherDocument> {
        if request.exceeds_provider_limit() {
            tracing::warn!(
                "Requested {} days ({} to {}); World Weather Online returns at most {} per call",
                request.span_days(),
                request.start,
                request.end,
                HistoryRequest::MAX_SPAN_DAYS
            );
        }

        tracing::debug!(
            "Fetching hourly history for {} from {} to {}",
            request.coordinate.as_query(),
            request.start,
            request.end
        );

        let res = self
            .http
            .get(&self.base_url)
            .query(&self.query(request))
            .send()
            .await
            .map_err(|source| self.fetch_error(source))?;

        let status = res.status();
        let body = res.text().await.map_err(|source| self.fetch_error(source))?;

        if !status.is_success() {
            return Err(HistoryError::HttpStatus {
                url: self.base_url.clone(),
                status,
                body: truncate_body(&body),
            });
        }

        let document = serde_json::from_str(&body).map_err(|source| {
            HistoryError::MalformedResponse {
                reason: format!("response body is not JSON: {}", truncate_body(&body)),
                source: Some(source),
            }
        })?;

        Ok(RawWeatherDocument::new(document))
    }
}
