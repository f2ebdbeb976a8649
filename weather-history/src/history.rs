use crate::{
    HistoryRequest, HourlyTable,
    error::Result,
    provider::WeatherHistoryProvider,
    timezone::{TimezoneResolver, TzfResolver},
    transform::transform,
};

/// Fetch-then-transform for one location and date range.
#[derive(Debug)]
pub struct HourlyHistory<P, R = TzfResolver> {
    provider: P,
    resolver: R,
}

impl<P: WeatherHistoryProvider> HourlyHistory<P> {
    /// Uses the bundled offline timezone lookup.
    pub fn with_default_resolver(provider: P) -> Self {
        Self::new(provider, TzfResolver::new())
    }
}

impl<P: WeatherHistoryProvider, R: TimezoneResolver> HourlyHistory<P, R> {
    pub fn new(provider: P, resolver: R) -> Self {
        Self { provider, resolver }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Hourly rows for `request`, every row tagged with `id`.
    pub async fn hourly_table(&self, request: &HistoryRequest, id: &str) -> Result<HourlyTable> {
        let document = self.provider.fetch_history(request).await?;
        let coordinate = request.coordinate;

        let table = transform(&document, coordinate.lat, coordinate.lon, id, &self.resolver)?;

        tracing::info!(
            "Built {} hourly rows for '{id}' ({} to {})",
            table.len(),
            request.start,
            request.end
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        RawWeatherDocument,
        error::HistoryError,
        timezone::FixedTimezone,
        transform::fixtures::{day, document, hour},
    };
    use async_trait::async_trait;
    use chrono::NaiveDate;

    #[derive(Debug)]
    struct CannedProvider(RawWeatherDocument);

    #[async_trait]
    impl WeatherHistoryProvider for CannedProvider {
        async fn fetch_history(&self, _request: &HistoryRequest) -> Result<RawWeatherDocument> {
            Ok(self.0.clone())
        }
    }

    fn request() -> HistoryRequest {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date");
        HistoryRequest::new(40.7128, -74.0060, date, date)
    }

    #[tokio::test]
    async fn fetches_and_transforms() {
        let provider = CannedProvider(document(vec![day(
            "2023-01-01",
            vec![hour("0", "2023-01-01", "500"), hour("1200", "2023-01-01", "1700")],
        )]));
        let history = HourlyHistory::new(provider, FixedTimezone::named("America/New_York"));

        let table = history.hourly_table(&request(), "nyc").await.unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].local_datetime, "2023-01-01T00:00:00-05:00");
        assert_eq!(table.rows()[0].utc_datetime, "2023-01-01T05:00:00+00:00");
        assert!(table.iter().all(|row| row.id == "nyc"));
    }

    #[tokio::test]
    async fn provider_is_reachable_after_construction() {
        let doc = document(vec![day("2023-01-01", vec![])]);
        let history = HourlyHistory::new(CannedProvider(doc.clone()), FixedTimezone::unknown());

        let fetched = history.provider().fetch_history(&request()).await.unwrap();
        assert_eq!(fetched.as_value(), doc.as_value());
    }

    #[tokio::test]
    async fn transform_errors_propagate() {
        let provider = CannedProvider(document(vec![
            day("2023-01-01", vec![hour("0", "2023-01-01", "0")]),
            day("2023-01-01", vec![]),
        ]));
        let history = HourlyHistory::new(provider, FixedTimezone::unknown());

        let err = history.hourly_table(&request(), "nyc").await.unwrap_err();
        assert!(matches!(err, HistoryError::Join { matches: 2, .. }));
    }

    #[tokio::test]
    async fn boxed_providers_are_accepted() {
        let provider: Box<dyn WeatherHistoryProvider> =
            Box::new(CannedProvider(document(vec![])));
        let history = HourlyHistory::new(provider, FixedTimezone::unknown());

        let table = history.hourly_table(&request(), "empty").await.unwrap();
        assert!(table.is_empty());
    }
}
