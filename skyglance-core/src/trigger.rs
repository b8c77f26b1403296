use std::sync::Arc;

use crate::{
    classify::Classification,
    error::LocationError,
    fetch::WeatherFetcher,
    location::LocationSource,
    model::WeatherQuery,
};

/// The two user actions: search by city and use my location.
#[derive(Debug, Clone)]
pub struct QueryTrigger {
    fetcher: WeatherFetcher,
    location: Option<Arc<dyn LocationSource>>,
}

impl QueryTrigger {
    pub fn new(fetcher: WeatherFetcher, location: Option<Arc<dyn LocationSource>>) -> Self {
        Self { fetcher, location }
    }

    pub fn fetcher(&self) -> &WeatherFetcher {
        &self.fetcher
    }

    /// Search for the input exactly as typed. Empty input is sent as-is.
    pub async fn search(&self, input: &str) -> Classification {
        self.fetcher.fetch(WeatherQuery::City(input.to_owned())).await
    }

    /// Look up the current position, then its weather.
    ///
    /// A location failure is returned for the caller to show as an alert;
    /// in that case no lookup is made and the state is not touched.
    pub async fn use_my_location(&self) -> Result<Classification, LocationError> {
        let source = self.location.as_ref().ok_or(LocationError::Unsupported)?;

        let coords = source.current_position().await.map_err(|err| {
            tracing::error!(error = %err, "error fetching location");
            err
        })?;

        Ok(self.fetcher.fetch(WeatherQuery::Coordinates(coords)).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::FetchError,
        location::FixedLocation,
        model::{Coordinates, WeatherReading},
        provider::WeatherProvider,
        state::WeatherStore,
    };
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::time::Duration;

    /// Records every query it receives.
    #[derive(Debug, Default)]
    struct RecordingProvider {
        queries: Mutex<Vec<WeatherQuery>>,
    }

    #[async_trait]
    impl WeatherProvider for RecordingProvider {
        async fn current_weather(
            &self,
            query: &WeatherQuery,
        ) -> Result<Classification, FetchError> {
            self.queries.lock().push(query.clone());
            Ok(WeatherReading {
                location_name: "Somewhere".into(),
                country: "NO".into(),
                temperature_c: -3.5,
                condition: "Snow".into(),
            }
            .into())
        }
    }

    #[derive(Debug)]
    struct DeniedLocation;

    #[async_trait]
    impl LocationSource for DeniedLocation {
        async fn current_position(&self) -> Result<Coordinates, LocationError> {
            Err(LocationError::Denied)
        }
    }

    fn trigger(
        location: Option<Arc<dyn LocationSource>>,
    ) -> (QueryTrigger, Arc<RecordingProvider>) {
        let provider = Arc::new(RecordingProvider::default());
        let fetcher =
            WeatherFetcher::new(provider.clone(), WeatherStore::new(), Duration::from_secs(1));
        (QueryTrigger::new(fetcher, location), provider)
    }

    #[tokio::test]
    async fn search_sends_input_verbatim() {
        let (t, provider) = trigger(None);
        t.search("  san francisco ").await;
        t.search("").await;

        assert_eq!(
            *provider.queries.lock(),
            vec![
                WeatherQuery::City("  san francisco ".into()),
                WeatherQuery::City(String::new()),
            ]
        );
    }

    #[tokio::test]
    async fn location_forwards_coordinates() {
        let coords = Coordinates::new(59.9, 10.7);
        let (t, provider) = trigger(Some(Arc::new(FixedLocation(coords))));

        let c = t.use_my_location().await.expect("location resolves");
        assert!(c.reading.is_some());
        assert_eq!(*provider.queries.lock(), vec![WeatherQuery::Coordinates(coords)]);
    }

    #[tokio::test]
    async fn location_failure_skips_fetch_and_keeps_state() {
        let (t, provider) = trigger(Some(Arc::new(DeniedLocation)));
        t.search("Oslo").await;
        let before = t.fetcher().store().snapshot();

        let err = t.use_my_location().await.unwrap_err();
        assert!(matches!(err, LocationError::Denied));
        assert_eq!(provider.queries.lock().len(), 1);
        assert_eq!(t.fetcher().store().snapshot(), before);
    }

    #[tokio::test]
    async fn missing_location_source_is_unsupported() {
        let (t, provider) = trigger(None);

        let err = t.use_my_location().await.unwrap_err();
        assert!(matches!(err, LocationError::Unsupported));
        assert!(provider.queries.lock().is_empty());
        assert!(t.fetcher().store().snapshot().is_idle());
    }
}
