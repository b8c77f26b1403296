use std::{sync::Arc, time::Duration};

use crate::{
    classify::{Classification, settle},
    config::Config,
    error::FetchError,
    model::WeatherQuery,
    provider::WeatherProvider,
    state::{Ticket, WeatherStore},
};

/// Runs lookups against a provider and publishes the results to a store.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    provider: Arc<dyn WeatherProvider>,
    store: WeatherStore,
    timeout: Duration,
}

impl WeatherFetcher {
    pub fn new(provider: Arc<dyn WeatherProvider>, store: WeatherStore, timeout: Duration) -> Self {
        Self {
            provider,
            store,
            timeout,
        }
    }

    pub fn from_config(config: &Config, store: WeatherStore) -> anyhow::Result<Self> {
        let provider = crate::provider::provider_from_config(config)?;
        Ok(Self::new(provider, store, config.timeout()))
    }

    pub fn store(&self) -> &WeatherStore {
        &self.store
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Look up `query`, racing the request against the timeout.
    ///
    /// Never fails: every error becomes the "Not Found" classification. The
    /// store's `loading` flag is raised for the duration and lowered on every
    /// path. If the timer wins, the request future is dropped, which aborts
    /// the underlying HTTP call.
    ///
    /// If this future is itself dropped, or the provider panics, `loading` is
    /// still lowered.
    pub async fn fetch(&self, query: WeatherQuery) -> Classification {
        let mut in_flight = InFlight {
            store: &self.store,
            ticket: Some(self.store.begin()),
        };

        let result =
            match tokio::time::timeout(self.timeout, self.provider.current_weather(&query)).await {
                Ok(result) => result,
                Err(_elapsed) => Err(FetchError::Timeout(self.timeout)),
            };

        let classification = settle(result);

        let published = in_flight
            .ticket
            .take()
            .is_some_and(|ticket| self.store.settle(ticket, classification.clone()));
        if !published {
            tracing::debug!(%query, "newer lookup in progress, discarding result");
        }

        classification
    }
}

/// Lowers `loading` if a lookup ends before publishing its result.
struct InFlight<'a> {
    store: &'a WeatherStore,
    ticket: Option<Ticket>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            tracing::debug!("lookup abandoned before settling");
            self.store.abandon(ticket);
        }
    }
}
