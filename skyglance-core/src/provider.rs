use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;

use crate::{
    classify::Classification, config::Config, error::FetchError, model::WeatherQuery,
    provider::openweather::OpenWeatherProvider,
};

pub mod openweather;

/// A source of current weather for a query.
///
/// Implementations do not apply the lookup timeout; that is the fetch flow's job.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, query: &WeatherQuery) -> Result<Classification, FetchError>;
}

/// Construct the OpenWeather provider described by the config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `skyglance configure` and enter your API key."
        )
    })?;

    let provider = OpenWeatherProvider::with_base_url(api_key.to_owned(), config.base_url())?;
    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("No OpenWeather API key configured"));
        assert!(msg.contains("Hint: run `skyglance configure`"));
    }

    #[test]
    fn provider_from_config_errors_on_bad_base_url() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.base_url = Some("not a url".into());
        assert!(provider_from_config(&cfg).is_err());
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        assert!(provider_from_config(&cfg).is_ok());
    }
}
