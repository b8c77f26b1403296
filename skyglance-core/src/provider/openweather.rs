use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::{
    classify::{Classification, classify_body},
    error::FetchError,
    model::WeatherQuery,
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const CURRENT_WEATHER_PATH: &str = "data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: Url,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the provider at another host, e.g. a proxy or a mock server.
    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid OpenWeather base URL: {base_url}"))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            api_key,
            base_url,
            http: Client::new(),
        })
    }

    /// Current-weather URL for a query, always in metric units.
    pub fn request_url(&self, query: &WeatherQuery) -> Result<Url, url::ParseError> {
        let mut url = self.base_url.join(CURRENT_WEATHER_PATH)?;
        {
            let mut pairs = url.query_pairs_mut();
            match query {
                WeatherQuery::City(name) => {
                    pairs.append_pair("q", name);
                }
                WeatherQuery::Coordinates(c) => {
                    pairs
                        .append_pair("lat", &c.latitude.to_string())
                        .append_pair("lon", &c.longitude.to_string());
                }
            }
            pairs
                .append_pair("units", "metric")
                .append_pair("appid", &self.api_key);
        }
        Ok(url)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, query: &WeatherQuery) -> Result<Classification, FetchError> {
        let url = self.request_url(query)?;

        tracing::debug!(%query, "requesting current weather");

        // Error bodies still carry `cod`, so the status line is not checked here.
        let res = self.http.get(url).send().await?;
        let status = res.status();
        let body = res.text().await?;

        tracing::trace!(%status, body = %truncate_body(&body), "OpenWeather response");

        classify_body(&body)
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinates;

    fn provider() -> OpenWeatherProvider {
        OpenWeatherProvider::new("KEY".into()).expect("default base url parses")
    }

    #[test]
    fn city_url_uses_q_and_metric() {
        let url = provider()
            .request_url(&WeatherQuery::City("London".into()))
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://api.openweathermap.org/data/2.5/weather?q=London&units=metric&appid=KEY"
        );
    }

    #[test]
    fn coordinates_url_uses_lat_lon() {
        let url = provider()
            .request_url(&WeatherQuery::Coordinates(Coordinates::new(51.5, -0.12)))
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://api.openweathermap.org/data/2.5/weather?lat=51.5&lon=-0.12&units=metric&appid=KEY"
        );
    }

    #[test]
    fn city_is_passed_through_untrimmed() {
        let url = provider()
            .request_url(&WeatherQuery::City(" New York ".into()))
            .expect("url");
        let q = url
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned());
        assert_eq!(q.as_deref(), Some(" New York "));
    }

    #[test]
    fn empty_city_still_builds_a_request() {
        let url = provider()
            .request_url(&WeatherQuery::City(String::new()))
            .expect("url");
        assert!(url.as_str().contains("q=&units=metric"));
    }

    #[test]
    fn base_url_with_path_prefix_is_kept() {
        let p = OpenWeatherProvider::with_base_url("KEY".into(), "http://localhost:8080/ow")
            .expect("valid url");
        let url = p.request_url(&WeatherQuery::City("Oslo".into())).expect("url");
        assert!(url.as_str().starts_with("http://localhost:8080/ow/data/2.5/weather?"));
    }

    #[test]
    fn truncate_body_limits_length() {
        let long = "x".repeat(500);
        assert_eq!(truncate_body(&long).len(), 200);
        assert_eq!(truncate_body("short"), "short");
    }
}
