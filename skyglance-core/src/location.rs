//! "Use my location": one-shot lookups of the device's coordinates.

use std::{fmt::Debug, sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    config::{Config, GeolocationMode},
    error::LocationError,
    model::Coordinates,
};

pub const DEFAULT_IP_LOOKUP_URL: &str = "https://ipapi.co/json/";

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("skyglance/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait LocationSource: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Coordinates known up front (command line or config).
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationSource for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// Approximate position from the public IP address.
#[derive(Debug, Clone)]
pub struct IpLocation {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    city: Option<String>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

impl IpLocation {
    pub fn new() -> Result<Self, LocationError> {
        Self::with_url(DEFAULT_IP_LOOKUP_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Result<Self, LocationError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        Ok(Self {
            url: url.into(),
            http,
        })
    }
}

#[async_trait]
impl LocationSource for IpLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => return Err(LocationError::Denied),
            status if !status.is_success() => {
                return Err(LocationError::Unavailable(format!("lookup returned {status}")));
            }
            _ => {}
        }

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        if body.error {
            return Err(LocationError::Unavailable(
                body.reason.unwrap_or_else(|| "unknown reason".into()),
            ));
        }

        match (body.latitude, body.longitude) {
            (Some(latitude), Some(longitude)) => {
                tracing::debug!(city = ?body.city, latitude, longitude, "resolved IP location");
                Ok(Coordinates::new(latitude, longitude))
            }
            _ => Err(LocationError::Unavailable("lookup returned no coordinates".into())),
        }
    }
}

/// The location source the config asks for, or `None` when geolocation is off.
///
/// Fixed coordinates take precedence over IP lookup.
pub fn location_source_from_config(
    config: &Config,
) -> Result<Option<Arc<dyn LocationSource>>, LocationError> {
    if let Some(coords) = config.location {
        return Ok(Some(Arc::new(FixedLocation(coords))));
    }

    match config.geolocation {
        GeolocationMode::None => Ok(None),
        GeolocationMode::Ip => {
            let source = match config.geolocation_url.as_deref() {
                Some(url) => IpLocation::with_url(url)?,
                None => IpLocation::new()?,
            };
            Ok(Some(Arc::new(source)))
        }
    }
}
