use std::time::Duration;

/// Ways a weather lookup can fail. All of them render as "Not Found".
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("location not recognised by the weather API (cod {0})")]
    NotFound(u16),
    #[error("weather request URL is invalid: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("weather request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("weather response could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("weather response is missing {0}")]
    MissingField(&'static str),
    #[error("weather request did not complete within {0:?}")]
    Timeout(Duration),
}

/// Geolocation failures. These are shown to the user directly and never start a fetch.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("location permission denied")]
    Denied,
    #[error("location service unavailable: {0}")]
    Unavailable(String),
    #[error("geolocation is not supported")]
    Unsupported,
}

impl LocationError {
    /// Text of the alert shown when the location lookup fails.
    pub fn alert_message(&self) -> &'static str {
        match self {
            LocationError::Denied | LocationError::Unavailable(_) => {
                "Unable to retrieve your location. Please try again."
            }
            LocationError::Unsupported => "Geolocation is not supported by this client.",
        }
    }
}
