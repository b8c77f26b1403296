//! Turns an OpenWeather current-weather body into a presentation category.

use serde::{Deserialize, Serialize};

use crate::{
    error::FetchError,
    model::{WeatherCategory, WeatherReading},
};

/// `cod` values the API uses when it cannot resolve the requested location.
const NOT_FOUND_CODES: &[u16] = &[404, 400];

/// Outcome of one lookup, as far as the result panel is concerned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    /// `None` when the API condition is outside the known set.
    pub category: Option<WeatherCategory>,
    pub reading: Option<WeatherReading>,
}

impl Classification {
    pub fn not_found() -> Self {
        Self {
            category: Some(WeatherCategory::NotFound),
            reading: None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.category == Some(WeatherCategory::NotFound)
    }
}

impl From<WeatherReading> for Classification {
    fn from(reading: WeatherReading) -> Self {
        Self {
            category: WeatherCategory::from_condition(&reading.condition),
            reading: Some(reading),
        }
    }
}

/// The API sends `cod` as a number on success and as a string on errors.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCode {
    Number(i64),
    Text(String),
}

impl OwCode {
    fn as_status(&self) -> Option<u16> {
        match self {
            OwCode::Number(n) => u16::try_from(*n).ok(),
            OwCode::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    cod: Option<OwCode>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    sys: OwSys,
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

/// Parse and classify a response body.
///
/// Returns [`FetchError::NotFound`] for the "unknown location" codes and a
/// parse or missing-field error when the body is not a usable payload. An
/// unrecognised condition is not an error: the reading is kept and the
/// category is left empty.
pub fn classify_body(body: &str) -> Result<Classification, FetchError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)?;

    if let Some(code) = parsed.cod.as_ref().and_then(OwCode::as_status)
        && NOT_FOUND_CODES.contains(&code)
    {
        return Err(FetchError::NotFound(code));
    }

    let condition = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| w.main)
        .ok_or(FetchError::MissingField("weather[0]"))?;
    let temperature_c = parsed
        .main
        .and_then(|m| m.temp)
        .ok_or(FetchError::MissingField("main.temp"))?;

    Ok(WeatherReading {
        location_name: parsed.name,
        country: parsed.sys.country,
        temperature_c,
        condition,
    }
    .into())
}

/// Collapse every failure into the single "Not Found" presentation.
pub fn settle(result: Result<Classification, FetchError>) -> Classification {
    match result {
        Ok(classification) => classification,
        Err(FetchError::NotFound(code)) => {
            tracing::debug!(code, "location not found");
            Classification::not_found()
        }
        Err(FetchError::Timeout(limit)) => {
            tracing::info!(?limit, "weather request timed out");
            Classification::not_found()
        }
        Err(err) => {
            tracing::warn!(error = %err, "weather lookup failed");
            Classification::not_found()
        }
    }
}
