use std::fmt;

use serde::{Deserialize, Serialize};

/// Weather conditions the result panel knows how to illustrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCategory {
    Clear,
    Rain,
    Snow,
    Clouds,
    Haze,
    Smoke,
    Mist,
    Drizzle,
    NotFound,
}

impl WeatherCategory {
    /// Categories that can be matched from an API condition string.
    pub const fn known() -> &'static [WeatherCategory] {
        &[
            WeatherCategory::Clear,
            WeatherCategory::Rain,
            WeatherCategory::Snow,
            WeatherCategory::Clouds,
            WeatherCategory::Haze,
            WeatherCategory::Smoke,
            WeatherCategory::Mist,
            WeatherCategory::Drizzle,
        ]
    }

    /// Exact, case-sensitive lookup of an API `weather[0].main` value.
    ///
    /// Never yields [`WeatherCategory::NotFound`].
    pub fn from_condition(condition: &str) -> Option<Self> {
        Self::known()
            .iter()
            .copied()
            .find(|category| category.label() == condition)
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeatherCategory::Clear => "Clear",
            WeatherCategory::Rain => "Rain",
            WeatherCategory::Snow => "Snow",
            WeatherCategory::Clouds => "Clouds",
            WeatherCategory::Haze => "Haze",
            WeatherCategory::Smoke => "Smoke",
            WeatherCategory::Mist => "Mist",
            WeatherCategory::Drizzle => "Drizzle",
            WeatherCategory::NotFound => "Not Found",
        }
    }

    /// Bundled icon asset for this category.
    pub fn icon(&self) -> &'static str {
        match self {
            WeatherCategory::Clear => "Clear.png",
            WeatherCategory::Rain => "Rain.png",
            WeatherCategory::Snow => "Snow.png",
            WeatherCategory::Clouds => "Clouds.png",
            WeatherCategory::Haze => "Haze.png",
            WeatherCategory::Smoke => "Smoke.png",
            WeatherCategory::Mist => "Mist.png",
            WeatherCategory::Drizzle => "Drizzle.png",
            WeatherCategory::NotFound => "NotFound.png",
        }
    }
}

impl fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The fields of an OpenWeather current-weather payload that get displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub location_name: String,
    pub country: String,
    pub temperature_c: f64,
    pub condition: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    /// Free text, used exactly as typed.
    City(String),
    Coordinates(Coordinates),
}

impl fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherQuery::City(name) => write!(f, "city {name:?}"),
            WeatherQuery::Coordinates(c) => write!(f, "lat {} lon {}", c.latitude, c.longitude),
        }
    }
}
