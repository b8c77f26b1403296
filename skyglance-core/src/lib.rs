//! Core library for the `skyglance` weather lookup client.
//!
//! This crate defines:
//! - Configuration handling
//! - The OpenWeather provider and the response classifier
//! - The fetch flow (timeout race, state updates) and the query trigger
//! - Geolocation sources and rendering of the result panel
//!
//! It is used by `skyglance-cli`, but can also be reused by other frontends.

pub mod classify;
pub mod config;
pub mod error;
pub mod fetch;
pub mod location;
pub mod model;
pub mod provider;
pub mod render;
pub mod state;
pub mod trigger;

pub use classify::Classification;
pub use config::{Config, GeolocationMode};
pub use error::{FetchError, LocationError};
pub use fetch::WeatherFetcher;
pub use location::{FixedLocation, IpLocation, LocationSource};
pub use model::{Coordinates, WeatherCategory, WeatherQuery, WeatherReading};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use render::View;
pub use state::{UiState, WeatherStore};
pub use trigger::QueryTrigger;
