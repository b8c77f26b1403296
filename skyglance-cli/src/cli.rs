use std::{future::Future, sync::Arc, time::Duration};

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Confirm, Text};
use skyglance_core::{
    Config, Coordinates, FixedLocation, GeolocationMode, IpLocation, LocationError,
    LocationSource, QueryTrigger, View, WeatherFetcher, WeatherStore, location::location_source_from_config, render,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyglance", version, about = "Current weather at a glance")]
pub struct Cli {
    /// Print the result panel as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Give up on the weather request after this many milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and geolocation preference.
    Configure,

    /// Show weather for a city name.
    Search {
        /// City name, sent exactly as given.
        city: String,
    },

    /// Show weather for the current location.
    Locate {
        /// Latitude to use instead of looking the position up.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude to use instead of looking the position up.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Look the position up from the public IP address.
        #[arg(long, conflicts_with = "lat")]
        ip: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let json = self.json;

        match self.command {
            Command::Configure => configure(),
            Command::Search { city } => {
                let config = load_config(self.timeout_ms)?;
                let trigger = build_trigger(&config, None)?;
                with_progress(&trigger, json, trigger.search(&city)).await;
                print_view(&trigger, json)
            }
            Command::Locate { lat, lon, ip } => {
                let config = load_config(self.timeout_ms)?;
                let source = location_source(&config, lat, lon, ip).map_err(alert)?;
                let trigger = build_trigger(&config, source)?;

                with_progress(&trigger, json, trigger.use_my_location())
                    .await
                    .map_err(alert)?;
                print_view(&trigger, json)
            }
        }
    }
}

/// Pick the location source: explicit coordinates, then `--ip`, then config.
fn location_source(
    config: &Config,
    lat: Option<f64>,
    lon: Option<f64>,
    ip: bool,
) -> Result<Option<Arc<dyn LocationSource>>, LocationError> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(Some(Arc::new(FixedLocation(Coordinates::new(lat, lon))))),
        _ if ip => Ok(Some(Arc::new(IpLocation::new()?))),
        _ => location_source_from_config(config),
    }
}

/// Every location failure reaches the user as the same alert text.
fn alert(err: LocationError) -> anyhow::Error {
    tracing::warn!(error = %err, "location unavailable, no lookup made");
    anyhow!(err.alert_message())
}

fn load_config(timeout_ms: Option<u64>) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    if let Some(ms) = timeout_ms {
        config.timeout_ms = Some(ms);
    }
    Ok(config)
}

fn build_trigger(
    config: &Config,
    location: Option<Arc<dyn LocationSource>>,
) -> anyhow::Result<QueryTrigger> {
    let fetcher = WeatherFetcher::from_config(config, WeatherStore::new())?;
    Ok(QueryTrigger::new(fetcher, location))
}

/// Drive a lookup, printing the loading line once the request is in flight.
async fn with_progress<T>(
    trigger: &QueryTrigger,
    json: bool,
    lookup: impl Future<Output = T>,
) -> T {
    tokio::pin!(lookup);
    let store = trigger.fetcher().store();
    let mut announced = json;
    let mut tick = tokio::time::interval(Duration::from_millis(50));

    loop {
        tokio::select! {
            out = &mut lookup => return out,
            _ = tick.tick(), if !announced => {
                if store.is_loading() {
                    eprint!("{}", View::Loading);
                    announced = true;
                }
            }
        }
    }
}

fn print_view(trigger: &QueryTrigger, json: bool) -> anyhow::Result<()> {
    let view = render::view(&trigger.fetcher().store().snapshot());
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{view}");
    }
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Text::new("OpenWeather API key:")
        .with_initial_value(config.api_key().unwrap_or_default())
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());

    let use_ip = Confirm::new("Look up your location from your IP address for `locate`?")
        .with_default(config.geolocation == GeolocationMode::Ip)
        .prompt()
        .context("Failed to read geolocation preference")?;
    config.geolocation = if use_ip {
        GeolocationMode::Ip
    } else {
        GeolocationMode::None
    };

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}
