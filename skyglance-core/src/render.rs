//! What the result panel shows for a given state.

use std::fmt;

use serde::Serialize;

use crate::state::UiState;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum View {
    /// Nothing looked up yet.
    Idle,
    Loading,
    Result(Panel),
}

/// Each line is absent when there is nothing to show for it. An unknown
/// condition leaves `icon` and `title` empty while the temperature still shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub location: Option<String>,
    pub icon: Option<&'static str>,
    pub title: Option<&'static str>,
    pub temperature: Option<String>,
}

pub fn view(state: &UiState) -> View {
    if state.loading {
        return View::Loading;
    }
    if state.is_idle() {
        return View::Idle;
    }

    let reading = state.reading.as_ref();
    View::Result(Panel {
        location: reading.map(|r| format!("{},{}", r.location_name, r.country)),
        icon: state.category.map(|c| c.icon()),
        title: state.category.map(|c| c.label()),
        temperature: reading.map(|r| format_temperature(r.temperature_c)),
    })
}

/// `15.2` → `15.2°C`, `15.0` → `15°C`.
pub fn format_temperature(celsius: f64) -> String {
    format!("{celsius}°C")
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Idle => Ok(()),
            View::Loading => writeln!(f, "Loading..."),
            View::Result(panel) => {
                let lines = [
                    panel.location.as_deref(),
                    panel.icon,
                    panel.title,
                    panel.temperature.as_deref(),
                ];
                for line in lines.into_iter().flatten() {
                    writeln!(f, "{line}")?;
                }
                Ok(())
            }
        }
    }
}
