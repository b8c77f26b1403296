//! Shared state behind the result panel.
//!
//! Only the fetch flow writes to it: [`WeatherStore::begin`] when a lookup
//! starts and [`WeatherStore::settle`] when it ends. Every lookup gets a
//! ticket, and only the newest ticket may write its result, so a slow answer
//! to an old query never replaces the answer to a newer one.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use crate::{
    classify::Classification,
    model::{WeatherCategory, WeatherReading},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UiState {
    pub loading: bool,
    pub category: Option<WeatherCategory>,
    pub reading: Option<WeatherReading>,
    /// When the last lookup settled.
    pub updated_at: Option<DateTime<Utc>>,
}

impl UiState {
    /// Nothing has been looked up yet.
    pub fn is_idle(&self) -> bool {
        !self.loading && self.category.is_none() && self.reading.is_none()
    }
}

/// Identifies one lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
struct Inner {
    state: UiState,
    latest: u64,
}

#[derive(Debug, Clone, Default)]
pub struct WeatherStore {
    inner: Arc<Mutex<Inner>>,
}

impl WeatherStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> UiState {
        self.inner.lock().state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.lock().state.loading
    }

    /// Mark a lookup as started.
    pub(crate) fn begin(&self) -> Ticket {
        let mut inner = self.inner.lock();
        inner.latest += 1;
        inner.state.loading = true;
        Ticket(inner.latest)
    }

    /// Publish a lookup's result. Returns `false` if a newer lookup has
    /// started since, in which case the state is left untouched.
    pub(crate) fn settle(&self, ticket: Ticket, classification: Classification) -> bool {
        let mut inner = self.inner.lock();
        if ticket.0 != inner.latest {
            return false;
        }

        inner.state = UiState {
            loading: false,
            category: classification.category,
            reading: classification.reading,
            updated_at: Some(Utc::now()),
        };
        true
    }

    /// Lower `loading` for a lookup that ended without a result (dropped or
    /// panicked). The previous result stays on display.
    pub(crate) fn abandon(&self, ticket: Ticket) {
        let mut inner = self.inner.lock();
        if ticket.0 == inner.latest {
            inner.state.loading = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(name: &str) -> WeatherReading {
        WeatherReading {
            location_name: name.into(),
            country: "GB".into(),
            temperature_c: 10.0,
            condition: "Rain".into(),
        }
    }

    #[test]
    fn starts_idle() {
        let store = WeatherStore::new();
        assert!(store.snapshot().is_idle());
        assert!(!store.is_loading());
    }

    #[test]
    fn begin_sets_loading_and_settle_clears_it() {
        let store = WeatherStore::new();
        let ticket = store.begin();
        assert!(store.is_loading());

        assert!(store.settle(ticket, reading("Leeds").into()));
        let state = store.snapshot();
        assert!(!state.loading);
        assert_eq!(state.category, Some(WeatherCategory::Rain));
        assert_eq!(state.reading, Some(reading("Leeds")));
        assert!(state.updated_at.is_some());
    }

    #[test]
    fn not_found_clears_previous_reading() {
        let store = WeatherStore::new();
        let t = store.begin();
        store.settle(t, reading("Leeds").into());

        let t = store.begin();
        store.settle(t, Classification::not_found());
        let state = store.snapshot();
        assert_eq!(state.category, Some(WeatherCategory::NotFound));
        assert_eq!(state.reading, None);
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let store = WeatherStore::new();
        let old = store.begin();
        let new = store.begin();
        assert!(new > old);

        assert!(store.settle(new, reading("York").into()));
        assert!(!store.settle(old, Classification::not_found()));

        let state = store.snapshot();
        assert_eq!(state.reading, Some(reading("York")));
        assert!(!state.loading);
    }

    #[test]
    fn loading_stays_until_latest_settles() {
        let store = WeatherStore::new();
        let old = store.begin();
        let new = store.begin();

        assert!(!store.settle(old, reading("Hull").into()));
        assert!(store.is_loading());

        store.settle(new, reading("York").into());
        assert!(!store.is_loading());
    }

    #[test]
    fn abandon_clears_loading_and_keeps_result() {
        let store = WeatherStore::new();
        let t = store.begin();
        store.settle(t, reading("Leeds").into());

        let t = store.begin();
        store.abandon(t);
        let state = store.snapshot();
        assert!(!state.loading);
        assert_eq!(state.reading, Some(reading("Leeds")));
    }

    #[test]
    fn abandon_of_stale_ticket_keeps_loading() {
        let store = WeatherStore::new();
        let old = store.begin();
        let _new = store.begin();
        store.abandon(old);
        assert!(store.is_loading());
    }

    #[test]
    fn clones_share_state() {
        let store = WeatherStore::new();
        let other = store.clone();
        let t = store.begin();
        assert!(other.is_loading());
        other.settle(t, Classification::not_found());
        assert!(!store.is_loading());
    }
}
