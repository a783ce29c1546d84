//! Geocoding providers.
//!
//! [`NominatimProvider`] talks to a Nominatim-compatible HTTP endpoint.
//! [`MockGeocodeProvider`] is a programmable in-memory stand-in.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::cache::Coordinates;
use super::error::{GeoError, GeoResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("magang/", env!("CARGO_PKG_VERSION"));

#[async_trait]
/// Resolves a free-text location query to a coordinate.
pub trait GeocodeProvider: Send + Sync {
    /// Returns `Ok(None)` when the provider has no match for `query`.
    async fn geocode(&self, query: &str) -> GeoResult<Option<Coordinates>>;
}

/// Nominatim-compatible HTTP geocoding provider.
pub struct NominatimProvider {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

impl NominatimProvider {
    /// Creates a provider against `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl GeocodeProvider for NominatimProvider {
    async fn geocode(&self, query: &str) -> GeoResult<Option<Coordinates>> {
        let places: Vec<Place> = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(place) = places.first() else {
            return Ok(None);
        };

        let lat: f64 = place
            .lat
            .parse()
            .map_err(|_| GeoError::InvalidCoordinate {
                value: place.lat.clone(),
            })?;
        let lon: f64 = place
            .lon
            .parse()
            .map_err(|_| GeoError::InvalidCoordinate {
                value: place.lon.clone(),
            })?;

        Ok(Some(Coordinates::new(lat, lon)))
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::MockGeocodeProvider;

#[cfg(any(test, feature = "mock"))]
mod mock {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::{Coordinates, GeoError, GeoResult, GeocodeProvider};

    /// Programmable geocoding provider that counts external queries.
    #[derive(Default, Clone)]
    pub struct MockGeocodeProvider {
        responses: Arc<std::sync::RwLock<HashMap<String, Option<Coordinates>>>>,
        calls: Arc<AtomicUsize>,
        erroring: Arc<AtomicBool>,
    }

    impl MockGeocodeProvider {
        pub fn new() -> Self {
            Self::default()
        }

        /// Programs the response for an exact query string.
        pub fn insert(&self, query: &str, value: Option<Coordinates>) {
            self.responses
                .write()
                .expect("lock poisoned")
                .insert(query.to_string(), value);
        }

        /// When set, every query fails with a provider error.
        pub fn set_error(&self, erroring: bool) {
            self.erroring.store(erroring, Ordering::SeqCst);
        }

        /// Number of queries that reached the provider.
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GeocodeProvider for MockGeocodeProvider {
        async fn geocode(&self, query: &str) -> GeoResult<Option<Coordinates>> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.erroring.load(Ordering::SeqCst) {
                return Err(GeoError::RequestFailed {
                    reason: "mock provider error".to_string(),
                });
            }

            Ok(self
                .responses
                .read()
                .expect("lock poisoned")
                .get(query)
                .copied()
                .flatten())
        }
    }
}
