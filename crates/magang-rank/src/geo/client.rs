//! Cache-aside geocoding client.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::cache::{CacheLookup, Coordinates, GeoCache};
use super::provider::GeocodeProvider;

/// Resolves location names through the cache, falling back to the provider.
///
/// Every provider outcome is written through to the cache, including
/// "not found" and provider errors: one failed resolution suppresses further
/// external queries for that name until the cache document is cleared. No
/// retries, no backoff; failures surface as `None`, never as errors.
pub struct GeocodeClient<P> {
    provider: P,
    cache: Arc<GeoCache>,
    country: String,
}

impl<P: GeocodeProvider> GeocodeClient<P> {
    /// Creates a client scoping every query to `country`.
    pub fn new(provider: P, cache: Arc<GeoCache>, country: impl Into<String>) -> Self {
        Self {
            provider,
            cache,
            country: country.into(),
        }
    }

    /// Resolves a location name to a coordinate, or `None` if unresolvable.
    pub async fn resolve(&self, name: &str) -> Option<Coordinates> {
        let key = GeoCache::normalize_key(name);

        match self.cache.lookup(&key) {
            CacheLookup::Found(coords) => {
                debug!(location = %key, "Geocode cache hit");
                return Some(coords);
            }
            CacheLookup::NotFound => {
                debug!(location = %key, "Geocode cache hit (known absent)");
                return None;
            }
            CacheLookup::Missing => {}
        }

        info!(location = %key, "Geocoding new location");

        let query = format!("{}, {}", key, self.country);
        let outcome = match self.provider.geocode(&query).await {
            Ok(Some(coords)) => Some(coords),
            Ok(None) => {
                info!(location = %key, "Location not found by geocoding provider");
                None
            }
            Err(e) => {
                warn!(location = %key, error = %e, "Geocoding failed, treating as unresolvable");
                None
            }
        };

        if let Err(e) = self.cache.store(&key, outcome) {
            warn!(location = %key, error = %e, "Failed to persist geocode cache entry");
        }

        outcome
    }

    /// Returns the shared cache handle.
    pub fn cache(&self) -> &Arc<GeoCache> {
        &self.cache
    }

    /// Returns the configured country scope.
    pub fn country(&self) -> &str {
        &self.country
    }
}
