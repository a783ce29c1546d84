//! Location resolution: persistent geocode cache, provider clients, and
//! great-circle distance.

pub mod cache;
pub mod client;
mod error;
pub mod provider;


pub use cache::{CacheLookup, Coordinates, GeoCache};
pub use client::GeocodeClient;
pub use error::{GeoError, GeoResult};
#[cfg(any(test, feature = "mock"))]
pub use provider::MockGeocodeProvider;
pub use provider::{GeocodeProvider, NominatimProvider};

use ::geo::{Distance, Haversine, Point};

/// Great-circle distance between two coordinates, in kilometers.
pub fn haversine_distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let origin = Point::new(a.lon, a.lat);
    let destination = Point::new(b.lon, b.lat);
    Haversine.distance(origin, destination) / 1000.0
}
