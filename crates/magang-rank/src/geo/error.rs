use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("failed to persist geocode cache to {path}: {source}")]
    PersistFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize geocode cache: {source}")]
    SerializeFailed {
        #[source]
        source: serde_json::Error,
    },

    #[error("geocoding request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("geocoding provider returned an invalid coordinate: {value}")]
    InvalidCoordinate { value: String },
}

pub type GeoResult<T> = Result<T, GeoError>;

impl From<reqwest::Error> for GeoError {
    fn from(err: reqwest::Error) -> Self {
        GeoError::RequestFailed {
            reason: err.to_string(),
        }
    }
}
