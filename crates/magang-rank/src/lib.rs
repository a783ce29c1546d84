//! Magang core library (used by the server and integration tests).
//!
//! Classifies free-text profiles into job categories and ranks candidate
//! internships against a profile. The ranking combines sentence-embedding
//! cosine similarity with a geocoded distance bonus backed by a persistent
//! geocode cache.
//!
//! # Public API Surface
//!
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`CategoryClassifier`], [`ClassifierConfig`] - Profile classification
//! - [`SentenceEmbedder`], [`SentenceConfig`] - Embedding generation
//! - [`GeoCache`], [`GeocodeClient`], [`NominatimProvider`] - Location
//!   resolution with a write-through cache
//! - [`RankingService`] - The two-stage ranking orchestrator
//!
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod classifier;
pub mod config;
pub mod embedding;
pub mod geo;
pub mod ranking;
pub mod text;

pub use classifier::{CategoryClassifier, ClassifierConfig, ClassifierError};
pub use config::{Config, ConfigError};
pub use embedding::{
    EmbeddingError, SENTENCE_EMBEDDING_DIM, SENTENCE_MAX_SEQ_LEN, SentenceConfig,
    SentenceEmbedder, cosine_similarity,
};
#[cfg(any(test, feature = "mock"))]
pub use self::geo::MockGeocodeProvider;
pub use self::geo::{
    CacheLookup, Coordinates, GeoCache, GeoError, GeocodeClient, GeocodeProvider,
    NominatimProvider, haversine_distance_km,
};
pub use ranking::{
    CO_LOCATED_BONUS, CO_LOCATED_RADIUS_KM, Candidate, NEARBY_BONUS, NEARBY_RADIUS_KM,
    RankingError, RankingRequest, RankingService, ScoredCandidate, distance_bonus, encode_target,
};
pub use text::clean_text;
