use std::sync::Arc;

use magang::classifier::CategoryClassifier;
use magang::geo::{GeoCache, GeocodeProvider};
use magang::ranking::RankingService;

/// Shared handler state.
///
/// Model capabilities are optional: one that failed to load at startup stays
/// `None`, and the endpoints depending on it answer 503 instead of crashing.
pub struct HandlerState<P: GeocodeProvider + 'static> {
    pub classifier: Option<Arc<CategoryClassifier>>,

    pub ranking: Option<Arc<RankingService<P>>>,

    pub geo_cache: Arc<GeoCache>,
}

impl<P: GeocodeProvider + 'static> HandlerState<P> {
    pub fn new(
        classifier: Option<Arc<CategoryClassifier>>,
        ranking: Option<Arc<RankingService<P>>>,
        geo_cache: Arc<GeoCache>,
    ) -> Self {
        Self {
            classifier,
            ranking,
            geo_cache,
        }
    }
}

// Manual impl: `P` itself does not need to be `Clone`, only the `Arc`s are
// cloned.
impl<P: GeocodeProvider + 'static> Clone for HandlerState<P> {
    fn clone(&self) -> Self {
        Self {
            classifier: self.classifier.clone(),
            ranking: self.ranking.clone(),
            geo_cache: Arc::clone(&self.geo_cache),
        }
    }
}
