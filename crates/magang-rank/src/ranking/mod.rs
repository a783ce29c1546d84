//! Two-stage internship ranking: embedding similarity plus a geocoded
//! distance bonus.

mod error;

#[cfg(test)]
mod tests;

pub use error::{RankingError, RankingResult};

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use crate::embedding::{SentenceEmbedder, cosine_similarity};
use crate::geo::{GeocodeClient, GeocodeProvider, haversine_distance_km};

/// Distance under which a candidate counts as co-located, in kilometers.
pub const CO_LOCATED_RADIUS_KM: f64 = 1.0;

/// Distance under which a candidate counts as nearby, in kilometers.
pub const NEARBY_RADIUS_KM: f64 = 150.0;

/// Score bonus for co-located candidates.
pub const CO_LOCATED_BONUS: f32 = 2.0;

/// Score bonus for nearby candidates.
pub const NEARBY_BONUS: f32 = 0.75;

/// A candidate internship to rank.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Caller-assigned id, unique within a request (not validated).
    pub id: i64,
    /// Descriptive text to embed.
    pub text: String,
    /// Unnormalized location name.
    pub location: String,
}

/// One ranking request.
#[derive(Debug, Clone)]
pub struct RankingRequest {
    pub profile_text: String,
    pub predicted_category: Option<String>,
    pub preferred_location: String,
    pub candidates: Vec<Candidate>,
}

/// Per-candidate scores, ephemeral within one ranking call.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub id: i64,
    pub similarity: f32,
    pub location: String,
    pub final_score: f32,
}

/// Builds the profile text to embed, biasing the embedding space toward
/// category-consistent matches when a predicted category is present.
pub fn encode_target(profile_text: &str, category: Option<&str>) -> String {
    match category {
        Some(category) => format!(
            "The user's predicted job category is {category}. Based on that, consider their profile: {profile_text}"
        ),
        None => profile_text.to_string(),
    }
}

/// Maps a great-circle distance to its score bonus tier.
///
/// The bonus is added directly to cosine similarity even though the two are
/// on different scales; the coarse tiers are a deliberate, tunable heuristic
/// (interpretable, and robust to noisy geocoding) rather than a normalized
/// scoring model.
pub fn distance_bonus(distance_km: f64) -> f32 {
    if distance_km < CO_LOCATED_RADIUS_KM {
        CO_LOCATED_BONUS
    } else if distance_km < NEARBY_RADIUS_KM {
        NEARBY_BONUS
    } else {
        0.0
    }
}

/// Stable descending sort on final score alone; equal scores keep their
/// input order. Returns candidate ids only.
fn rank_by_final_score(mut scored: Vec<ScoredCandidate>) -> Vec<i64> {
    scored.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(Ordering::Equal)
    });
    scored.into_iter().map(|candidate| candidate.id).collect()
}

/// The ranking orchestrator.
///
/// Owns the embedding capability and a geocoding client; both are loaded at
/// service start and treated as read-only for the process lifetime.
pub struct RankingService<P> {
    embedder: Arc<SentenceEmbedder>,
    geocoder: GeocodeClient<P>,
}

impl<P: GeocodeProvider> RankingService<P> {
    pub fn new(embedder: Arc<SentenceEmbedder>, geocoder: GeocodeClient<P>) -> Self {
        Self { embedder, geocoder }
    }

    /// Ranks the request's candidates, best first, returning ids only.
    ///
    /// An empty candidate list returns empty without touching the embedder.
    /// Geocoding failures degrade to a zero bonus and never fail the call.
    pub async fn rank(&self, request: &RankingRequest) -> RankingResult<Vec<i64>> {
        if request.candidates.is_empty() {
            return Ok(Vec::new());
        }

        let target = encode_target(
            &request.profile_text,
            request.predicted_category.as_deref(),
        );
        let profile_embedding = self.embedder.embed(&target)?;

        let texts: Vec<&str> = request
            .candidates
            .iter()
            .map(|candidate| candidate.text.as_str())
            .collect();
        let candidate_embeddings = self.embedder.embed_batch(&texts)?;

        let mut scored: Vec<ScoredCandidate> = request
            .candidates
            .iter()
            .zip(candidate_embeddings.iter())
            .map(|(candidate, embedding)| {
                let similarity = cosine_similarity(&profile_embedding, embedding);
                ScoredCandidate {
                    id: candidate.id,
                    similarity,
                    location: candidate.location.clone(),
                    final_score: similarity,
                }
            })
            .collect();

        debug!(
            candidates = scored.len(),
            preferred_location = %request.preferred_location,
            "Computed base similarity scores"
        );

        if let Some(user_coords) = self.geocoder.resolve(&request.preferred_location).await {
            for candidate in &mut scored {
                if let Some(coords) = self.geocoder.resolve(&candidate.location).await {
                    let distance_km = haversine_distance_km(user_coords, coords);
                    candidate.final_score += distance_bonus(distance_km);
                }
            }
        }

        Ok(rank_by_final_score(scored))
    }

    /// Returns the geocoding client.
    pub fn geocoder(&self) -> &GeocodeClient<P> {
        &self.geocoder
    }

    /// Returns the embedding capability.
    pub fn embedder(&self) -> &Arc<SentenceEmbedder> {
        &self.embedder
    }
}
