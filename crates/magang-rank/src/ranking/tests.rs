use super::*;

use std::sync::Arc;

use crate::embedding::SentenceConfig;
use crate::geo::{Coordinates, GeoCache, MockGeocodeProvider};

/// Kilometers per degree of latitude under the haversine mean earth radius.
const KM_PER_DEGREE_LAT: f64 = 111.195_085_9;

const JAKARTA: Coordinates = Coordinates {
    lat: -6.2088,
    lon: 106.8456,
};

const TOKYO: Coordinates = Coordinates {
    lat: 35.6764,
    lon: 139.6500,
};

struct Fixture {
    service: RankingService<MockGeocodeProvider>,
    provider: MockGeocodeProvider,
    _dir: tempfile::TempDir,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().expect("temp dir");
    let cache = Arc::new(GeoCache::load(dir.path().join("geo_cache.json")));
    let provider = MockGeocodeProvider::new();
    let embedder =
        Arc::new(SentenceEmbedder::load(SentenceConfig::stub()).expect("stub embedder"));
    let service = RankingService::new(
        embedder,
        GeocodeClient::new(provider.clone(), cache, "Indonesia"),
    );

    Fixture {
        service,
        provider,
        _dir: dir,
    }
}

fn candidate(id: i64, text: &str, location: &str) -> Candidate {
    Candidate {
        id,
        text: text.to_string(),
        location: location.to_string(),
    }
}

fn request(preferred_location: &str, candidates: Vec<Candidate>) -> RankingRequest {
    RankingRequest {
        profile_text: "experienced software engineer".to_string(),
        predicted_category: None,
        preferred_location: preferred_location.to_string(),
        candidates,
    }
}

fn scored(id: i64, similarity: f32, final_score: f32) -> ScoredCandidate {
    ScoredCandidate {
        id,
        similarity,
        location: String::new(),
        final_score,
    }
}

/// A coordinate `km` kilometers due north of the origin.
fn north_of_origin(km: f64) -> Coordinates {
    Coordinates::new(km / KM_PER_DEGREE_LAT, 0.0)
}

#[test]
fn test_distance_bonus_tiers() {
    assert_eq!(distance_bonus(0.0), CO_LOCATED_BONUS);
    assert_eq!(distance_bonus(0.5), CO_LOCATED_BONUS);
    assert_eq!(distance_bonus(0.999), CO_LOCATED_BONUS);
    assert_eq!(distance_bonus(1.0), NEARBY_BONUS);
    assert_eq!(distance_bonus(100.0), NEARBY_BONUS);
    assert_eq!(distance_bonus(149.999), NEARBY_BONUS);
    assert_eq!(distance_bonus(150.0), 0.0);
    assert_eq!(distance_bonus(200.0), 0.0);
}

#[test]
fn test_encode_target_with_category() {
    assert_eq!(
        encode_target("loves rust", Some("Software Engineering")),
        "The user's predicted job category is Software Engineering. \
         Based on that, consider their profile: loves rust"
    );
}

#[test]
fn test_encode_target_without_category() {
    assert_eq!(encode_target("loves rust", None), "loves rust");
}

#[test]
fn test_rank_by_final_score_descending() {
    let ids = rank_by_final_score(vec![
        scored(1, 0.2, 0.2),
        scored(2, 0.9, 0.9),
        scored(3, 0.5, 0.5),
    ]);
    assert_eq!(ids, vec![2, 3, 1]);
}

#[test]
fn test_equal_scores_keep_input_order() {
    let ids = rank_by_final_score(vec![
        scored(7, 0.5, 0.5),
        scored(3, 0.5, 0.5),
        scored(9, 0.5, 0.5),
    ]);
    assert_eq!(ids, vec![7, 3, 9]);
}

#[test]
fn test_co_located_low_similarity_beats_distant_high_similarity() {
    // A: similarity 0.8 plus the co-located bonus; B: similarity 0.9 with an
    // unresolvable location. 2.8 > 0.9.
    let ids = rank_by_final_score(vec![
        scored(2, 0.9, 0.9),
        scored(1, 0.8, 0.8 + CO_LOCATED_BONUS),
    ]);
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_empty_candidate_list() {
    let fixture = fixture();

    let ids = fixture
        .service
        .rank(&request("jakarta", vec![]))
        .await
        .expect("rank");
    assert!(ids.is_empty());
    // Short-circuits before any location resolution as well.
    assert_eq!(fixture.provider.call_count(), 0);
}

#[tokio::test]
async fn test_ranking_is_deterministic() {
    let fixture = fixture();
    fixture.provider.insert("jakarta, Indonesia", Some(JAKARTA));
    fixture.provider.insert("tokyo, Indonesia", Some(TOKYO));

    let req = request(
        "jakarta",
        vec![
            candidate(1, "backend internship in fintech", "jakarta"),
            candidate(2, "frontend internship", "tokyo"),
            candidate(3, "data annotation work", "nowhere"),
        ],
    );

    let first = fixture.service.rank(&req).await.expect("rank");
    let second = fixture.service.rank(&req).await.expect("rank");
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_distance_bonus_reorders_equal_similarity() {
    let fixture = fixture();
    fixture.provider.insert("jakarta, Indonesia", Some(JAKARTA));
    fixture.provider.insert("tokyo, Indonesia", Some(TOKYO));

    // Identical candidate text: equal base similarity, so only the distance
    // bonus separates them. The far candidate comes first in the input.
    let req = request(
        "jakarta",
        vec![
            candidate(1, "software internship", "tokyo"),
            candidate(2, "software internship", "jakarta"),
        ],
    );

    let ids = fixture.service.rank(&req).await.expect("rank");
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn test_bonus_tiers_end_to_end() {
    let fixture = fixture();
    fixture.provider.insert("origin, Indonesia", Some(north_of_origin(0.0)));
    fixture
        .provider
        .insert("next door, Indonesia", Some(north_of_origin(0.5)));
    fixture
        .provider
        .insert("nearby town, Indonesia", Some(north_of_origin(100.0)));
    fixture
        .provider
        .insert("far city, Indonesia", Some(north_of_origin(200.0)));

    let req = request(
        "origin",
        vec![
            candidate(1, "software internship", "far city"),
            candidate(2, "software internship", "nearby town"),
            candidate(3, "software internship", "next door"),
        ],
    );

    let ids = fixture.service.rank(&req).await.expect("rank");
    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn test_unresolvable_candidate_gets_no_bonus() {
    let fixture = fixture();
    fixture.provider.insert("jakarta, Indonesia", Some(JAKARTA));

    let req = request(
        "jakarta",
        vec![
            candidate(1, "software internship", "nowhere"),
            candidate(2, "software internship", "jakarta"),
        ],
    );

    let ids = fixture.service.rank(&req).await.expect("rank");
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn test_unresolvable_preferred_location_falls_back_to_similarity() {
    let fixture = fixture();
    fixture.provider.insert("jakarta, Indonesia", Some(JAKARTA));

    // Candidate 2's text matches the profile exactly, so it has the highest
    // base similarity; candidate 1 would win on the bonus if it applied.
    let mut req = request(
        "atlantis",
        vec![
            candidate(1, "warehouse shift supervisor", "jakarta"),
            candidate(2, "experienced software engineer", "jakarta"),
        ],
    );
    req.profile_text = "experienced software engineer".to_string();

    let ids = fixture.service.rank(&req).await.expect("rank");
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn test_duplicate_ids_pass_through() {
    let fixture = fixture();

    let req = request(
        "atlantis",
        vec![
            candidate(5, "software internship", "jakarta"),
            candidate(5, "software internship", "jakarta"),
        ],
    );

    let ids = fixture.service.rank(&req).await.expect("rank");
    assert_eq!(ids, vec![5, 5]);
}

#[tokio::test]
async fn test_category_changes_profile_embedding() {
    let fixture = fixture();

    let base = request(
        "atlantis",
        vec![
            candidate(1, "first", "jakarta"),
            candidate(2, "second", "jakarta"),
        ],
    );
    let mut with_category = base.clone();
    with_category.predicted_category = Some("Finance".to_string());

    // Both calls succeed; the augmented target is a different embedding
    // input, which is all the template promises.
    fixture.service.rank(&base).await.expect("rank");
    fixture.service.rank(&with_category).await.expect("rank");
}
