//! End-to-end API tests driving the full router with stub models and a mock
//! geocoding provider.

use axum::{Router, body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use magang::classifier::{CategoryClassifier, ClassifierConfig};
use magang::embedding::{SentenceConfig, SentenceEmbedder};
use magang::geo::{CacheLookup, Coordinates, GeoCache, GeocodeClient, MockGeocodeProvider};
use magang::ranking::RankingService;
use magang_server::gateway::{HandlerState, create_router_with_state};

const JAKARTA: Coordinates = Coordinates {
    lat: -6.2088,
    lon: 106.8456,
};

const BANDUNG: Coordinates = Coordinates {
    lat: -6.9175,
    lon: 107.6191,
};

struct TestApi {
    router: Router,
    provider: MockGeocodeProvider,
    geo_cache: Arc<GeoCache>,
    cache_path: PathBuf,
    _temp_dir: TempDir,
}

fn test_api() -> TestApi {
    let temp_dir = TempDir::new().expect("temp dir");
    let cache_path = temp_dir.path().join("geo_cache.json");
    let geo_cache = Arc::new(GeoCache::load(cache_path.clone()));

    let provider = MockGeocodeProvider::new();
    provider.insert("jakarta, Indonesia", Some(JAKARTA));
    provider.insert("bandung, Indonesia", Some(BANDUNG));

    let classifier = Arc::new(
        CategoryClassifier::load(ClassifierConfig::stub()).expect("stub classifier"),
    );
    let embedder =
        Arc::new(SentenceEmbedder::load(SentenceConfig::stub()).expect("stub embedder"));
    let ranking = Arc::new(RankingService::new(
        embedder,
        GeocodeClient::new(provider.clone(), Arc::clone(&geo_cache), "Indonesia"),
    ));

    let state = HandlerState::new(Some(classifier), Some(ranking), Arc::clone(&geo_cache));

    TestApi {
        router: create_router_with_state(state),
        provider,
        geo_cache,
        cache_path,
        _temp_dir: temp_dir,
    }
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

async fn recommend(api: &TestApi, body: &serde_json::Value) -> Vec<i64> {
    let response = api
        .router
        .clone()
        .oneshot(post_json("/api/v1/recommend-internships", body))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    body["recommendations"]
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v.as_i64().expect("id"))
        .collect()
}

#[tokio::test]
async fn test_predict_then_recommend_flow() {
    let api = test_api();

    let response = api
        .router
        .clone()
        .oneshot(post_json(
            "/api/v1/predict-category",
            &serde_json::json!({"profile_text": "backend developer with Rust experience"}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let predicted = json_body(response).await["predicted_category"]
        .as_str()
        .expect("label")
        .to_string();

    // Feed the prediction back in, the way the UI flow does.
    let ids = recommend(
        &api,
        &serde_json::json!({
            "profile_text": "backend developer with Rust experience",
            "predicted_category": predicted,
            "preferred_location": "jakarta",
            "internships": [
                {"id": 10, "internship_text": "rust backend internship", "location": "jakarta"},
                {"id": 20, "internship_text": "rust backend internship", "location": "unknown island"}
            ]
        }),
    )
    .await;

    assert_eq!(ids, vec![10, 20]);
}

#[tokio::test]
async fn test_recommendations_are_deterministic() {
    let api = test_api();
    let body = serde_json::json!({
        "profile_text": "data analyst",
        "predicted_category": null,
        "preferred_location": "bandung",
        "internships": [
            {"id": 1, "internship_text": "spreadsheet wrangling", "location": "bandung"},
            {"id": 2, "internship_text": "ml pipeline work", "location": "jakarta"},
            {"id": 3, "internship_text": "barista", "location": "atlantis"}
        ]
    });

    let first = recommend(&api, &body).await;
    let second = recommend(&api, &body).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_geocode_results_are_cached_and_persisted() {
    let api = test_api();
    let body = serde_json::json!({
        "profile_text": "anything",
        "predicted_category": null,
        "preferred_location": "jakarta",
        "internships": [
            {"id": 1, "internship_text": "a", "location": "bandung"},
            {"id": 2, "internship_text": "b", "location": "atlantis"}
        ]
    });

    recommend(&api, &body).await;
    // jakarta + bandung + atlantis, one provider call each.
    assert_eq!(api.provider.call_count(), 3);
    assert_eq!(api.geo_cache.lookup("atlantis"), CacheLookup::NotFound);

    // A repeat request is served entirely from the cache.
    recommend(&api, &body).await;
    assert_eq!(api.provider.call_count(), 3);

    // The write-through document round-trips, including the negative entry.
    let reloaded = GeoCache::load(api.cache_path.clone());
    assert_eq!(reloaded.lookup("jakarta"), CacheLookup::Found(JAKARTA));
    assert_eq!(reloaded.lookup("atlantis"), CacheLookup::NotFound);
}

#[tokio::test]
async fn test_unresolvable_preferred_location_keeps_similarity_order() {
    let api = test_api();

    // The profile matches candidate 2's text exactly; candidate 1 is
    // co-located with the (unresolvable) preferred location and would win if
    // the bonus applied.
    let ids = recommend(
        &api,
        &serde_json::json!({
            "profile_text": "experienced software engineer",
            "predicted_category": null,
            "preferred_location": "atlantis",
            "internships": [
                {"id": 1, "internship_text": "warehouse supervisor", "location": "jakarta"},
                {"id": 2, "internship_text": "experienced software engineer", "location": "bandung"}
            ]
        }),
    )
    .await;

    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn test_duplicate_ids_are_not_deduplicated() {
    let api = test_api();

    let ids = recommend(
        &api,
        &serde_json::json!({
            "profile_text": "anything",
            "predicted_category": null,
            "preferred_location": "atlantis",
            "internships": [
                {"id": 7, "internship_text": "same text", "location": "jakarta"},
                {"id": 7, "internship_text": "same text", "location": "jakarta"}
            ]
        }),
    )
    .await;

    assert_eq!(ids, vec![7, 7]);
}
