//! HTTP gateway (Axum) for classification and internship ranking.
//!
//! This module is primarily used by the `magang` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use handler::{predict_category_handler, recommend_internships_handler};
pub use state::HandlerState;

use magang::geo::GeocodeProvider;

/// Welcome message served at the root route.
pub const WELCOME_MESSAGE: &str = "Welcome to the Magang internship recommendation API";

const STATUS_READY: &str = "ready";
const STATUS_UNAVAILABLE: &str = "unavailable";

pub fn create_router_with_state<P>(state: HandlerState<P>) -> Router
where
    P: GeocodeProvider + 'static,
{
    Router::new()
        .route("/", get(welcome_handler))
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/api/v1/predict-category", post(predict_category_handler))
        .route(
            "/api/v1/recommend-internships",
            post(recommend_internships_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub classifier: &'static str,
    pub ranking: &'static str,
    pub cached_locations: usize,
}

#[tracing::instrument]
pub async fn welcome_handler() -> Response {
    (
        StatusCode::OK,
        Json(WelcomeResponse {
            message: WELCOME_MESSAGE,
        }),
    )
        .into_response()
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<P>(State(state): State<HandlerState<P>>) -> Response
where
    P: GeocodeProvider + 'static,
{
    let classifier_status = if state.classifier.is_some() {
        STATUS_READY
    } else {
        STATUS_UNAVAILABLE
    };

    let ranking_status = if state.ranking.is_some() {
        STATUS_READY
    } else {
        STATUS_UNAVAILABLE
    };

    let components = ComponentStatus {
        http: STATUS_READY,
        classifier: classifier_status,
        ranking: ranking_status,
        cached_locations: state.geo_cache.len(),
    };

    let is_ready =
        components.classifier == STATUS_READY && components.ranking == STATUS_READY;

    let status_code = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status_msg = if is_ready { "ok" } else { "pending" };

    (
        status_code,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
