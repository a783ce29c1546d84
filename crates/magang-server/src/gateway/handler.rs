use axum::{Json, extract::State};
use tracing::{debug, instrument};

use magang::ranking::{Candidate, RankingRequest};

use crate::gateway::error::GatewayError;
use crate::gateway::payload::{
    CategoryResponse, ProfileRequest, RecommendationRequest, RecommendationResponse,
};
use crate::gateway::state::HandlerState;
use magang::geo::GeocodeProvider;

#[instrument(skip(state, request))]
pub async fn predict_category_handler<P>(
    State(state): State<HandlerState<P>>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<CategoryResponse>, GatewayError>
where
    P: GeocodeProvider + 'static,
{
    let classifier = state
        .classifier
        .as_ref()
        .ok_or(GatewayError::ServiceUnavailable("category classifier"))?;

    let predicted_category = classifier.predict(&request.profile_text)?;

    debug!(category = %predicted_category, "Predicted job category");

    Ok(Json(CategoryResponse { predicted_category }))
}

#[instrument(skip(state, request), fields(internships = request.internships.len()))]
pub async fn recommend_internships_handler<P>(
    State(state): State<HandlerState<P>>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, GatewayError>
where
    P: GeocodeProvider + 'static,
{
    let ranking = state
        .ranking
        .as_ref()
        .ok_or(GatewayError::ServiceUnavailable("ranking service"))?;

    let ranking_request = RankingRequest {
        profile_text: request.profile_text,
        predicted_category: request.predicted_category,
        preferred_location: request.preferred_location,
        candidates: request
            .internships
            .into_iter()
            .map(|item| Candidate {
                id: item.id,
                text: item.internship_text,
                location: item.location,
            })
            .collect(),
    };

    let recommendations = ranking.rank(&ranking_request).await?;

    Ok(Json(RecommendationResponse { recommendations }))
}
