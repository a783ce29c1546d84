use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use magang::classifier::ClassifierError;
use magang::ranking::RankingError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0} is unavailable")]
    ServiceUnavailable(&'static str),

    #[error("classification failed: {0}")]
    ClassificationFailed(#[from] ClassifierError),

    #[error("ranking failed: {0}")]
    RankingFailed(#[from] RankingError),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::ClassificationFailed(_) | GatewayError::RankingFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}
