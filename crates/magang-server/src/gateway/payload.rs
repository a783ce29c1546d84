//! Request/response payloads for the recommendation API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub profile_text: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub predicted_category: String,
}

#[derive(Debug, Deserialize)]
pub struct InternshipItem {
    pub id: i64,
    pub internship_text: String,
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub profile_text: String,
    #[serde(default)]
    pub predicted_category: Option<String>,
    pub preferred_location: String,
    pub internships: Vec<InternshipItem>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<i64>,
}
