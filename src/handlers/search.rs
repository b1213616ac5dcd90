use crate::auth::Claims;
use crate::services::search::{AadharMatch, SearchHit};
use crate::state::AppState;
use crate::utils::{ApiError, ApiResponse};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AadharQuery {
    pub aadhar: Option<String>,
}

#[derive(Serialize)]
pub struct SearchData {
    pub results: Vec<SearchHit>,
    pub count: usize,
}

pub async fn universal_search(
    State(state): State<AppState>,
    claims: Claims,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchData>>, ApiError> {
    let term = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::Validation("Search query is required".to_string()))?;

    let results = state.search_service.search(&claims, term).await?;
    let count = results.len();
    Ok(Json(ApiResponse::ok(SearchData { results, count })))
}

/// Exact aadhar lookup across all dealers; `data` is null when no active
/// employee carries the number.
pub async fn check_aadhar(
    State(state): State<AppState>,
    _claims: Claims,
    Query(query): Query<AadharQuery>,
) -> Result<Json<ApiResponse<Option<AadharMatch>>>, ApiError> {
    let aadhar = query
        .aadhar
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| ApiError::Validation("Aadhar number is required".to_string()))?;

    let matched = state.search_service.check_aadhar(aadhar).await?;
    Ok(Json(ApiResponse::ok(matched)))
}
