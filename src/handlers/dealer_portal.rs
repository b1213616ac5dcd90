use crate::auth::Claims;
use crate::database::DealerWithUser;
use crate::handlers::dealers::{AuditLogQuery, LogsData};
use crate::state::AppState;
use crate::utils::{ApiError, ApiResponse};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct DealerProfileData {
    pub dealer: DealerWithUser,
}

/// A dealer's own profile, resolved from the tenant claim in their token.
pub async fn dealer_profile(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<ApiResponse<DealerProfileData>>, ApiError> {
    let dealer_id = claims
        .dealer_id
        .ok_or_else(|| ApiError::NotFound("Dealer profile not found".to_string()))?;

    let dealer = state.dealer_service.get(dealer_id).await?;
    Ok(Json(ApiResponse::ok(DealerProfileData { dealer })))
}

/// Activity trail filtered to the caller's own tenant.
pub async fn dealer_audit_logs(
    State(state): State<AppState>,
    claims: Claims,
    Query(query): Query<AuditLogQuery>,
) -> Result<Json<ApiResponse<LogsData>>, ApiError> {
    let dealer_id = claims
        .dealer_id
        .ok_or_else(|| ApiError::NotFound("Dealer profile not found".to_string()))?;

    let logs = state
        .audit_service
        .recent_for_dealer(dealer_id, query.limit)
        .await?;
    Ok(Json(ApiResponse::ok(LogsData { logs })))
}
