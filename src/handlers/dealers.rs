use crate::auth::Claims;
use crate::database::{AuditLog, Dealer, DealerChanges, DealerStatus, DealerWithUser};
use crate::services::dealers::CreateDealerInput;
use crate::state::AppState;
use crate::utils::{ApiError, ApiResponse, ValidatedJson};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDealerRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Company name is required"))]
    pub company_name: String,
    #[validate(length(min = 1, message = "Primary contact name is required"))]
    pub primary_contact_name: String,
    #[validate(length(min = 1, message = "Primary contact phone is required"))]
    pub primary_contact_phone: String,
    #[validate(email(message = "Valid primary contact email is required"))]
    pub primary_contact_email: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDealerRequest {
    #[validate(length(min = 1, message = "Company name cannot be empty"))]
    pub company_name: Option<String>,
    #[validate(length(min = 1, message = "Primary contact name cannot be empty"))]
    pub primary_contact_name: Option<String>,
    #[validate(length(min = 1, message = "Primary contact phone cannot be empty"))]
    pub primary_contact_phone: Option<String>,
    #[validate(email(message = "Valid primary contact email is required"))]
    pub primary_contact_email: Option<String>,
    #[validate(length(min = 1, message = "Address cannot be empty"))]
    pub address: Option<String>,
    pub status: Option<DealerStatus>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetDealerPasswordRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AuditLogQuery {
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct DealersData {
    pub dealers: Vec<DealerWithUser>,
}

#[derive(Serialize)]
pub struct DealerData {
    pub dealer: DealerWithUser,
}

#[derive(Serialize)]
pub struct UpdatedDealerData {
    pub dealer: Dealer,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedDealerData {
    pub dealer: Dealer,
    pub temp_password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TempPassData {
    pub temp_pass: String,
}

#[derive(Serialize)]
pub struct LogsData {
    pub logs: Vec<AuditLog>,
}

pub async fn list_dealers(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DealersData>>, ApiError> {
    let dealers = state.dealer_service.list().await?;
    Ok(Json(ApiResponse::ok(DealersData { dealers })))
}

pub async fn get_dealer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DealerData>>, ApiError> {
    let dealer = state.dealer_service.get(id).await?;
    Ok(Json(ApiResponse::ok(DealerData { dealer })))
}

/// The temporary password is only ever returned here, at creation time.
pub async fn create_dealer(
    State(state): State<AppState>,
    claims: Claims,
    ValidatedJson(request): ValidatedJson<CreateDealerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedDealerData>>), ApiError> {
    let created = state
        .dealer_service
        .create(
            &claims,
            CreateDealerInput {
                name: request.name,
                username: request.username,
                email: request.email,
                company_name: request.company_name,
                primary_contact_name: request.primary_contact_name,
                primary_contact_phone: request.primary_contact_phone,
                primary_contact_email: request.primary_contact_email,
                address: request.address,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            CreatedDealerData {
                dealer: created.dealer,
                temp_password: created.temp_password,
            },
            "Dealer created successfully",
        )),
    ))
}

pub async fn update_dealer(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateDealerRequest>,
) -> Result<Json<ApiResponse<UpdatedDealerData>>, ApiError> {
    let dealer = state
        .dealer_service
        .update(
            &claims,
            id,
            DealerChanges {
                company_name: request.company_name,
                primary_contact_name: request.primary_contact_name,
                primary_contact_phone: request.primary_contact_phone,
                primary_contact_email: request.primary_contact_email,
                address: request.address,
                status: request.status,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok_with_message(
        UpdatedDealerData { dealer },
        "Dealer updated successfully",
    )))
}

pub async fn delete_dealer(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.dealer_service.delete(&claims, id).await?;
    Ok(Json(ApiResponse::message("Dealer deleted successfully")))
}

pub async fn reset_dealer_password(
    State(state): State<AppState>,
    claims: Claims,
    ValidatedJson(request): ValidatedJson<ResetDealerPasswordRequest>,
) -> Result<Json<ApiResponse<TempPassData>>, ApiError> {
    let temp_pass = state
        .dealer_service
        .reset_password(&claims, request.user_id)
        .await?;

    Ok(Json(ApiResponse::ok_with_message(
        TempPassData { temp_pass },
        "Password reset successfully",
    )))
}

pub async fn admin_audit_logs(
    State(state): State<AppState>,
    Query(query): Query<AuditLogQuery>,
) -> Result<Json<ApiResponse<LogsData>>, ApiError> {
    let logs = state.audit_service.recent(query.limit).await?;
    Ok(Json(ApiResponse::ok(LogsData { logs })))
}
