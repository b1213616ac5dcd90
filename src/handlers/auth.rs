use crate::auth::Claims;
use crate::database::{User, UserProfileChanges, UserRole};
use crate::services::auth::FORGOT_PASSWORD_MESSAGE;
use crate::state::AppState;
use crate::utils::{ApiError, ApiResponse, ValidatedJson};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_password_change: Option<bool>,
}

#[derive(Serialize)]
pub struct RefreshData {
    pub token: String,
}

#[derive(Serialize)]
pub struct UserData {
    pub user: User,
}

pub async fn admin_login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginData>>, ApiError> {
    let outcome = state
        .auth_service
        .login(&request.email, &request.password, UserRole::Admin)
        .await?;

    Ok(Json(ApiResponse::ok(LoginData {
        user: outcome.user,
        token: outcome.token,
        refresh_token: outcome.refresh_token,
        requires_password_change: None,
    })))
}

pub async fn dealer_login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginData>>, ApiError> {
    let outcome = state
        .auth_service
        .login(&request.email, &request.password, UserRole::Dealer)
        .await?;

    Ok(Json(ApiResponse::ok(LoginData {
        user: outcome.user,
        token: outcome.token,
        refresh_token: outcome.refresh_token,
        requires_password_change: Some(outcome.requires_password_change),
    })))
}

pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<ApiResponse<RefreshData>>, ApiError> {
    let token = state.auth_service.refresh(&request.refresh_token).await?;
    Ok(Json(ApiResponse::ok(RefreshData { token })))
}

/// Same response whether or not the email exists; the actual reset runs after
/// the response on a background task.
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ForgotPasswordRequest>,
) -> Json<ApiResponse<()>> {
    state.auth_service.forgot_password(request.email);
    Json(ApiResponse::message(FORGOT_PASSWORD_MESSAGE))
}

pub async fn logout(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.auth_service.logout(&claims).await?;
    Ok(Json(ApiResponse::message("Logged out successfully")))
}

pub async fn current_user(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<ApiResponse<UserData>>, ApiError> {
    let user = state.auth_service.current_user(&claims).await?;
    Ok(Json(ApiResponse::ok(UserData { user })))
}

pub async fn update_profile(
    State(state): State<AppState>,
    claims: Claims,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserData>>, ApiError> {
    let user = state
        .auth_service
        .update_profile(
            &claims,
            UserProfileChanges {
                name: request.name,
                username: request.username,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok_with_message(
        UserData { user },
        "Profile updated successfully",
    )))
}

pub async fn change_password(
    State(state): State<AppState>,
    claims: Claims,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<UserData>>, ApiError> {
    let user = state
        .auth_service
        .change_password(&claims, &request.current_password, &request.new_password)
        .await?;

    Ok(Json(ApiResponse::ok_with_message(
        UserData { user },
        "Password changed successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_requires_well_formed_email() {
        let bad = LoginRequest {
            email: "nope".into(),
            password: "secret".into(),
        };
        assert!(bad.validate().is_err());

        let good = LoginRequest {
            email: "admin@example.com".into(),
            password: "secret".into(),
        };
        assert!(good.validate().is_ok());
    }

    #[test]
    fn change_password_enforces_minimum_length() {
        let short = ChangePasswordRequest {
            current_password: "old".into(),
            new_password: "abc".into(),
        };
        assert!(short.validate().is_err());
    }

    #[test]
    fn refresh_request_uses_camel_case_field() {
        let body = serde_json::json!({ "refreshToken": "abc" });
        let request: RefreshTokenRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.refresh_token, "abc");
    }

    #[test]
    fn profile_update_allows_partial_bodies() {
        let partial = UpdateProfileRequest {
            name: Some("New Name".into()),
            username: None,
        };
        assert!(partial.validate().is_ok());

        let empty_name = UpdateProfileRequest {
            name: Some(String::new()),
            username: None,
        };
        assert!(empty_name.validate().is_err());
    }
}
