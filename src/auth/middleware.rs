use crate::auth::jwt::{Claims, JwtManager};
use crate::database::models::UserRole;
use crate::utils::error::ApiError;
use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
    Extension,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Pure gate decision: no identity is unauthorized, a role outside the
/// allowed set is forbidden. Tenant checks happen at the data level once the
/// target row is loaded.
pub fn authorize(claims: Option<&Claims>, allowed_roles: &[UserRole]) -> Result<(), ApiError> {
    let claims = claims.ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))?;

    if !allowed_roles.contains(&claims.role) {
        return Err(ApiError::Forbidden(
            "Forbidden: Insufficient permissions".to_string(),
        ));
    }

    Ok(())
}

/// Data-level ownership check. Admin bypasses tenant scoping; a dealer must
/// own the target row.
pub fn ensure_tenant_scope(claims: &Claims, owner_dealer_id: Uuid) -> Result<(), ApiError> {
    match claims.role {
        UserRole::Admin => Ok(()),
        UserRole::Dealer => {
            if claims.dealer_id == Some(owner_dealer_id) {
                Ok(())
            } else {
                Err(ApiError::Forbidden(
                    "Forbidden: Cannot access other dealer data".to_string(),
                ))
            }
        }
    }
}

/// Bearer-token authentication. Missing header, bad signature, malformed
/// payload and expiry are all the same 401.
pub async fn authenticate(
    Extension(jwt): Extension<Arc<JwtManager>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;

    let claims = jwt
        .validate_token(token)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    debug!("Authenticated user {} ({:?})", claims.sub, claims.role);
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    authorize(request.extensions().get::<Claims>(), &[UserRole::Admin])?;
    Ok(next.run(request).await)
}

pub async fn require_dealer(request: Request, next: Next) -> Result<Response, ApiError> {
    authorize(request.extensions().get::<Claims>(), &[UserRole::Dealer])?;
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))
    }
}
