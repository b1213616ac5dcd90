use crate::auth::Claims;
use crate::database::{AuditAction, AuditLog, NewAuditEntry, Store};
use crate::utils::error::ApiError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

const DEFAULT_LOG_LIMIT: i64 = 100;

/// Append-only activity trail. Entries are written by the domain services
/// after an operation succeeds; nothing ever updates them.
pub struct AuditService {
    repository: Arc<dyn Store>,
}

impl AuditService {
    pub fn new(repository: Arc<dyn Store>) -> Self {
        Self { repository }
    }

    /// One entry per successful operation, attributed to the caller.
    pub async fn record(
        &self,
        claims: &Claims,
        action: AuditAction,
        details: impl Into<String>,
    ) -> Result<(), ApiError> {
        self.record_as(
            claims.sub,
            &claims.email,
            claims.dealer_id,
            action,
            details,
        )
        .await
    }

    /// Variant for flows where the actor is known from the row rather than a
    /// token (login, background password resets).
    pub async fn record_as(
        &self,
        who_user_id: Uuid,
        who_user_name: &str,
        dealer_id: Option<Uuid>,
        action: AuditAction,
        details: impl Into<String>,
    ) -> Result<(), ApiError> {
        self.repository
            .insert_audit(&NewAuditEntry {
                who_user_id,
                who_user_name: who_user_name.to_string(),
                dealer_id,
                action_type: action,
                details: details.into(),
            })
            .await
            .map_err(ApiError::db)?;
        Ok(())
    }

    pub async fn recent(&self, limit: Option<i64>) -> Result<Vec<AuditLog>, ApiError> {
        self.repository
            .recent_audit(normalize_limit(limit))
            .await
            .map_err(ApiError::db)
    }

    pub async fn recent_for_dealer(
        &self,
        dealer_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<AuditLog>, ApiError> {
        self.repository
            .audit_for_dealer(dealer_id, normalize_limit(limit))
            .await
            .map_err(ApiError::db)
    }

    pub async fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, ApiError> {
        self.repository
            .prune_audit_before(cutoff)
            .await
            .map_err(ApiError::db)
    }
}

fn normalize_limit(limit: Option<i64>) -> i64 {
    match limit {
        Some(n) if n > 0 => n.min(1000),
        _ => DEFAULT_LOG_LIMIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_caps() {
        assert_eq!(normalize_limit(None), 100);
        assert_eq!(normalize_limit(Some(0)), 100);
        assert_eq!(normalize_limit(Some(-5)), 100);
        assert_eq!(normalize_limit(Some(25)), 25);
        assert_eq!(normalize_limit(Some(5000)), 1000);
    }
}
