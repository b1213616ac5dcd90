use crate::auth::password::{generate_temp_password, hash_password, verify_password};
use crate::auth::{Claims, JwtManager};
use crate::database::{AuditAction, NewAuditEntry, Store, User, UserProfileChanges, UserRole};
use crate::services::AuditService;
use crate::utils::error::ApiError;
use std::sync::Arc;
use tracing::{error, info};

/// Always returned by forgot-password, whether or not the email exists.
pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If a user with that email exists, a password reset link has been sent.";

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
    pub requires_password_change: bool,
}

pub struct AuthService {
    repository: Arc<dyn Store>,
    audit: Arc<AuditService>,
    jwt: Arc<JwtManager>,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        repository: Arc<dyn Store>,
        audit: Arc<AuditService>,
        jwt: Arc<JwtManager>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            repository,
            audit,
            jwt,
            bcrypt_cost,
        }
    }

    /// Unknown email, wrong role and wrong password are indistinguishable to
    /// the caller.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        required_role: UserRole,
    ) -> Result<LoginOutcome, ApiError> {
        let user = self
            .repository
            .find_user_by_email(email)
            .await
            .map_err(ApiError::db)?
            .filter(|u| u.role == required_role)
            .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        if !valid {
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        self.repository
            .update_last_login(user.id)
            .await
            .map_err(ApiError::db)?;

        let details = match user.role {
            UserRole::Admin => "Admin logged in".to_string(),
            UserRole::Dealer => format!("Dealer logged in: {}", user.name),
        };
        self.audit
            .record_as(user.id, &user.name, user.dealer_id, AuditAction::Login, details)
            .await?;

        let token = self
            .jwt
            .generate_token(user.id, user.role, &user.email, user.dealer_id)
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        let refresh_token = self
            .jwt
            .generate_refresh_token(user.id, user.role, &user.email, user.dealer_id)
            .map_err(|e| ApiError::InternalError(e.to_string()))?;

        let requires_password_change = user.temp_pass;
        Ok(LoginOutcome {
            user,
            token,
            refresh_token,
            requires_password_change,
        })
    }

    /// Exchange a valid refresh token for a fresh access token. Claims are
    /// re-read from the user row so a role or tenant change takes effect on
    /// the next refresh.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, ApiError> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

        let user = self
            .repository
            .find_user_by_id(claims.sub)
            .await
            .map_err(ApiError::db)?
            .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        self.jwt
            .generate_token(user.id, user.role, &user.email, user.dealer_id)
            .map_err(|e| ApiError::InternalError(e.to_string()))
    }

    /// Tokens are stateless, so logout is just an audited client-side event.
    pub async fn logout(&self, claims: &Claims) -> Result<(), ApiError> {
        self.audit
            .record(claims, AuditAction::Logout, "User logged out")
            .await
    }

    pub async fn current_user(&self, claims: &Claims) -> Result<User, ApiError> {
        self.repository
            .find_user_by_id(claims.sub)
            .await
            .map_err(ApiError::db)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    pub async fn update_profile(
        &self,
        claims: &Claims,
        changes: UserProfileChanges,
    ) -> Result<User, ApiError> {
        let user = self.current_user(claims).await?;

        if let Some(username) = &changes.username {
            if username != &user.username {
                let taken = self
                    .repository
                    .find_user_by_username(username)
                    .await
                    .map_err(ApiError::db)?
                    .is_some_and(|existing| existing.id != user.id);
                if taken {
                    return Err(ApiError::Conflict("Username already taken".to_string()));
                }
            }
        }

        let updated = self
            .repository
            .update_user_profile(user.id, &changes)
            .await
            .map_err(ApiError::db)?;

        self.audit
            .record(claims, AuditAction::UpdateProfile, "User updated their profile")
            .await?;

        Ok(updated)
    }

    pub async fn change_password(
        &self,
        claims: &Claims,
        current_password: &str,
        new_password: &str,
    ) -> Result<User, ApiError> {
        let user = self.current_user(claims).await?;

        let valid = verify_password(current_password, &user.password_hash)
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        if !valid {
            return Err(ApiError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }

        let hash = hash_password(new_password, self.bcrypt_cost)
            .map_err(|e| ApiError::InternalError(e.to_string()))?;

        let updated = self
            .repository
            .set_user_password(user.id, &hash, false)
            .await
            .map_err(ApiError::db)?;

        self.audit
            .record(
                claims,
                AuditAction::ChangePassword,
                "User changed their password",
            )
            .await?;

        Ok(updated)
    }

    /// The response is already on the wire when this runs; the reset work is
    /// a detached task with its own error logging. Unknown emails do nothing,
    /// so the endpoint cannot be used to enumerate accounts.
    pub fn forgot_password(&self, email: String) {
        let repository = self.repository.clone();
        let cost = self.bcrypt_cost;

        tokio::spawn(async move {
            if let Err(err) = reset_with_temp_password(repository.as_ref(), cost, &email).await {
                error!("Forgot-password task failed for {}: {}", email, err);
            }
        });
    }
}

async fn reset_with_temp_password(
    repository: &dyn Store,
    cost: u32,
    email: &str,
) -> anyhow::Result<()> {
    let Some(user) = repository.find_user_by_email(email).await? else {
        return Ok(());
    };

    let temp_password = generate_temp_password();
    let hash = hash_password(&temp_password, cost)?;
    repository.set_user_password(user.id, &hash, true).await?;

    repository
        .insert_audit(&NewAuditEntry {
            who_user_id: user.id,
            who_user_name: user.name.clone(),
            dealer_id: user.dealer_id,
            action_type: AuditAction::PasswordReset,
            details: "Password reset requested".to_string(),
        })
        .await?;

    // TODO: deliver the temporary password by email once an SMTP relay is
    // provisioned; until then an admin re-issues it via reset-password.
    info!("Temporary password issued for {}", email);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::JwtConfig;
    use crate::database::{AuditLog, MockStore};
    use chrono::Utc;
    use uuid::Uuid;

    fn jwt() -> Arc<JwtManager> {
        Arc::new(JwtManager::new(&JwtConfig {
            secret: "test-secret".into(),
            expiration_seconds: 3600,
            refresh_secret: "test-refresh-secret".into(),
            refresh_expiration_seconds: 7200,
        }))
    }

    fn dealer_user(password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            role: UserRole::Dealer,
            name: "Asha Khan".into(),
            username: "asha".into(),
            email: "asha@example.com".into(),
            password_hash: crate::auth::password::hash_password(password, 4).unwrap(),
            temp_pass: false,
            dealer_id: Some(Uuid::new_v4()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login: None,
        }
    }

    fn audit_row(entry: &NewAuditEntry) -> AuditLog {
        AuditLog {
            id: 1,
            who_user_id: entry.who_user_id,
            who_user_name: entry.who_user_name.clone(),
            dealer_id: entry.dealer_id,
            action_type: entry.action_type,
            details: entry.details.clone(),
            timestamp: Utc::now(),
        }
    }

    fn service(store: MockStore) -> AuthService {
        let store: Arc<dyn Store> = Arc::new(store);
        AuthService::new(store.clone(), Arc::new(AuditService::new(store)), jwt(), 4)
    }

    #[test]
    fn enumeration_safe_message_is_stable() {
        assert_eq!(
            FORGOT_PASSWORD_MESSAGE,
            "If a user with that email exists, a password reset link has been sent."
        );
    }

    #[tokio::test]
    async fn successful_login_records_exactly_one_audit_entry() {
        let user = dealer_user("secret-pw");
        let user_id = user.id;

        let mut store = MockStore::new();
        store
            .expect_find_user_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        store
            .expect_update_last_login()
            .times(1)
            .returning(|_| Ok(()));
        store
            .expect_insert_audit()
            .withf(move |entry| {
                entry.action_type == AuditAction::Login && entry.who_user_id == user_id
            })
            .times(1)
            .returning(|entry| Ok(audit_row(entry)));

        let outcome = service(store)
            .login("asha@example.com", "secret-pw", UserRole::Dealer)
            .await
            .unwrap();
        assert!(!outcome.requires_password_change);
        assert!(!outcome.token.is_empty());
    }

    // MockStore panics on any call without an expectation, so a rejected
    // login must touch neither last_login nor the audit log.
    #[tokio::test]
    async fn rejected_login_records_nothing() {
        let user = dealer_user("secret-pw");

        let mut store = MockStore::new();
        store
            .expect_find_user_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let err = service(store)
            .login("asha@example.com", "wrong-pw", UserRole::Dealer)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn role_mismatch_is_plain_unauthorized() {
        let user = dealer_user("secret-pw");

        let mut store = MockStore::new();
        store
            .expect_find_user_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let err = service(store)
            .login("asha@example.com", "secret-pw", UserRole::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(msg) if msg == INVALID_CREDENTIALS));
    }
}
