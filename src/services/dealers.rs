use crate::auth::password::{generate_temp_password, hash_password};
use crate::auth::Claims;
use crate::database::{
    AuditAction, Dealer, DealerChanges, DealerWithUser, NewDealerAccount, Store, UserRole,
};
use crate::services::AuditService;
use crate::utils::error::ApiError;
use std::sync::Arc;
use uuid::Uuid;

pub struct CreateDealerInput {
    pub name: String,
    pub username: String,
    pub email: String,
    pub company_name: String,
    pub primary_contact_name: String,
    pub primary_contact_phone: String,
    pub primary_contact_email: String,
    pub address: String,
}

/// The dealer returned at creation time, together with the one-time temporary
/// password for its login account.
#[derive(Debug)]
pub struct CreatedDealer {
    pub dealer: Dealer,
    pub temp_password: String,
}

/// Admin-facing dealer lifecycle management.
pub struct DealerService {
    repository: Arc<dyn Store>,
    audit: Arc<AuditService>,
    bcrypt_cost: u32,
}

impl DealerService {
    pub fn new(repository: Arc<dyn Store>, audit: Arc<AuditService>, bcrypt_cost: u32) -> Self {
        Self {
            repository,
            audit,
            bcrypt_cost,
        }
    }

    pub async fn list(&self) -> Result<Vec<DealerWithUser>, ApiError> {
        self.repository
            .all_dealers_with_user()
            .await
            .map_err(ApiError::db)
    }

    pub async fn get(&self, id: Uuid) -> Result<DealerWithUser, ApiError> {
        self.repository
            .dealer_with_user(id)
            .await
            .map_err(ApiError::db)?
            .ok_or_else(|| ApiError::NotFound("Dealer not found".to_string()))
    }

    pub async fn create(
        &self,
        claims: &Claims,
        input: CreateDealerInput,
    ) -> Result<CreatedDealer, ApiError> {
        if self
            .repository
            .find_user_by_email(&input.email)
            .await
            .map_err(ApiError::db)?
            .is_some()
        {
            return Err(ApiError::Conflict("Email already exists".to_string()));
        }

        if self
            .repository
            .find_user_by_username(&input.username)
            .await
            .map_err(ApiError::db)?
            .is_some()
        {
            return Err(ApiError::Conflict("Username already exists".to_string()));
        }

        let temp_password = generate_temp_password();
        let password_hash = hash_password(&temp_password, self.bcrypt_cost)
            .map_err(|e| ApiError::InternalError(e.to_string()))?;

        let dealer = self
            .repository
            .create_dealer_account(&NewDealerAccount {
                name: input.name,
                username: input.username,
                email: input.email,
                password_hash,
                company_name: input.company_name,
                primary_contact_name: input.primary_contact_name,
                primary_contact_phone: input.primary_contact_phone,
                primary_contact_email: input.primary_contact_email,
                address: input.address,
            })
            .await
            .map_err(ApiError::db)?;

        self.audit
            .record(
                claims,
                AuditAction::CreateDealer,
                format!("Created dealer: {}", dealer.company_name),
            )
            .await?;

        Ok(CreatedDealer {
            dealer,
            temp_password,
        })
    }

    pub async fn update(
        &self,
        claims: &Claims,
        id: Uuid,
        changes: DealerChanges,
    ) -> Result<Dealer, ApiError> {
        self.repository
            .find_dealer_by_id(id)
            .await
            .map_err(ApiError::db)?
            .ok_or_else(|| ApiError::NotFound("Dealer not found".to_string()))?;

        let updated = self
            .repository
            .update_dealer(id, &changes)
            .await
            .map_err(ApiError::db)?;

        self.audit
            .record_as(
                claims.sub,
                &claims.email,
                Some(id),
                AuditAction::UpdateDealer,
                format!("Updated dealer: {}", updated.company_name),
            )
            .await?;

        Ok(updated)
    }

    pub async fn delete(&self, claims: &Claims, id: Uuid) -> Result<(), ApiError> {
        let dealer = self
            .repository
            .find_dealer_by_id(id)
            .await
            .map_err(ApiError::db)?
            .ok_or_else(|| ApiError::NotFound("Dealer not found".to_string()))?;

        self.repository
            .delete_dealer(id)
            .await
            .map_err(ApiError::db)?;

        self.audit
            .record(
                claims,
                AuditAction::DeleteDealer,
                format!("Deleted dealer: {}", dealer.company_name),
            )
            .await?;

        Ok(())
    }

    /// Admin-initiated reset for a dealer's login account. The temp password
    /// is returned once, never stored in the clear.
    pub async fn reset_password(&self, claims: &Claims, user_id: Uuid) -> Result<String, ApiError> {
        let user = self
            .repository
            .find_user_by_id(user_id)
            .await
            .map_err(ApiError::db)?
            .filter(|u| u.role == UserRole::Dealer)
            .ok_or_else(|| ApiError::NotFound("Dealer not found".to_string()))?;

        let temp_password = generate_temp_password();
        let hash = hash_password(&temp_password, self.bcrypt_cost)
            .map_err(|e| ApiError::InternalError(e.to_string()))?;

        self.repository
            .set_user_password(user.id, &hash, true)
            .await
            .map_err(ApiError::db)?;

        self.audit
            .record_as(
                claims.sub,
                &claims.email,
                user.dealer_id,
                AuditAction::ResetPassword,
                format!("Admin reset password for dealer: {}", user.name),
            )
            .await?;

        Ok(temp_password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{AuditLog, DealerStatus, MockStore, NewAuditEntry};
    use chrono::Utc;

    fn admin_claims() -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            role: UserRole::Admin,
            email: "admin@example.com".into(),
            dealer_id: None,
            exp: 0,
        }
    }

    fn dealer(company_name: &str) -> Dealer {
        Dealer {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            company_name: company_name.into(),
            primary_contact_name: "R. Mehta".into(),
            primary_contact_phone: "9876500000".into(),
            primary_contact_email: "contact@northern.example.com".into(),
            address: "Plot 12, Industrial Area".into(),
            status: DealerStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
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

    fn service(store: MockStore) -> DealerService {
        let store: Arc<dyn Store> = Arc::new(store);
        DealerService::new(store.clone(), Arc::new(AuditService::new(store)), 4)
    }

    fn create_input() -> CreateDealerInput {
        CreateDealerInput {
            name: "Ravi Mehta".into(),
            username: "ravi".into(),
            email: "ravi@example.com".into(),
            company_name: "Northern Fuels".into(),
            primary_contact_name: "R. Mehta".into(),
            primary_contact_phone: "9876500000".into(),
            primary_contact_email: "contact@northern.example.com".into(),
            address: "Plot 12, Industrial Area".into(),
        }
    }

    #[tokio::test]
    async fn create_records_exactly_one_audit_entry() {
        let mut store = MockStore::new();
        store.expect_find_user_by_email().returning(|_| Ok(None));
        store.expect_find_user_by_username().returning(|_| Ok(None));
        store
            .expect_create_dealer_account()
            .times(1)
            .returning(|_| Ok(dealer("Northern Fuels")));
        store
            .expect_insert_audit()
            .withf(|entry| entry.action_type == AuditAction::CreateDealer)
            .times(1)
            .returning(|entry| Ok(audit_row(entry)));

        let created = service(store)
            .create(&admin_claims(), create_input())
            .await
            .unwrap();
        assert!(!created.temp_password.is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_before_any_write() {
        let mut store = MockStore::new();
        store.expect_find_user_by_email().returning(|_| {
            Ok(Some(crate::database::User {
                id: Uuid::new_v4(),
                role: UserRole::Dealer,
                name: "Existing".into(),
                username: "existing".into(),
                email: "ravi@example.com".into(),
                password_hash: String::new(),
                temp_pass: false,
                dealer_id: Some(Uuid::new_v4()),
                created_at: Utc::now(),
                updated_at: Utc::now(),
                last_login: None,
            }))
        });

        let err = service(store)
            .create(&admin_claims(), create_input())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_records_exactly_one_audit_entry() {
        let id = Uuid::new_v4();
        let mut store = MockStore::new();
        store
            .expect_find_dealer_by_id()
            .returning(|_| Ok(Some(dealer("Northern Fuels"))));
        store.expect_delete_dealer().times(1).returning(|_| Ok(()));
        store
            .expect_insert_audit()
            .withf(|entry| {
                entry.action_type == AuditAction::DeleteDealer
                    && entry.details.contains("Northern Fuels")
            })
            .times(1)
            .returning(|entry| Ok(audit_row(entry)));

        service(store).delete(&admin_claims(), id).await.unwrap();
    }

    #[tokio::test]
    async fn delete_of_unknown_dealer_is_not_found_and_unaudited() {
        let mut store = MockStore::new();
        store.expect_find_dealer_by_id().returning(|_| Ok(None));

        let err = service(store)
            .delete(&admin_claims(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
