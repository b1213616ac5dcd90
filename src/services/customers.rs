use crate::auth::middleware::ensure_tenant_scope;
use crate::auth::Claims;
use crate::database::{AuditAction, Customer, CustomerChanges, CustomerType, NewCustomer, Store};
use crate::services::AuditService;
use crate::utils::error::ApiError;
use std::sync::Arc;
use uuid::Uuid;

pub struct CreateCustomerInput {
    pub kind: CustomerType,
    pub name_or_entity: String,
    pub contact_person: Option<String>,
    pub phone: String,
    pub email: String,
    pub official_id: String,
    pub address: String,
}

/// Dealer-facing customer book. Status is reversible (`active <-> inactive`)
/// through a plain update, unlike employee termination.
pub struct CustomerService {
    repository: Arc<dyn Store>,
    audit: Arc<AuditService>,
}

impl CustomerService {
    pub fn new(repository: Arc<dyn Store>, audit: Arc<AuditService>) -> Self {
        Self { repository, audit }
    }

    pub async fn list(&self, claims: &Claims) -> Result<Vec<Customer>, ApiError> {
        let dealer_id = require_dealer_tenant(claims)?;
        self.repository
            .customers_for_dealer(dealer_id)
            .await
            .map_err(ApiError::db)
    }

    pub async fn create(
        &self,
        claims: &Claims,
        input: CreateCustomerInput,
    ) -> Result<Customer, ApiError> {
        let dealer_id = require_dealer_tenant(claims)?;

        let customer = self
            .repository
            .create_customer(&NewCustomer {
                dealer_id,
                kind: input.kind,
                name_or_entity: input.name_or_entity,
                contact_person: input.contact_person,
                phone: input.phone,
                email: input.email,
                official_id: input.official_id,
                address: input.address,
            })
            .await
            .map_err(ApiError::db)?;

        self.audit
            .record(
                claims,
                AuditAction::CreateCustomer,
                format!("Created customer: {}", customer.name_or_entity),
            )
            .await?;

        Ok(customer)
    }

    pub async fn update(
        &self,
        claims: &Claims,
        id: Uuid,
        changes: CustomerChanges,
    ) -> Result<Customer, ApiError> {
        let customer = self
            .repository
            .find_customer_by_id(id)
            .await
            .map_err(ApiError::db)?
            .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;
        ensure_tenant_scope(claims, customer.dealer_id)?;

        let updated = self
            .repository
            .update_customer(id, &changes)
            .await
            .map_err(ApiError::db)?;

        self.audit
            .record(
                claims,
                AuditAction::UpdateCustomer,
                format!("Updated customer: {}", updated.name_or_entity),
            )
            .await?;

        Ok(updated)
    }
}

fn require_dealer_tenant(claims: &Claims) -> Result<Uuid, ApiError> {
    claims
        .dealer_id
        .ok_or_else(|| ApiError::Forbidden("No dealer profile linked to this account".to_string()))
}
