use crate::auth::middleware::ensure_tenant_scope;
use crate::auth::Claims;
use crate::database::{AuditAction, Employee, EmployeeChanges, EmployeeStatus, NewEmployee, Store};
use crate::services::AuditService;
use crate::utils::error::ApiError;
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

pub struct CreateEmployeeInput {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub aadhar: String,
    pub position: String,
    pub hire_date: NaiveDate,
}

/// Dealer-facing employee lifecycle. Every mutating path re-checks tenant
/// ownership against the loaded row, since the route-level gate only knows
/// the caller's role.
pub struct EmployeeService {
    repository: Arc<dyn Store>,
    audit: Arc<AuditService>,
}

impl EmployeeService {
    pub fn new(repository: Arc<dyn Store>, audit: Arc<AuditService>) -> Self {
        Self { repository, audit }
    }

    pub async fn list(&self, claims: &Claims) -> Result<Vec<Employee>, ApiError> {
        let dealer_id = require_dealer_tenant(claims)?;
        self.repository
            .employees_for_dealer(dealer_id)
            .await
            .map_err(ApiError::db)
    }

    pub async fn create(
        &self,
        claims: &Claims,
        input: CreateEmployeeInput,
    ) -> Result<Employee, ApiError> {
        let dealer_id = require_dealer_tenant(claims)?;

        let existing = self
            .repository
            .find_employee_by_aadhar(&input.aadhar)
            .await
            .map_err(ApiError::db)?;
        ensure_unique_aadhar(existing.as_ref())?;

        let employee = self
            .repository
            .create_employee(&NewEmployee {
                dealer_id,
                first_name: input.first_name,
                last_name: input.last_name,
                phone: input.phone,
                email: input.email,
                aadhar: input.aadhar,
                position: input.position,
                hire_date: input.hire_date,
            })
            .await
            .map_err(ApiError::db)?;

        self.audit
            .record(
                claims,
                AuditAction::CreateEmployee,
                format!(
                    "Created employee: {} {}",
                    employee.first_name, employee.last_name
                ),
            )
            .await?;

        Ok(employee)
    }

    pub async fn update(
        &self,
        claims: &Claims,
        id: Uuid,
        changes: EmployeeChanges,
    ) -> Result<Employee, ApiError> {
        let employee = self.load(id).await?;
        ensure_tenant_scope(claims, employee.dealer_id)?;

        let updated = self
            .repository
            .update_employee(id, &changes)
            .await
            .map_err(ApiError::db)?;

        self.audit
            .record(
                claims,
                AuditAction::UpdateEmployee,
                format!(
                    "Updated employee: {} {}",
                    updated.first_name, updated.last_name
                ),
            )
            .await?;

        Ok(updated)
    }

    /// One-way transition; a terminated employee can never become active
    /// again.
    pub async fn terminate(
        &self,
        claims: &Claims,
        id: Uuid,
        termination_date: NaiveDate,
        termination_reason: &str,
    ) -> Result<Employee, ApiError> {
        let employee = self.load(id).await?;
        ensure_tenant_scope(claims, employee.dealer_id)?;
        ensure_terminable(employee.status)?;

        let terminated = self
            .repository
            .terminate_employee(id, termination_date, termination_reason)
            .await
            .map_err(ApiError::db)?;

        self.audit
            .record(
                claims,
                AuditAction::TerminateEmployee,
                format!(
                    "Terminated employee: {} {}. Reason: {}",
                    terminated.first_name, terminated.last_name, termination_reason
                ),
            )
            .await?;

        Ok(terminated)
    }

    async fn load(&self, id: Uuid) -> Result<Employee, ApiError> {
        self.repository
            .find_employee_by_id(id)
            .await
            .map_err(ApiError::db)?
            .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))
    }
}

fn require_dealer_tenant(claims: &Claims) -> Result<Uuid, ApiError> {
    claims
        .dealer_id
        .ok_or_else(|| ApiError::Forbidden("No dealer profile linked to this account".to_string()))
}

fn ensure_unique_aadhar(existing: Option<&Employee>) -> Result<(), ApiError> {
    if existing.is_some() {
        return Err(ApiError::Conflict(
            "Employee with this Aadhar number already exists".to_string(),
        ));
    }
    Ok(())
}

fn ensure_terminable(status: EmployeeStatus) -> Result<(), ApiError> {
    match status {
        EmployeeStatus::Active => Ok(()),
        EmployeeStatus::Terminated => Err(ApiError::Conflict(
            "Employee is already terminated".to_string(),
        )),
    }
}
