use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Dealer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "dealer_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DealerStatus {
    Active,
    Suspended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employee_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Active,
    Terminated,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Terminated => "terminated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "customer_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Inactive,
}

impl CustomerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "customer_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    Private,
    Government,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "audit_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Login,
    Logout,
    PasswordReset,
    ResetPassword,
    ChangePassword,
    CreateDealer,
    UpdateDealer,
    DeleteDealer,
    Search,
    CreateEmployee,
    UpdateEmployee,
    TerminateEmployee,
    CreateCustomer,
    UpdateCustomer,
    UpdateProfile,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: Uuid,
    pub role: UserRole,
    pub name: String,
    pub username: String,
    pub email: String,
    // Never serialized to clients.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub temp_pass: bool,
    pub dealer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Dealer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub primary_contact_name: String,
    pub primary_contact_phone: String,
    pub primary_contact_email: String,
    pub address: String,
    pub status: DealerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dealer joined with its login account, for admin listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DealerWithUser {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub primary_contact_name: String,
    pub primary_contact_phone: String,
    pub primary_contact_email: String,
    pub address: String,
    pub status: DealerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_name: String,
    pub user_email: String,
    pub username: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Employee {
    pub id: Uuid,
    pub dealer_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub aadhar: String,
    pub position: String,
    pub hire_date: NaiveDate,
    pub status: EmployeeStatus,
    pub termination_date: Option<NaiveDate>,
    pub termination_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Customer {
    pub id: Uuid,
    pub dealer_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: CustomerType,
    pub name_or_entity: String,
    pub contact_person: Option<String>,
    pub phone: String,
    pub email: String,
    pub official_id: String,
    pub address: String,
    pub status: CustomerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: i64,
    pub who_user_id: Uuid,
    pub who_user_name: String,
    pub dealer_id: Option<Uuid>,
    pub action_type: AuditAction,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

/// Row shapes for the cross-table substring search, joined to the owning
/// dealer's company name.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeSearchRow {
    pub id: Uuid,
    pub dealer_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub aadhar: String,
    pub position: String,
    pub hire_date: NaiveDate,
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
    pub company_name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct CustomerSearchRow {
    pub id: Uuid,
    pub dealer_id: Uuid,
    #[sqlx(rename = "type")]
    pub kind: CustomerType,
    pub name_or_entity: String,
    pub contact_person: Option<String>,
    pub phone: String,
    pub email: String,
    pub official_id: String,
    pub status: CustomerStatus,
    pub created_at: DateTime<Utc>,
    pub company_name: String,
}

// ---------------------------------------------------------------------------
// Insert / partial-update parameter structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewDealerAccount {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub company_name: String,
    pub primary_contact_name: String,
    pub primary_contact_phone: String,
    pub primary_contact_email: String,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub dealer_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub aadhar: String,
    pub position: String,
    pub hire_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub dealer_id: Uuid,
    pub kind: CustomerType,
    pub name_or_entity: String,
    pub contact_person: Option<String>,
    pub phone: String,
    pub email: String,
    pub official_id: String,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub who_user_id: Uuid,
    pub who_user_name: String,
    pub dealer_id: Option<Uuid>,
    pub action_type: AuditAction,
    pub details: String,
}

/// Only provided fields change; `updated_at` is always stamped.
#[derive(Debug, Clone, Default)]
pub struct UserProfileChanges {
    pub name: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DealerChanges {
    pub company_name: Option<String>,
    pub primary_contact_name: Option<String>,
    pub primary_contact_phone: Option<String>,
    pub primary_contact_email: Option<String>,
    pub address: Option<String>,
    pub status: Option<DealerStatus>,
}

/// Deliberately has no status field: `active -> terminated` is one-way and
/// only `terminate_employee` can take it.
#[derive(Debug, Clone, Default)]
pub struct EmployeeChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerChanges {
    pub kind: Option<CustomerType>,
    pub name_or_entity: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub official_id: Option<String>,
    pub address: Option<String>,
    pub status: Option<CustomerStatus>,
}
