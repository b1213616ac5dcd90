use crate::auth::Claims;
use crate::database::{
    AuditAction, CustomerSearchRow, CustomerType, Employee, EmployeeSearchRow, EmployeeStatus,
    Store, UserRole,
};
use crate::services::AuditService;
use crate::utils::error::ApiError;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Employee,
    Customer,
}

/// Normalized row shape shared by both entity kinds, tagged with its origin.
#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub dealer_id: Uuid,
    pub company_name: String,
    pub additional: SearchExtra,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SearchExtra {
    Employee {
        aadhar: String,
        position: String,
        hire_date: NaiveDate,
    },
    Customer {
        customer_type: CustomerType,
        official_id: String,
        contact_person: Option<String>,
    },
}

impl SearchHit {
    fn from_employee(row: EmployeeSearchRow) -> Self {
        SearchHit {
            id: row.id,
            kind: EntityKind::Employee,
            name: format!("{} {}", row.first_name, row.last_name),
            email: row.email,
            phone: row.phone,
            status: row.status.as_str().to_string(),
            dealer_id: row.dealer_id,
            company_name: row.company_name,
            additional: SearchExtra::Employee {
                aadhar: row.aadhar,
                position: row.position,
                hire_date: row.hire_date,
            },
        }
    }

    fn from_customer(row: CustomerSearchRow) -> Self {
        SearchHit {
            id: row.id,
            kind: EntityKind::Customer,
            name: row.name_or_entity,
            email: row.email,
            phone: row.phone,
            status: row.status.as_str().to_string(),
            dealer_id: row.dealer_id,
            company_name: row.company_name,
            additional: SearchExtra::Customer {
                customer_type: row.kind,
                official_id: row.official_id,
                contact_person: row.contact_person,
            },
        }
    }
}

/// Exact-match aadhar lookup result, used to catch duplicate-identity
/// registrations before they happen.
#[derive(Debug, Serialize)]
pub struct AadharMatch {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub dealer_id: Uuid,
    pub aadhar: String,
    pub position: String,
    pub hire_date: NaiveDate,
}

impl AadharMatch {
    fn from_employee(employee: Employee) -> Self {
        AadharMatch {
            id: employee.id,
            kind: EntityKind::Employee,
            name: format!("{} {}", employee.first_name, employee.last_name),
            email: employee.email,
            phone: employee.phone,
            status: employee.status.as_str().to_string(),
            dealer_id: employee.dealer_id,
            aadhar: employee.aadhar,
            position: employee.position,
            hire_date: employee.hire_date,
        }
    }
}

/// Case-insensitive substring search across employees and customers. Dealer
/// callers get the tenant predicate pushed into the query itself; admins run
/// unscoped. Each side is capped at 50 rows, newest first.
pub struct SearchService {
    repository: Arc<dyn Store>,
    audit: Arc<AuditService>,
}

impl SearchService {
    pub fn new(repository: Arc<dyn Store>, audit: Arc<AuditService>) -> Self {
        Self { repository, audit }
    }

    pub async fn search(&self, claims: &Claims, term: &str) -> Result<Vec<SearchHit>, ApiError> {
        let scope = scope_for(claims)?;

        let employees = self
            .repository
            .search_employees(term, scope)
            .await
            .map_err(ApiError::db)?;
        let customers = self
            .repository
            .search_customers(term, scope)
            .await
            .map_err(ApiError::db)?;

        let results = merge_results(employees, customers);
        info!(
            "Search '{}' returned {} results for user {}",
            term,
            results.len(),
            claims.sub
        );

        self.audit
            .record(
                claims,
                AuditAction::Search,
                format!("Performed universal search: {}", term),
            )
            .await?;

        Ok(results)
    }

    /// Deliberately unscoped: the point is to detect an aadhar already
    /// registered under any dealer. Only active employees count.
    pub async fn check_aadhar(&self, aadhar: &str) -> Result<Option<AadharMatch>, ApiError> {
        let employee = self
            .repository
            .find_employee_by_aadhar(aadhar)
            .await
            .map_err(ApiError::db)?;

        Ok(employee
            .filter(|e| e.status == EmployeeStatus::Active)
            .map(AadharMatch::from_employee))
    }
}

fn scope_for(claims: &Claims) -> Result<Option<Uuid>, ApiError> {
    match claims.role {
        UserRole::Admin => Ok(None),
        UserRole::Dealer => claims.dealer_id.map(Some).ok_or_else(|| {
            ApiError::Forbidden("No dealer profile linked to this account".to_string())
        }),
    }
}

fn merge_results(
    employees: Vec<EmployeeSearchRow>,
    customers: Vec<CustomerSearchRow>,
) -> Vec<SearchHit> {
    employees
        .into_iter()
        .map(SearchHit::from_employee)
        .chain(customers.into_iter().map(SearchHit::from_customer))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::CustomerStatus;
    use chrono::Utc;

    fn employee_row(dealer_id: Uuid) -> EmployeeSearchRow {
        EmployeeSearchRow {
            id: Uuid::new_v4(),
            dealer_id,
            first_name: "Bilal".into(),
            last_name: "Mir".into(),
            phone: "9797000001".into(),
            email: "bilal@example.com".into(),
            aadhar: "111122223333".into(),
            position: "Manager".into(),
            hire_date: NaiveDate::from_ymd_opt(2022, 6, 15).unwrap(),
            status: EmployeeStatus::Active,
            created_at: Utc::now(),
            company_name: "Valley Fuels".into(),
        }
    }

    fn customer_row(dealer_id: Uuid) -> CustomerSearchRow {
        CustomerSearchRow {
            id: Uuid::new_v4(),
            dealer_id,
            kind: CustomerType::Government,
            name_or_entity: "PWD Srinagar".into(),
            contact_person: Some("R. Lone".into()),
            phone: "0194222222".into(),
            email: "pwd@example.com".into(),
            official_id: "GOV-42".into(),
            status: CustomerStatus::Active,
            created_at: Utc::now(),
            company_name: "Valley Fuels".into(),
        }
    }

    #[test]
    fn merged_results_are_tagged_by_kind() {
        let dealer = Uuid::new_v4();
        let hits = merge_results(vec![employee_row(dealer)], vec![customer_row(dealer)]);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].kind, EntityKind::Employee);
        assert_eq!(hits[0].name, "Bilal Mir");
        assert_eq!(hits[1].kind, EntityKind::Customer);
        assert_eq!(hits[1].name, "PWD Srinagar");
    }

    #[test]
    fn employee_extra_carries_identity_fields() {
        let hits = merge_results(vec![employee_row(Uuid::new_v4())], vec![]);
        match &hits[0].additional {
            SearchExtra::Employee { aadhar, position, .. } => {
                assert_eq!(aadhar, "111122223333");
                assert_eq!(position, "Manager");
            }
            SearchExtra::Customer { .. } => panic!("employee row tagged as customer"),
        }
    }

    #[test]
    fn admin_scope_is_unrestricted() {
        let admin = Claims {
            sub: Uuid::new_v4(),
            role: UserRole::Admin,
            email: "a@example.com".into(),
            dealer_id: None,
            exp: 0,
        };
        assert_eq!(scope_for(&admin).unwrap(), None);
    }

    #[test]
    fn dealer_scope_is_their_tenant() {
        let dealer_id = Uuid::new_v4();
        let dealer = Claims {
            sub: Uuid::new_v4(),
            role: UserRole::Dealer,
            email: "d@example.com".into(),
            dealer_id: Some(dealer_id),
            exp: 0,
        };
        assert_eq!(scope_for(&dealer).unwrap(), Some(dealer_id));
    }

    #[test]
    fn dealer_without_profile_cannot_search() {
        let orphan = Claims {
            sub: Uuid::new_v4(),
            role: UserRole::Dealer,
            email: "d@example.com".into(),
            dealer_id: None,
            exp: 0,
        };
        assert!(matches!(
            scope_for(&orphan).unwrap_err(),
            ApiError::Forbidden(_)
        ));
    }

    #[test]
    fn hit_serialization_uses_type_tag() {
        let hits = merge_results(vec![], vec![customer_row(Uuid::new_v4())]);
        let json = serde_json::to_value(&hits[0]).unwrap();
        assert_eq!(json["type"], "customer");
        assert_eq!(json["additional"]["customer_type"], "government");
        assert_eq!(json["additional"]["official_id"], "GOV-42");
    }

    #[tokio::test]
    async fn search_records_exactly_one_audit_entry() {
        use crate::database::{AuditLog, MockStore};

        let dealer_id = Uuid::new_v4();
        let mut store = MockStore::new();
        store
            .expect_search_employees()
            .returning(move |_, _| Ok(vec![employee_row(dealer_id)]));
        store
            .expect_search_customers()
            .returning(|_, _| Ok(vec![]));
        store
            .expect_insert_audit()
            .withf(|entry| entry.action_type == AuditAction::Search)
            .times(1)
            .returning(|entry| {
                Ok(AuditLog {
                    id: 1,
                    who_user_id: entry.who_user_id,
                    who_user_name: entry.who_user_name.clone(),
                    dealer_id: entry.dealer_id,
                    action_type: entry.action_type,
                    details: entry.details.clone(),
                    timestamp: Utc::now(),
                })
            });

        let store: Arc<dyn Store> = Arc::new(store);
        let service = SearchService::new(store.clone(), Arc::new(AuditService::new(store)));

        let claims = Claims {
            sub: Uuid::new_v4(),
            role: UserRole::Dealer,
            email: "d@example.com".into(),
            dealer_id: Some(dealer_id),
            exp: 0,
        };
        let hits = service.search(&claims, "bilal").await.unwrap();
        assert_eq!(hits.len(), 1);
    }
}
