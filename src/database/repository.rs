use super::models::*;
use super::pool::DbPool;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

const SEARCH_RESULT_CAP: i64 = 50;

/// Persistence port. Services depend on this trait; `Repository` is the
/// Postgres implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    // users
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn update_user_profile(&self, id: Uuid, changes: &UserProfileChanges) -> Result<User>;
    async fn set_user_password(
        &self,
        id: Uuid,
        password_hash: &str,
        temp_pass: bool,
    ) -> Result<User>;
    async fn update_last_login(&self, id: Uuid) -> Result<()>;

    // dealers
    async fn create_dealer_account(&self, new: &NewDealerAccount) -> Result<Dealer>;
    async fn find_dealer_by_id(&self, id: Uuid) -> Result<Option<Dealer>>;
    async fn dealer_with_user(&self, id: Uuid) -> Result<Option<DealerWithUser>>;
    async fn all_dealers_with_user(&self) -> Result<Vec<DealerWithUser>>;
    async fn update_dealer(&self, id: Uuid, changes: &DealerChanges) -> Result<Dealer>;
    async fn delete_dealer(&self, id: Uuid) -> Result<()>;

    // employees
    async fn employees_for_dealer(&self, dealer_id: Uuid) -> Result<Vec<Employee>>;
    async fn find_employee_by_id(&self, id: Uuid) -> Result<Option<Employee>>;
    async fn find_employee_by_aadhar(&self, aadhar: &str) -> Result<Option<Employee>>;
    async fn create_employee(&self, new: &NewEmployee) -> Result<Employee>;
    async fn update_employee(&self, id: Uuid, changes: &EmployeeChanges) -> Result<Employee>;
    async fn terminate_employee(
        &self,
        id: Uuid,
        termination_date: NaiveDate,
        termination_reason: &str,
    ) -> Result<Employee>;
    async fn search_employees(
        &self,
        term: &str,
        scope: Option<Uuid>,
    ) -> Result<Vec<EmployeeSearchRow>>;

    // customers
    async fn customers_for_dealer(&self, dealer_id: Uuid) -> Result<Vec<Customer>>;
    async fn find_customer_by_id(&self, id: Uuid) -> Result<Option<Customer>>;
    async fn create_customer(&self, new: &NewCustomer) -> Result<Customer>;
    async fn update_customer(&self, id: Uuid, changes: &CustomerChanges) -> Result<Customer>;
    async fn search_customers(
        &self,
        term: &str,
        scope: Option<Uuid>,
    ) -> Result<Vec<CustomerSearchRow>>;

    // audit log
    async fn insert_audit(&self, entry: &NewAuditEntry) -> Result<AuditLog>;
    async fn recent_audit(&self, limit: i64) -> Result<Vec<AuditLog>>;
    async fn audit_for_dealer(&self, dealer_id: Uuid, limit: i64) -> Result<Vec<AuditLog>>;
    async fn prune_audit_before(&self, cutoff: DateTime<Utc>) -> Result<u64>;
}

pub struct Repository {
    pool: DbPool,
}

impl Repository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for Repository {
    // -- users --------------------------------------------------------------

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.get_pool())
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(self.pool.get_pool())
            .await?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(self.pool.get_pool())
            .await?;
        Ok(user)
    }

    async fn update_user_profile(&self, id: Uuid, changes: &UserProfileChanges) -> Result<User> {
        let mut query = build_user_profile_update(id, changes);
        let user = query
            .build_query_as::<User>()
            .fetch_one(self.pool.get_pool())
            .await?;
        Ok(user)
    }

    async fn set_user_password(
        &self,
        id: Uuid,
        password_hash: &str,
        temp_pass: bool,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"UPDATE users
               SET password_hash = $1, temp_pass = $2, updated_at = NOW()
               WHERE id = $3
               RETURNING *"#,
        )
        .bind(password_hash)
        .bind(temp_pass)
        .bind(id)
        .fetch_one(self.pool.get_pool())
        .await?;
        Ok(user)
    }

    async fn update_last_login(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(id)
            .execute(self.pool.get_pool())
            .await?;
        Ok(())
    }

    // -- dealers ------------------------------------------------------------

    /// Creates the login account, the dealer profile and the back-link in one
    /// transaction; a failure at any step rolls everything back.
    async fn create_dealer_account(&self, new: &NewDealerAccount) -> Result<Dealer> {
        let mut tx = self.pool.get_pool().begin().await?;

        let user_id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO users (role, name, username, email, password_hash, temp_pass)
               VALUES ('dealer', $1, $2, $3, $4, TRUE)
               RETURNING id"#,
        )
        .bind(&new.name)
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .fetch_one(&mut *tx)
        .await?;

        let dealer = sqlx::query_as::<_, Dealer>(
            r#"INSERT INTO dealers (user_id, company_name, primary_contact_name,
                                    primary_contact_phone, primary_contact_email, address)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(user_id)
        .bind(&new.company_name)
        .bind(&new.primary_contact_name)
        .bind(&new.primary_contact_phone)
        .bind(&new.primary_contact_email)
        .bind(&new.address)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET dealer_id = $1, updated_at = NOW() WHERE id = $2")
            .bind(dealer.id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!("Created dealer account {} for user {}", dealer.id, user_id);

        Ok(dealer)
    }

    async fn find_dealer_by_id(&self, id: Uuid) -> Result<Option<Dealer>> {
        let dealer = sqlx::query_as::<_, Dealer>("SELECT * FROM dealers WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.get_pool())
            .await?;
        Ok(dealer)
    }

    async fn dealer_with_user(&self, id: Uuid) -> Result<Option<DealerWithUser>> {
        let dealer = sqlx::query_as::<_, DealerWithUser>(
            r#"SELECT d.*, u.name AS user_name, u.email AS user_email, u.username
               FROM dealers d
               JOIN users u ON d.user_id = u.id
               WHERE d.id = $1"#,
        )
        .bind(id)
        .fetch_optional(self.pool.get_pool())
        .await?;
        Ok(dealer)
    }

    async fn all_dealers_with_user(&self) -> Result<Vec<DealerWithUser>> {
        let dealers = sqlx::query_as::<_, DealerWithUser>(
            r#"SELECT d.*, u.name AS user_name, u.email AS user_email, u.username
               FROM dealers d
               JOIN users u ON d.user_id = u.id
               ORDER BY d.created_at DESC"#,
        )
        .fetch_all(self.pool.get_pool())
        .await?;
        Ok(dealers)
    }

    async fn update_dealer(&self, id: Uuid, changes: &DealerChanges) -> Result<Dealer> {
        let mut query = build_dealer_update(id, changes);
        let dealer = query
            .build_query_as::<Dealer>()
            .fetch_one(self.pool.get_pool())
            .await?;
        Ok(dealer)
    }

    /// The users.dealer_id FK cascades, so the login account goes with it.
    async fn delete_dealer(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM dealers WHERE id = $1")
            .bind(id)
            .execute(self.pool.get_pool())
            .await?;
        Ok(())
    }

    // -- employees ----------------------------------------------------------

    async fn employees_for_dealer(&self, dealer_id: Uuid) -> Result<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE dealer_id = $1 ORDER BY hire_date DESC",
        )
        .bind(dealer_id)
        .fetch_all(self.pool.get_pool())
        .await?;
        Ok(employees)
    }

    async fn find_employee_by_id(&self, id: Uuid) -> Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.get_pool())
            .await?;
        Ok(employee)
    }

    /// Aadhar is unique across the whole system, not per tenant.
    async fn find_employee_by_aadhar(&self, aadhar: &str) -> Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE aadhar = $1")
            .bind(aadhar)
            .fetch_optional(self.pool.get_pool())
            .await?;
        Ok(employee)
    }

    async fn create_employee(&self, new: &NewEmployee) -> Result<Employee> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"INSERT INTO employees (dealer_id, first_name, last_name, phone, email,
                                      aadhar, position, hire_date)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING *"#,
        )
        .bind(new.dealer_id)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.phone)
        .bind(&new.email)
        .bind(&new.aadhar)
        .bind(&new.position)
        .bind(new.hire_date)
        .fetch_one(self.pool.get_pool())
        .await?;
        Ok(employee)
    }

    async fn update_employee(&self, id: Uuid, changes: &EmployeeChanges) -> Result<Employee> {
        let mut query = build_employee_update(id, changes);
        let employee = query
            .build_query_as::<Employee>()
            .fetch_one(self.pool.get_pool())
            .await?;
        Ok(employee)
    }

    async fn terminate_employee(
        &self,
        id: Uuid,
        termination_date: NaiveDate,
        termination_reason: &str,
    ) -> Result<Employee> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"UPDATE employees
               SET status = 'terminated',
                   termination_date = $1,
                   termination_reason = $2,
                   updated_at = NOW()
               WHERE id = $3
               RETURNING *"#,
        )
        .bind(termination_date)
        .bind(termination_reason)
        .bind(id)
        .fetch_one(self.pool.get_pool())
        .await?;
        Ok(employee)
    }

    async fn search_employees(
        &self,
        term: &str,
        scope: Option<Uuid>,
    ) -> Result<Vec<EmployeeSearchRow>> {
        let pattern = like_pattern(term);
        let mut query = build_employee_search(&pattern, scope);
        let rows = query
            .build_query_as::<EmployeeSearchRow>()
            .fetch_all(self.pool.get_pool())
            .await?;
        debug!("Employee search matched {} rows", rows.len());
        Ok(rows)
    }

    // -- customers ----------------------------------------------------------

    async fn customers_for_dealer(&self, dealer_id: Uuid) -> Result<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE dealer_id = $1 ORDER BY created_at DESC",
        )
        .bind(dealer_id)
        .fetch_all(self.pool.get_pool())
        .await?;
        Ok(customers)
    }

    async fn find_customer_by_id(&self, id: Uuid) -> Result<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.get_pool())
            .await?;
        Ok(customer)
    }

    async fn create_customer(&self, new: &NewCustomer) -> Result<Customer> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"INSERT INTO customers (dealer_id, type, name_or_entity, contact_person,
                                      phone, email, official_id, address)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING *"#,
        )
        .bind(new.dealer_id)
        .bind(new.kind)
        .bind(&new.name_or_entity)
        .bind(&new.contact_person)
        .bind(&new.phone)
        .bind(&new.email)
        .bind(&new.official_id)
        .bind(&new.address)
        .fetch_one(self.pool.get_pool())
        .await?;
        Ok(customer)
    }

    async fn update_customer(&self, id: Uuid, changes: &CustomerChanges) -> Result<Customer> {
        let mut query = build_customer_update(id, changes);
        let customer = query
            .build_query_as::<Customer>()
            .fetch_one(self.pool.get_pool())
            .await?;
        Ok(customer)
    }

    async fn search_customers(
        &self,
        term: &str,
        scope: Option<Uuid>,
    ) -> Result<Vec<CustomerSearchRow>> {
        let pattern = like_pattern(term);
        let mut query = build_customer_search(&pattern, scope);
        let rows = query
            .build_query_as::<CustomerSearchRow>()
            .fetch_all(self.pool.get_pool())
            .await?;
        debug!("Customer search matched {} rows", rows.len());
        Ok(rows)
    }

    // -- audit log ----------------------------------------------------------

    async fn insert_audit(&self, entry: &NewAuditEntry) -> Result<AuditLog> {
        let log = sqlx::query_as::<_, AuditLog>(
            r#"INSERT INTO audit_logs (who_user_id, who_user_name, dealer_id, action_type, details)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING *"#,
        )
        .bind(entry.who_user_id)
        .bind(&entry.who_user_name)
        .bind(entry.dealer_id)
        .bind(entry.action_type)
        .bind(&entry.details)
        .fetch_one(self.pool.get_pool())
        .await?;
        Ok(log)
    }

    async fn recent_audit(&self, limit: i64) -> Result<Vec<AuditLog>> {
        let logs = sqlx::query_as::<_, AuditLog>(
            "SELECT * FROM audit_logs ORDER BY timestamp DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool.get_pool())
        .await?;
        Ok(logs)
    }

    async fn audit_for_dealer(&self, dealer_id: Uuid, limit: i64) -> Result<Vec<AuditLog>> {
        let logs = sqlx::query_as::<_, AuditLog>(
            "SELECT * FROM audit_logs WHERE dealer_id = $1 ORDER BY timestamp DESC LIMIT $2",
        )
        .bind(dealer_id)
        .bind(limit)
        .fetch_all(self.pool.get_pool())
        .await?;
        Ok(logs)
    }

    /// Retention helper; the only way audit rows ever leave the table.
    async fn prune_audit_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM audit_logs WHERE timestamp < $1")
            .bind(cutoff)
            .execute(self.pool.get_pool())
            .await?;
        Ok(result.rows_affected())
    }
}

fn like_pattern(term: &str) -> String {
    format!("%{}%", term)
}

// ---------------------------------------------------------------------------
// Partial-update and search query builders. Separated out so the generated
// SQL can be asserted on without a live database.
// ---------------------------------------------------------------------------

fn build_user_profile_update<'a>(
    id: Uuid,
    changes: &'a UserProfileChanges,
) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE users SET updated_at = NOW()");
    if let Some(v) = &changes.name {
        qb.push(", name = ").push_bind(v.as_str());
    }
    if let Some(v) = &changes.username {
        qb.push(", username = ").push_bind(v.as_str());
    }
    qb.push(" WHERE id = ").push_bind(id);
    qb.push(" RETURNING *");
    qb
}

fn build_dealer_update<'a>(id: Uuid, changes: &'a DealerChanges) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE dealers SET updated_at = NOW()");
    if let Some(v) = &changes.company_name {
        qb.push(", company_name = ").push_bind(v.as_str());
    }
    if let Some(v) = &changes.primary_contact_name {
        qb.push(", primary_contact_name = ").push_bind(v.as_str());
    }
    if let Some(v) = &changes.primary_contact_phone {
        qb.push(", primary_contact_phone = ").push_bind(v.as_str());
    }
    if let Some(v) = &changes.primary_contact_email {
        qb.push(", primary_contact_email = ").push_bind(v.as_str());
    }
    if let Some(v) = &changes.address {
        qb.push(", address = ").push_bind(v.as_str());
    }
    if let Some(v) = changes.status {
        qb.push(", status = ").push_bind(v);
    }
    qb.push(" WHERE id = ").push_bind(id);
    qb.push(" RETURNING *");
    qb
}

fn build_employee_update<'a>(id: Uuid, changes: &'a EmployeeChanges) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE employees SET updated_at = NOW()");
    if let Some(v) = &changes.first_name {
        qb.push(", first_name = ").push_bind(v.as_str());
    }
    if let Some(v) = &changes.last_name {
        qb.push(", last_name = ").push_bind(v.as_str());
    }
    if let Some(v) = &changes.phone {
        qb.push(", phone = ").push_bind(v.as_str());
    }
    if let Some(v) = &changes.email {
        qb.push(", email = ").push_bind(v.as_str());
    }
    if let Some(v) = &changes.position {
        qb.push(", position = ").push_bind(v.as_str());
    }
    qb.push(" WHERE id = ").push_bind(id);
    qb.push(" RETURNING *");
    qb
}

fn build_customer_update<'a>(id: Uuid, changes: &'a CustomerChanges) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE customers SET updated_at = NOW()");
    if let Some(v) = changes.kind {
        qb.push(", type = ").push_bind(v);
    }
    if let Some(v) = &changes.name_or_entity {
        qb.push(", name_or_entity = ").push_bind(v.as_str());
    }
    if let Some(v) = &changes.contact_person {
        qb.push(", contact_person = ").push_bind(v.as_str());
    }
    if let Some(v) = &changes.phone {
        qb.push(", phone = ").push_bind(v.as_str());
    }
    if let Some(v) = &changes.email {
        qb.push(", email = ").push_bind(v.as_str());
    }
    if let Some(v) = &changes.official_id {
        qb.push(", official_id = ").push_bind(v.as_str());
    }
    if let Some(v) = &changes.address {
        qb.push(", address = ").push_bind(v.as_str());
    }
    if let Some(v) = changes.status {
        qb.push(", status = ").push_bind(v);
    }
    qb.push(" WHERE id = ").push_bind(id);
    qb.push(" RETURNING *");
    qb
}

/// Case-insensitive substring match on text fields, plain substring on
/// phone/aadhar. The tenant predicate is part of the query when the caller is
/// dealer-scoped, so other tenants' rows are never fetched.
fn build_employee_search<'a>(pattern: &'a str, scope: Option<Uuid>) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(
        r#"SELECT e.id, e.dealer_id, e.first_name, e.last_name, e.phone, e.email,
                  e.aadhar, e.position, e.hire_date, e.status, e.created_at,
                  d.company_name
           FROM employees e
           JOIN dealers d ON e.dealer_id = d.id
           WHERE ((e.first_name || ' ' || e.last_name) ILIKE "#,
    );
    qb.push_bind(pattern);
    qb.push(" OR e.phone LIKE ").push_bind(pattern);
    qb.push(" OR e.aadhar LIKE ").push_bind(pattern);
    qb.push(" OR e.email ILIKE ").push_bind(pattern);
    qb.push(")");
    if let Some(dealer_id) = scope {
        qb.push(" AND e.dealer_id = ").push_bind(dealer_id);
    }
    qb.push(" ORDER BY e.created_at DESC LIMIT ")
        .push_bind(SEARCH_RESULT_CAP);
    qb
}

fn build_customer_search<'a>(pattern: &'a str, scope: Option<Uuid>) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(
        r#"SELECT c.id, c.dealer_id, c.type, c.name_or_entity, c.contact_person,
                  c.phone, c.email, c.official_id, c.status, c.created_at,
                  d.company_name
           FROM customers c
           JOIN dealers d ON c.dealer_id = d.id
           WHERE (c.name_or_entity ILIKE "#,
    );
    qb.push_bind(pattern);
    qb.push(" OR c.contact_person ILIKE ").push_bind(pattern);
    qb.push(" OR c.phone LIKE ").push_bind(pattern);
    qb.push(" OR c.official_id LIKE ").push_bind(pattern);
    qb.push(" OR c.email ILIKE ").push_bind(pattern);
    qb.push(")");
    if let Some(dealer_id) = scope {
        qb.push(" AND c.dealer_id = ").push_bind(dealer_id);
    }
    qb.push(" ORDER BY c.created_at DESC LIMIT ")
        .push_bind(SEARCH_RESULT_CAP);
    qb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dealer_update_touches_only_provided_fields() {
        let id = Uuid::new_v4();
        let changes = DealerChanges {
            company_name: Some("Northern Fuels".into()),
            status: Some(DealerStatus::Suspended),
            ..Default::default()
        };
        let sql = build_dealer_update(id, &changes).into_sql();

        assert!(sql.contains("updated_at = NOW()"));
        assert!(sql.contains("company_name = "));
        assert!(sql.contains("status = "));
        assert!(!sql.contains("address"));
        assert!(!sql.contains("primary_contact_phone"));
    }

    #[test]
    fn empty_update_still_stamps_updated_at() {
        let sql = build_dealer_update(Uuid::new_v4(), &DealerChanges::default()).into_sql();
        assert!(sql.starts_with("UPDATE dealers SET updated_at = NOW() WHERE id = "));
        assert!(sql.ends_with("RETURNING *"));
    }

    #[test]
    fn employee_update_cannot_express_a_status_change() {
        let changes = EmployeeChanges {
            first_name: Some("A".into()),
            last_name: Some("B".into()),
            phone: Some("1".into()),
            email: Some("a@b.com".into()),
            position: Some("Driver".into()),
        };
        let sql = build_employee_update(Uuid::new_v4(), &changes).into_sql();
        assert!(!sql.contains("status"));
        assert!(!sql.contains("termination"));
    }

    #[test]
    fn customer_update_covers_status_and_type() {
        let changes = CustomerChanges {
            kind: Some(CustomerType::Government),
            status: Some(CustomerStatus::Inactive),
            ..Default::default()
        };
        let sql = build_customer_update(Uuid::new_v4(), &changes).into_sql();
        assert!(sql.contains("type = "));
        assert!(sql.contains("status = "));
        assert!(!sql.contains("name_or_entity"));
    }

    #[test]
    fn scoped_employee_search_carries_tenant_predicate() {
        let pattern = like_pattern("khan");
        assert_eq!(pattern, "%khan%");

        let unscoped = build_employee_search(&pattern, None).into_sql();
        assert!(!unscoped.contains("AND e.dealer_id"));
        assert!(unscoped.contains("ILIKE"));
        assert!(unscoped.contains("ORDER BY e.created_at DESC"));

        let scoped = build_employee_search(&pattern, Some(Uuid::new_v4())).into_sql();
        assert!(scoped.contains("AND e.dealer_id = "));
    }

    #[test]
    fn scoped_customer_search_carries_tenant_predicate() {
        let pattern = like_pattern("947");
        let scoped = build_customer_search(&pattern, Some(Uuid::new_v4())).into_sql();
        assert!(scoped.contains("AND c.dealer_id = "));
        assert!(scoped.contains("c.official_id LIKE "));
    }

    #[test]
    fn profile_update_handles_each_field_independently() {
        let only_name = UserProfileChanges {
            name: Some("N".into()),
            username: None,
        };
        let sql = build_user_profile_update(Uuid::new_v4(), &only_name).into_sql();
        assert!(sql.contains("name = "));
        assert!(!sql.contains("username = "));
    }
}
