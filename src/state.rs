use crate::auth::JwtManager;
use crate::config::Settings;
use crate::database::{DbPool, Repository, Store};
use crate::services::{
    AuditService, AuthService, CustomerService, DealerService, EmployeeService, SearchService,
};
use crate::utils::RateLimiter;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub jwt: Arc<JwtManager>,
    pub rate_limiter: Arc<RateLimiter>,
    pub auth_service: Arc<AuthService>,
    pub dealer_service: Arc<DealerService>,
    pub employee_service: Arc<EmployeeService>,
    pub customer_service: Arc<CustomerService>,
    pub search_service: Arc<SearchService>,
    pub audit_service: Arc<AuditService>,
}

impl AppState {
    pub fn new(settings: Settings, db_pool: DbPool) -> Self {
        let repository: Arc<dyn Store> = Arc::new(Repository::new(db_pool));
        let jwt = Arc::new(JwtManager::new(&settings.jwt));
        let rate_limiter = Arc::new(RateLimiter::new(
            Duration::from_secs(settings.rate_limit.window_seconds),
            settings.rate_limit.max_requests,
        ));

        let audit_service = Arc::new(AuditService::new(repository.clone()));
        let auth_service = Arc::new(AuthService::new(
            repository.clone(),
            audit_service.clone(),
            jwt.clone(),
            settings.password.bcrypt_cost,
        ));
        let dealer_service = Arc::new(DealerService::new(
            repository.clone(),
            audit_service.clone(),
            settings.password.bcrypt_cost,
        ));
        let employee_service = Arc::new(EmployeeService::new(
            repository.clone(),
            audit_service.clone(),
        ));
        let customer_service = Arc::new(CustomerService::new(
            repository.clone(),
            audit_service.clone(),
        ));
        let search_service = Arc::new(SearchService::new(repository, audit_service.clone()));

        Self {
            settings,
            jwt,
            rate_limiter,
            auth_service,
            dealer_service,
            employee_service,
            customer_service,
            search_service,
            audit_service,
        }
    }
}
