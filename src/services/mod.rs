pub mod audit;
pub mod auth;
pub mod customers;
pub mod dealers;
pub mod employees;
pub mod search;

pub use audit::AuditService;
pub use auth::AuthService;
pub use customers::CustomerService;
pub use dealers::DealerService;
pub use employees::EmployeeService;
pub use search::SearchService;
