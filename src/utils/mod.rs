pub mod error;
pub mod extract;
pub mod rate_limit;
pub mod response;

pub use error::ApiError;
pub use extract::ValidatedJson;
pub use rate_limit::RateLimiter;
pub use response::ApiResponse;
