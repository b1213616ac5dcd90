pub mod auth;
pub mod customers;
pub mod dealer_portal;
pub mod dealers;
pub mod employees;
pub mod health;
pub mod search;
