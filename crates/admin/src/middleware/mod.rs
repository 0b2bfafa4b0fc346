//! Request middleware: bearer-token authentication and the URL permission
//! gate.

pub mod auth;
pub mod permission;

pub use auth::RequireAuth;
pub use permission::{AccessDecision, check_permission, decide, require_active};
