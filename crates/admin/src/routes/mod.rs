//! HTTP route handlers for the admin backend.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check (in main)
//! GET  /health/ready              - Readiness check (in main)
//!
//! # Admin accounts
//! POST /api/v1/admin/login        - Login, returns a bearer token (open)
//! POST /api/v1/admin/create       - Create an account
//! POST /api/v1/admin/email        - Change an account's email
//! POST /api/v1/admin/mobile       - Change an account's mobile
//! POST /api/v1/admin/password     - Change an account's password
//! POST /api/v1/admin/active       - Flip an account's active flag
//!
//! # RBAC
//! POST /api/v1/permission/role/create     - Create a role
//! POST /api/v1/permission/role/modify     - Rename a role
//! POST /api/v1/permission/role/active     - Flip a role's active flag
//! POST /api/v1/permission/role/list       - List all roles
//! POST /api/v1/permission/url/add         - Grant a URL to a role
//! POST /api/v1/permission/url/remove      - Revoke a URL from a role
//! POST /api/v1/permission/url/roles       - Roles granted for a URL
//! POST /api/v1/permission/url/list        - List all grants
//! POST /api/v1/permission/relation/add    - Assign a role to an admin
//! POST /api/v1/permission/relation/remove - Remove a role from an admin
//! POST /api/v1/permission/relation/list   - List an admin's roles
//!
//! # Orders
//! POST /api/v1/order/create       - Create an order with its items
//! POST /api/v1/order/info         - Order + items by id
//! POST /api/v1/order/user         - Orders for a user by status
//! POST /api/v1/order/id           - Order id by order code
//! POST /api/v1/order/pay          - Record the payment method
//! POST /api/v1/order/ship         - Record the consignment code
//! POST /api/v1/order/status       - Set an explicit status
//!
//! # Banners
//! POST /api/v1/banner/create      - Create a banner
//! POST /api/v1/banner/list        - Banners valid at a unix time
//! POST /api/v1/banner/info        - Banner by id
//! POST /api/v1/banner/delete      - Delete a banner
//!
//! # Categories
//! POST /api/v1/category/create    - Insert a category
//! POST /api/v1/category/status    - Change a category's status
//! POST /api/v1/category/name      - Rename a category
//! POST /api/v1/category/children  - Children of a parent
//!
//! # SMS
//! POST /api/v1/sms/send           - Issue a verification code
//! POST /api/v1/sms/check          - Check a verification code
//!
//! # Upload
//! POST /api/v1/user/upload        - Multipart upload (field: file)
//! ```
//!
//! Everything below `/api/v1` except the login route requires a bearer token
//! and passes the URL permission gate; the admin-account routes additionally
//! re-check the caller's active flag against the database.

pub mod admins;
pub mod banners;
pub mod categories;
pub mod orders;
pub mod permissions;
pub mod sms;
pub mod uploads;

use axum::{Router, middleware::from_fn_with_state, routing::post};

use crate::middleware::{check_permission, require_active};
use crate::state::AppState;

/// Create the admin-account routes router.
///
/// The account-management routes carry the permission gate plus the
/// active-flag gate; `/login` is registered after the layers so it stays
/// reachable without a token.
fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/create", post(admins::create))
        .route("/email", post(admins::update_email))
        .route("/mobile", post(admins::update_mobile))
        .route("/password", post(admins::update_password))
        .route("/active", post(admins::update_active))
        .layer(from_fn_with_state(state.clone(), require_active))
        .layer(from_fn_with_state(state.clone(), check_permission))
        .route("/login", post(admins::login))
}

/// Create the RBAC routes router.
fn permission_routes() -> Router<AppState> {
    Router::new()
        .route("/role/create", post(permissions::create_role))
        .route("/role/modify", post(permissions::modify_role))
        .route("/role/active", post(permissions::set_role_active))
        .route("/role/list", post(permissions::list_roles))
        .route("/url/add", post(permissions::grant_url))
        .route("/url/remove", post(permissions::revoke_url))
        .route("/url/roles", post(permissions::roles_for_url))
        .route("/url/list", post(permissions::list_permissions))
        .route("/relation/add", post(permissions::assign_role))
        .route("/relation/remove", post(permissions::remove_role))
        .route("/relation/list", post(permissions::list_relations))
}

/// Create the order routes router.
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(orders::create))
        .route("/info", post(orders::info))
        .route("/user", post(orders::list_for_user))
        .route("/id", post(orders::id_by_code))
        .route("/pay", post(orders::pay))
        .route("/ship", post(orders::ship))
        .route("/status", post(orders::set_status))
}

/// Create the banner routes router.
fn banner_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(banners::create))
        .route("/list", post(banners::list_valid))
        .route("/info", post(banners::info))
        .route("/delete", post(banners::delete))
}

/// Create the category routes router.
fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(categories::create))
        .route("/status", post(categories::set_status))
        .route("/name", post(categories::rename))
        .route("/children", post(categories::children))
}

/// Create the SMS routes router.
fn sms_routes() -> Router<AppState> {
    Router::new()
        .route("/send", post(sms::send))
        .route("/check", post(sms::check))
}

/// Create all routes for the admin backend.
pub fn routes(state: &AppState) -> Router<AppState> {
    let guarded = Router::new()
        .nest("/api/v1/permission", permission_routes())
        .nest("/api/v1/order", order_routes())
        .nest("/api/v1/banner", banner_routes())
        .nest("/api/v1/category", category_routes())
        .nest("/api/v1/sms", sms_routes())
        .route("/api/v1/user/upload", post(uploads::upload))
        .layer(from_fn_with_state(state.clone(), check_permission));

    guarded.nest("/api/v1/admin", admin_routes(state))
}
