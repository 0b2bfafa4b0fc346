//! Integration tests for the URL permission gate.
//!
//! These tests require a running server and a migrated database; they seed
//! roles/permissions/relations through the repositories and observe the gate
//! from the outside.
//!
//! Run with: `cargo test -p storekeep-integration-tests -- --ignored`

use reqwest::StatusCode;
use serde_json::{Value, json};

use storekeep_admin::db::{
    AdminRepository, PermissionRepository, RelationRepository, RoleRepository,
};
use storekeep_admin::services::auth::hash_password;
use storekeep_core::{AdminId, Email, Mobile, RoleId};
use storekeep_integration_tests::{admin_base_url, connect, unique_suffix};

const PASSWORD: &str = "correct-horse-battery";

/// The guarded probe endpoint the tests grant and deny against.
const PROBE_URL: &str = "/api/v1/banner/list";

async fn seed_admin(pool: &sqlx::MySqlPool, suffix: &str) -> (AdminId, String) {
    let name = format!("rbac-admin-{suffix}");
    let digits = u32::from_str_radix(suffix, 16).unwrap_or(7_654_321) % 100_000_000;
    let mobile = Mobile::parse(&format!("139{digits:08}")).expect("mobile");
    let email = Email::parse(&format!("{name}@example.test")).expect("email");
    let hash = hash_password(PASSWORD).expect("hash");

    let id = AdminRepository::new(pool)
        .create(&name, &hash, &mobile, &email)
        .await
        .expect("seed admin");
    (id, name)
}

async fn login(name: &str) -> String {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}/api/v1/admin/login", admin_base_url()))
        .json(&json!({ "name": name, "password": PASSWORD }))
        .send()
        .await
        .expect("login request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("login body");
    body["token"].as_str().expect("token").to_owned()
}

async fn probe(token: &str) -> StatusCode {
    reqwest::Client::new()
        .post(format!("{}{PROBE_URL}", admin_base_url()))
        .bearer_auth(token)
        .json(&json!({ "at": 0 }))
        .send()
        .await
        .expect("probe request")
        .status()
}

/// An admin whose role is granted the URL passes the gate.
#[tokio::test]
#[ignore = "requires a running server and database"]
async fn gate_grants_on_role_intersection() {
    let pool = connect().await;
    let suffix = unique_suffix();

    let (admin_id, name) = seed_admin(&pool, &suffix).await;
    let role_id = RoleRepository::new(&pool)
        .create(&format!("rbac-role-{suffix}"), "probe role")
        .await
        .expect("seed role");
    PermissionRepository::new(&pool)
        .grant(PROBE_URL, role_id)
        .await
        .expect("grant url");
    RelationRepository::new(&pool)
        .assign(admin_id, role_id)
        .await
        .expect("assign role");

    let token = login(&name).await;
    assert_eq!(probe(&token).await, StatusCode::OK);

    PermissionRepository::new(&pool)
        .revoke(PROBE_URL, role_id)
        .await
        .expect("cleanup grant");
}

/// An admin holding only unrelated roles is denied with 424.
#[tokio::test]
#[ignore = "requires a running server and database"]
async fn gate_denies_disjoint_roles() {
    let pool = connect().await;
    let suffix = unique_suffix();

    let (admin_id, name) = seed_admin(&pool, &suffix).await;
    let granted_role = RoleRepository::new(&pool)
        .create(&format!("rbac-granted-{suffix}"), "holds the url")
        .await
        .expect("seed granted role");
    let other_role = RoleRepository::new(&pool)
        .create(&format!("rbac-other-{suffix}"), "unrelated")
        .await
        .expect("seed other role");

    PermissionRepository::new(&pool)
        .grant(PROBE_URL, granted_role)
        .await
        .expect("grant url");
    RelationRepository::new(&pool)
        .assign(admin_id, other_role)
        .await
        .expect("assign unrelated role");

    let token = login(&name).await;
    assert_eq!(probe(&token).await, StatusCode::FAILED_DEPENDENCY);

    PermissionRepository::new(&pool)
        .revoke(PROBE_URL, granted_role)
        .await
        .expect("cleanup grant");
}

/// Documents the policy gap: a URL with no grants lets any authenticated
/// admin through, roles or not.
#[tokio::test]
#[ignore = "requires a running server and database"]
async fn gate_falls_through_for_unregistered_url() {
    let pool = connect().await;
    let suffix = unique_suffix();

    let (_, name) = seed_admin(&pool, &suffix).await;
    let token = login(&name).await;

    // No grants exist for the probe URL in this test's world; the roleless
    // admin still passes.
    let status = probe(&token).await;
    assert_eq!(status, StatusCode::OK);
}

/// Deactivating a role drops it out of the resolution queries.
#[tokio::test]
#[ignore = "requires a running server and database"]
async fn deactivated_role_stops_granting() {
    let pool = connect().await;
    let suffix = unique_suffix();

    let (admin_id, _) = seed_admin(&pool, &suffix).await;
    let role_id = RoleRepository::new(&pool)
        .create(&format!("rbac-off-{suffix}"), "to deactivate")
        .await
        .expect("seed role");
    RelationRepository::new(&pool)
        .assign(admin_id, role_id)
        .await
        .expect("assign role");

    let before = RelationRepository::new(&pool)
        .roles_for_admin(admin_id)
        .await
        .expect("roles before");
    assert!(before.contains(&role_id));

    RoleRepository::new(&pool)
        .set_active(role_id, false)
        .await
        .expect("deactivate");

    let after = RelationRepository::new(&pool)
        .roles_for_admin(admin_id)
        .await
        .expect("roles after");
    assert!(!after.contains(&RoleId::new(role_id.as_u64())));
}
