//! Integration tests for admin account login.
//!
//! These tests require:
//! - A migrated MySQL database (`sk-cli migrate`)
//! - The admin server running (`cargo run -p storekeep-admin`)
//! - `STOREKEEP_TEST_DATABASE_URL` pointing at the same database
//!
//! Run with: `cargo test -p storekeep-integration-tests -- --ignored`

use reqwest::StatusCode;
use serde_json::{Value, json};

use storekeep_admin::db::AdminRepository;
use storekeep_admin::services::auth::hash_password;
use storekeep_core::{Email, Mobile};
use storekeep_integration_tests::{admin_base_url, connect, unique_suffix};

/// Seed an admin account directly and return its name.
async fn seed_admin(password: &str) -> String {
    let pool = connect().await;
    let suffix = unique_suffix();
    let name = format!("it-admin-{suffix}");

    let mobile = Mobile::parse(&format!("138{:08}", fastrand_like(&suffix))).expect("mobile");
    let email = Email::parse(&format!("{name}@example.test")).expect("email");
    let hash = hash_password(password).expect("hash");

    AdminRepository::new(&pool)
        .create(&name, &hash, &mobile, &email)
        .await
        .expect("seed admin");

    name
}

/// Derive eight digits from a hex suffix (keeps seeded mobiles unique-ish).
fn fastrand_like(suffix: &str) -> u32 {
    u32::from_str_radix(suffix, 16).unwrap_or(12_345_678) % 100_000_000
}

#[tokio::test]
#[ignore = "requires a running server and database"]
async fn login_rejects_wrong_password() {
    let name = seed_admin("correct-horse-battery").await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/v1/admin/login", admin_base_url()))
        .json(&json!({ "name": name, "password": "not-the-password" }))
        .send()
        .await
        .expect("request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a running server and database"]
async fn login_rejects_unknown_name() {
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/v1/admin/login", admin_base_url()))
        .json(&json!({ "name": format!("ghost-{}", unique_suffix()), "password": "whatever" }))
        .send()
        .await
        .expect("request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a running server and database"]
async fn login_issues_token_for_correct_password() {
    let name = seed_admin("correct-horse-battery").await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/v1/admin/login", admin_base_url()))
        .json(&json!({ "name": name, "password": "correct-horse-battery" }))
        .send()
        .await
        .expect("request");

    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("json body");
    let token = body["token"].as_str().expect("token field");
    assert!(!token.is_empty());

    // The token must open a protected endpoint.
    let resp = client
        .post(format!("{}/api/v1/permission/role/list", admin_base_url()))
        .bearer_auth(token)
        .json(&json!({}))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires a running server and database"]
async fn protected_endpoint_rejects_missing_token() {
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/v1/permission/role/list", admin_base_url()))
        .json(&json!({}))
        .send()
        .await
        .expect("request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
