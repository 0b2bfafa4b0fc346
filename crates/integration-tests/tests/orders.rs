//! Integration tests for the order-creation transaction.
//!
//! These tests go through the repository against a live database; they are
//! the only way to observe the rollback behavior for real.
//!
//! Run with: `cargo test -p storekeep-integration-tests -- --ignored`

use storekeep_admin::db::{OrderRepository, RepositoryError};
use storekeep_admin::models::{NewOrder, NewOrderItem};
use storekeep_core::UserId;
use storekeep_integration_tests::connect;

fn sample_order(user_id: u64) -> NewOrder {
    NewOrder {
        user_id: UserId::new(user_id),
        address_id: "addr-1".to_owned(),
        total_price: 2599,
        promotion: false,
        freight: 120,
    }
}

fn sample_items() -> Vec<NewOrderItem> {
    vec![
        NewOrderItem {
            product_id: 11.into(),
            count: 2,
            price: 1200,
            discount: 95,
        },
        NewOrderItem {
            product_id: 12.into(),
            count: 1,
            price: 199,
            discount: 100,
        },
    ]
}

/// A user id unlikely to collide across test runs.
fn unique_user() -> u64 {
    u64::from(std::process::id()) * 1_000_003 + 900_000_000_000
}

#[tokio::test]
#[ignore = "requires a migrated test database"]
async fn create_persists_header_and_items() {
    let pool = connect().await;
    let repo = OrderRepository::new(&pool);

    let user = unique_user();
    let (order_id, order_code) = repo
        .create(&sample_order(user), &sample_items(), 24)
        .await
        .expect("create order");

    let info = repo.info(order_id).await.expect("order info");
    assert_eq!(info.order.order_code, order_code);
    assert_eq!(info.order.user_id, UserId::new(user));
    assert_eq!(info.items.len(), 2);
    assert!(info.order.closed_at > info.order.created_at);

    let found = repo.id_by_code(&order_code).await.expect("id by code");
    assert_eq!(found, order_id);
}

/// Failing an item insert must take the already-inserted header with it.
///
/// The failure is injected by hiding `order_item` behind a rename for the
/// duration of the create call, which makes the first item insert error
/// after the header insert has succeeded.
#[tokio::test]
#[ignore = "requires a migrated test database (exclusive: renames order_item)"]
async fn create_rolls_back_header_when_item_insert_fails() {
    let pool = connect().await;
    let repo = OrderRepository::new(&pool);
    let user = unique_user() + 1;

    sqlx::query("RENAME TABLE order_item TO order_item_hidden")
        .execute(&pool)
        .await
        .expect("hide order_item");

    let result = repo.create(&sample_order(user), &sample_items(), 24).await;

    sqlx::query("RENAME TABLE order_item_hidden TO order_item")
        .execute(&pool)
        .await
        .expect("restore order_item");

    assert!(result.is_err(), "create must fail when items cannot insert");

    // Partial insertion must not be observable: no header row survived.
    let headers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = ?")
        .bind(user)
        .fetch_one(&pool)
        .await
        .expect("count headers");
    assert_eq!(headers, 0);
}

/// Documents the order-code weakness: two creations for the same user in the
/// same second generate the same code, and only the unique key stops the
/// second insert. (If the clock ticks between the calls, both succeed with
/// distinct codes.)
#[tokio::test]
#[ignore = "requires a migrated test database"]
async fn same_second_duplicate_codes_are_rejected_by_the_unique_key() {
    let pool = connect().await;
    let repo = OrderRepository::new(&pool);
    let user = unique_user() + 2;

    let first = repo
        .create(&sample_order(user), &sample_items(), 24)
        .await
        .expect("first create");

    match repo.create(&sample_order(user), &sample_items(), 24).await {
        // Same second: the duplicate code tripped the unique key.
        Err(RepositoryError::Conflict(_)) => {}
        // Second boundary crossed: the codes must differ.
        Ok(second) => assert_ne!(first.1, second.1),
        Err(other) => panic!("unexpected error: {other}"),
    }
}
