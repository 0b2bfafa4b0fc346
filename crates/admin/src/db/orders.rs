//! Order repository.
//!
//! Order creation is the one multi-statement unit in the schema: the header
//! and every line item go through a single transaction, so a failed item
//! insert takes the header with it.

use chrono::{Duration, Utc};
use sqlx::MySqlPool;

use storekeep_core::{OrderCode, OrderId, UserId};

use super::RepositoryError;
use crate::models::{NewOrder, NewOrderItem, Order, OrderItem, OrderWithItems};

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a MySqlPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// Create an order header and all of its line items atomically.
    ///
    /// The order code is derived from the creation instant and the user id;
    /// `closed_at` is `created_at + close_after_hours`. The transaction is
    /// committed only after every item insert succeeded; any failure rolls
    /// the whole order back.
    ///
    /// There is no idempotency key: a retried client request creates a second
    /// order (or trips over the order-code unique key if it lands within the
    /// same second).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the generated order code
    /// already exists. Returns `RepositoryError::Database` for other errors.
    pub async fn create(
        &self,
        order: &NewOrder,
        items: &[NewOrderItem],
        close_after_hours: i64,
    ) -> Result<(OrderId, OrderCode), RepositoryError> {
        let created_at = Utc::now();
        let closed_at = created_at + Duration::hours(close_after_hours);
        let order_code = OrderCode::generate(created_at, order.user_id);

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r"
            INSERT INTO orders
                (order_code, user_id, address_id, total_price, promotion, freight,
                 created_at, closed_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&order_code)
        .bind(order.user_id)
        .bind(&order.address_id)
        .bind(order.total_price)
        .bind(order.promotion)
        .bind(order.freight)
        .bind(created_at)
        .bind(closed_at)
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::on_conflict(e, "order code already exists"))?;

        let order_id = OrderId::new(result.last_insert_id());

        for item in items {
            sqlx::query(
                r"
                INSERT INTO order_item (product_id, order_id, count, price, discount)
                VALUES (?, ?, ?, ?, ?)
                ",
            )
            .bind(item.product_id)
            .bind(order_id)
            .bind(item.count)
            .bind(item.price)
            .bind(item.discount)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok((order_id, order_code))
    }

    /// Look up an order id by its order code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for unknown codes.
    pub async fn id_by_code(&self, order_code: &OrderCode) -> Result<OrderId, RepositoryError> {
        let id = sqlx::query_scalar::<_, u64>(
            "SELECT id FROM orders WHERE order_code = ? LOCK IN SHARE MODE",
        )
        .bind(order_code)
        .fetch_optional(self.pool)
        .await?;

        id.map(OrderId::new).ok_or(RepositoryError::NotFound)
    }

    /// Fetch an order header and its items by order id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for unknown ids.
    pub async fn info(&self, order_id: OrderId) -> Result<OrderWithItems, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(
            r"
            SELECT id, order_code, user_id, ship_code, address_id, total_price,
                   pay_way, promotion, freight, status, created_at, closed_at, updated_at
            FROM orders
            WHERE id = ?
            ",
        )
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let items = self.items_for_order(order_id).await?;

        Ok(OrderWithItems { order, items })
    }

    /// List a user's orders with a given status, items included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        status: u8,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(
            r"
            SELECT id, order_code, user_id, ship_code, address_id, total_price,
                   pay_way, promotion, freight, status, created_at, closed_at, updated_at
            FROM orders
            WHERE user_id = ? AND status = ?
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(self.pool)
        .await?;

        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.items_for_order(order.id).await?;
            result.push(OrderWithItems { order, items });
        }

        Ok(result)
    }

    /// Record the payment method, resetting the status to unfinished.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row was updated.
    pub async fn set_pay_way(&self, order_id: OrderId, pay_way: u8) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders SET pay_way = ?, updated_at = ?, status = 0 WHERE id = ? LIMIT 1",
        )
        .bind(pay_way)
        .bind(Utc::now())
        .bind(order_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Record the carrier consignment code, marking the order shipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row was updated.
    pub async fn set_ship_code(
        &self,
        order_id: OrderId,
        ship_code: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders SET ship_code = ?, updated_at = ?, status = 1 WHERE id = ? LIMIT 1",
        )
        .bind(ship_code)
        .bind(Utc::now())
        .bind(order_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Set an explicit order status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row was updated.
    pub async fn set_status(&self, order_id: OrderId, status: u8) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ? LIMIT 1")
                .bind(status)
                .bind(Utc::now())
                .bind(order_id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// All line items belonging to an order.
    async fn items_for_order(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(
            r"
            SELECT product_id, order_id, count, price, discount
            FROM order_item
            WHERE order_id = ?
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}
