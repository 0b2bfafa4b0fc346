//! Order domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storekeep_core::{OrderCode, OrderId, ProductId, UserId};

/// A persisted order header.
///
/// `pay_way` and `status` are carried as the raw small integers the schema
/// stores; `0` is an order that has not completed, `1` one that has been
/// consigned.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    /// Unique order id.
    pub id: OrderId,
    /// Time-and-user derived code (unique key in the schema).
    pub order_code: OrderCode,
    /// Ordering user.
    pub user_id: UserId,
    /// Carrier consignment code, empty until shipped.
    pub ship_code: String,
    /// Delivery address reference.
    pub address_id: String,
    /// Total price in minor units.
    pub total_price: u32,
    /// Payment method selector.
    pub pay_way: u8,
    /// Whether the order participates in a promotion.
    pub promotion: bool,
    /// Freight in minor units.
    pub freight: u32,
    /// Order status.
    pub status: u8,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Closing deadline computed at creation.
    pub closed_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A persisted order line item.
#[derive(Debug, Clone, Copy, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    /// Product the line refers to.
    pub product_id: ProductId,
    /// Owning order.
    pub order_id: OrderId,
    /// Quantity ordered.
    pub count: u32,
    /// Unit price in minor units.
    pub price: u32,
    /// Discount percentage applied to the line.
    pub discount: u8,
}

/// An order header together with its line items.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    /// The order header.
    pub order: Order,
    /// All line items belonging to the order.
    pub items: Vec<OrderItem>,
}

/// Fields required to create an order header.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Ordering user.
    pub user_id: UserId,
    /// Delivery address reference.
    pub address_id: String,
    /// Total price in minor units.
    pub total_price: u32,
    /// Whether the order participates in a promotion.
    pub promotion: bool,
    /// Freight in minor units.
    pub freight: u32,
}

/// Fields required to create a line item.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NewOrderItem {
    /// Product the line refers to.
    pub product_id: ProductId,
    /// Quantity ordered.
    pub count: u32,
    /// Unit price in minor units.
    pub price: u32,
    /// Discount percentage applied to the line.
    pub discount: u8,
}
