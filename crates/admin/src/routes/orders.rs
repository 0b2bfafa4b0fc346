//! Order route handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use storekeep_core::{OrderCode, OrderId, UserId};

use crate::db::OrderRepository;
use crate::error::AppError;
use crate::models::{NewOrder, NewOrderItem, OrderWithItems};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Body of `POST /api/v1/order/create`.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub user_id: UserId,
    pub address_id: String,
    pub total_price: u32,
    pub promotion: bool,
    pub freight: u32,
    pub items: Vec<NewOrderItem>,
}

/// Reply to a successful order creation.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub order_id: OrderId,
    pub order_code: OrderCode,
}

/// Body of `POST /api/v1/order/info`.
#[derive(Debug, Deserialize)]
pub struct InfoRequest {
    pub order_id: OrderId,
}

/// Body of `POST /api/v1/order/user`.
#[derive(Debug, Deserialize)]
pub struct ListRequest {
    pub user_id: UserId,
    pub status: u8,
}

/// Body of `POST /api/v1/order/id`.
#[derive(Debug, Deserialize)]
pub struct IdByCodeRequest {
    pub order_code: String,
}

/// Reply to an order-id lookup.
#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub order_id: OrderId,
}

/// Body of `POST /api/v1/order/pay`.
#[derive(Debug, Deserialize)]
pub struct PayRequest {
    pub order_id: OrderId,
    pub pay_way: u8,
}

/// Body of `POST /api/v1/order/ship`.
#[derive(Debug, Deserialize)]
pub struct ShipRequest {
    pub order_id: OrderId,
    pub ship_code: String,
}

/// Body of `POST /api/v1/order/status`.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub order_id: OrderId,
    pub status: u8,
}

// =============================================================================
// Handlers
// =============================================================================

/// Create an order with its line items in one transaction.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let order = NewOrder {
        user_id: req.user_id,
        address_id: req.address_id,
        total_price: req.total_price,
        promotion: req.promotion,
        freight: req.freight,
    };

    let (order_id, order_code) = OrderRepository::new(state.pool())
        .create(&order, &req.items, state.config().order_close_hours)
        .await?;

    tracing::info!(%order_id, %order_code, user_id = %req.user_id, "order created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            order_id,
            order_code,
        }),
    ))
}

/// Fetch an order and its items by id.
pub async fn info(
    State(state): State<AppState>,
    Json(req): Json<InfoRequest>,
) -> Result<Json<OrderWithItems>, AppError> {
    let order = OrderRepository::new(state.pool()).info(req.order_id).await?;
    Ok(Json(order))
}

/// List a user's orders with a given status.
pub async fn list_for_user(
    State(state): State<AppState>,
    Json(req): Json<ListRequest>,
) -> Result<Json<Vec<OrderWithItems>>, AppError> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(req.user_id, req.status)
        .await?;
    Ok(Json(orders))
}

/// Look up an order id by its code.
pub async fn id_by_code(
    State(state): State<AppState>,
    Json(req): Json<IdByCodeRequest>,
) -> Result<Json<IdResponse>, AppError> {
    let order_id = OrderRepository::new(state.pool())
        .id_by_code(&OrderCode::from_string(req.order_code))
        .await?;
    Ok(Json(IdResponse { order_id }))
}

/// Record the payment method for an order.
pub async fn pay(
    State(state): State<AppState>,
    Json(req): Json<PayRequest>,
) -> Result<StatusCode, AppError> {
    OrderRepository::new(state.pool())
        .set_pay_way(req.order_id, req.pay_way)
        .await?;

    tracing::info!(order_id = %req.order_id, pay_way = req.pay_way, "order payment recorded");
    Ok(StatusCode::NO_CONTENT)
}

/// Record the consignment code for an order.
pub async fn ship(
    State(state): State<AppState>,
    Json(req): Json<ShipRequest>,
) -> Result<StatusCode, AppError> {
    OrderRepository::new(state.pool())
        .set_ship_code(req.order_id, &req.ship_code)
        .await?;

    tracing::info!(order_id = %req.order_id, "order consigned");
    Ok(StatusCode::NO_CONTENT)
}

/// Set an explicit order status.
pub async fn set_status(
    State(state): State<AppState>,
    Json(req): Json<StatusRequest>,
) -> Result<StatusCode, AppError> {
    OrderRepository::new(state.pool())
        .set_status(req.order_id, req.status)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_binds_items() {
        let req: CreateRequest = serde_json::from_str(
            r#"{
                "user_id": 7,
                "address_id": "addr-31",
                "total_price": 2599,
                "promotion": false,
                "freight": 120,
                "items": [
                    {"product_id": 11, "count": 2, "price": 1200, "discount": 95},
                    {"product_id": 12, "count": 1, "price": 199, "discount": 100}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(req.user_id, UserId::new(7));
        assert_eq!(req.items.len(), 2);
        assert_eq!(req.items[0].count, 2);
    }
}
