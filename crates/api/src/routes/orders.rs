//! Order routes. All of them require a bearer token.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use tradewind_core::{DeliveryStatus, OrderId, OrderItemId, ProductId};

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::order::{OrderItem, OrderWithItems, ProposedOrder};
use crate::services::orders::OrderService;
use crate::state::AppState;

use super::users::UserResponse;

/// A persisted line item.
#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.id,
            order_id: item.order_id,
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

/// A materialized order: header, owner payload, and line items.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub user: UserResponse,
    pub order_date: DateTime<Utc>,
    pub order_total: Decimal,
    pub delivery_status: DeliveryStatus,
    pub order_items: Vec<OrderItemResponse>,
}

impl From<OrderWithItems> for OrderResponse {
    fn from(materialized: OrderWithItems) -> Self {
        Self {
            id: materialized.order.id,
            user: materialized.owner.into(),
            order_date: materialized.order.order_date,
            order_total: materialized.order.order_total,
            delivery_status: materialized.order.delivery_status,
            order_items: materialized
                .items
                .into_iter()
                .map(OrderItemResponse::from)
                .collect(),
        }
    }
}

/// Validate and commit a new order for the current user.
///
/// POST /orders
///
/// # Errors
///
/// Returns 422 if a line item references an unknown product or the claimed
/// total doesn't match the line items; nothing is persisted in either case.
pub async fn create_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(proposed): Json<ProposedOrder>,
) -> Result<(StatusCode, Json<OrderResponse>)> {
    let orders = OrderService::new(state.pool());
    let committed = orders.create(proposed, user).await?;

    Ok((StatusCode::CREATED, Json(committed.into())))
}

/// List the current user's orders.
///
/// GET /orders/my_orders
///
/// # Errors
///
/// Returns 500 if a query fails.
pub async fn my_orders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<OrderResponse>>> {
    let orders = OrderService::new(state.pool());
    let list = orders.list_for_owner(&user).await?;

    Ok(Json(list.into_iter().map(OrderResponse::from).collect()))
}

/// Fetch an order by ID.
///
/// GET /orders/{order_id}
///
/// # Errors
///
/// Returns 404 if the order doesn't exist.
pub async fn get_order(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(order_id): Path<i32>,
) -> Result<Json<OrderResponse>> {
    let orders = OrderService::new(state.pool());
    let materialized = orders.get(OrderId::new(order_id)).await?;

    Ok(Json(materialized.into()))
}

/// Replace an order with a new validated payload.
///
/// PUT /orders/{order_id}
///
/// Line items absent from the payload are left untouched.
///
/// # Errors
///
/// Returns 404 if the order doesn't exist and 422 for validation failures.
pub async fn update_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(order_id): Path<i32>,
    Json(proposed): Json<ProposedOrder>,
) -> Result<Json<OrderResponse>> {
    let orders = OrderService::new(state.pool());
    let updated = orders.update(OrderId::new(order_id), proposed, user).await?;

    Ok(Json(updated.into()))
}

/// Delete an order. Allowed for the owner and for admins.
///
/// DELETE /orders/{order_id}
///
/// Returns the order as it was before deletion.
///
/// # Errors
///
/// Returns 404 if the order doesn't exist and 403 for other users' orders.
pub async fn delete_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(order_id): Path<i32>,
) -> Result<Json<OrderResponse>> {
    let orders = OrderService::new(state.pool());
    let deleted = orders.delete(OrderId::new(order_id), &user).await?;

    Ok(Json(deleted.into()))
}
