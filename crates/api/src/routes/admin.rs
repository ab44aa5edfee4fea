//! Admin routes. Every handler requires an admin bearer token; non-admins
//! get 403 from the `CurrentAdmin` extractor.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use tradewind_core::{DeliveryStatus, OrderId, ProductId, UserId, UserRole};

use crate::db::RepositoryError;
use crate::db::products::ProductRepository;
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::CurrentAdmin;
use crate::models::product::NewProduct;
use crate::models::user::UserSortField;
use crate::services::orders::OrderService;
use crate::state::AppState;

use super::orders::OrderResponse;
use super::products::ProductResponse;
use super::users::UserResponse;

/// Catalog update payload: a full product row including its ID.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub id: ProductId,
    #[serde(flatten)]
    pub product: NewProduct,
}

/// Name search parameters for user listings.
#[derive(Debug, Deserialize)]
pub struct UserSearchQuery {
    pub query: String,
}

/// Sort parameters for user listings; the field is a closed whitelist.
#[derive(Debug, Deserialize)]
pub struct UserSortQuery {
    pub field: UserSortField,
}

/// Role filter parameters for user listings.
#[derive(Debug, Deserialize)]
pub struct UserFilterQuery {
    pub role: UserRole,
}

/// Delivery status write parameters.
#[derive(Debug, Deserialize)]
pub struct DeliveryStatusQuery {
    pub delivery_status: DeliveryStatus,
}

/// Add a product to the catalog.
///
/// POST /admin/products/add
///
/// # Errors
///
/// Returns 500 if the insert fails.
pub async fn add_product(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Json(product): Json<NewProduct>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    let created = ProductRepository::new(state.pool()).create(&product).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Overwrite a product's catalog entry.
///
/// PUT /admin/products/update
///
/// # Errors
///
/// Returns 404 if the product doesn't exist.
pub async fn update_product(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>> {
    let updated = ProductRepository::new(state.pool())
        .update(req.id, &req.product)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound(format!("product with id {} does not exist", req.id))
            }
            other => other.into(),
        })?;

    Ok(Json(updated.into()))
}

/// Remove a product from the catalog.
///
/// DELETE /admin/products/{product_id}
///
/// # Errors
///
/// Returns 404 if the product doesn't exist.
pub async fn delete_product(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path(product_id): Path<i32>,
) -> Result<Json<ProductResponse>> {
    let repo = ProductRepository::new(state.pool());
    let id = ProductId::new(product_id);

    let product = repo.get_by_id(id).await?.ok_or_else(|| {
        AppError::NotFound(format!("product with id {product_id} does not exist"))
    })?;

    repo.delete(id).await?;

    Ok(Json(product.into()))
}

/// List all users.
///
/// GET /admin/users
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn list_users(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
) -> Result<Json<Vec<UserResponse>>> {
    let users = UserRepository::new(state.pool()).list_all().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Search users by name.
///
/// GET /admin/users/search?query=
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn search_users(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Query(query): Query<UserSearchQuery>,
) -> Result<Json<Vec<UserResponse>>> {
    let users = UserRepository::new(state.pool()).search(&query.query).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// List all users ordered by a whitelisted field.
///
/// GET /admin/users/sort?field=
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn sort_users(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Query(query): Query<UserSortQuery>,
) -> Result<Json<Vec<UserResponse>>> {
    let users = UserRepository::new(state.pool())
        .list_sorted(query.field)
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// List users with a given role.
///
/// GET /admin/users/filter?role=
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn filter_users(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Query(query): Query<UserFilterQuery>,
) -> Result<Json<Vec<UserResponse>>> {
    let users = UserRepository::new(state.pool())
        .filter_by_role(query.role)
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// List any user's orders.
///
/// GET /admin/orders/user/{user_id}
///
/// # Errors
///
/// Returns 404 if the user doesn't exist.
pub async fn orders_for_user(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<OrderResponse>>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(UserId::new(user_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user with id {user_id} does not exist")))?;

    let orders = OrderService::new(state.pool());
    let list = orders.list_for_owner(&user).await?;

    Ok(Json(list.into_iter().map(OrderResponse::from).collect()))
}

/// Set an order's delivery status.
///
/// PATCH /admin/orders/{order_id}?delivery_status=
///
/// Repeating the same status is a no-op that still succeeds.
///
/// # Errors
///
/// Returns 404 if the order doesn't exist.
pub async fn update_delivery_status(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(order_id): Path<i32>,
    Query(query): Query<DeliveryStatusQuery>,
) -> Result<Json<OrderResponse>> {
    let orders = OrderService::new(state.pool());
    let updated = orders
        .update_delivery_status(OrderId::new(order_id), query.delivery_status, admin.role)
        .await?;

    Ok(Json(updated.into()))
}
