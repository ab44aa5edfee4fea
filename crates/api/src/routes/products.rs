//! Public product catalog routes.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tradewind_core::ProductId;

use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::product::{Product, ProductSortField};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;

/// Public product payload.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            category: product.category,
        }
    }
}

fn to_responses(products: Vec<Product>) -> Vec<ProductResponse> {
    products.into_iter().map(ProductResponse::from).collect()
}

/// Pagination parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Name search parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

/// Category filter parameters.
#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    pub category: String,
}

/// Sort parameters; the field is a closed whitelist.
#[derive(Debug, Deserialize)]
pub struct SortQuery {
    pub field: ProductSortField,
}

/// List products with pagination.
///
/// GET /products?limit=&offset=
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ProductResponse>>> {
    let products = ProductRepository::new(state.pool())
        .list(
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            query.offset.unwrap_or(0),
        )
        .await?;

    Ok(Json(to_responses(products)))
}

/// Search products by name.
///
/// GET /products/search?query=
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ProductResponse>>> {
    let products = ProductRepository::new(state.pool())
        .search(&query.query)
        .await?;

    Ok(Json(to_responses(products)))
}

/// Filter products by category.
///
/// GET /products/filter?category=
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn filter_products(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Vec<ProductResponse>>> {
    let products = ProductRepository::new(state.pool())
        .filter_by_category(&query.category)
        .await?;

    Ok(Json(to_responses(products)))
}

/// List all products ordered by a whitelisted field.
///
/// GET /products/sort?field=
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn sort_products(
    State(state): State<AppState>,
    Query(query): Query<SortQuery>,
) -> Result<Json<Vec<ProductResponse>>> {
    let products = ProductRepository::new(state.pool())
        .list_sorted(query.field)
        .await?;

    Ok(Json(to_responses(products)))
}

/// Fetch a product by ID.
///
/// GET /products/{id}
///
/// # Errors
///
/// Returns 404 if the product doesn't exist.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductResponse>> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product with id {id} does not exist")))?;

    Ok(Json(product.into()))
}
