//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (pings the database)
//!
//! # Users
//! POST /users/login               - Authenticate, returns a bearer token
//! POST /users/signup              - Register a new account
//! GET  /users/{id}                - Fetch a user
//! PUT  /users/update              - Replace own profile (auth)
//! DELETE /users/delete            - Delete own account (auth)
//!
//! # Products (public reads)
//! GET  /products                  - List with limit/offset
//! GET  /products/search?query=    - Name search
//! GET  /products/filter?category= - Category filter
//! GET  /products/sort?field=      - Whitelisted sort
//! GET  /products/{id}             - Fetch a product
//!
//! # Orders (auth)
//! POST /orders                    - Validate and commit an order
//! GET  /orders/my_orders          - Current user's orders
//! GET  /orders/{order_id}         - Fetch an order
//! PUT  /orders/{order_id}         - Replace an order (re-validated)
//! DELETE /orders/{order_id}       - Delete an order (owner or admin)
//!
//! # Admin (auth + admin role)
//! POST  /admin/products/add
//! PUT   /admin/products/update
//! DELETE /admin/products/{product_id}
//! GET   /admin/users              - Plus /search, /sort, /filter
//! GET   /admin/orders/user/{user_id}
//! PATCH /admin/orders/{order_id}?delivery_status=
//! ```

pub mod admin;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::state::AppState;

/// Create the user routes router.
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/login", post(users::login))
        .route("/users/signup", post(users::signup))
        .route("/users/update", put(users::update_user))
        .route("/users/delete", delete(users::delete_user))
        .route("/users/{id}", get(users::get_user))
}

/// Create the product routes router.
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list_products))
        .route("/products/search", get(products::search_products))
        .route("/products/filter", get(products::filter_products))
        .route("/products/sort", get(products::sort_products))
        .route("/products/{id}", get(products::get_product))
}

/// Create the order routes router.
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(orders::create_order))
        .route("/orders/my_orders", get(orders::my_orders))
        .route(
            "/orders/{order_id}",
            get(orders::get_order)
                .put(orders::update_order)
                .delete(orders::delete_order),
        )
}

/// Create the admin routes router, nested under `/admin`.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/products/add", post(admin::add_product))
        .route("/products/update", put(admin::update_product))
        .route("/products/{product_id}", delete(admin::delete_product))
        .route("/users", get(admin::list_users))
        .route("/users/search", get(admin::search_users))
        .route("/users/sort", get(admin::sort_users))
        .route("/users/filter", get(admin::filter_users))
        .route("/orders/user/{user_id}", get(admin::orders_for_user))
        .route("/orders/{order_id}", patch(admin::update_delivery_status))
}

/// Create the complete application router (without state or layers).
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(user_routes())
        .merge(product_routes())
        .merge(order_routes())
        .nest("/admin", admin_routes())
}
