//! Order repository for database operations.
//!
//! Order creation and replacement are multi-row writes (the order header
//! plus its line items) and always run inside a single transaction: either
//! every row commits or none do. A transaction dropped before `commit`
//! rolls back.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use tradewind_core::{DeliveryStatus, OrderId, OrderItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::order::{NewOrderItem, Order, OrderItem};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    order_date: DateTime<Utc>,
    order_total: Decimal,
    delivery_status: DeliveryStatus,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            order_date: row.order_date,
            order_total: row.order_total,
            delivery_status: row.delivery_status,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
    quantity: i32,
    unit_price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order header by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, order_date, order_total, delivery_status
             FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    /// List all orders owned by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, order_date, order_total, delivery_status
             FROM orders WHERE user_id = $1 ORDER BY order_date DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Fetch the line items of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_for(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT id, order_id, product_id, quantity, unit_price
             FROM order_items WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    /// Insert an order and all its line items in a single transaction.
    ///
    /// The delivery status defaults to `pending` at the database level.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails; in that case
    /// the transaction rolls back and no rows are persisted.
    pub async fn create(
        &self,
        owner: UserId,
        order_date: DateTime<Utc>,
        order_total: Decimal,
        items: &[NewOrderItem],
    ) -> Result<(Order, Vec<OrderItem>), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_row = sqlx::query_as::<_, OrderRow>(
            "INSERT INTO orders (user_id, order_date, order_total)
             VALUES ($1, $2, $3)
             RETURNING id, user_id, order_date, order_total, delivery_status",
        )
        .bind(owner)
        .bind(order_date)
        .bind(order_total)
        .fetch_one(&mut *tx)
        .await?;

        let mut persisted = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, OrderItemRow>(
                "INSERT INTO order_items (order_id, product_id, quantity, unit_price)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, order_id, product_id, quantity, unit_price",
            )
            .bind(order_row.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .fetch_one(&mut *tx)
            .await?;

            persisted.push(row.into());
        }

        tx.commit().await?;

        Ok((order_row.into(), persisted))
    }

    /// Replace an order's header and merge the submitted line items.
    ///
    /// Each submitted item updates the existing row for
    /// `(order_id, product_id)` in place if one exists, otherwise a new row
    /// is inserted. Existing items absent from `items` are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` if any write fails; the
    /// transaction rolls back and the order is unchanged.
    pub async fn replace(
        &self,
        id: OrderId,
        owner: UserId,
        order_date: DateTime<Utc>,
        order_total: Decimal,
        items: &[NewOrderItem],
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let Some(order_row) = sqlx::query_as::<_, OrderRow>(
            "UPDATE orders
             SET user_id = $2, order_date = $3, order_total = $4
             WHERE id = $1
             RETURNING id, user_id, order_date, order_total, delivery_status",
        )
        .bind(id)
        .bind(owner)
        .bind(order_date)
        .bind(order_total)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Err(RepositoryError::NotFound);
        };

        for item in items {
            let existing = sqlx::query_scalar::<_, OrderItemId>(
                "SELECT id FROM order_items WHERE order_id = $1 AND product_id = $2",
            )
            .bind(id)
            .bind(item.product_id)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(item_id) = existing {
                sqlx::query(
                    "UPDATE order_items SET quantity = $2, unit_price = $3 WHERE id = $1",
                )
                .bind(item_id)
                .bind(item.quantity)
                .bind(item.unit_price)
                .execute(&mut *tx)
                .await?;
            } else {
                sqlx::query(
                    "INSERT INTO order_items (order_id, product_id, quantity, unit_price)
                     VALUES ($1, $2, $3, $4)",
                )
                .bind(id)
                .bind(item.product_id)
                .bind(item.quantity)
                .bind(item.unit_price)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Ok(order_row.into())
    }

    /// Set the delivery status of an order.
    ///
    /// Writing the current status again is a no-op that still succeeds.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_delivery_status(
        &self,
        id: OrderId,
        status: DeliveryStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "UPDATE orders SET delivery_status = $2 WHERE id = $1
             RETURNING id, user_id, order_date, order_total, delivery_status",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    /// Delete an order; its line items cascade.
    ///
    /// # Returns
    ///
    /// Returns `true` if the order was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
