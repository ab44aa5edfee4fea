//! Order service: validation and transactional commit.
//!
//! An order submission passes two fail-fast checks before anything is
//! written: every line item must reference an existing product, and the
//! claimed total must equal the sum over the line items exactly. Only then
//! does the repository persist the order and its items in one transaction,
//! so a failure at any step leaves the store untouched.
//!
//! The total check trusts the client-submitted unit prices; they are not
//! cross-checked against the catalog price. An internally consistent
//! submission with fabricated prices passes.

mod error;

pub use error::OrderError;

use rust_decimal::Decimal;
use sqlx::PgPool;

use tradewind_core::{DeliveryStatus, OrderId, UserRole};

use crate::db::orders::OrderRepository;
use crate::db::products::ProductRepository;
use crate::db::users::UserRepository;
use crate::db::RepositoryError;
use crate::models::order::{NewOrderItem, Order, OrderWithItems, ProposedOrder};
use crate::models::user::User;

/// Order service.
///
/// Validates proposed orders and drives the commit protocol.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
    products: ProductRepository<'a>,
    users: UserRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            products: ProductRepository::new(pool),
            users: UserRepository::new(pool),
        }
    }

    /// Validate a proposed order and commit it atomically.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::InvalidReference` if any line item names a
    /// nonexistent product, `OrderError::InvalidTotal` if the claimed total
    /// doesn't match the line items, and `OrderError::Repository` if the
    /// write fails. No rows are persisted on any error path.
    pub async fn create(
        &self,
        proposed: ProposedOrder,
        owner: User,
    ) -> Result<OrderWithItems, OrderError> {
        self.validate_product_references(&proposed.order_items)
            .await?;
        validate_total(&proposed)?;

        let (order, items) = self
            .orders
            .create(
                owner.id,
                proposed.order_date,
                proposed.order_total,
                &proposed.order_items,
            )
            .await?;

        Ok(OrderWithItems {
            order,
            owner,
            items,
        })
    }

    /// Fetch a materialized order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist.
    pub async fn get(&self, order_id: OrderId) -> Result<OrderWithItems, OrderError> {
        let order = self
            .orders
            .get_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound(order_id))?;

        self.materialize(order).await
    }

    /// List all orders owned by a user, materialized.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if a query fails.
    pub async fn list_for_owner(&self, owner: &User) -> Result<Vec<OrderWithItems>, OrderError> {
        let orders = self.orders.list_by_user(owner.id).await?;

        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.orders.items_for(order.id).await?;
            result.push(OrderWithItems {
                order,
                owner: owner.clone(),
                items,
            });
        }

        Ok(result)
    }

    /// Validate a replacement payload and apply it to an existing order.
    ///
    /// Submitted line items update the existing row for their
    /// `(order_id, product_id)` in place, or insert a new row. Items absent
    /// from the payload are left untouched.
    ///
    /// # Errors
    ///
    /// Same validation errors as [`Self::create`], plus
    /// `OrderError::NotFound` if the order doesn't exist.
    pub async fn update(
        &self,
        order_id: OrderId,
        proposed: ProposedOrder,
        owner: User,
    ) -> Result<OrderWithItems, OrderError> {
        if self.orders.get_by_id(order_id).await?.is_none() {
            return Err(OrderError::NotFound(order_id));
        }

        self.validate_product_references(&proposed.order_items)
            .await?;
        validate_total(&proposed)?;

        let order = self
            .orders
            .replace(
                order_id,
                owner.id,
                proposed.order_date,
                proposed.order_total,
                &proposed.order_items,
            )
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => OrderError::NotFound(order_id),
                other => OrderError::Repository(other),
            })?;

        let items = self.orders.items_for(order.id).await?;

        Ok(OrderWithItems {
            order,
            owner,
            items,
        })
    }

    /// Set an order's delivery status. Admin only.
    ///
    /// Writing the same status twice succeeds both times and leaves the
    /// order in that status. No transition graph is enforced: any status is
    /// reachable from any other.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Forbidden` if the requester is not an admin and
    /// `OrderError::NotFound` if the order doesn't exist.
    pub async fn update_delivery_status(
        &self,
        order_id: OrderId,
        status: DeliveryStatus,
        requester_role: UserRole,
    ) -> Result<OrderWithItems, OrderError> {
        if !requester_role.is_admin() {
            return Err(OrderError::Forbidden);
        }

        let order = self
            .orders
            .set_delivery_status(order_id, status)
            .await?
            .ok_or(OrderError::NotFound(order_id))?;

        self.materialize(order).await
    }

    /// Delete an order. Allowed for the owner and for admins.
    ///
    /// Returns the order as it was before deletion.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist and
    /// `OrderError::Forbidden` if the requester is neither the owner nor an
    /// admin.
    pub async fn delete(
        &self,
        order_id: OrderId,
        requester: &User,
    ) -> Result<OrderWithItems, OrderError> {
        let order = self
            .orders
            .get_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound(order_id))?;

        if !requester.role.is_admin() && order.user_id != requester.id {
            return Err(OrderError::Forbidden);
        }

        // Materialize before the delete cascades the line items away.
        let materialized = self.materialize(order).await?;
        self.orders.delete(order_id).await?;

        Ok(materialized)
    }

    /// Check that every line item references an existing product.
    async fn validate_product_references(
        &self,
        items: &[NewOrderItem],
    ) -> Result<(), OrderError> {
        for item in items {
            if self.products.get_by_id(item.product_id).await?.is_none() {
                return Err(OrderError::InvalidReference(item.product_id));
            }
        }

        Ok(())
    }

    /// Attach the owner payload and line items to an order header.
    async fn materialize(&self, order: Order) -> Result<OrderWithItems, OrderError> {
        let owner = self.users.get_by_id(order.user_id).await?.ok_or_else(|| {
            OrderError::Repository(RepositoryError::DataCorruption(format!(
                "order {} has no owner row",
                order.id
            )))
        })?;

        let items = self.orders.items_for(order.id).await?;

        Ok(OrderWithItems {
            order,
            owner,
            items,
        })
    }
}

/// Sum the submitted line items: `Σ quantity × unit_price`.
fn items_total(items: &[NewOrderItem]) -> Decimal {
    items
        .iter()
        .map(|item| Decimal::from(item.quantity) * item.unit_price)
        .sum()
}

/// Require the claimed total to equal the line-item sum exactly.
///
/// Decimal equality, no tolerance.
fn validate_total(proposed: &ProposedOrder) -> Result<(), OrderError> {
    let computed = items_total(&proposed.order_items);
    if computed != proposed.order_total {
        return Err(OrderError::InvalidTotal {
            submitted: proposed.order_total,
            computed,
        });
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use tradewind_core::ProductId;

    use super::*;

    fn item(product_id: i32, quantity: i32, unit_price: Decimal) -> NewOrderItem {
        NewOrderItem {
            product_id: ProductId::new(product_id),
            quantity,
            unit_price,
        }
    }

    fn proposed(total: Decimal, items: Vec<NewOrderItem>) -> ProposedOrder {
        ProposedOrder {
            order_date: Utc::now(),
            order_total: total,
            order_items: items,
        }
    }

    #[test]
    fn test_items_total_sums_quantity_times_price() {
        // 2 x 5.0 + 1 x 3.0 = 13.0
        let items = vec![
            item(1, 2, Decimal::new(50, 1)),
            item(2, 1, Decimal::new(30, 1)),
        ];

        assert_eq!(items_total(&items), Decimal::new(130, 1));
    }

    #[test]
    fn test_items_total_of_empty_order_is_zero() {
        assert_eq!(items_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_validate_total_accepts_matching_total() {
        let order = proposed(
            Decimal::new(130, 1),
            vec![
                item(1, 2, Decimal::new(50, 1)),
                item(2, 1, Decimal::new(30, 1)),
            ],
        );

        assert!(validate_total(&order).is_ok());
    }

    #[test]
    fn test_validate_total_rejects_mismatch() {
        let order = proposed(
            Decimal::new(100, 1),
            vec![
                item(1, 2, Decimal::new(50, 1)),
                item(2, 1, Decimal::new(30, 1)),
            ],
        );

        let err = validate_total(&order).unwrap_err();
        match err {
            OrderError::InvalidTotal {
                submitted,
                computed,
            } => {
                assert_eq!(submitted, Decimal::new(100, 1));
                assert_eq!(computed, Decimal::new(130, 1));
            }
            other => panic!("expected InvalidTotal, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_total_is_exact_not_approximate() {
        // Off by a cent is still a mismatch.
        let order = proposed(
            Decimal::new(1301, 2),
            vec![
                item(1, 2, Decimal::new(50, 1)),
                item(2, 1, Decimal::new(30, 1)),
            ],
        );

        assert!(validate_total(&order).is_err());
    }

    #[test]
    fn test_validate_total_scale_insensitive_equality() {
        // 13 and 13.0 are the same quantity; Decimal equality is numeric.
        let order = proposed(Decimal::from(13), vec![item(1, 2, Decimal::new(65, 1))]);

        assert!(validate_total(&order).is_ok());
    }
}
