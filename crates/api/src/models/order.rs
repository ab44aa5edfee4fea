//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use tradewind_core::{DeliveryStatus, OrderId, OrderItemId, ProductId, UserId};

use super::user::User;

/// A committed order (domain type).
#[derive(Debug, Clone)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Owning user.
    pub user_id: UserId,
    /// When the order was placed.
    pub order_date: DateTime<Utc>,
    /// Total as submitted and validated at commit time.
    pub order_total: Decimal,
    /// Current delivery status.
    pub delivery_status: DeliveryStatus,
}

/// A persisted line item belonging to an order.
///
/// Items of one order carry no ordering guarantee.
#[derive(Debug, Clone)]
pub struct OrderItem {
    /// Unique line-item ID.
    pub id: OrderItemId,
    /// Parent order.
    pub order_id: OrderId,
    /// Referenced catalog product.
    pub product_id: ProductId,
    /// Quantity ordered.
    pub quantity: i32,
    /// Price per unit as submitted by the client.
    pub unit_price: Decimal,
}

/// A fully materialized order: the row, its owner, and its line items.
#[derive(Debug, Clone)]
pub struct OrderWithItems {
    pub order: Order,
    pub owner: User,
    pub items: Vec<OrderItem>,
}

/// A client-submitted order awaiting validation and commit.
#[derive(Debug, Clone, Deserialize)]
pub struct ProposedOrder {
    /// Order timestamp; defaults to the time of submission.
    #[serde(default = "Utc::now")]
    pub order_date: DateTime<Utc>,
    /// Claimed total; must equal the sum over the line items exactly.
    pub order_total: Decimal,
    /// Proposed line items.
    pub order_items: Vec<NewOrderItem>,
}

/// One proposed line item within a [`ProposedOrder`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_proposed_order_deserializes_numeric_amounts() {
        let proposed: ProposedOrder = serde_json::from_str(
            r#"{
                "order_total": 13.0,
                "order_items": [
                    {"product_id": 1, "quantity": 2, "unit_price": 5.0},
                    {"product_id": 2, "quantity": 1, "unit_price": 3.0}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(proposed.order_items.len(), 2);
        assert_eq!(proposed.order_total, Decimal::new(130, 1));
    }

    #[test]
    fn test_proposed_order_date_defaults_to_now() {
        let proposed: ProposedOrder =
            serde_json::from_str(r#"{"order_total": 0, "order_items": []}"#).unwrap();
        assert!(proposed.order_date <= Utc::now());
    }
}
