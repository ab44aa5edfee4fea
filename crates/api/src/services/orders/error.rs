//! Order error types.

use rust_decimal::Decimal;
use thiserror::Error;

use tradewind_core::{OrderId, ProductId};

use crate::db::RepositoryError;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// A line item references a product that does not exist.
    #[error("order references unknown product {0}")]
    InvalidReference(ProductId),

    /// The claimed order total does not equal the sum over the line items.
    #[error("order total {submitted} does not match sum of line items {computed}")]
    InvalidTotal {
        /// Total claimed by the client.
        submitted: Decimal,
        /// Total computed from the submitted line items.
        computed: Decimal,
    },

    /// The order does not exist.
    #[error("order {0} does not exist")]
    NotFound(OrderId),

    /// The requester lacks the role required for this operation.
    #[error("only admins may perform this operation")]
    Forbidden,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
