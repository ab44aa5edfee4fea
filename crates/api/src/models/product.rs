//! Product domain types.

use rust_decimal::Decimal;
use serde::Deserialize;

use tradewind_core::ProductId;

/// A catalog product (domain type).
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Catalog price.
    pub price: Decimal,
    /// Optional category tag used by the filter endpoint.
    pub category: Option<String>,
}

/// Payload for creating a product (admin only).
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
}

/// Whitelisted sort fields for the product sort endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortField {
    Id,
    Name,
    Description,
    Price,
    Category,
}

impl ProductSortField {
    /// The database column this field sorts by.
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Description => "description",
            Self::Price => "price",
            Self::Category => "category",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_field_from_query_string() {
        let field: ProductSortField = serde_json::from_str("\"price\"").unwrap();
        assert_eq!(field, ProductSortField::Price);
        assert_eq!(field.column(), "price");
    }

    #[test]
    fn test_sort_field_rejects_unknown_column() {
        assert!(serde_json::from_str::<ProductSortField>("\"id; DROP TABLE products\"").is_err());
    }
}
