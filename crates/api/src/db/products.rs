//! Product repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;

use tradewind_core::ProductId;

use super::RepositoryError;
use crate::models::product::{NewProduct, Product, ProductSortField};

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: Option<String>,
    price: Decimal,
    category: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            category: row.category,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, description, price, category";

/// Repository for product catalog operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description, price, category FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// List products with pagination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description, price, category FROM products
             ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Search products by name (case-insensitive substring match).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description, price, category FROM products
             WHERE name ILIKE $1 ORDER BY id",
        )
        .bind(format!("%{query}%"))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Filter products by category (case-insensitive substring match).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn filter_by_category(&self, category: &str) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description, price, category FROM products
             WHERE category ILIKE $1 ORDER BY id",
        )
        .bind(format!("%{category}%"))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// List all products ordered by a whitelisted field.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_sorted(
        &self,
        field: ProductSortField,
    ) -> Result<Vec<Product>, RepositoryError> {
        // The column name comes from a closed enum, not client input.
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY {}",
            field.column()
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "INSERT INTO products (name, description, price, category)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, description, price, category",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Overwrite a product's catalog entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "UPDATE products
             SET name = $2, description = $3, price = $4, category = $5
             WHERE id = $1
             RETURNING id, name, description, price, category",
        )
        .bind(id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::from).ok_or(RepositoryError::NotFound)
    }

    /// Remove a product from the catalog.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
