//! User repository for database operations.

use sqlx::PgPool;

use tradewind_core::{Email, UserId, UserRole};

use super::RepositoryError;
use crate::models::user::{User, UserSortField};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    name: String,
    email: Email,
    role: UserRole,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
        }
    }
}

const USER_COLUMNS: &str = "id, name, email, role";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, role FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, role FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    /// Create a new user with a pre-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (name, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, email, role",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Get a user and their password hash by email.
    ///
    /// Returns `None` if no user exists for the email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct UserWithHashRow {
            id: UserId,
            name: String,
            email: Email,
            role: UserRole,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, UserWithHashRow>(
            "SELECT id, name, email, role, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| {
            (
                User {
                    id: r.id,
                    name: r.name,
                    email: r.email,
                    role: r.role,
                },
                r.password_hash,
            )
        }))
    }

    /// Overwrite a user's profile, including the password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new email is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: UserId,
        name: &str,
        email: &Email,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "UPDATE users
             SET name = $2, email = $3, password_hash = $4, role = $5
             WHERE id = $1
             RETURNING id, name, email, role",
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.map(User::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a user.
    ///
    /// # Returns
    ///
    /// Returns `true` if the user was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, role FROM users ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Search users by name (case-insensitive substring match).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, query: &str) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, role FROM users WHERE name ILIKE $1 ORDER BY id",
        )
        .bind(format!("%{query}%"))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// List all users ordered by a whitelisted field.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_sorted(&self, field: UserSortField) -> Result<Vec<User>, RepositoryError> {
        // The column name comes from a closed enum, not client input.
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY {}",
            field.column()
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql).fetch_all(self.pool).await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// List users with a given role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn filter_by_role(&self, role: UserRole) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, role FROM users WHERE role = $1 ORDER BY id",
        )
        .bind(role)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}
