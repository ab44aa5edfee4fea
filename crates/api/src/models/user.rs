//! User domain types.

use serde::Deserialize;

use tradewind_core::{Email, UserId, UserRole};

/// A registered user (domain type).
///
/// The password hash never leaves the repository layer; it is not part of
/// this type.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address (unique).
    pub email: Email,
    /// Authorization role.
    pub role: UserRole,
}

/// Whitelisted sort fields for admin user listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSortField {
    Id,
    Name,
    Email,
    Role,
}

impl UserSortField {
    /// The database column this field sorts by.
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Email => "email",
            Self::Role => "role",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_field_from_query_string() {
        let field: UserSortField = serde_json::from_str("\"email\"").unwrap();
        assert_eq!(field, UserSortField::Email);
        assert_eq!(field.column(), "email");
    }

    #[test]
    fn test_sort_field_rejects_unknown_column() {
        assert!(serde_json::from_str::<UserSortField>("\"password_hash\"").is_err());
    }
}
