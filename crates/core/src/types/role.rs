//! User roles for authorization decisions.

use serde::{Deserialize, Serialize};

/// Role carried by every user and embedded in session tokens.
///
/// Admins manage the product catalog, other users, and order delivery
/// statuses; customers manage their own account and orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access to catalog, user, and order administration.
    Admin,
    /// Regular shopper; limited to their own account and orders.
    Customer,
}

impl UserRole {
    /// Returns the canonical string form, as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
        }
    }

    /// Whether this role grants administrative access.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "customer" => Ok(Self::Customer),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

// SQLx support (with postgres feature) - stored as TEXT
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for UserRole {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for UserRole {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        s.parse::<Self>().map_err(Into::into)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for UserRole {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<'_, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_str() {
        for role in [UserRole::Admin, UserRole::Customer] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
    }

    #[test]
    fn test_invalid_role() {
        assert!("superuser".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_is_admin() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Customer.is_admin());
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        let parsed: UserRole = serde_json::from_str("\"customer\"").unwrap();
        assert_eq!(parsed, UserRole::Customer);
    }
}
