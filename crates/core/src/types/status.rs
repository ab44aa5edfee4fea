//! Status enums for orders.

use serde::{Deserialize, Serialize};

/// Delivery status of an order.
///
/// New orders start as `Pending`. Any status is reachable from any other by
/// an admin write; no transition graph is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    #[default]
    Pending,
    InProgress,
    Delivered,
    Cancelled,
}

impl DeliveryStatus {
    /// Returns the canonical string form, as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DeliveryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid delivery status: {s}")),
        }
    }
}

// SQLx support (with postgres feature) - stored as TEXT
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for DeliveryStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for DeliveryStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        s.parse::<Self>().map_err(Into::into)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for DeliveryStatus {
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
    fn test_default_is_pending() {
        assert_eq!(DeliveryStatus::default(), DeliveryStatus::Pending);
    }

    #[test]
    fn test_round_trip_str() {
        for status in [
            DeliveryStatus::Pending,
            DeliveryStatus::InProgress,
            DeliveryStatus::Delivered,
            DeliveryStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<DeliveryStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_invalid_status() {
        assert!("shipped".parse::<DeliveryStatus>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&DeliveryStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        let parsed: DeliveryStatus = serde_json::from_str("\"delivered\"").unwrap();
        assert_eq!(parsed, DeliveryStatus::Delivered);
    }
}
