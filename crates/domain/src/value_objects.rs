//! Value objects shared by the delivery entities.

use std::str::FromStr;

use common::RecordId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random ID.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an ID from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<RecordId> for $name {
            fn from(id: RecordId) -> Self {
                Self(id.as_uuid())
            }
        }

        impl From<$name> for RecordId {
            fn from(id: $name) -> Self {
                RecordId::from_uuid(id.0)
            }
        }
    };
}

entity_id!(
    /// Unique identifier for a customer.
    CustomerId
);
entity_id!(
    /// Unique identifier for a restaurant.
    RestaurantId
);
entity_id!(
    /// Unique identifier for a menu item.
    ProductId
);
entity_id!(
    /// Unique identifier for an order.
    OrderId
);

/// Money amount represented in cents to avoid floating point issues.
///
/// Serialized as the bare number of cents so stored payloads can be
/// range-filtered numerically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money {
    /// Amount in cents (e.g., 1000 = 10.00)
    cents: i64,
}

impl Money {
    /// Largest decimal amount whose cents fit in an `i64`.
    pub const MAX_DECIMAL: f64 = i64::MAX as f64 / 100.0;

    /// Creates a new Money amount from cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Converts a decimal amount such as `45.5` into cents.
    ///
    /// Returns `None` for non-finite values, for values with more than
    /// two decimal places and for amounts too large to hold in cents.
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let scaled = value * 100.0;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-6 || rounded.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Self::from_cents(rounded as i64))
    }

    /// Returns zero money.
    pub const fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the amount as a decimal number (e.g. 60.5).
    pub fn as_decimal(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Returns true if the amount is positive.
    pub fn is_positive(&self) -> bool {
        self.cents > 0
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents + rhs.cents,
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.cents += rhs.cents;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(CustomerId::new(), CustomerId::new());
        assert_ne!(OrderId::new(), OrderId::new());
    }

    #[test]
    fn test_id_converts_through_record_id() {
        let id = RestaurantId::new();
        let record_id: RecordId = id.into();
        assert_eq!(RestaurantId::from(record_id), id);
        assert_eq!(record_id.as_uuid(), id.as_uuid());
    }

    #[test]
    fn test_id_parses_from_string() {
        let id = ProductId::new();
        let parsed: ProductId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("42".parse::<ProductId>().is_err());
    }

    #[test]
    fn test_money_from_decimal() {
        assert_eq!(Money::from_decimal(45.50), Some(Money::from_cents(4550)));
        assert_eq!(Money::from_decimal(15.0), Some(Money::from_cents(1500)));
        assert_eq!(Money::from_decimal(0.1), Some(Money::from_cents(10)));
        assert_eq!(Money::from_decimal(10.005), None);
        assert_eq!(Money::from_decimal(f64::NAN), None);
        assert_eq!(Money::from_decimal(f64::INFINITY), None);
        assert_eq!(Money::from_decimal(1e20), None);
        assert_eq!(Money::from_decimal(-1e20), None);
        assert_eq!(
            Money::from_decimal(1e15),
            Some(Money::from_cents(100_000_000_000_000_000))
        );
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_cents(6050).to_string(), "60.50");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-1234).to_string(), "-12.34");
    }

    #[test]
    fn test_money_arithmetic() {
        let total: Money = [Money::from_cents(4550), Money::from_cents(1500)]
            .into_iter()
            .sum();
        assert_eq!(total.cents(), 6050);
        assert_eq!(total.as_decimal(), 60.5);

        let mut running = Money::zero();
        running += Money::from_cents(800);
        assert_eq!(running.cents(), 800);
    }

    #[test]
    fn test_money_sign() {
        assert!(Money::from_cents(1).is_positive());
        assert!(!Money::zero().is_positive());
        assert!(Money::from_cents(-1).is_negative());
    }

    #[test]
    fn test_money_serializes_as_cents() {
        let json = serde_json::to_string(&Money::from_cents(1500)).unwrap();
        assert_eq!(json, "1500");
    }
}
