//! Strongly-typed identifiers for backend records.
//!
//! The backend hands out positive integer keys. Each record kind gets its own
//! newtype so an item id can never be passed where a requirement id is due.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a catalogue item (the key of a stock snapshot).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

/// Identifier of a stock record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockId(i64);

/// Identifier of a project requirement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementId(i64);

/// Identifier of a single requirement line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementLineId(i64);

/// Identifier of a purchase order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurchaseOrderId(i64);

/// Identifier of a single purchase order line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurchaseOrderLineId(i64);

/// Identifier of an invoice attached to a purchase order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(i64);

/// Identifier of a stock transaction (purchase/issue/return).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(i64);

/// Identifier of a user account.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

macro_rules! impl_int_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                if value <= 0 {
                    return Err(DomainError::invalid_id(format!(
                        "{}: must be positive, got {}",
                        $name, value
                    )));
                }
                Ok(Self(value))
            }
        }
    };
}

impl_int_newtype!(ItemId, "ItemId");
impl_int_newtype!(StockId, "StockId");
impl_int_newtype!(RequirementId, "RequirementId");
impl_int_newtype!(RequirementLineId, "RequirementLineId");
impl_int_newtype!(PurchaseOrderId, "PurchaseOrderId");
impl_int_newtype!(PurchaseOrderLineId, "PurchaseOrderLineId");
impl_int_newtype!(InvoiceId, "InvoiceId");
impl_int_newtype!(TransactionId, "TransactionId");
impl_int_newtype!(UserId, "UserId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_integers() {
        let id: ItemId = " 42 ".parse().unwrap();
        assert_eq!(id, ItemId::new(42));
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn rejects_garbage_and_non_positive() {
        assert!(matches!(
            "abc".parse::<PurchaseOrderId>(),
            Err(DomainError::InvalidId(msg)) if msg.starts_with("PurchaseOrderId")
        ));
        assert!("0".parse::<RequirementId>().is_err());
        assert!("-3".parse::<RequirementId>().is_err());
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&ItemId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: ItemId = serde_json::from_str("7").unwrap();
        assert_eq!(back, ItemId::new(7));
    }
}
