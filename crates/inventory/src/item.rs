use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ItemId, StockId};

/// Catalogue item as served by `GET /stock/items`, with its embedded stock record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model_number: Option<String>,
    #[serde(default)]
    pub unit_price: Decimal,
    #[serde(default)]
    pub minimum_stock: i64,
    #[serde(default, deserialize_with = "stockroom_core::time::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stock: Option<StockRecord>,
}

impl Item {
    /// On-hand quantity; an item without a stock record has none.
    pub fn on_hand(&self) -> i64 {
        self.stock.as_ref().map_or(0, |s| s.current_quantity)
    }

    pub fn status(&self) -> StockStatus {
        StockStatus::classify(self.on_hand(), self.minimum_stock)
    }
}

/// Stock record embedded in an [`Item`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: StockId,
    pub item_id: ItemId,
    pub current_quantity: i64,
    #[serde(default, deserialize_with = "stockroom_core::time::deserialize_option")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Stock level row as served by `GET /stock/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLevel {
    pub id: StockId,
    pub item_id: ItemId,
    pub current_quantity: i64,
    #[serde(default, deserialize_with = "stockroom_core::time::deserialize_option")]
    pub last_updated: Option<DateTime<Utc>>,
    pub item: Item,
}

impl StockLevel {
    pub fn status(&self) -> StockStatus {
        StockStatus::classify(self.current_quantity, self.item.minimum_stock)
    }
}

/// Payload for `POST /stock/items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStockItem {
    pub name: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub minimum_stock: i64,
}

impl NewStockItem {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            description: None,
            unit_price: Decimal::ZERO,
            minimum_stock: 0,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.code.trim().is_empty() {
            return Err(DomainError::validation("code cannot be empty"));
        }
        if self.unit_price < Decimal::ZERO {
            return Err(DomainError::validation("unit_price cannot be negative"));
        }
        if self.minimum_stock < 0 {
            return Err(DomainError::validation("minimum_stock cannot be negative"));
        }
        Ok(())
    }
}

/// Payload for `PATCH /stock/{item_id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockUpdate {
    pub current_quantity: i64,
}

impl StockUpdate {
    pub fn new(current_quantity: i64) -> DomainResult<Self> {
        if current_quantity < 0 {
            return Err(DomainError::validation(format!(
                "current_quantity cannot be negative (got {current_quantity})"
            )));
        }
        Ok(Self { current_quantity })
    }
}

/// Stock-level badge shown next to each item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    InStock,
}

impl StockStatus {
    /// At or below zero is out of stock; at or below the minimum is low.
    pub fn classify(current_quantity: i64, minimum_stock: i64) -> Self {
        if current_quantity <= 0 {
            StockStatus::OutOfStock
        } else if current_quantity <= minimum_stock {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::InStock => "In Stock",
        }
    }
}

impl core::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive match on name, code or description. A blank query matches everything.
pub fn matches_query(item: &Item, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }
    item.name.to_lowercase().contains(&q)
        || item.code.to_lowercase().contains(&q)
        || item
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&q))
}
