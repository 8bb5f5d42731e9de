use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ItemId};

use crate::shortage::ToBeOrderedItem;

/// Line of a purchase order draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPurchaseOrderLine {
    pub item_id: ItemId,
    pub quantity: i64,
    pub unit_price: Decimal,
}

impl NewPurchaseOrderLine {
    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Payload for `POST /purchase-orders/`. The backend assigns the PO number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPurchaseOrder {
    pub supplier_name: String,
    pub expected_delivery_date: DateTime<Utc>,
    pub items: Vec<NewPurchaseOrderLine>,
}

impl NewPurchaseOrder {
    /// Draft an order for the selected shortage rows: each line orders the
    /// full shortage at the item's catalogue price. Rows that are not short
    /// are skipped.
    pub fn from_shortages(
        rows: &[ToBeOrderedItem],
        selected: &[ItemId],
        supplier_name: impl Into<String>,
        expected_delivery_date: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let items = rows
            .iter()
            .filter(|row| selected.contains(&row.item.id) && row.needs_ordering())
            .map(|row| NewPurchaseOrderLine {
                item_id: row.item.id,
                quantity: row.shortage,
                unit_price: row.item.unit_price,
            })
            .collect();

        let draft = Self {
            supplier_name: supplier_name.into(),
            expected_delivery_date,
            items,
        };
        draft.validate()?;
        Ok(draft)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.supplier_name.trim().is_empty() {
            return Err(DomainError::validation("supplier_name cannot be empty"));
        }
        if self.items.is_empty() {
            return Err(DomainError::validation(
                "purchase order must list at least one item",
            ));
        }
        let mut seen = HashSet::new();
        for line in &self.items {
            if line.quantity <= 0 {
                return Err(DomainError::validation(format!(
                    "item {}: quantity must be positive",
                    line.item_id
                )));
            }
            if line.unit_price < Decimal::ZERO {
                return Err(DomainError::validation(format!(
                    "item {}: unit_price cannot be negative",
                    line.item_id
                )));
            }
            if !seen.insert(line.item_id) {
                return Err(DomainError::validation(format!(
                    "item {} listed more than once",
                    line.item_id
                )));
            }
        }
        Ok(())
    }

    pub fn total_amount(&self) -> Decimal {
        self.items.iter().map(NewPurchaseOrderLine::total).sum()
    }
}
