use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ItemId, PurchaseOrderId, PurchaseOrderLineId};
use stockroom_inventory::Item;

use crate::invoice::Invoice;

/// Purchase order status lifecycle.
///
/// `Cancelled` exists on the backend but is never derived from line state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseOrderStatus {
    Pending,
    #[serde(rename = "Partially Received")]
    PartiallyReceived,
    Received,
    Cancelled,
}

impl PurchaseOrderStatus {
    /// Status implied by line fulfillment: all lines fully received is
    /// `Received`, any receipt at all is `PartiallyReceived`, else `Pending`.
    pub fn derive(lines: &[PurchaseOrderLineItem]) -> Self {
        Self::from_received(lines.iter().map(|l| (l.quantity, l.received_quantity)))
    }

    pub(crate) fn from_received(lines: impl IntoIterator<Item = (i64, i64)>) -> Self {
        let mut any_line = false;
        let mut all_full = true;
        let mut any_received = false;
        for (ordered, received) in lines {
            any_line = true;
            all_full &= received >= ordered;
            any_received |= received > 0;
        }
        if any_line && all_full {
            PurchaseOrderStatus::Received
        } else if any_received {
            PurchaseOrderStatus::PartiallyReceived
        } else {
            PurchaseOrderStatus::Pending
        }
    }

    /// Whether goods can still be booked against an order in this status.
    pub fn is_receivable(&self) -> bool {
        matches!(
            self,
            PurchaseOrderStatus::Pending | PurchaseOrderStatus::PartiallyReceived
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseOrderStatus::Pending => "Pending",
            PurchaseOrderStatus::PartiallyReceived => "Partially Received",
            PurchaseOrderStatus::Received => "Received",
            PurchaseOrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl core::fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Purchase order line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderLineItem {
    #[serde(default)]
    pub id: Option<PurchaseOrderLineId>,
    pub item_id: ItemId,
    /// Ordered quantity, fixed at creation.
    pub quantity: i64,
    /// Older orders predate partial receipts and omit this field.
    #[serde(default)]
    pub received_quantity: i64,
    pub unit_price: Decimal,
    #[serde(default)]
    pub total_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
}

impl PurchaseOrderLineItem {
    pub fn new(item_id: ItemId, quantity: i64, received_quantity: i64, unit_price: Decimal) -> Self {
        Self {
            id: None,
            item_id,
            quantity,
            received_quantity,
            unit_price,
            total_price: None,
            item: None,
        }
    }

    /// Still to be received. Never negative.
    pub fn remaining(&self) -> i64 {
        (self.quantity - self.received_quantity).max(0)
    }

    pub fn is_fully_received(&self) -> bool {
        self.received_quantity >= self.quantity
    }

    /// Line value, preferring the backend's figure when present.
    pub fn line_total(&self) -> Decimal {
        self.total_price
            .unwrap_or_else(|| self.unit_price * Decimal::from(self.quantity))
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity <= 0 {
            return Err(DomainError::validation(format!(
                "item {}: ordered quantity must be positive (got {})",
                self.item_id, self.quantity
            )));
        }
        if self.received_quantity < 0 {
            return Err(DomainError::validation(format!(
                "item {}: received_quantity cannot be negative (got {})",
                self.item_id, self.received_quantity
            )));
        }
        if self.received_quantity > self.quantity {
            return Err(DomainError::validation(format!(
                "item {}: received_quantity {} exceeds ordered quantity {}",
                self.item_id, self.received_quantity, self.quantity
            )));
        }
        Ok(())
    }
}

/// Purchase order as served by `GET /purchase-orders/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: PurchaseOrderId,
    pub po_number: String,
    pub supplier_name: String,
    #[serde(default, deserialize_with = "stockroom_core::time::deserialize_option")]
    pub expected_delivery_date: Option<DateTime<Utc>>,
    pub status: PurchaseOrderStatus,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default, deserialize_with = "stockroom_core::time::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "stockroom_core::time::deserialize_option")]
    pub received_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<PurchaseOrderLineItem>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
}

impl PurchaseOrder {
    pub fn line(&self, item_id: ItemId) -> Option<&PurchaseOrderLineItem> {
        self.items.iter().find(|l| l.item_id == item_id)
    }

    /// Lines with something left to receive.
    pub fn outstanding_lines(&self) -> impl Iterator<Item = &PurchaseOrderLineItem> {
        self.items.iter().filter(|l| !l.is_fully_received())
    }

    pub fn derived_status(&self) -> PurchaseOrderStatus {
        PurchaseOrderStatus::derive(&self.items)
    }

    pub fn invoiced_total(&self) -> Decimal {
        self.invoices.iter().map(|i| i.amount).sum()
    }

    /// Amount not yet covered by attached invoices (may be negative when over-invoiced).
    pub fn uninvoiced_amount(&self) -> Decimal {
        self.total_amount - self.invoiced_total()
    }
}
