use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{ItemId, PurchaseOrderId, RequirementId, TransactionId};

use crate::item::Item;

/// Kind of stock movement recorded by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionAction {
    /// Goods received against a purchase order.
    Purchase,
    /// Goods issued to a requirement.
    Issue,
    Return,
}

impl TransactionAction {
    /// Signed effect of `quantity` on stock on hand.
    pub fn signed(&self, quantity: i64) -> i64 {
        match self {
            TransactionAction::Purchase | TransactionAction::Return => quantity,
            TransactionAction::Issue => -quantity,
        }
    }
}

/// Row of `GET /transactions/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub item_id: ItemId,
    pub quantity: i64,
    pub action: TransactionAction,
    #[serde(default)]
    pub purchase_order_id: Option<PurchaseOrderId>,
    #[serde(default)]
    pub requirement_id: Option<RequirementId>,
    #[serde(default, deserialize_with = "stockroom_core::time::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
}

impl Transaction {
    pub fn stock_delta(&self) -> i64 {
        self.action.signed(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_issue_row() {
        let json = r#"{
            "id": 81, "item_id": 3, "quantity": 4, "action": "Issue",
            "purchase_order_id": null, "requirement_id": 12,
            "created_at": "2024-06-02T14:30:00"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.action, TransactionAction::Issue);
        assert_eq!(tx.requirement_id, Some(RequirementId::new(12)));
        assert_eq!(tx.stock_delta(), -4);
        assert!(tx.created_at.is_some());
    }

    #[test]
    fn purchase_and_return_add_stock() {
        assert_eq!(TransactionAction::Purchase.signed(5), 5);
        assert_eq!(TransactionAction::Return.signed(2), 2);
    }
}
