//! Point-in-time stock snapshot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ItemId};

use crate::item::{Item, StockLevel};

/// On-hand quantity per item, rebuilt wholesale from each fetch.
///
/// A missing key means zero on hand, never an error. Snapshots are only ever
/// replaced, never patched. Decoding goes through [`StockSnapshot::from_quantities`],
/// so a negative quantity fails to decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "HashMap<ItemId, i64>",
    into = "HashMap<ItemId, i64>"
)]
pub struct StockSnapshot {
    on_hand: HashMap<ItemId, i64>,
}

impl StockSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from `(item, quantity)` pairs, rejecting negative quantities.
    pub fn from_quantities(
        quantities: impl IntoIterator<Item = (ItemId, i64)>,
    ) -> DomainResult<Self> {
        let mut on_hand = HashMap::new();
        for (item_id, quantity) in quantities {
            if quantity < 0 {
                return Err(DomainError::validation(format!(
                    "stock for item {item_id} cannot be negative (got {quantity})"
                )));
            }
            on_hand.insert(item_id, quantity);
        }
        Ok(Self { on_hand })
    }

    /// Snapshot from the catalogue listing; items without a stock record are left out.
    pub fn from_items(items: &[Item]) -> DomainResult<Self> {
        Self::from_quantities(
            items
                .iter()
                .filter_map(|i| i.stock.as_ref().map(|s| (i.id, s.current_quantity))),
        )
    }

    pub fn from_stock_levels(levels: &[StockLevel]) -> DomainResult<Self> {
        Self::from_quantities(levels.iter().map(|l| (l.item_id, l.current_quantity)))
    }

    /// On-hand quantity for `item_id` (zero when absent).
    pub fn on_hand(&self, item_id: ItemId) -> i64 {
        self.on_hand.get(&item_id).copied().unwrap_or(0)
    }

    pub fn contains(&self, item_id: ItemId) -> bool {
        self.on_hand.contains_key(&item_id)
    }

    pub fn len(&self) -> usize {
        self.on_hand.len()
    }

    pub fn is_empty(&self) -> bool {
        self.on_hand.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, i64)> + '_ {
        self.on_hand.iter().map(|(k, v)| (*k, *v))
    }
}

impl TryFrom<HashMap<ItemId, i64>> for StockSnapshot {
    type Error = DomainError;

    fn try_from(on_hand: HashMap<ItemId, i64>) -> DomainResult<Self> {
        Self::from_quantities(on_hand)
    }
}

impl From<StockSnapshot> for HashMap<ItemId, i64> {
    fn from(snapshot: StockSnapshot) -> Self {
        snapshot.on_hand
    }
}
