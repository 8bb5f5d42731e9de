use serde::{Deserialize, Serialize};

use stockroom_inventory::Item;
use stockroom_requirements::Requirement;

/// Row of `GET /transactions/to-be-ordered`: an item whose open requirement
/// demand exceeds stock on hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToBeOrderedItem {
    pub item: Item,
    pub total_required: i64,
    pub current_stock: i64,
    pub shortage: i64,
    /// Requirements contributing to the demand.
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

impl ToBeOrderedItem {
    pub fn needs_ordering(&self) -> bool {
        self.shortage > 0
    }
}
