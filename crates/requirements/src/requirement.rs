use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ItemId, RequirementId, RequirementLineId};
use stockroom_inventory::Item;

/// Requirement status lifecycle. The backend flips it to `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequirementStatus {
    Active,
    Completed,
}

impl RequirementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementStatus::Active => "Active",
            RequirementStatus::Completed => "Completed",
        }
    }
}

/// Requirement line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementLineItem {
    #[serde(default)]
    pub id: Option<RequirementLineId>,
    pub item_id: ItemId,
    pub quantity_needed: i64,
    #[serde(default)]
    pub quantity_issued: i64,
    /// Set by the backend once a purchase order covers this line.
    #[serde(default)]
    pub ordered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
}

impl RequirementLineItem {
    pub fn new(item_id: ItemId, quantity_needed: i64, quantity_issued: i64) -> Self {
        Self {
            id: None,
            item_id,
            quantity_needed,
            quantity_issued,
            ordered: false,
            item: None,
        }
    }

    /// Still to be issued. Never negative.
    pub fn outstanding(&self) -> i64 {
        (self.quantity_needed - self.quantity_issued).max(0)
    }

    pub fn is_fulfilled(&self) -> bool {
        self.quantity_issued >= self.quantity_needed
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity_needed <= 0 {
            return Err(DomainError::validation(format!(
                "item {}: quantity_needed must be positive (got {})",
                self.item_id, self.quantity_needed
            )));
        }
        if self.quantity_issued < 0 {
            return Err(DomainError::validation(format!(
                "item {}: quantity_issued cannot be negative (got {})",
                self.item_id, self.quantity_issued
            )));
        }
        if self.quantity_issued > self.quantity_needed {
            return Err(DomainError::validation(format!(
                "item {}: quantity_issued {} exceeds quantity_needed {}",
                self.item_id, self.quantity_issued, self.quantity_needed
            )));
        }
        Ok(())
    }
}

/// Project requirement as served by `GET /requirements/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: RequirementId,
    pub project_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: RequirementStatus,
    #[serde(default, deserialize_with = "stockroom_core::time::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "stockroom_core::time::deserialize_option")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<RequirementLineItem>,
}

impl Requirement {
    pub fn line(&self, item_id: ItemId) -> Option<&RequirementLineItem> {
        self.items.iter().find(|l| l.item_id == item_id)
    }

    /// Completed exactly when every line is fully issued.
    pub fn derived_status(&self) -> RequirementStatus {
        if !self.items.is_empty() && self.items.iter().all(|l| l.is_fulfilled()) {
            RequirementStatus::Completed
        } else {
            RequirementStatus::Active
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == RequirementStatus::Completed
    }

    pub fn total_outstanding(&self) -> i64 {
        self.items.iter().map(RequirementLineItem::outstanding).sum()
    }
}

/// Line of a requirement draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRequirementLine {
    pub item_id: ItemId,
    pub quantity_needed: i64,
}

/// Payload for `POST /requirements/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRequirement {
    pub project_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub items: Vec<NewRequirementLine>,
}

impl NewRequirement {
    pub fn validate(&self) -> DomainResult<()> {
        if self.project_name.trim().is_empty() {
            return Err(DomainError::validation("project_name cannot be empty"));
        }
        if self.items.is_empty() {
            return Err(DomainError::validation(
                "requirement must list at least one item",
            ));
        }
        let mut seen = HashSet::new();
        for line in &self.items {
            if line.quantity_needed <= 0 {
                return Err(DomainError::validation(format!(
                    "item {}: quantity_needed must be positive",
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
}
