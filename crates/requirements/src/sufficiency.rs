//! Stock sufficiency evaluation.
//!
//! Given a requirement and a stock snapshot, classify each line as
//! satisfiable or not and fold the lines into an aggregate classification.
//! Pure: the same inputs always produce the same report.

use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ItemId};
use stockroom_inventory::StockSnapshot;

use crate::requirement::{Requirement, RequirementLineItem};

/// Aggregate availability of a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Every line can be issued from current stock.
    Satisfiable,
    /// Some lines can, some cannot.
    PartiallySatisfiable,
    /// No line can.
    Unsatisfiable,
}

impl Availability {
    /// Badge text shown on the requirements list.
    pub fn label(&self) -> &'static str {
        match self {
            Availability::Satisfiable => "Available",
            Availability::PartiallySatisfiable => "Partial",
            Availability::Unsatisfiable => "To Order",
        }
    }
}

/// Availability of a single requirement line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAvailability {
    pub item_id: ItemId,
    pub current_stock: i64,
    pub outstanding_need: i64,
    pub satisfiable: bool,
    /// Quantity missing to cover the outstanding need (zero when satisfiable).
    pub shortfall: i64,
}

/// Result of [`evaluate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SufficiencyReport {
    pub per_item: Vec<ItemAvailability>,
    pub aggregate: Availability,
}

impl SufficiencyReport {
    pub fn line(&self, item_id: ItemId) -> Option<&ItemAvailability> {
        self.per_item.iter().find(|l| l.item_id == item_id)
    }

    /// Lines with something left to issue that current stock covers.
    pub fn issuable_items(&self) -> impl Iterator<Item = &ItemAvailability> {
        self.per_item
            .iter()
            .filter(|l| l.outstanding_need > 0 && l.satisfiable)
    }

    /// Lines current stock cannot cover.
    pub fn shortfalls(&self) -> impl Iterator<Item = &ItemAvailability> {
        self.per_item.iter().filter(|l| !l.satisfiable)
    }

    /// Whole-requirement issue is possible: everything covered and something left to issue.
    pub fn can_issue_all(&self) -> bool {
        self.aggregate == Availability::Satisfiable
            && self.per_item.iter().any(|l| l.outstanding_need > 0)
    }
}

/// Evaluate a requirement against a stock snapshot.
///
/// Fails on an empty requirement or a malformed line; a snapshot that lacks
/// an item is not an error (zero on hand).
pub fn evaluate(
    requirement: &Requirement,
    snapshot: &StockSnapshot,
) -> DomainResult<SufficiencyReport> {
    evaluate_lines(&requirement.items, snapshot)
}

/// [`evaluate`] over bare line items.
pub fn evaluate_lines(
    lines: &[RequirementLineItem],
    snapshot: &StockSnapshot,
) -> DomainResult<SufficiencyReport> {
    if lines.is_empty() {
        return Err(DomainError::validation(
            "requirement must have at least one line item",
        ));
    }

    let per_item = lines
        .iter()
        .map(|line| {
            line.validate()?;
            let current_stock = snapshot.on_hand(line.item_id);
            let outstanding_need = line.outstanding();
            Ok(ItemAvailability {
                item_id: line.item_id,
                current_stock,
                outstanding_need,
                satisfiable: current_stock >= outstanding_need,
                shortfall: (outstanding_need - current_stock).max(0),
            })
        })
        .collect::<DomainResult<Vec<_>>>()?;

    let satisfiable = per_item.iter().filter(|l| l.satisfiable).count();
    let aggregate = if satisfiable == per_item.len() {
        Availability::Satisfiable
    } else if satisfiable == 0 {
        Availability::Unsatisfiable
    } else {
        Availability::PartiallySatisfiable
    };

    Ok(SufficiencyReport {
        per_item,
        aggregate,
    })
}
