//! Partial receipt reconciliation.
//!
//! Checks a user-entered "receive now" quantity per purchase order line
//! against what is still outstanding, and plans the updated received
//! quantities. An over-receipt is clamped to the remainder for display, but
//! stays flagged and blocks the whole plan until corrected.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ItemId};

use crate::invoice::{InvoiceDraft, filter_invoices};
use crate::order::{PurchaseOrder, PurchaseOrderLineItem, PurchaseOrderStatus};

/// Additional quantity to receive per item. Items not listed receive nothing.
pub type RequestedQuantities = HashMap<ItemId, i64>;

pub const EXCEEDS_REMAINING: &str = "cannot receive more than remaining";

/// A display value paired with the error that forced it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedQuantity {
    pub value: i64,
    pub error: Option<String>,
}

impl ProposedQuantity {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// One planned line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedLine {
    pub item_id: ItemId,
    pub ordered: i64,
    pub already_received: i64,
    pub remaining: i64,
    pub requested: i64,
    pub proposed: ProposedQuantity,
    /// `already_received + proposed.value`; never above `ordered`.
    pub new_received_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineError {
    pub item_id: ItemId,
    pub message: String,
}

/// Quantity booked for one item in a receipt submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub item_id: ItemId,
    pub quantity: i64,
}

/// Payload for `PATCH /purchase-orders/{id}/receive-partial`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialReceipt {
    pub items: Vec<ReceiptItem>,
    pub invoices: Vec<InvoiceDraft>,
}

/// Payload for `PATCH /purchase-orders/{id}/receive` (everything outstanding).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullReceipt {
    pub invoices: Vec<InvoiceDraft>,
}

impl FullReceipt {
    /// Build a full receipt for `order`; refuses orders that are already closed.
    pub fn for_order(order: &PurchaseOrder, invoices: Vec<InvoiceDraft>) -> DomainResult<Self> {
        if !order.status.is_receivable() {
            return Err(DomainError::conflict(format!(
                "purchase order {} is {} and cannot be received",
                order.po_number, order.status
            )));
        }
        Ok(Self {
            invoices: filter_invoices(invoices)?,
        })
    }
}

/// Outcome of [`plan_partial_receipt`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptPlan {
    pub lines: Vec<PlannedLine>,
    pub errors: Vec<LineError>,
    pub can_apply: bool,
}

impl ReceiptPlan {
    pub fn line(&self, item_id: ItemId) -> Option<&PlannedLine> {
        self.lines.iter().find(|l| l.item_id == item_id)
    }

    /// `(item, new received quantity)` for every line.
    pub fn updated_lines(&self) -> impl Iterator<Item = (ItemId, i64)> + '_ {
        self.lines
            .iter()
            .map(|l| (l.item_id, l.new_received_quantity))
    }

    /// Lines that would actually be submitted (strictly positive, valid).
    pub fn submitted_items(&self) -> Vec<ReceiptItem> {
        self.lines
            .iter()
            .filter(|l| l.requested > 0 && l.proposed.is_valid())
            .map(|l| ReceiptItem {
                item_id: l.item_id,
                quantity: l.requested,
            })
            .collect()
    }

    /// Status the order would have once this plan is applied.
    pub fn projected_status(&self) -> PurchaseOrderStatus {
        PurchaseOrderStatus::from_received(
            self.lines
                .iter()
                .map(|l| (l.ordered, l.new_received_quantity)),
        )
    }

    /// Turn the plan into a submission payload. Refused while any line is
    /// flagged or nothing is being received.
    pub fn into_submission(self, invoices: Vec<InvoiceDraft>) -> DomainResult<PartialReceipt> {
        if !self.can_apply {
            let reason = match self.errors.first() {
                Some(e) => format!("item {}: {}", e.item_id, e.message),
                None => "no quantities to receive".to_string(),
            };
            return Err(DomainError::validation(format!(
                "receipt cannot be applied: {reason}"
            )));
        }
        Ok(PartialReceipt {
            items: self.submitted_items(),
            invoices: filter_invoices(invoices)?,
        })
    }
}

/// Plan a partial receipt for `lines`.
///
/// Malformed input (bad line quantities, a negative request, duplicate item
/// lines, or a request for an item not on the order) is an error. Requests
/// above the remainder are reported in the plan instead.
pub fn plan_partial_receipt(
    lines: &[PurchaseOrderLineItem],
    requested: &RequestedQuantities,
) -> DomainResult<ReceiptPlan> {
    let mut on_order = HashSet::with_capacity(lines.len());
    for line in lines {
        line.validate()?;
        if !on_order.insert(line.item_id) {
            return Err(DomainError::validation(format!(
                "item {} appears on more than one line",
                line.item_id
            )));
        }
    }

    let mut unknown: Vec<ItemId> = requested
        .keys()
        .filter(|id| !on_order.contains(id))
        .copied()
        .collect();
    if !unknown.is_empty() {
        unknown.sort();
        return Err(DomainError::validation(format!(
            "requested items not on this purchase order: {}",
            unknown
                .iter()
                .map(ItemId::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }

    let mut planned = Vec::with_capacity(lines.len());
    let mut errors = Vec::new();

    for line in lines {
        let requested = requested.get(&line.item_id).copied().unwrap_or(0);
        if requested < 0 {
            return Err(DomainError::validation(format!(
                "item {}: requested quantity cannot be negative (got {requested})",
                line.item_id
            )));
        }

        let remaining = line.remaining();
        let proposed = if requested > remaining {
            errors.push(LineError {
                item_id: line.item_id,
                message: EXCEEDS_REMAINING.to_string(),
            });
            ProposedQuantity {
                value: remaining,
                error: Some(EXCEEDS_REMAINING.to_string()),
            }
        } else {
            ProposedQuantity {
                value: requested,
                error: None,
            }
        };

        planned.push(PlannedLine {
            item_id: line.item_id,
            ordered: line.quantity,
            already_received: line.received_quantity,
            remaining,
            requested,
            new_received_quantity: line.received_quantity + proposed.value,
            proposed,
        });
    }

    let can_apply = errors.is_empty() && planned.iter().any(|l| l.requested > 0);

    Ok(ReceiptPlan {
        lines: planned,
        errors,
        can_apply,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn line(item: i64, quantity: i64, received: i64) -> PurchaseOrderLineItem {
        PurchaseOrderLineItem::new(ItemId::new(item), quantity, received, dec!(100))
    }

    fn request(pairs: &[(i64, i64)]) -> RequestedQuantities {
        pairs.iter().map(|(i, q)| (ItemId::new(*i), *q)).collect()
    }

    #[test]
    fn request_within_remaining_is_applied() {
        let plan = plan_partial_receipt(&[line(1, 10, 3)], &request(&[(1, 5)])).unwrap();

        let l = plan.line(ItemId::new(1)).unwrap();
        assert_eq!(l.remaining, 7);
        assert_eq!(l.proposed.value, 5);
        assert!(l.proposed.is_valid());
        assert_eq!(l.new_received_quantity, 8);
        assert!(plan.errors.is_empty());
        assert!(plan.can_apply);
        assert_eq!(plan.projected_status(), PurchaseOrderStatus::PartiallyReceived);
    }

    #[test]
    fn over_receipt_is_clamped_and_blocks() {
        let plan = plan_partial_receipt(&[line(1, 10, 3)], &request(&[(1, 9)])).unwrap();

        let l = plan.line(ItemId::new(1)).unwrap();
        assert_eq!(l.requested, 9);
        assert_eq!(l.proposed.value, 7);
        assert_eq!(l.proposed.error.as_deref(), Some(EXCEEDS_REMAINING));
        assert_eq!(l.new_received_quantity, 10);
        assert_eq!(
            plan.errors,
            vec![LineError {
                item_id: ItemId::new(1),
                message: EXCEEDS_REMAINING.to_string()
            }]
        );
        assert!(!plan.can_apply);

        let err = plan.into_submission(Vec::new()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains(EXCEEDS_REMAINING)));
    }

    #[test]
    fn one_bad_line_blocks_the_whole_plan() {
        let plan = plan_partial_receipt(
            &[line(1, 10, 0), line(2, 5, 4)],
            &request(&[(1, 4), (2, 2)]),
        )
        .unwrap();
        assert_eq!(plan.errors.len(), 1);
        assert_eq!(plan.errors[0].item_id, ItemId::new(2));
        assert!(!plan.can_apply);
    }

    #[test]
    fn zero_lines_are_valid_but_not_submitted() {
        let plan = plan_partial_receipt(
            &[line(1, 10, 0), line(2, 5, 0)],
            &request(&[(1, 0), (2, 5)]),
        )
        .unwrap();
        assert!(plan.can_apply);

        let submission = plan.into_submission(Vec::new()).unwrap();
        assert_eq!(
            submission.items,
            vec![ReceiptItem {
                item_id: ItemId::new(2),
                quantity: 5
            }]
        );
    }

    #[test]
    fn nothing_requested_cannot_apply() {
        let plan = plan_partial_receipt(&[line(1, 10, 0)], &RequestedQuantities::new()).unwrap();
        assert!(!plan.can_apply);
        assert!(plan.errors.is_empty());
        assert_eq!(plan.projected_status(), PurchaseOrderStatus::Pending);

        let err = plan.into_submission(Vec::new()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("no quantities")));
    }

    #[test]
    fn receiving_every_remainder_projects_received() {
        let plan = plan_partial_receipt(
            &[line(1, 10, 3), line(2, 5, 2)],
            &request(&[(1, 7), (2, 3)]),
        )
        .unwrap();
        assert!(plan.can_apply);
        assert_eq!(plan.projected_status(), PurchaseOrderStatus::Received);
        assert_eq!(
            plan.updated_lines().collect::<Vec<_>>(),
            vec![(ItemId::new(1), 10), (ItemId::new(2), 5)]
        );
    }

    #[test]
    fn blank_invoices_are_filtered_from_submission() {
        let plan = plan_partial_receipt(&[line(1, 10, 0)], &request(&[(1, 2)])).unwrap();
        let submission = plan
            .into_submission(vec![
                InvoiceDraft::new("", Utc::now(), dec!(100)),
                InvoiceDraft::new("INV1", Utc::now(), dec!(50)),
            ])
            .unwrap();
        assert_eq!(submission.invoices.len(), 1);
        assert_eq!(submission.invoices[0].invoice_number, "INV1");
    }

    #[test]
    fn malformed_input_fails_fast() {
        assert!(plan_partial_receipt(&[line(1, 10, 0)], &request(&[(1, -1)])).is_err());
        assert!(plan_partial_receipt(&[line(1, 10, 12)], &request(&[(1, 1)])).is_err());
        assert!(plan_partial_receipt(&[line(1, 10, 0), line(1, 3, 0)], &request(&[])).is_err());

        let err = plan_partial_receipt(&[line(1, 10, 0)], &request(&[(9, 1), (8, 1)])).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.ends_with("8, 9")));
    }

    #[test]
    fn full_receipt_refuses_closed_orders() {
        let mut order = PurchaseOrder {
            id: stockroom_core::PurchaseOrderId::new(4),
            po_number: "PO-ABC123".to_string(),
            supplier_name: "Volt Traders".to_string(),
            expected_delivery_date: None,
            status: PurchaseOrderStatus::Pending,
            total_amount: dec!(1000),
            created_at: None,
            received_at: None,
            items: vec![line(1, 10, 0)],
            invoices: Vec::new(),
        };
        let receipt = FullReceipt::for_order(
            &order,
            vec![
                InvoiceDraft::new(" ", Utc::now(), dec!(1)),
                InvoiceDraft::new("INV-7", Utc::now(), dec!(1000)),
            ],
        )
        .unwrap();
        assert_eq!(receipt.invoices.len(), 1);

        order.status = PurchaseOrderStatus::Received;
        let err = FullReceipt::for_order(&order, Vec::new()).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    fn arb_order() -> impl Strategy<Value = Vec<(i64, i64, i64)>> {
        // (ordered, received, requested); requested may be far above remaining
        prop::collection::vec(
            (1i64..100).prop_flat_map(|ordered| {
                (Just(ordered), 0..=ordered, prop_oneof![0i64..120, 0i64..i64::MAX / 4])
            }),
            1..6,
        )
    }

    fn build(shape: &[(i64, i64, i64)]) -> (Vec<PurchaseOrderLineItem>, RequestedQuantities) {
        let lines = shape
            .iter()
            .enumerate()
            .map(|(i, (q, r, _))| line(i as i64 + 1, *q, *r))
            .collect();
        let req = shape
            .iter()
            .enumerate()
            .map(|(i, (_, _, want))| (ItemId::new(i as i64 + 1), *want))
            .collect();
        (lines, req)
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: no planned line ever exceeds its ordered quantity.
        #[test]
        fn never_plans_above_ordered(shape in arb_order()) {
            let (lines, req) = build(&shape);
            let plan = plan_partial_receipt(&lines, &req).unwrap();
            for (planned, (ordered, _, _)) in plan.lines.iter().zip(&shape) {
                prop_assert!(planned.new_received_quantity <= *ordered);
                prop_assert!(planned.proposed.value <= planned.remaining);
            }
        }

        /// Property: can_apply holds exactly when something positive is
        /// requested and no line asks for more than remains.
        #[test]
        fn can_apply_matches_definition(shape in arb_order()) {
            let (lines, req) = build(&shape);
            let plan = plan_partial_receipt(&lines, &req).unwrap();
            let any_positive = shape.iter().any(|(_, _, want)| *want > 0);
            let none_over = shape.iter().all(|(q, r, want)| *want <= q - r);
            prop_assert_eq!(plan.can_apply, any_positive && none_over);
            prop_assert_eq!(plan.errors.is_empty(), none_over);
        }

        /// Property: requesting zero everywhere never applies.
        #[test]
        fn all_zero_never_applies(shape in arb_order()) {
            let shape: Vec<_> = shape.into_iter().map(|(q, r, _)| (q, r, 0)).collect();
            let (lines, req) = build(&shape);
            let plan = plan_partial_receipt(&lines, &req).unwrap();
            prop_assert!(!plan.can_apply);
        }
    }
}
