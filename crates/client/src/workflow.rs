//! Fetch, evaluate, act: the multi-step operations behind each user action.
//!
//! Every workflow re-reads state from the backend before deciding, and
//! returns the backend's view after acting. Nothing is patched locally.
//! Workflows that change state take the caller's role and check it before
//! the first request.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use stockroom_auth::{Capability, Role, authorize};
use stockroom_core::{DomainError, ItemId, PurchaseOrderId, RequirementId};
use stockroom_inventory::{RowError, StockUpdate, export_stock, parse_stock_import};
use stockroom_purchasing::{
    FullReceipt, InvoiceDraft, NewPurchaseOrder, PurchaseOrder, RequestedQuantities,
    plan_partial_receipt,
};
use stockroom_requirements::{Requirement, SufficiencyReport, evaluate};

use crate::error::ServiceError;
use crate::service::InventoryService;

/// A requirement together with its availability against current stock.
#[derive(Debug, Clone, PartialEq)]
pub struct RequirementCheck {
    pub requirement: Requirement,
    pub report: SufficiencyReport,
}

/// Fetch a requirement and a fresh stock snapshot, then evaluate.
pub async fn check_requirement<S>(
    service: &S,
    id: RequirementId,
) -> Result<RequirementCheck, ServiceError>
where
    S: InventoryService + ?Sized,
{
    let requirement = service.fetch_requirement(id).await?;
    let snapshot = service.fetch_stock_snapshot().await?;
    let report = evaluate(&requirement, &snapshot)?;
    info!(
        requirement_id = %id,
        availability = report.aggregate.label(),
        lines = report.per_item.len(),
        "requirement evaluated"
    );
    Ok(RequirementCheck {
        requirement,
        report,
    })
}

/// Issue one line of a requirement, refusing locally when stock is short.
pub async fn issue_item<S>(
    service: &S,
    role: Option<Role>,
    id: RequirementId,
    item_id: ItemId,
) -> Result<Requirement, ServiceError>
where
    S: InventoryService + ?Sized,
{
    authorize(role, Capability::IssueRequirements)?;
    let check = check_requirement(service, id).await?;
    let line = check.report.line(item_id).ok_or_else(|| {
        DomainError::validation(format!("item {item_id} is not on requirement {id}"))
    })?;

    if line.outstanding_need == 0 {
        return Err(DomainError::conflict(format!(
            "item {item_id} is already fully issued on requirement {id}"
        ))
        .into());
    }
    if !line.satisfiable {
        warn!(
            requirement_id = %id,
            item_id = %item_id,
            on_hand = line.current_stock,
            needed = line.outstanding_need,
            "insufficient stock to issue"
        );
        return Err(DomainError::conflict(format!(
            "insufficient stock for item {item_id}: {} on hand, {} needed",
            line.current_stock, line.outstanding_need
        ))
        .into());
    }

    let updated = service.issue_requirement_item(id, item_id).await?;
    info!(requirement_id = %id, item_id = %item_id, quantity = line.outstanding_need, "item issued");
    Ok(updated)
}

/// Issue every outstanding line at once. Only allowed when stock covers all of them.
pub async fn issue_requirement<S>(
    service: &S,
    role: Option<Role>,
    id: RequirementId,
) -> Result<Requirement, ServiceError>
where
    S: InventoryService + ?Sized,
{
    authorize(role, Capability::IssueRequirements)?;
    let check = check_requirement(service, id).await?;
    if check.requirement.is_complete() {
        return Err(DomainError::conflict(format!("requirement {id} is already completed")).into());
    }
    if !check.report.can_issue_all() {
        let short: Vec<String> = check
            .report
            .shortfalls()
            .map(|l| format!("item {} short by {}", l.item_id, l.shortfall))
            .collect();
        warn!(requirement_id = %id, shortfalls = short.len(), "requirement cannot be issued in full");
        let reason = if short.is_empty() {
            "nothing left to issue".to_string()
        } else {
            short.join(", ")
        };
        return Err(DomainError::conflict(format!(
            "requirement {id} cannot be issued: {reason}"
        ))
        .into());
    }

    let updated = service.issue_requirement(id).await?;
    info!(requirement_id = %id, status = updated.status.as_str(), "requirement issued");
    Ok(updated)
}

/// Receive part of a purchase order.
///
/// Plans against a fresh copy of the order; a plan with flagged lines is
/// returned inside [`ServiceError::ReceiptBlocked`] and nothing is sent.
pub async fn receive_partial<S>(
    service: &S,
    role: Option<Role>,
    id: PurchaseOrderId,
    requested: &RequestedQuantities,
    invoices: Vec<InvoiceDraft>,
) -> Result<PurchaseOrder, ServiceError>
where
    S: InventoryService + ?Sized,
{
    authorize(role, Capability::ReceivePurchaseOrders)?;
    let order = service.fetch_purchase_order(id).await?;
    if !order.status.is_receivable() {
        return Err(DomainError::conflict(format!(
            "purchase order {} is {} and cannot be received",
            order.po_number, order.status
        ))
        .into());
    }

    let plan = plan_partial_receipt(&order.items, requested)?;
    if !plan.errors.is_empty() {
        warn!(
            po_number = %order.po_number,
            errors = plan.errors.len(),
            "partial receipt blocked"
        );
        return Err(ServiceError::ReceiptBlocked(Box::new(plan)));
    }

    let projected = plan.projected_status();
    let receipt = plan.into_submission(invoices)?;
    service.receive_purchase_order_partial(id, &receipt).await?;
    info!(
        po_number = %order.po_number,
        lines = receipt.items.len(),
        invoices = receipt.invoices.len(),
        expected_status = projected.as_str(),
        "partial receipt applied"
    );

    service.fetch_purchase_order(id).await
}

/// Receive everything still outstanding on a purchase order.
pub async fn receive_full<S>(
    service: &S,
    role: Option<Role>,
    id: PurchaseOrderId,
    invoices: Vec<InvoiceDraft>,
) -> Result<PurchaseOrder, ServiceError>
where
    S: InventoryService + ?Sized,
{
    authorize(role, Capability::ReceivePurchaseOrders)?;
    let order = service.fetch_purchase_order(id).await?;
    let receipt = FullReceipt::for_order(&order, invoices)?;
    service.receive_purchase_order_full(id, &receipt).await?;
    info!(po_number = %order.po_number, invoices = receipt.invoices.len(), "purchase order received");
    service.fetch_purchase_order(id).await
}

/// Outcome of a bulk stock import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub succeeded: usize,
    pub failed: usize,
    /// Parse and backend failures alike, by 1-based data row.
    pub errors: Vec<RowError>,
}

/// Create one stock item per CSV row and set its opening quantity.
///
/// Only an unusable header aborts; a failing row is recorded and the rest
/// continue.
pub async fn import_stock_csv<S>(
    service: &S,
    role: Option<Role>,
    text: &str,
) -> Result<ImportReport, ServiceError>
where
    S: InventoryService + ?Sized,
{
    authorize(role, Capability::ManageStock)?;
    let parsed = parse_stock_import(text)?;
    let mut report = ImportReport {
        failed: parsed.errors.len(),
        errors: parsed.errors,
        ..ImportReport::default()
    };

    for row in parsed.rows {
        let outcome = async {
            let created = service.create_stock_item(&row.item).await?;
            if let Some(qty) = row.current_quantity.filter(|q| *q > 0) {
                service
                    .update_stock(created.id, StockUpdate::new(qty)?)
                    .await?;
            }
            Ok::<_, ServiceError>(())
        }
        .await;

        match outcome {
            Ok(()) => report.succeeded += 1,
            Err(err) => {
                warn!(row = row.row, code = %row.item.code, error = %err, "stock import row failed");
                report.failed += 1;
                report.errors.push(RowError {
                    row: row.row,
                    message: err.to_string(),
                });
            }
        }
    }

    report.errors.sort_by_key(|e| e.row);
    info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "stock import finished"
    );
    Ok(report)
}

/// Export every catalogue item as CSV.
pub async fn export_stock_csv<S>(service: &S) -> Result<String, ServiceError>
where
    S: InventoryService + ?Sized,
{
    let items = service.list_items().await?;
    let csv = export_stock(&items)?;
    info!(items = items.len(), "stock exported");
    Ok(csv)
}

/// Raise a purchase order for the selected to-be-ordered items.
pub async fn order_shortages<S>(
    service: &S,
    role: Option<Role>,
    selected: &[ItemId],
    supplier_name: &str,
    expected_delivery_date: DateTime<Utc>,
) -> Result<PurchaseOrder, ServiceError>
where
    S: InventoryService + ?Sized,
{
    authorize(role, Capability::ManagePurchaseOrders)?;
    let rows = service.to_be_ordered().await?;
    let draft =
        NewPurchaseOrder::from_shortages(&rows, selected, supplier_name, expected_delivery_date)?;
    let order = service.create_purchase_order(&draft).await?;
    info!(
        po_number = %order.po_number,
        lines = draft.items.len(),
        total = %draft.total_amount(),
        "purchase order raised for shortages"
    );
    Ok(order)
}
