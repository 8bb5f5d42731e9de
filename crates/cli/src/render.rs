//! Plain-text rendering of command results.

use stockroom_client::ImportReport;
use stockroom_client::workflow::RequirementCheck;
use stockroom_inventory::{Item, StockLevel};
use stockroom_purchasing::{PurchaseOrder, ReceiptPlan, ToBeOrderedItem};

pub fn stock_levels(levels: &[StockLevel]) -> String {
    let mut out = format!(
        "{:<6} {:<28} {:<16} {:>8} {:>8}  {}\n",
        "ID", "NAME", "CODE", "ON HAND", "MIN", "STATUS"
    );
    for level in levels {
        out.push_str(&format!(
            "{:<6} {:<28} {:<16} {:>8} {:>8}  {}\n",
            level.item_id,
            level.item.name,
            level.item.code,
            level.current_quantity,
            level.item.minimum_stock,
            level.status()
        ));
    }
    out
}

pub fn items(items: &[Item]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&format!(
            "{:<6} {:<28} {:<16} {:>8}  {}\n",
            item.id,
            item.name,
            item.code,
            item.on_hand(),
            item.status()
        ));
    }
    out
}

pub fn requirement_check(check: &RequirementCheck) -> String {
    let req = &check.requirement;
    let mut out = format!(
        "Requirement {} ({}): {} [{}]\n",
        req.id,
        req.status.as_str(),
        req.project_name,
        check.report.aggregate.label()
    );
    for line in &check.report.per_item {
        let name = req
            .line(line.item_id)
            .and_then(|l| l.item.as_ref())
            .map_or_else(|| format!("item {}", line.item_id), |i| i.name.clone());
        let verdict = if line.outstanding_need == 0 {
            "issued".to_string()
        } else if line.satisfiable {
            "available".to_string()
        } else {
            format!("short by {}", line.shortfall)
        };
        out.push_str(&format!(
            "  {:<28} need {:>6}  stock {:>6}  {}\n",
            name, line.outstanding_need, line.current_stock, verdict
        ));
    }
    out
}

pub fn purchase_order(po: &PurchaseOrder) -> String {
    let mut out = format!(
        "{} from {} [{}] total {}\n",
        po.po_number, po.supplier_name, po.status, po.total_amount
    );
    for line in &po.items {
        out.push_str(&format!(
            "  item {:<6} ordered {:>6}  received {:>6}  remaining {:>6}\n",
            line.item_id,
            line.quantity,
            line.received_quantity,
            line.remaining()
        ));
    }
    for invoice in &po.invoices {
        out.push_str(&format!(
            "  invoice {} {} {}\n",
            invoice.invoice_number,
            invoice.invoice_date.format("%Y-%m-%d"),
            invoice.amount
        ));
    }
    out
}

pub fn receipt_plan(plan: &ReceiptPlan) -> String {
    let mut out = String::from("Receipt not applied:\n");
    for line in &plan.lines {
        let note = line.proposed.error.as_deref().unwrap_or("ok");
        out.push_str(&format!(
            "  item {:<6} remaining {:>6}  requested {:>6}  {}\n",
            line.item_id, line.remaining, line.requested, note
        ));
    }
    out
}

pub fn import_report(report: &ImportReport) -> String {
    let mut out = format!(
        "Imported {} item(s), {} failed\n",
        report.succeeded, report.failed
    );
    for err in &report.errors {
        out.push_str(&format!("  {err}\n"));
    }
    out
}

pub fn shortages(rows: &[ToBeOrderedItem]) -> String {
    let mut out = format!(
        "{:<6} {:<28} {:>9} {:>8} {:>9}\n",
        "ID", "NAME", "REQUIRED", "STOCK", "SHORTAGE"
    );
    for row in rows {
        out.push_str(&format!(
            "{:<6} {:<28} {:>9} {:>8} {:>9}\n",
            row.item.id, row.item.name, row.total_required, row.current_stock, row.shortage
        ));
    }
    out
}
