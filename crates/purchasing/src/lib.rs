//! Purchasing domain module (purchase orders, invoices, receipts).
//!
//! Business rules for purchase orders implemented as deterministic domain
//! logic (no IO, no HTTP, no storage). The backend owns persistence and
//! status transitions; this crate validates and plans what gets sent.

pub mod draft;
pub mod invoice;
pub mod order;
pub mod receipt;
pub mod shortage;

pub use draft::{NewPurchaseOrder, NewPurchaseOrderLine};
pub use invoice::{Invoice, InvoiceDraft, filter_invoices, invoice_total};
pub use order::{PurchaseOrder, PurchaseOrderLineItem, PurchaseOrderStatus};
pub use receipt::{
    FullReceipt, LineError, PartialReceipt, PlannedLine, ProposedQuantity, ReceiptItem,
    ReceiptPlan, RequestedQuantities, plan_partial_receipt,
};
pub use shortage::ToBeOrderedItem;
