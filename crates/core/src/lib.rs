//! `stockroom-core`: domain foundation shared by every stockroom crate.
//!
//! Pure domain primitives only: the error model and strongly-typed
//! identifiers for backend entities. No IO, no transport.

pub mod error;
pub mod id;
pub mod time;

pub use error::{DomainError, DomainResult};
pub use id::{
    InvoiceId, ItemId, PurchaseOrderId, PurchaseOrderLineId, RequirementId, RequirementLineId,
    StockId, TransactionId, UserId,
};
