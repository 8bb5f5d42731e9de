//! Supplier invoices attached to purchase orders.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, InvoiceId, PurchaseOrderId};

/// Invoice as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub purchase_order_id: PurchaseOrderId,
    pub invoice_number: String,
    #[serde(deserialize_with = "stockroom_core::time::deserialize")]
    pub invoice_date: DateTime<Utc>,
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "stockroom_core::time::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Invoice entered alongside a receipt (or added to an order afterwards).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub invoice_number: String,
    pub invoice_date: DateTime<Utc>,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl InvoiceDraft {
    pub fn new(invoice_number: impl Into<String>, invoice_date: DateTime<Utc>, amount: Decimal) -> Self {
        Self {
            invoice_number: invoice_number.into(),
            invoice_date,
            amount,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_blank(&self) -> bool {
        self.invoice_number.trim().is_empty()
    }
}

/// Drop invoices with a blank number and normalize the rest for submission.
///
/// Invoice numbers are trimmed and must be unique within one submission;
/// amounts must not be negative. Blank descriptions become `None`.
pub fn filter_invoices(drafts: Vec<InvoiceDraft>) -> DomainResult<Vec<InvoiceDraft>> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(drafts.len());

    for mut draft in drafts.into_iter().filter(|d| !d.is_blank()) {
        draft.invoice_number = draft.invoice_number.trim().to_string();
        draft.description = draft
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        if draft.amount < Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "invoice {}: amount cannot be negative",
                draft.invoice_number
            )));
        }
        if !seen.insert(draft.invoice_number.clone()) {
            return Err(DomainError::validation(format!(
                "invoice number {} appears more than once",
                draft.invoice_number
            )));
        }
        kept.push(draft);
    }

    Ok(kept)
}

/// Sum of invoice amounts.
pub fn invoice_total(invoices: &[InvoiceDraft]) -> Decimal {
    invoices.iter().map(|i| i.amount).sum()
}
