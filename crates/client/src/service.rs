use stockroom_core::{InvoiceId, ItemId, PurchaseOrderId, RequirementId};
use stockroom_inventory::{Item, NewStockItem, StockLevel, StockSnapshot, StockUpdate, Transaction};
use stockroom_purchasing::{
    FullReceipt, Invoice, InvoiceDraft, NewPurchaseOrder, PartialReceipt, PurchaseOrder,
    ToBeOrderedItem,
};
use stockroom_requirements::{NewRequirement, Requirement};

use crate::error::ServiceError;
use crate::types::{DashboardSummary, LoginResponse};

/// Operations offered by the stockroom backend.
///
/// The backend owns persistence and every state transition; callers re-fetch
/// after a successful mutation instead of patching local copies.
#[async_trait::async_trait]
pub trait InventoryService: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ServiceError>;

    // Stock
    async fn list_items(&self) -> Result<Vec<Item>, ServiceError>;
    async fn create_stock_item(&self, item: &NewStockItem) -> Result<Item, ServiceError>;
    async fn list_stock(&self) -> Result<Vec<StockLevel>, ServiceError>;
    async fn update_stock(
        &self,
        item_id: ItemId,
        update: StockUpdate,
    ) -> Result<StockLevel, ServiceError>;

    /// Current on-hand quantities, rebuilt from a full stock listing.
    async fn fetch_stock_snapshot(&self) -> Result<StockSnapshot, ServiceError> {
        let levels = self.list_stock().await?;
        Ok(StockSnapshot::from_stock_levels(&levels)?)
    }

    // Requirements
    async fn list_requirements(&self) -> Result<Vec<Requirement>, ServiceError>;
    async fn fetch_requirement(&self, id: RequirementId) -> Result<Requirement, ServiceError>;
    async fn create_requirement(
        &self,
        requirement: &NewRequirement,
    ) -> Result<Requirement, ServiceError>;
    /// Issue every outstanding line of a requirement.
    async fn issue_requirement(&self, id: RequirementId) -> Result<Requirement, ServiceError>;
    async fn issue_requirement_item(
        &self,
        id: RequirementId,
        item_id: ItemId,
    ) -> Result<Requirement, ServiceError>;

    // Purchase orders
    async fn list_purchase_orders(&self) -> Result<Vec<PurchaseOrder>, ServiceError>;
    async fn fetch_purchase_order(&self, id: PurchaseOrderId)
    -> Result<PurchaseOrder, ServiceError>;
    async fn create_purchase_order(
        &self,
        order: &NewPurchaseOrder,
    ) -> Result<PurchaseOrder, ServiceError>;
    async fn receive_purchase_order_full(
        &self,
        id: PurchaseOrderId,
        receipt: &FullReceipt,
    ) -> Result<PurchaseOrder, ServiceError>;
    async fn receive_purchase_order_partial(
        &self,
        id: PurchaseOrderId,
        receipt: &PartialReceipt,
    ) -> Result<PurchaseOrder, ServiceError>;

    // Invoices
    async fn list_invoices(&self, po_id: PurchaseOrderId) -> Result<Vec<Invoice>, ServiceError>;
    async fn add_invoice(
        &self,
        po_id: PurchaseOrderId,
        invoice: &InvoiceDraft,
    ) -> Result<Invoice, ServiceError>;
    async fn update_invoice(
        &self,
        id: InvoiceId,
        invoice: &InvoiceDraft,
    ) -> Result<Invoice, ServiceError>;
    async fn delete_invoice(&self, id: InvoiceId) -> Result<(), ServiceError>;

    // Reporting
    async fn list_transactions(&self) -> Result<Vec<Transaction>, ServiceError>;
    async fn dashboard(&self) -> Result<DashboardSummary, ServiceError>;
    async fn to_be_ordered(&self) -> Result<Vec<ToBeOrderedItem>, ServiceError>;
}
