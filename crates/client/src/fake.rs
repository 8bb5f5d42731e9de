//! In-memory [`InventoryService`] for workflow tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::Utc;

use stockroom_auth::{Role, User};
use stockroom_core::{
    InvoiceId, ItemId, PurchaseOrderId, RequirementId, StockId, TransactionId, UserId,
};
use stockroom_inventory::{
    Item, NewStockItem, StockLevel, StockRecord, StockUpdate, Transaction, TransactionAction,
};
use stockroom_purchasing::{
    FullReceipt, Invoice, InvoiceDraft, NewPurchaseOrder, PartialReceipt, PurchaseOrder,
    PurchaseOrderLineItem, PurchaseOrderStatus, ToBeOrderedItem,
};
use stockroom_requirements::{NewRequirement, Requirement, RequirementLineItem, RequirementStatus};

use crate::error::ServiceError;
use crate::service::InventoryService;
use crate::types::{DashboardSummary, LoginResponse};

#[derive(Default)]
struct State {
    items: BTreeMap<ItemId, Item>,
    requirements: BTreeMap<RequirementId, Requirement>,
    orders: BTreeMap<PurchaseOrderId, PurchaseOrder>,
    transactions: Vec<Transaction>,
    shortages: Vec<ToBeOrderedItem>,
    /// Mutating calls, in order.
    calls: Vec<String>,
    /// Item codes whose creation the backend refuses.
    rejected_codes: Vec<String>,
}

#[derive(Default)]
pub struct FakeService {
    state: Mutex<State>,
}

pub fn item(id: i64, name: &str, on_hand: Option<i64>) -> Item {
    Item {
        id: ItemId::new(id),
        name: name.to_string(),
        code: format!("CODE-{id}"),
        description: None,
        make: None,
        model_number: None,
        unit_price: rust_decimal::Decimal::from(10 * id),
        minimum_stock: 0,
        created_at: None,
        stock: on_hand.map(|q| StockRecord {
            id: StockId::new(id),
            item_id: ItemId::new(id),
            current_quantity: q,
            last_updated: None,
        }),
    }
}

impl FakeService {
    pub fn with_items(items: Vec<Item>) -> Self {
        let fake = Self::default();
        {
            let mut state = fake.state.lock().unwrap();
            for item in items {
                state.items.insert(item.id, item);
            }
        }
        fake
    }

    pub fn add_requirement(&self, id: i64, lines: Vec<RequirementLineItem>) {
        let requirement = Requirement {
            id: RequirementId::new(id),
            project_name: format!("Project {id}"),
            description: None,
            status: RequirementStatus::Active,
            created_at: None,
            completed_at: None,
            items: lines,
        };
        let mut state = self.state.lock().unwrap();
        state.requirements.insert(requirement.id, requirement);
    }

    pub fn add_order(&self, id: i64, lines: Vec<PurchaseOrderLineItem>) {
        let order = PurchaseOrder {
            id: PurchaseOrderId::new(id),
            po_number: format!("PO-{id:06}"),
            supplier_name: "Volt Traders".to_string(),
            expected_delivery_date: None,
            status: PurchaseOrderStatus::derive(&lines),
            total_amount: lines.iter().map(PurchaseOrderLineItem::line_total).sum(),
            created_at: None,
            received_at: None,
            items: lines,
            invoices: Vec::new(),
        };
        let mut state = self.state.lock().unwrap();
        state.orders.insert(order.id, order);
    }

    pub fn add_shortage(&self, row: ToBeOrderedItem) {
        self.state.lock().unwrap().shortages.push(row);
    }

    pub fn reject_code(&self, code: &str) {
        self.state.lock().unwrap().rejected_codes.push(code.to_string());
    }

    pub fn on_hand(&self, id: i64) -> i64 {
        let state = self.state.lock().unwrap();
        state.items.get(&ItemId::new(id)).map_or(0, Item::on_hand)
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn order(&self, id: i64) -> PurchaseOrder {
        self.state.lock().unwrap().orders[&PurchaseOrderId::new(id)].clone()
    }

    pub fn items(&self) -> Vec<Item> {
        self.state.lock().unwrap().items.values().cloned().collect()
    }
}

impl State {
    fn adjust_stock(&mut self, item_id: ItemId, delta: i64) {
        if let Some(item) = self.items.get_mut(&item_id) {
            let record = item.stock.get_or_insert(StockRecord {
                id: StockId::new(item_id.get()),
                item_id,
                current_quantity: 0,
                last_updated: None,
            });
            record.current_quantity += delta;
        }
    }

    fn record(&mut self, item_id: ItemId, quantity: i64, action: TransactionAction) {
        let id = TransactionId::new(self.transactions.len() as i64 + 1);
        self.transactions.push(Transaction {
            id,
            item_id,
            quantity,
            action,
            purchase_order_id: None,
            requirement_id: None,
            created_at: Some(Utc::now()),
            item: None,
        });
    }

    fn requirement(&self, id: RequirementId) -> Result<Requirement, ServiceError> {
        self.requirements
            .get(&id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound("Requirement not found".to_string()))
    }

    fn order(&self, id: PurchaseOrderId) -> Result<PurchaseOrder, ServiceError> {
        self.orders
            .get(&id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound("Purchase order not found".to_string()))
    }

    fn refresh_requirement(&mut self, id: RequirementId) {
        if let Some(req) = self.requirements.get_mut(&id) {
            req.status = req.derived_status();
        }
    }
}

#[async_trait::async_trait]
impl InventoryService for FakeService {
    async fn login(&self, username: &str, _password: &str) -> Result<LoginResponse, ServiceError> {
        Ok(LoginResponse {
            access_token: format!("token-{username}"),
            token_type: "bearer".to_string(),
            user: User {
                id: Some(UserId::new(1)),
                username: username.to_string(),
                role: Role::Admin,
            },
        })
    }

    async fn list_items(&self) -> Result<Vec<Item>, ServiceError> {
        Ok(self.items())
    }

    async fn create_stock_item(&self, new: &NewStockItem) -> Result<Item, ServiceError> {
        let mut state = self.state.lock().unwrap();
        if state.rejected_codes.contains(&new.code)
            || state.items.values().any(|i| i.code == new.code)
        {
            return Err(ServiceError::Api {
                status: 400,
                detail: "Item code already registered".to_string(),
            });
        }
        let id = ItemId::new(state.items.len() as i64 + 1);
        let item = Item {
            id,
            name: new.name.clone(),
            code: new.code.clone(),
            description: new.description.clone(),
            make: None,
            model_number: None,
            unit_price: new.unit_price,
            minimum_stock: new.minimum_stock,
            created_at: Some(Utc::now()),
            stock: Some(StockRecord {
                id: StockId::new(id.get()),
                item_id: id,
                current_quantity: 0,
                last_updated: None,
            }),
        };
        state.calls.push(format!("create_stock_item {}", new.code));
        state.items.insert(id, item.clone());
        Ok(item)
    }

    async fn list_stock(&self) -> Result<Vec<StockLevel>, ServiceError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .items
            .values()
            .filter_map(|item| {
                item.stock.as_ref().map(|s| StockLevel {
                    id: s.id,
                    item_id: s.item_id,
                    current_quantity: s.current_quantity,
                    last_updated: s.last_updated,
                    item: item.clone(),
                })
            })
            .collect())
    }

    async fn update_stock(
        &self,
        item_id: ItemId,
        update: StockUpdate,
    ) -> Result<StockLevel, ServiceError> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(format!("update_stock {item_id} {}", update.current_quantity));
        let current = state.items.get(&item_id).map_or(0, Item::on_hand);
        state.adjust_stock(item_id, update.current_quantity - current);
        let item = state
            .items
            .get(&item_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound("Stock not found".to_string()))?;
        Ok(StockLevel {
            id: StockId::new(item_id.get()),
            item_id,
            current_quantity: update.current_quantity,
            last_updated: None,
            item,
        })
    }

    async fn list_requirements(&self) -> Result<Vec<Requirement>, ServiceError> {
        Ok(self.state.lock().unwrap().requirements.values().cloned().collect())
    }

    async fn fetch_requirement(&self, id: RequirementId) -> Result<Requirement, ServiceError> {
        self.state.lock().unwrap().requirement(id)
    }

    async fn create_requirement(
        &self,
        new: &NewRequirement,
    ) -> Result<Requirement, ServiceError> {
        let id = {
            let state = self.state.lock().unwrap();
            state.requirements.len() as i64 + 1
        };
        self.add_requirement(
            id,
            new.items
                .iter()
                .map(|l| RequirementLineItem::new(l.item_id, l.quantity_needed, 0))
                .collect(),
        );
        self.state.lock().unwrap().requirement(RequirementId::new(id))
    }

    async fn issue_requirement(&self, id: RequirementId) -> Result<Requirement, ServiceError> {
        let mut state = self.state.lock().unwrap();
        let requirement = state.requirement(id)?;
        state.calls.push(format!("issue_requirement {id}"));
        for line in &requirement.items {
            let qty = line.outstanding();
            if qty > 0 {
                state.adjust_stock(line.item_id, -qty);
                state.record(line.item_id, qty, TransactionAction::Issue);
            }
        }
        if let Some(req) = state.requirements.get_mut(&id) {
            for line in &mut req.items {
                line.quantity_issued = line.quantity_needed;
            }
        }
        state.refresh_requirement(id);
        state.requirement(id)
    }

    async fn issue_requirement_item(
        &self,
        id: RequirementId,
        item_id: ItemId,
    ) -> Result<Requirement, ServiceError> {
        let mut state = self.state.lock().unwrap();
        let requirement = state.requirement(id)?;
        let qty = requirement.line(item_id).map_or(0, RequirementLineItem::outstanding);
        state.calls.push(format!("issue_requirement_item {id} {item_id}"));
        state.adjust_stock(item_id, -qty);
        state.record(item_id, qty, TransactionAction::Issue);
        if let Some(line) = state
            .requirements
            .get_mut(&id)
            .and_then(|r| r.items.iter_mut().find(|l| l.item_id == item_id))
        {
            line.quantity_issued = line.quantity_needed;
        }
        state.refresh_requirement(id);
        state.requirement(id)
    }

    async fn list_purchase_orders(&self) -> Result<Vec<PurchaseOrder>, ServiceError> {
        Ok(self.state.lock().unwrap().orders.values().cloned().collect())
    }

    async fn fetch_purchase_order(
        &self,
        id: PurchaseOrderId,
    ) -> Result<PurchaseOrder, ServiceError> {
        self.state.lock().unwrap().order(id)
    }

    async fn create_purchase_order(
        &self,
        new: &NewPurchaseOrder,
    ) -> Result<PurchaseOrder, ServiceError> {
        let id = {
            let mut state = self.state.lock().unwrap();
            state
                .calls
                .push(format!("create_purchase_order {}", new.supplier_name));
            state.orders.len() as i64 + 1
        };
        self.add_order(
            id,
            new.items
                .iter()
                .map(|l| PurchaseOrderLineItem::new(l.item_id, l.quantity, 0, l.unit_price))
                .collect(),
        );
        self.state.lock().unwrap().order(PurchaseOrderId::new(id))
    }

    async fn receive_purchase_order_full(
        &self,
        id: PurchaseOrderId,
        receipt: &FullReceipt,
    ) -> Result<PurchaseOrder, ServiceError> {
        let mut state = self.state.lock().unwrap();
        let order = state.order(id)?;
        state.calls.push(format!(
            "receive_full {id} invoices={}",
            receipt.invoices.len()
        ));
        for line in &order.items {
            let qty = line.remaining();
            state.adjust_stock(line.item_id, qty);
            state.record(line.item_id, qty, TransactionAction::Purchase);
        }
        if let Some(po) = state.orders.get_mut(&id) {
            for line in &mut po.items {
                line.received_quantity = line.quantity;
            }
            po.status = PurchaseOrderStatus::Received;
            po.received_at = Some(Utc::now());
        }
        state.order(id)
    }

    async fn receive_purchase_order_partial(
        &self,
        id: PurchaseOrderId,
        receipt: &PartialReceipt,
    ) -> Result<PurchaseOrder, ServiceError> {
        let mut state = self.state.lock().unwrap();
        state.order(id)?;
        let summary: Vec<String> = receipt
            .items
            .iter()
            .map(|r| format!("{}={}", r.item_id, r.quantity))
            .collect();
        state.calls.push(format!(
            "receive_partial {id} [{}] invoices={}",
            summary.join(","),
            receipt.invoices.len()
        ));
        for r in &receipt.items {
            state.adjust_stock(r.item_id, r.quantity);
            state.record(r.item_id, r.quantity, TransactionAction::Purchase);
        }
        if let Some(po) = state.orders.get_mut(&id) {
            for r in &receipt.items {
                if let Some(line) = po.items.iter_mut().find(|l| l.item_id == r.item_id) {
                    line.received_quantity += r.quantity;
                }
            }
            po.status = po.derived_status();
        }
        state.order(id)
    }

    async fn list_invoices(&self, po_id: PurchaseOrderId) -> Result<Vec<Invoice>, ServiceError> {
        Ok(self.state.lock().unwrap().order(po_id)?.invoices)
    }

    async fn add_invoice(
        &self,
        po_id: PurchaseOrderId,
        draft: &InvoiceDraft,
    ) -> Result<Invoice, ServiceError> {
        let mut state = self.state.lock().unwrap();
        let po = state
            .orders
            .get_mut(&po_id)
            .ok_or_else(|| ServiceError::NotFound("Purchase order not found".to_string()))?;
        let invoice = Invoice {
            id: InvoiceId::new(po.invoices.len() as i64 + 1),
            purchase_order_id: po_id,
            invoice_number: draft.invoice_number.clone(),
            invoice_date: draft.invoice_date,
            amount: draft.amount,
            description: draft.description.clone(),
            created_at: Some(Utc::now()),
        };
        po.invoices.push(invoice.clone());
        Ok(invoice)
    }

    async fn update_invoice(
        &self,
        id: InvoiceId,
        _draft: &InvoiceDraft,
    ) -> Result<Invoice, ServiceError> {
        Err(ServiceError::NotFound(format!("invoice {id}")))
    }

    async fn delete_invoice(&self, id: InvoiceId) -> Result<(), ServiceError> {
        Err(ServiceError::NotFound(format!("invoice {id}")))
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>, ServiceError> {
        Ok(self.state.lock().unwrap().transactions.clone())
    }

    async fn dashboard(&self) -> Result<DashboardSummary, ServiceError> {
        let state = self.state.lock().unwrap();
        Ok(DashboardSummary {
            total_stock_items: state.items.len() as i64,
            items_to_be_ordered: state.shortages.len() as i64,
            active_projects: state
                .requirements
                .values()
                .filter(|r| !r.is_complete())
                .count() as i64,
            total_purchase_orders: state.orders.len() as i64,
            recent_transactions: state.transactions.clone(),
            recent_purchase_orders: state.orders.values().cloned().collect(),
        })
    }

    async fn to_be_ordered(&self) -> Result<Vec<ToBeOrderedItem>, ServiceError> {
        Ok(self.state.lock().unwrap().shortages.clone())
    }
}
