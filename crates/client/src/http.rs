//! reqwest-backed [`InventoryService`].

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use stockroom_core::{InvoiceId, ItemId, PurchaseOrderId, RequirementId};
use stockroom_inventory::{Item, NewStockItem, StockLevel, StockUpdate, Transaction};
use stockroom_purchasing::{
    FullReceipt, Invoice, InvoiceDraft, NewPurchaseOrder, PartialReceipt, PurchaseOrder,
    ToBeOrderedItem,
};
use stockroom_requirements::{NewRequirement, Requirement};

use crate::config::ClientConfig;
use crate::error::ServiceError;
use crate::service::InventoryService;
use crate::types::{DashboardSummary, LoginResponse};

#[derive(Clone)]
pub struct HttpInventoryService {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpInventoryService {
    pub fn new(config: ClientConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("stockroom/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Attach a bearer token to every subsequent request.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.config.token = Some(token.into());
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.endpoint(path);
        debug!(%method, %url, "backend request");
        let req = self.client.request(method, url);
        match &self.config.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ServiceError> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(rejection(resp).await);
        }
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ServiceError::Decode(e.to_string()))
    }

    async fn send_discarding(&self, req: RequestBuilder) -> Result<(), ServiceError> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(rejection(resp).await);
        }
        Ok(())
    }
}

/// Error for a non-success response. A body that cannot be read is reported
/// as the transport failure it is.
async fn rejection(resp: reqwest::Response) -> ServiceError {
    let status = resp.status().as_u16();
    match resp.text().await {
        Ok(body) => {
            debug!(status, "backend rejected request");
            ServiceError::from_response(status, &body)
        }
        Err(err) => {
            debug!(status, error = %err, "failed to read error body");
            err.into()
        }
    }
}

#[async_trait::async_trait]
impl InventoryService for HttpInventoryService {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ServiceError> {
        let req = self
            .request(Method::POST, "/login")
            .form(&[("username", username), ("password", password)]);
        self.send(req).await
    }

    async fn list_items(&self) -> Result<Vec<Item>, ServiceError> {
        self.send(self.request(Method::GET, "/stock/items")).await
    }

    async fn create_stock_item(&self, item: &NewStockItem) -> Result<Item, ServiceError> {
        item.validate()?;
        self.send(self.request(Method::POST, "/stock/items").json(item))
            .await
    }

    async fn list_stock(&self) -> Result<Vec<StockLevel>, ServiceError> {
        self.send(self.request(Method::GET, "/stock/")).await
    }

    async fn update_stock(
        &self,
        item_id: ItemId,
        update: StockUpdate,
    ) -> Result<StockLevel, ServiceError> {
        self.send(
            self.request(Method::PATCH, &format!("/stock/{item_id}"))
                .json(&update),
        )
        .await
    }

    async fn list_requirements(&self) -> Result<Vec<Requirement>, ServiceError> {
        self.send(self.request(Method::GET, "/requirements/")).await
    }

    async fn fetch_requirement(&self, id: RequirementId) -> Result<Requirement, ServiceError> {
        self.send(self.request(Method::GET, &format!("/requirements/{id}")))
            .await
    }

    async fn create_requirement(
        &self,
        requirement: &NewRequirement,
    ) -> Result<Requirement, ServiceError> {
        requirement.validate()?;
        self.send(self.request(Method::POST, "/requirements/").json(requirement))
            .await
    }

    async fn issue_requirement(&self, id: RequirementId) -> Result<Requirement, ServiceError> {
        self.send(self.request(Method::PATCH, &format!("/requirements/{id}/issue")))
            .await
    }

    async fn issue_requirement_item(
        &self,
        id: RequirementId,
        item_id: ItemId,
    ) -> Result<Requirement, ServiceError> {
        self.send(self.request(
            Method::PATCH,
            &format!("/requirements/{id}/items/{item_id}/issue"),
        ))
        .await
    }

    async fn list_purchase_orders(&self) -> Result<Vec<PurchaseOrder>, ServiceError> {
        self.send(self.request(Method::GET, "/purchase-orders/")).await
    }

    async fn fetch_purchase_order(
        &self,
        id: PurchaseOrderId,
    ) -> Result<PurchaseOrder, ServiceError> {
        self.send(self.request(Method::GET, &format!("/purchase-orders/{id}")))
            .await
    }

    async fn create_purchase_order(
        &self,
        order: &NewPurchaseOrder,
    ) -> Result<PurchaseOrder, ServiceError> {
        order.validate()?;
        self.send(self.request(Method::POST, "/purchase-orders/").json(order))
            .await
    }

    async fn receive_purchase_order_full(
        &self,
        id: PurchaseOrderId,
        receipt: &FullReceipt,
    ) -> Result<PurchaseOrder, ServiceError> {
        self.send(
            self.request(Method::PATCH, &format!("/purchase-orders/{id}/receive"))
                .json(receipt),
        )
        .await
    }

    async fn receive_purchase_order_partial(
        &self,
        id: PurchaseOrderId,
        receipt: &PartialReceipt,
    ) -> Result<PurchaseOrder, ServiceError> {
        self.send(
            self.request(
                Method::PATCH,
                &format!("/purchase-orders/{id}/receive-partial"),
            )
            .json(receipt),
        )
        .await
    }

    async fn list_invoices(&self, po_id: PurchaseOrderId) -> Result<Vec<Invoice>, ServiceError> {
        self.send(self.request(Method::GET, &format!("/purchase-orders/{po_id}/invoices")))
            .await
    }

    async fn add_invoice(
        &self,
        po_id: PurchaseOrderId,
        invoice: &InvoiceDraft,
    ) -> Result<Invoice, ServiceError> {
        self.send(
            self.request(Method::POST, &format!("/purchase-orders/{po_id}/invoices"))
                .json(invoice),
        )
        .await
    }

    async fn update_invoice(
        &self,
        id: InvoiceId,
        invoice: &InvoiceDraft,
    ) -> Result<Invoice, ServiceError> {
        self.send(
            self.request(Method::PUT, &format!("/purchase-orders/invoices/{id}"))
                .json(invoice),
        )
        .await
    }

    async fn delete_invoice(&self, id: InvoiceId) -> Result<(), ServiceError> {
        self.send_discarding(
            self.request(Method::DELETE, &format!("/purchase-orders/invoices/{id}")),
        )
        .await
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>, ServiceError> {
        self.send(self.request(Method::GET, "/transactions/")).await
    }

    async fn dashboard(&self) -> Result<DashboardSummary, ServiceError> {
        self.send(self.request(Method::GET, "/transactions/dashboard"))
            .await
    }

    async fn to_be_ordered(&self) -> Result<Vec<ToBeOrderedItem>, ServiceError> {
        self.send(self.request(Method::GET, "/transactions/to-be-ordered"))
            .await
    }
}
