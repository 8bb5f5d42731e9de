use serde::{Deserialize, Serialize};

use stockroom_auth::User;
use stockroom_inventory::Transaction;
use stockroom_purchasing::PurchaseOrder;

/// Response of `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

/// Response of `GET /transactions/dashboard`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_stock_items: i64,
    pub items_to_be_ordered: i64,
    pub active_projects: i64,
    pub total_purchase_orders: i64,
    #[serde(default)]
    pub recent_transactions: Vec<Transaction>,
    #[serde(default)]
    pub recent_purchase_orders: Vec<PurchaseOrder>,
}
