use serde::{Deserialize, Serialize};

use crate::Role;

/// Action a user may be allowed to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ViewDashboard,
    ViewStock,
    /// Create items, set stock levels, import CSV.
    ManageStock,
    ViewRequirements,
    CreateRequirements,
    IssueRequirements,
    ViewPurchaseOrders,
    /// Create orders and manage their invoices.
    ManagePurchaseOrders,
    ReceivePurchaseOrders,
    ViewToBeOrdered,
    ViewTransactions,
}

impl Capability {
    pub const ALL: [Capability; 11] = [
        Capability::ViewDashboard,
        Capability::ViewStock,
        Capability::ManageStock,
        Capability::ViewRequirements,
        Capability::CreateRequirements,
        Capability::IssueRequirements,
        Capability::ViewPurchaseOrders,
        Capability::ManagePurchaseOrders,
        Capability::ReceivePurchaseOrders,
        Capability::ViewToBeOrdered,
        Capability::ViewTransactions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ViewDashboard => "dashboard.view",
            Capability::ViewStock => "stock.view",
            Capability::ManageStock => "stock.manage",
            Capability::ViewRequirements => "requirements.view",
            Capability::CreateRequirements => "requirements.create",
            Capability::IssueRequirements => "requirements.issue",
            Capability::ViewPurchaseOrders => "purchase_orders.view",
            Capability::ManagePurchaseOrders => "purchase_orders.manage",
            Capability::ReceivePurchaseOrders => "purchase_orders.receive",
            Capability::ViewToBeOrdered => "to_be_ordered.view",
            Capability::ViewTransactions => "transactions.view",
        }
    }

    /// Whether `role` holds this capability.
    pub fn granted_to(&self, role: Role) -> bool {
        match role {
            Role::Admin => true,
            Role::Employee => matches!(
                self,
                Capability::ViewStock
                    | Capability::ManageStock
                    | Capability::ViewRequirements
                    | Capability::CreateRequirements
                    | Capability::IssueRequirements
            ),
        }
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
