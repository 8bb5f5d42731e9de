use serde::{Deserialize, Serialize};

use crate::{Capability, Role};

/// Top-level navigation destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Dashboard,
    Requirements,
    Stock,
    PurchaseOrders,
    ToBeOrdered,
    Transactions,
}

impl Page {
    /// Navigation order.
    pub const ALL: [Page; 6] = [
        Page::Dashboard,
        Page::Requirements,
        Page::Stock,
        Page::PurchaseOrders,
        Page::ToBeOrdered,
        Page::Transactions,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Page::Dashboard => "/",
            Page::Requirements => "/requirements",
            Page::Stock => "/stock",
            Page::PurchaseOrders => "/purchase-orders",
            Page::ToBeOrdered => "/to-be-ordered",
            Page::Transactions => "/transactions",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Requirements => "Requirements",
            Page::Stock => "Stock",
            Page::PurchaseOrders => "Purchase Orders",
            Page::ToBeOrdered => "To Be Ordered",
            Page::Transactions => "Transactions",
        }
    }

    /// Capability needed to open the page.
    pub fn required_capability(&self) -> Capability {
        match self {
            Page::Dashboard => Capability::ViewDashboard,
            Page::Requirements => Capability::ViewRequirements,
            Page::Stock => Capability::ViewStock,
            Page::PurchaseOrders => Capability::ViewPurchaseOrders,
            Page::ToBeOrdered => Capability::ViewToBeOrdered,
            Page::Transactions => Capability::ViewTransactions,
        }
    }

    pub fn visible_to(&self, role: Role) -> bool {
        self.required_capability().granted_to(role)
    }
}

/// Pages shown in the navigation for `role`, in order.
pub fn navigation(role: Role) -> Vec<Page> {
    Page::ALL.into_iter().filter(|p| p.visible_to(role)).collect()
}

/// Where a user lands after signing in.
pub fn landing_page(role: Role) -> Page {
    match role {
        Role::Admin => Page::Dashboard,
        Role::Employee => Page::Requirements,
    }
}
