use serde::{Deserialize, Serialize};

use stockroom_core::UserId;

use crate::{Capability, Role};

/// Signed-in user as returned by `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<UserId>,
    pub username: String,
    pub role: Role,
}

impl User {
    pub fn can(&self, capability: Capability) -> bool {
        capability.granted_to(self.role)
    }
}
