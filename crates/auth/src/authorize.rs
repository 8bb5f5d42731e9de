use thiserror::Error;

use crate::{Capability, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not signed in")]
    Unauthenticated,

    #[error("forbidden: role '{role}' lacks '{capability}'")]
    Forbidden { role: Role, capability: Capability },
}

/// Check that `role` may perform `required`.
///
/// `None` means no session; every capability then fails with
/// [`AuthzError::Unauthenticated`].
pub fn authorize(role: Option<Role>, required: Capability) -> Result<(), AuthzError> {
    let role = role.ok_or(AuthzError::Unauthenticated)?;
    if required.granted_to(role) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            role,
            capability: required,
        })
    }
}
