//! `stockroom-auth`: role-based access boundary for the stockroom client.
//!
//! Pure policy: maps the backend's user roles to capabilities and navigable
//! pages. Decoupled from HTTP and from token storage.

pub mod authorize;
pub mod pages;
pub mod permissions;
pub mod roles;
pub mod user;

pub use authorize::{AuthzError, authorize};
pub use pages::{Page, landing_page, navigation};
pub use permissions::Capability;
pub use roles::Role;
pub use user::User;
