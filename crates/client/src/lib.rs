//! `stockroom-client`: typed access to the stockroom backend.
//!
//! [`InventoryService`] is the seam between the pure domain crates and the
//! REST backend; [`HttpInventoryService`] implements it over reqwest. The
//! [`workflow`] module sequences "fetch, evaluate, act" around it.

pub mod config;
pub mod error;
pub mod http;
pub mod service;
pub mod types;
pub mod workflow;

#[cfg(test)]
mod fake;

pub use config::ClientConfig;
pub use error::ServiceError;
pub use http::HttpInventoryService;
pub use service::InventoryService;
pub use types::{DashboardSummary, LoginResponse};
pub use workflow::ImportReport;
