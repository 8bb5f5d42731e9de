//! Inventory domain module (catalogue items and stock levels).
//!
//! Pure data contracts and classification rules over snapshots fetched from
//! the backend (no IO, no HTTP, no storage).

pub mod csv;
pub mod item;
pub mod snapshot;
pub mod transaction;

pub use crate::csv::{CsvError, ParsedRow, RowError, StockImport, export_stock, parse_stock_import};
pub use item::{Item, NewStockItem, StockLevel, StockRecord, StockStatus, StockUpdate, matches_query};
pub use snapshot::StockSnapshot;
pub use transaction::{Transaction, TransactionAction};
