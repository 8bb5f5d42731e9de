//! Bulk stock import/export as comma-separated text.
//!
//! Columns: `name`, `code` (required) and `description`, `unit_price`,
//! `minimum_stock`, `current_quantity` (optional). Headers are matched
//! case-insensitively and may appear in any order.

use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::item::{Item, NewStockItem};

pub const EXPORT_HEADER: [&str; 6] = [
    "name",
    "code",
    "description",
    "unit_price",
    "minimum_stock",
    "current_quantity",
];

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv output is not valid UTF-8")]
    Encoding,
}

/// One successfully parsed data row.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    /// 1-based data row number (the header is not counted).
    pub row: usize,
    pub item: NewStockItem,
    pub current_quantity: Option<i64>,
}

/// A data row that could not be turned into a stock item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

impl core::fmt::Display for RowError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "row {}: {}", self.row, self.message)
    }
}

/// Parsed import: good rows and per-row failures, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockImport {
    pub rows: Vec<ParsedRow>,
    pub errors: Vec<RowError>,
}

struct Columns {
    name: usize,
    code: usize,
    description: Option<usize>,
    unit_price: Option<usize>,
    minimum_stock: Option<usize>,
    current_quantity: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, CsvError> {
        let find = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        };
        Ok(Self {
            name: find("name").ok_or(CsvError::MissingColumn("name"))?,
            code: find("code").ok_or(CsvError::MissingColumn("code"))?,
            description: find("description"),
            unit_price: find("unit_price"),
            minimum_stock: find("minimum_stock"),
            current_quantity: find("current_quantity"),
        })
    }
}

fn cell(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_number<T: FromStr>(raw: Option<&str>, column: &str) -> Result<Option<T>, String> {
    raw.map(|s| {
        s.parse::<T>()
            .map_err(|_| format!("invalid {column} '{s}'"))
    })
    .transpose()
}

fn parse_row(record: &StringRecord, cols: &Columns, row: usize) -> Result<ParsedRow, String> {
    let name = cell(record, Some(cols.name)).ok_or("name is required")?;
    let code = cell(record, Some(cols.code)).ok_or("code is required")?;

    let unit_price: Option<Decimal> = parse_number(cell(record, cols.unit_price), "unit_price")?;
    let minimum_stock: Option<i64> =
        parse_number(cell(record, cols.minimum_stock), "minimum_stock")?;
    let current_quantity: Option<i64> =
        parse_number(cell(record, cols.current_quantity), "current_quantity")?;

    if current_quantity.is_some_and(|q| q < 0) {
        return Err("current_quantity cannot be negative".to_string());
    }

    let item = NewStockItem {
        name: name.to_string(),
        code: code.to_string(),
        description: cell(record, cols.description).map(str::to_string),
        unit_price: unit_price.unwrap_or(Decimal::ZERO),
        minimum_stock: minimum_stock.unwrap_or(0),
    };
    item.validate().map_err(|e| e.to_string())?;

    Ok(ParsedRow {
        row,
        item,
        current_quantity,
    })
}

/// Parse an import file. Fails as a whole only when the header is unusable;
/// bad data rows are collected into [`StockImport::errors`].
pub fn parse_stock_import(text: &str) -> Result<StockImport, CsvError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let cols = Columns::resolve(reader.headers()?)?;
    let mut import = StockImport::default();

    for (idx, record) in reader.records().enumerate() {
        let row = idx + 1;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                import.errors.push(RowError {
                    row,
                    message: e.to_string(),
                });
                continue;
            }
        };
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        match parse_row(&record, &cols, row) {
            Ok(parsed) => import.rows.push(parsed),
            Err(message) => import.errors.push(RowError { row, message }),
        }
    }

    Ok(import)
}

/// Export the catalogue in the import column layout.
pub fn export_stock(items: &[Item]) -> Result<String, CsvError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;
    for item in items {
        writer.write_record([
            item.name.as_str(),
            item.code.as_str(),
            item.description.as_deref().unwrap_or(""),
            &item.unit_price.to_string(),
            &item.minimum_stock.to_string(),
            &item.on_hand().to_string(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| CsvError::Csv(e.into_error().into()))?;
    String::from_utf8(bytes).map_err(|_| CsvError::Encoding)
}
