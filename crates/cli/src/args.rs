//! Value parsers for command-line arguments.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use stockroom_core::ItemId;
use stockroom_purchasing::RequestedQuantities;

/// `ITEM=QTY`, e.g. `3=5`.
pub fn parse_item_quantity(raw: &str) -> Result<(ItemId, i64), String> {
    let (item, qty) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ITEM=QTY, got '{raw}'"))?;
    let item: ItemId = item.parse().map_err(|e| format!("{e}"))?;
    let qty: i64 = qty
        .trim()
        .parse()
        .map_err(|_| format!("invalid quantity '{}'", qty.trim()))?;
    if qty < 0 {
        return Err(format!("quantity cannot be negative (got {qty})"));
    }
    Ok((item, qty))
}

/// `NUMBER:AMOUNT`, e.g. `INV-001:1250.50`. The amount follows the last colon.
pub fn parse_invoice(raw: &str) -> Result<(String, Decimal), String> {
    let (number, amount) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("expected NUMBER:AMOUNT, got '{raw}'"))?;
    let amount: Decimal = amount
        .trim()
        .parse()
        .map_err(|_| format!("invalid amount '{}'", amount.trim()))?;
    Ok((number.trim().to_string(), amount))
}

/// Collect repeated `--item` pairs, refusing an item given more than once.
pub fn requested_quantities(pairs: Vec<(ItemId, i64)>) -> Result<RequestedQuantities, String> {
    let mut requested = RequestedQuantities::with_capacity(pairs.len());
    for (item_id, qty) in pairs {
        if requested.insert(item_id, qty).is_some() {
            return Err(format!("item {item_id} given more than once"));
        }
    }
    Ok(requested)
}

pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    stockroom_core::time::parse_timestamp(raw).ok_or_else(|| format!("invalid date '{raw}'"))
}
