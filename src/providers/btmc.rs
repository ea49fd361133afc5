//! Bảo Tín Minh Châu (btmc.vn), round plain ring gold.
//!
//! The buy column holds thousands of VND per chỉ. When the branded row has
//! no usable buy column, any row mentioning the ring is scanned for its first
//! number large enough to be a price, skipping index and purity columns.
use crate::core::price::{PriceQuote, Vendor};
use crate::providers::extract::{
    TableRow, contains_all, is_numeric_cell, parse_price, table_rows,
};
use tracing::debug;

const PRODUCT: &str = "NHẪN TRÒN TRƠN";
const BRAND: &str = "BẢO TÍN MINH CHÂU";
const BUY_COLUMN: usize = 3;
const MULTIPLIER: f64 = 1000.0;
/// Smallest raw value the fallback scan accepts as a price.
const MIN_SCANNED_PRICE: f64 = 10_000.0;

fn buy_column(row: &TableRow) -> Option<f64> {
    if !contains_all(&row.text, &[PRODUCT, BRAND]) {
        return None;
    }
    row.cell(BUY_COLUMN).map(parse_price)
}

fn scan_row(row: &TableRow) -> Option<f64> {
    if !row.cells.iter().any(|cell| contains_all(cell, &[PRODUCT])) {
        return None;
    }
    row.cells
        .iter()
        .skip(1)
        .filter(|cell| is_numeric_cell(cell))
        .map(|cell| parse_price(cell))
        .find(|price| *price > MIN_SCANNED_PRICE)
}

pub fn extract(html: &str) -> Option<PriceQuote> {
    let rows = table_rows(html);
    let raw = rows.iter().find_map(buy_column).or_else(|| {
        debug!("No branded BTMC row with a buy column, scanning ring rows");
        rows.iter().find_map(scan_row)
    })?;
    Some(Vendor::BaoTinMinhChau.quote(raw * MULTIPLIER))
}
