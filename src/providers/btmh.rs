//! Bảo Tín Mạnh Hải (baotinmanhhai.vn), Kim Gia Bảo 24K pressed ring.
use crate::core::price::{PriceQuote, Vendor};
use crate::providers::extract::{contains_all, parse_price, table_rows};

const PRODUCT: [&str; 2] = ["Kim Gia Bảo", "24K"];
const BUY_COLUMN: usize = 1;

/// Prices are posted in whole VND per chỉ.
pub fn extract(html: &str) -> Option<PriceQuote> {
    let raw = table_rows(html).iter().find_map(|row| {
        let name = row.cell(0)?;
        let buy = row.cell(BUY_COLUMN)?;
        contains_all(name, &PRODUCT).then(|| parse_price(buy))
    })?;
    Some(Vendor::BaoTinManhHai.quote(raw))
}
