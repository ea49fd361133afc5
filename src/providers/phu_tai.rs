//! Phú Tài (vangphutai.vn), 999.9 round plain ring.
use crate::core::price::{PriceQuote, Vendor};
use crate::providers::extract::{contains_all, parse_price, table_rows};

const PRODUCT: [&str; 2] = ["Nhẫn tròn trơn", "999.9"];
const BUY_COLUMN: usize = 1;
/// Posted in thousands of VND per chỉ.
const MULTIPLIER: f64 = 1000.0;

pub fn extract(html: &str) -> Option<PriceQuote> {
    let raw = table_rows(html).iter().find_map(|row| {
        let name = row.cell(0)?;
        let buy = row.cell(BUY_COLUMN)?;
        contains_all(name, &PRODUCT).then(|| parse_price(buy))
    })?;
    Some(Vendor::PhuTai.quote(raw * MULTIPLIER))
}
