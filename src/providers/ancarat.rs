//! Ancarat (giabac.ancarat.com), Ngân Long Quảng Tiến 1 lượng silver.
use crate::core::price::{PriceQuote, Vendor};
use crate::providers::extract::{contains_all, parse_price, table_rows};

const PRODUCT: [&str; 2] = ["Ngân Long Quảng Tiến", "1 lượng"];
/// The "Mua vào" column, already in VND.
const BUY_COLUMN: usize = 2;

pub fn extract(html: &str) -> Option<PriceQuote> {
    let raw = table_rows(html).iter().find_map(|row| {
        let name = row.cell(0)?;
        let buy = row.cell(BUY_COLUMN)?;
        contains_all(name, &PRODUCT).then(|| parse_price(buy))
    })?;
    Some(Vendor::Ancarat.quote(raw))
}
