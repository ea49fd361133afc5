//! Phú Quý silver, read from the BTMC price table.
//!
//! Phú Quý's own site has no scrapeable table, so its 1 kg bar is looked up
//! on btmc.vn. That table posts the bar at an inconsistent scale, so the raw
//! value is scaled up by magnitude until it looks like VND per kilogram. This
//! only holds while BTMC keeps listing the bar and silver stays in range.
use crate::core::price::{PriceQuote, Vendor};
use crate::providers::extract::{contains_all, parse_price, table_rows};

const PRODUCT: [&str; 2] = ["PHÚ QUÝ", "1 KG"];
const BUY_COLUMN: usize = 1;
const MIN_CELLS: usize = 3;

fn correct_magnitude(raw: f64) -> f64 {
    if raw < 1_000_000.0 {
        raw * 100.0
    } else if raw < 10_000_000.0 {
        raw * 10.0
    } else {
        raw
    }
}

pub fn extract(html: &str) -> Option<PriceQuote> {
    let raw = table_rows(html).iter().find_map(|row| {
        if row.cells.len() < MIN_CELLS || !contains_all(&row.cells[0], &PRODUCT) {
            return None;
        }
        row.cell(BUY_COLUMN).map(parse_price)
    })?;
    Some(Vendor::PhuQuy.quote(correct_magnitude(raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::units::Unit;

    #[test]
    fn test_magnitude_correction() {
        assert_eq!(correct_magnitude(485_000.0), 48_500_000.0);
        assert_eq!(correct_magnitude(4_850_000.0), 48_500_000.0);
        assert_eq!(correct_magnitude(48_500_000.0), 48_500_000.0);
        assert_eq!(correct_magnitude(999_999.0), 99_999_900.0);
        assert_eq!(correct_magnitude(1_000_000.0), 10_000_000.0);
        assert_eq!(correct_magnitude(10_000_000.0), 10_000_000.0);
    }

    #[test]
    fn test_bar_row_on_btmc_table() {
        let html = r#"<table>
            <tr><td>BẠC MIẾNG PHÚ QUÝ Ag 999 1 LƯỢNG</td><td>1.820</td><td>1.880</td></tr>
            <tr><td>Bạc miếng Phú Quý Ag 999 1 Kg</td><td>485.000</td><td>500.000</td></tr>
        </table>"#;
        let quote = extract(html).unwrap();
        assert_eq!(quote.vendor, Vendor::PhuQuy);
        assert_eq!(quote.unit, Unit::Kilogram);
        assert_eq!(quote.buy_price, 48_500_000.0);
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let html = r#"<table>
            <tr><td>BẠC MIẾNG PHÚ QUÝ 1 KG</td><td>485.000</td></tr>
        </table>"#;
        assert!(extract(html).is_none());
    }
}
