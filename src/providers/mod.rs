//! Vendor page fetching and per-vendor price extraction.

pub mod ancarat;
pub mod btmc;
pub mod btmh;
pub mod extract;
pub mod http;
pub mod phu_quy;
pub mod phu_tai;
pub mod util;

use crate::core::price::{PriceQuote, Vendor};

impl Vendor {
    /// Extracts this vendor's quote from a fetched page, `None` when the
    /// product row is missing.
    pub fn extract(self, html: &str) -> Option<PriceQuote> {
        match self {
            Vendor::BaoTinMinhChau => btmc::extract(html),
            Vendor::BaoTinManhHai => btmh::extract(html),
            Vendor::PhuQuy => phu_quy::extract(html),
            Vendor::PhuTai => phu_tai::extract(html),
            Vendor::Ancarat => ancarat::extract(html),
        }
    }
}
