//! Vendors, quotes and the page fetching abstraction

use crate::core::units::Unit;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize)]
pub enum MetalType {
    #[serde(rename = "gold")]
    Gold,
    #[serde(rename = "silver")]
    Silver,
}

impl Display for MetalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MetalType::Gold => "Gold",
                MetalType::Silver => "Silver",
            }
        )
    }
}

impl FromStr for MetalType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gold" | "vàng" => Ok(MetalType::Gold),
            "silver" | "bạc" => Ok(MetalType::Silver),
            _ => Err(anyhow!("Invalid metal type: {}", s)),
        }
    }
}

impl<'de> Deserialize<'de> for MetalType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Reference businesses whose posted buy price values a holding.
///
/// Serialized by key; config files may use the key or the display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize)]
pub enum Vendor {
    #[serde(rename = "btmc")]
    BaoTinMinhChau,
    #[serde(rename = "btmh")]
    BaoTinManhHai,
    #[serde(rename = "phu_quy")]
    PhuQuy,
    #[serde(rename = "phu_tai")]
    PhuTai,
    #[serde(rename = "ancarat")]
    Ancarat,
}

impl Vendor {
    pub const ALL: [Vendor; 5] = [
        Vendor::BaoTinMinhChau,
        Vendor::BaoTinManhHai,
        Vendor::PhuQuy,
        Vendor::PhuTai,
        Vendor::Ancarat,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Vendor::BaoTinMinhChau => "Bảo Tín Minh Châu",
            Vendor::BaoTinManhHai => "Bảo Tín Mạnh Hải",
            Vendor::PhuQuy => "Phú Quý",
            Vendor::PhuTai => "Phú Tài",
            Vendor::Ancarat => "Ancarat",
        }
    }

    /// Key used in configuration files.
    pub fn key(self) -> &'static str {
        match self {
            Vendor::BaoTinMinhChau => "btmc",
            Vendor::BaoTinManhHai => "btmh",
            Vendor::PhuQuy => "phu_quy",
            Vendor::PhuTai => "phu_tai",
            Vendor::Ancarat => "ancarat",
        }
    }

    /// Page the vendor's quote is scraped from.
    ///
    /// Phú Quý has no usable page of its own and is read from the BTMC table.
    pub fn default_url(self) -> &'static str {
        match self {
            Vendor::BaoTinMinhChau | Vendor::PhuQuy => "https://btmc.vn/",
            Vendor::BaoTinManhHai => "https://baotinmanhhai.vn/",
            Vendor::PhuTai => "https://www.vangphutai.vn/",
            Vendor::Ancarat => "https://giabac.ancarat.com/",
        }
    }

    pub fn metal(self) -> MetalType {
        match self {
            Vendor::BaoTinMinhChau | Vendor::BaoTinManhHai | Vendor::PhuTai => MetalType::Gold,
            Vendor::PhuQuy | Vendor::Ancarat => MetalType::Silver,
        }
    }

    /// Unit the vendor's reference product is quoted per.
    pub fn quote_unit(self) -> Unit {
        match self {
            Vendor::BaoTinMinhChau | Vendor::BaoTinManhHai | Vendor::PhuTai => Unit::Chi,
            Vendor::PhuQuy => Unit::Kilogram,
            Vendor::Ancarat => Unit::Luong,
        }
    }

    pub fn product_name(self) -> &'static str {
        match self {
            Vendor::BaoTinMinhChau => "Nhẫn tròn trơn Bảo Tín Minh Châu",
            Vendor::BaoTinManhHai => "Nhẫn ép vỉ Kim Gia Bảo 24K",
            Vendor::PhuQuy => "Bạc thỏi Phú Quý 999 1Kilo",
            Vendor::PhuTai => "Nhẫn tròn trơn 999.9",
            Vendor::Ancarat => "Ngân Long Quảng Tiến 999 - 1 lượng",
        }
    }

    /// Builds a quote for this vendor stamped with the current time.
    pub fn quote(self, buy_price: f64) -> PriceQuote {
        PriceQuote {
            vendor: self,
            buy_price,
            unit: self.quote_unit(),
            metal: self.metal(),
            product: self.product_name().to_string(),
            timestamp: Utc::now(),
        }
    }
}

impl Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Vendor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Vendor::ALL
            .into_iter()
            .find(|v| v.key().eq_ignore_ascii_case(s) || v.display_name() == s)
            .ok_or_else(|| anyhow!("Unknown vendor: {}", s))
    }
}

impl<'de> Deserialize<'de> for Vendor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single vendor's buy price for its reference product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub vendor: Vendor,
    pub buy_price: f64,
    pub unit: Unit,
    pub metal: MetalType,
    pub product: String,
    pub timestamp: DateTime<Utc>,
}

/// One successful refresh of one vendor, kept for the process lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    pub vendor: Vendor,
    pub metal: MetalType,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<&PriceQuote> for PriceHistoryEntry {
    fn from(quote: &PriceQuote) -> Self {
        PriceHistoryEntry {
            vendor: quote.vendor,
            metal: quote.metal,
            price: quote.buy_price,
            timestamp: quote.timestamp,
        }
    }
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String>;
}
