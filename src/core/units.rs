//! Quantity units used by Vietnamese bullion vendors and conversions between them.

use anyhow::anyhow;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Unit a holding is measured in, or a quote is priced per.
///
/// Config files may also spell units in Vietnamese (`chỉ`, `lượng`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize)]
pub enum Unit {
    /// Chỉ, the small unit (3.75 g).
    #[serde(rename = "chi")]
    Chi,
    /// Lượng (tael), 10 chỉ.
    #[serde(rename = "luong")]
    Luong,
    #[serde(rename = "kg")]
    Kilogram,
}

impl Unit {
    pub const ALL: [Unit; 3] = [Unit::Chi, Unit::Luong, Unit::Kilogram];

    /// Size of one unit expressed in chỉ.
    fn in_chi(self) -> f64 {
        match self {
            Unit::Chi => 1.0,
            Unit::Luong => 10.0,
            Unit::Kilogram => 266.7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Unit::Chi => "chỉ",
            Unit::Luong => "lượng",
            Unit::Kilogram => "kg",
        }
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Unit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chi" | "chỉ" => Ok(Unit::Chi),
            "luong" | "lượng" => Ok(Unit::Luong),
            "kg" | "kilogram" => Ok(Unit::Kilogram),
            _ => Err(anyhow!("Invalid unit: {}", s)),
        }
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Converts a quantity measured in `from` into `to`.
pub fn convert_quantity(value: f64, from: Unit, to: Unit) -> f64 {
    if from == to {
        return value;
    }
    value * from.in_chi() / to.in_chi()
}

/// Converts a price per `from` unit into a price per `to` unit.
///
/// Prices scale inversely with quantities: a price per lượng is ten times the
/// price per chỉ.
pub fn convert_price_per_unit(price: f64, from: Unit, to: Unit) -> f64 {
    if from == to {
        return price;
    }
    price * to.in_chi() / from.in_chi()
}
