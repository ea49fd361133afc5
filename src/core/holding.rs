//! Holding records tracked by the user.

use crate::core::error::HoldingError;
use crate::core::price::{MetalType, Vendor};
use crate::core::units::Unit;
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetCategory {
    #[serde(rename = "existing")]
    Existing,
    #[serde(rename = "investment")]
    Investment,
}

impl AssetCategory {
    pub fn label(&self) -> &'static str {
        match self {
            AssetCategory::Existing => "Existing",
            AssetCategory::Investment => "Investment",
        }
    }
}

/// Metal already owned, with no cost basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingAsset {
    pub id: String,
    pub name: String,
    pub metal: MetalType,
    pub quantity: f64,
    pub unit: Unit,
    pub vendor: Vendor,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Metal bought as an investment; carries the purchase price per `unit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentAsset {
    pub id: String,
    pub name: String,
    pub metal: MetalType,
    pub quantity: f64,
    pub unit: Unit,
    pub vendor: Vendor,
    pub purchase_price: f64,
    pub purchase_date: NaiveDate,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn check_base(id: &str, name: &str, quantity: f64) -> Result<(), HoldingError> {
    if name.trim().is_empty() {
        return Err(HoldingError::EmptyName { id: id.to_string() });
    }
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(HoldingError::InvalidQuantity {
            id: id.to_string(),
            quantity,
        });
    }
    Ok(())
}

impl ExistingAsset {
    pub fn validate(&self) -> Result<(), HoldingError> {
        check_base(&self.id, &self.name, self.quantity)
    }
}

impl InvestmentAsset {
    pub fn validate(&self, today: NaiveDate) -> Result<(), HoldingError> {
        check_base(&self.id, &self.name, self.quantity)?;
        if !self.purchase_price.is_finite() || self.purchase_price <= 0.0 {
            return Err(HoldingError::InvalidPurchasePrice {
                id: self.id.clone(),
                price: self.purchase_price,
            });
        }
        if self.purchase_date > today {
            return Err(HoldingError::FuturePurchaseDate {
                id: self.id.clone(),
                date: self.purchase_date,
            });
        }
        Ok(())
    }
}

/// Validates every holding and checks ids are unique across both categories.
pub fn validate_holdings(
    existing: &[ExistingAsset],
    investment: &[InvestmentAsset],
    today: NaiveDate,
) -> Result<(), HoldingError> {
    let mut seen = HashSet::new();
    for asset in existing {
        asset.validate()?;
        if !seen.insert(asset.id.as_str()) {
            return Err(HoldingError::DuplicateId {
                id: asset.id.clone(),
            });
        }
    }
    for asset in investment {
        asset.validate(today)?;
        if !seen.insert(asset.id.as_str()) {
            return Err(HoldingError::DuplicateId {
                id: asset.id.clone(),
            });
        }
    }
    Ok(())
}

/// Source of the user's holdings. Writes are handled by whoever owns storage.
pub trait HoldingStore: Send + Sync {
    fn load_existing(&self) -> Result<Vec<ExistingAsset>>;
    fn load_investment(&self) -> Result<Vec<InvestmentAsset>>;
}
