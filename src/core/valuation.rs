//! Values holdings against the latest cached quotes.
//!
//! A holding whose vendor has no usable quote gets no valuation at all rather
//! than a zero-valued one, so callers can tell "price unknown" from "worthless".
use crate::core::holding::{AssetCategory, ExistingAsset, InvestmentAsset};
use crate::core::price::{MetalType, PriceQuote, Vendor};
use crate::core::units::{Unit, convert_price_per_unit};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Average days per month used for holding periods. Not calendar-month exact.
const DAYS_PER_MONTH: f64 = 30.44;

/// Current worth of one holding. Investment-only fields are `None` for
/// existing holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetValuation {
    pub asset_id: String,
    pub name: String,
    pub metal: MetalType,
    pub category: AssetCategory,
    pub quantity: f64,
    pub unit: Unit,
    pub vendor: Vendor,
    pub purchase_price: Option<f64>,
    pub purchase_date: Option<NaiveDate>,
    pub current_price: f64,
    pub current_value: f64,
    pub profit_loss: Option<f64>,
    pub profit_loss_percent: Option<f64>,
    pub holding_months: Option<f64>,
    pub last_updated: DateTime<Utc>,
}

impl AssetValuation {
    /// Purchase price times quantity, zero for existing holdings.
    pub fn cost_basis(&self) -> f64 {
        self.purchase_price.unwrap_or(0.0) * self.quantity
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Price per `unit` and total value of `quantity`, or `None` when the quote
/// is missing or carries no usable price.
fn current_value(
    quantity: f64,
    unit: Unit,
    vendor: Vendor,
    quotes: &HashMap<Vendor, PriceQuote>,
) -> Option<(f64, f64)> {
    let Some(quote) = quotes.get(&vendor) else {
        warn!(%vendor, "No cached price");
        return None;
    };
    if quote.buy_price <= 0.0 {
        warn!(%vendor, price = quote.buy_price, "Cached price is not usable");
        return None;
    }
    let price = convert_price_per_unit(quote.buy_price, quote.unit, unit);
    Some((price, price * quantity))
}

/// Returns `(amount, percent)`; percent is rounded to 2 places and 0 when
/// the cost is 0.
pub fn profit_loss(purchase_price: f64, current_price: f64, quantity: f64) -> (f64, f64) {
    let total_cost = purchase_price * quantity;
    let amount = current_price * quantity - total_cost;
    let percent = if total_cost > 0.0 {
        round2(amount / total_cost * 100.0)
    } else {
        0.0
    };
    (amount, percent)
}

pub fn holding_months(purchase_date: NaiveDate, today: NaiveDate) -> f64 {
    let days = (today - purchase_date).num_days();
    round2(days as f64 / DAYS_PER_MONTH)
}

fn last_updated(vendor: Vendor, quotes: &HashMap<Vendor, PriceQuote>) -> DateTime<Utc> {
    quotes
        .get(&vendor)
        .map_or_else(Utc::now, |quote| quote.timestamp)
}

pub fn valuate_existing(
    asset: &ExistingAsset,
    quotes: &HashMap<Vendor, PriceQuote>,
) -> Option<AssetValuation> {
    let (current_price, current_value) =
        current_value(asset.quantity, asset.unit, asset.vendor, quotes)?;

    Some(AssetValuation {
        asset_id: asset.id.clone(),
        name: asset.name.clone(),
        metal: asset.metal,
        category: AssetCategory::Existing,
        quantity: asset.quantity,
        unit: asset.unit,
        vendor: asset.vendor,
        purchase_price: None,
        purchase_date: None,
        current_price,
        current_value,
        profit_loss: None,
        profit_loss_percent: None,
        holding_months: None,
        last_updated: last_updated(asset.vendor, quotes),
    })
}

pub fn valuate_investment(
    asset: &InvestmentAsset,
    quotes: &HashMap<Vendor, PriceQuote>,
    today: NaiveDate,
) -> Option<AssetValuation> {
    let (current_price, current_value) =
        current_value(asset.quantity, asset.unit, asset.vendor, quotes)?;
    let (amount, percent) = profit_loss(asset.purchase_price, current_price, asset.quantity);

    Some(AssetValuation {
        asset_id: asset.id.clone(),
        name: asset.name.clone(),
        metal: asset.metal,
        category: AssetCategory::Investment,
        quantity: asset.quantity,
        unit: asset.unit,
        vendor: asset.vendor,
        purchase_price: Some(asset.purchase_price),
        purchase_date: Some(asset.purchase_date),
        current_price,
        current_value,
        profit_loss: Some(amount),
        profit_loss_percent: Some(percent),
        holding_months: Some(holding_months(asset.purchase_date, today)),
        last_updated: last_updated(asset.vendor, quotes),
    })
}

/// Values both holding lists, skipping holdings without a usable quote.
pub fn valuate_all(
    existing: &[ExistingAsset],
    investment: &[InvestmentAsset],
    quotes: &HashMap<Vendor, PriceQuote>,
    today: NaiveDate,
) -> (Vec<AssetValuation>, Vec<AssetValuation>) {
    let existing_valuations: Vec<_> = existing
        .iter()
        .filter_map(|asset| valuate_existing(asset, quotes))
        .collect();
    let investment_valuations: Vec<_> = investment
        .iter()
        .filter_map(|asset| valuate_investment(asset, quotes, today))
        .collect();
    debug!(
        existing = existing_valuations.len(),
        investment = investment_valuations.len(),
        skipped = existing.len() + investment.len()
            - existing_valuations.len()
            - investment_valuations.len(),
        "Valuated holdings"
    );
    (existing_valuations, investment_valuations)
}
