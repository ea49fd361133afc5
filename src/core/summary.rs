//! Portfolio-level totals over a set of valuations.
use crate::core::price::MetalType;
use crate::core::valuation::{AssetValuation, round2};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_existing_value: f64,
    pub total_investment_value: f64,
    pub total_value: f64,
    pub total_gold_value: f64,
    pub total_silver_value: f64,
    pub total_profit_loss: f64,
    pub total_profit_loss_percent: f64,
    pub existing_count: usize,
    pub investment_count: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

fn total_value<'a>(valuations: impl Iterator<Item = &'a AssetValuation>) -> f64 {
    valuations.fold(0.0, |acc, v| acc + v.current_value)
}

/// Reduces the valuation lists into totals. Always recomputed from scratch.
pub fn summarize(
    existing: &[AssetValuation],
    investment: &[AssetValuation],
) -> PortfolioSummary {
    let total_existing_value = total_value(existing.iter());
    let total_investment_value = total_value(investment.iter());

    let all = || existing.iter().chain(investment.iter());
    let total_gold_value = total_value(all().filter(|v| v.metal == MetalType::Gold));
    let total_silver_value = total_value(all().filter(|v| v.metal == MetalType::Silver));

    let total_profit_loss = investment
        .iter()
        .filter_map(|v| v.profit_loss)
        .fold(0.0, |acc, pl| acc + pl);
    let total_cost = investment
        .iter()
        .fold(0.0, |acc, v| acc + v.cost_basis());
    let total_profit_loss_percent = if total_cost > 0.0 {
        round2(total_profit_loss / total_cost * 100.0)
    } else {
        0.0
    };

    PortfolioSummary {
        total_existing_value,
        total_investment_value,
        total_value: total_existing_value + total_investment_value,
        total_gold_value,
        total_silver_value,
        total_profit_loss,
        total_profit_loss_percent,
        existing_count: existing.len(),
        investment_count: investment.len(),
        last_updated: all().map(|v| v.last_updated).max(),
    }
}
