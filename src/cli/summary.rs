use super::ui;
use crate::core::{AssetValuation, HoldingStore, PortfolioSummary, PriceService, Vendor};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use comfy_table::Cell;
use serde::Serialize;

/// Everything the summary command prints, in one serializable value.
#[derive(Debug, Serialize)]
pub struct PortfolioReport {
    pub existing: Vec<AssetValuation>,
    pub investment: Vec<AssetValuation>,
    pub summary: PortfolioSummary,
    /// Holdings left out because their vendor had no usable price.
    pub skipped: Vec<String>,
    pub last_refresh: Option<DateTime<Utc>>,
}

pub async fn run(service: &PriceService, store: &dyn HoldingStore, json: bool) -> Result<()> {
    let pb = ui::new_progress_bar(Vendor::ALL.len() as u64, "Fetching prices...");
    service.refresh_all_with(&|_, _| pb.inc(1)).await;
    pb.finish_and_clear();

    let report = build_report(service, store).await?;
    if json {
        let out =
            serde_json::to_string_pretty(&report).context("Failed to serialize summary")?;
        println!("{out}");
    } else {
        println!("{}", display_report(&report));
    }
    Ok(())
}

/// Values the stored holdings against the service's cached quotes.
pub async fn build_report(
    service: &PriceService,
    store: &dyn HoldingStore,
) -> Result<PortfolioReport> {
    let existing = store.load_existing()?;
    let investment = store.load_investment()?;
    let (existing_valuations, investment_valuations) =
        service.valuate_all(&existing, &investment).await;

    let valued = |id: &str| {
        existing_valuations
            .iter()
            .chain(investment_valuations.iter())
            .any(|v| v.asset_id == id)
    };
    let skipped = existing
        .iter()
        .map(|a| (&a.id, &a.name, a.vendor))
        .chain(investment.iter().map(|a| (&a.id, &a.name, a.vendor)))
        .filter(|(id, _, _)| !valued(id.as_str()))
        .map(|(_, name, vendor)| format!("{name} ({vendor})"))
        .collect();

    Ok(PortfolioReport {
        summary: service.summarize(&existing_valuations, &investment_valuations),
        existing: existing_valuations,
        investment: investment_valuations,
        skipped,
        last_refresh: service.get_last_refresh_timestamp().await,
    })
}

fn existing_table(valuations: &[AssetValuation]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Holding"),
        ui::header_cell("Metal"),
        ui::header_cell("Quantity"),
        ui::header_cell("Vendor"),
        ui::header_cell("Price"),
        ui::header_cell("Value"),
    ]);
    for v in valuations {
        table.add_row(vec![
            Cell::new(&v.name),
            Cell::new(v.metal.to_string()),
            ui::number_cell(format!("{} {}", v.quantity, v.unit.label())),
            Cell::new(v.vendor.display_name()),
            ui::number_cell(format!("{}/{}", ui::format_vnd(v.current_price), v.unit.label())),
            ui::number_cell(ui::format_vnd(v.current_value)),
        ]);
    }
    table.to_string()
}

fn investment_table(valuations: &[AssetValuation]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Holding"),
        ui::header_cell("Metal"),
        ui::header_cell("Quantity"),
        ui::header_cell("Bought"),
        ui::header_cell("Cost"),
        ui::header_cell("Value"),
        ui::header_cell("P/L"),
        ui::header_cell("Months"),
    ]);
    for v in valuations {
        let pl = v.profit_loss.unwrap_or(0.0);
        let pl_text = format!(
            "{} ({})",
            ui::format_vnd(pl),
            ui::format_percent(v.profit_loss_percent.unwrap_or(0.0))
        );
        table.add_row(vec![
            Cell::new(&v.name),
            Cell::new(v.metal.to_string()),
            ui::number_cell(format!("{} {}", v.quantity, v.unit.label())),
            ui::format_optional_cell(v.purchase_date, |d| d.format("%Y-%m-%d").to_string()),
            ui::number_cell(ui::format_vnd(v.cost_basis())),
            ui::number_cell(ui::format_vnd(v.current_value)),
            ui::profit_loss_cell(pl, pl_text),
            ui::format_optional_cell(v.holding_months, |m| format!("{m:.1}")),
        ]);
    }
    table.to_string()
}

fn totals(summary: &PortfolioSummary) -> String {
    let line = |label: &str, value: String, style: ui::StyleType| {
        format!(
            "{} {}\n",
            ui::style_text(label, ui::StyleType::TotalLabel),
            ui::style_text(&value, style)
        )
    };
    let pl_style = if summary.total_profit_loss >= 0.0 {
        ui::StyleType::TotalValue
    } else {
        ui::StyleType::Error
    };

    let mut out = String::new();
    out.push_str(&line(
        "Existing:",
        ui::format_vnd(summary.total_existing_value),
        ui::StyleType::TotalValue,
    ));
    out.push_str(&line(
        "Investment:",
        ui::format_vnd(summary.total_investment_value),
        ui::StyleType::TotalValue,
    ));
    out.push_str(&line(
        "Gold:",
        ui::format_vnd(summary.total_gold_value),
        ui::StyleType::TotalValue,
    ));
    out.push_str(&line(
        "Silver:",
        ui::format_vnd(summary.total_silver_value),
        ui::StyleType::TotalValue,
    ));
    out.push_str(&line(
        "Profit/Loss:",
        format!(
            "{} ({})",
            ui::format_vnd(summary.total_profit_loss),
            ui::format_percent(summary.total_profit_loss_percent)
        ),
        pl_style,
    ));
    out.push_str(&line(
        "Total Value:",
        ui::format_vnd(summary.total_value),
        ui::StyleType::TotalValue,
    ));
    out
}

pub fn display_report(report: &PortfolioReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} ({})\n\n",
        ui::style_text("Existing holdings", ui::StyleType::Title),
        report.summary.existing_count
    ));
    output.push_str(&existing_table(&report.existing));

    output.push_str(&format!(
        "\n\n{} ({})\n\n",
        ui::style_text("Investment holdings", ui::StyleType::Title),
        report.summary.investment_count
    ));
    output.push_str(&investment_table(&report.investment));
    output.push_str("\n\n");

    if !report.skipped.is_empty() {
        output.push_str(&ui::style_text(
            &format!("Skipped, no price available: {}", report.skipped.join(", ")),
            ui::StyleType::Error,
        ));
        output.push_str("\n\n");
    }

    output.push_str(&totals(&report.summary));

    if let Some(at) = report.last_refresh {
        output.push_str(&ui::style_text(
            &format!("\nPrices as of {}", ui::format_timestamp(at)),
            ui::StyleType::Subtle,
        ));
    }
    output
}
