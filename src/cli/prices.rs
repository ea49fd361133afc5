use super::ui;
use crate::core::{PriceQuote, PriceService, RefreshResult, Vendor};
use anyhow::Result;
use comfy_table::Cell;
use std::collections::HashMap;

/// Refreshes every vendor and prints the quotes it got back.
pub async fn run(service: &PriceService) -> Result<()> {
    let pb = ui::new_progress_bar(Vendor::ALL.len() as u64, "Fetching prices...");
    let results = service.refresh_all_with(&|_, _| pb.inc(1)).await;
    pb.finish_and_clear();

    let cached = service.get_all_cached_quotes().await;
    println!("{}", display_quotes_table(&results, &cached));

    if let Some(at) = service.get_last_refresh_timestamp().await {
        let line = format!("Last refresh: {}", ui::format_timestamp(at));
        println!("\n{}", ui::style_text(&line, ui::StyleType::Subtle));
    }
    Ok(())
}

/// One row per vendor. A vendor that failed this cycle still shows its last
/// known price, marked stale, when the cache has one.
pub fn display_quotes_table(
    results: &RefreshResult,
    cached: &HashMap<Vendor, PriceQuote>,
) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Vendor"),
        ui::header_cell("Product"),
        ui::header_cell("Metal"),
        ui::header_cell("Buy price"),
        ui::header_cell("Unit"),
        ui::header_cell("Status"),
    ]);

    for vendor in Vendor::ALL {
        let fresh = results.get(&vendor).and_then(Option::as_ref);
        let quote = fresh.or_else(|| cached.get(&vendor));

        table.add_row(vec![
            Cell::new(vendor.display_name()),
            Cell::new(quote.map_or(vendor.product_name(), |q| q.product.as_str())),
            Cell::new(vendor.metal().to_string()),
            ui::format_optional_cell(quote.map(|q| q.buy_price), ui::format_vnd),
            Cell::new(vendor.quote_unit().label()),
            ui::status_cell(fresh.is_some(), quote.is_some()),
        ]);
    }

    format!(
        "{}\n\n{}",
        ui::style_text("Vendor prices", ui::StyleType::Title),
        table
    )
}
