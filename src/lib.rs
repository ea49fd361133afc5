pub mod cli;
pub mod core;
pub mod providers;

use crate::core::PriceService;
use crate::core::config::AppConfig;
use crate::providers::http::HttpPageFetcher;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Prices,
    Summary { json: bool },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("metalfolio starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let fetcher = Arc::new(HttpPageFetcher::new(&config.http)?);
    let service = PriceService::new(fetcher, config.vendor_urls());

    match command {
        AppCommand::Prices => cli::prices::run(&service).await,
        AppCommand::Summary { json } => cli::summary::run(&service, &config, json).await,
    }
}
