use crate::core::holding::{ExistingAsset, HoldingStore, InvestmentAsset, validate_holdings};
use crate::core::price::Vendor;
use anyhow::{Context, Result};
use chrono::Local;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Holdings {
    #[serde(default)]
    pub existing: Vec<ExistingAsset>,
    #[serde(default)]
    pub investment: Vec<InvestmentAsset>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VendorConfig {
    pub url: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retries() -> usize {
    1
}

fn default_retry_delay_ms() -> u64 {
    500
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub retries: usize,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub holdings: Holdings,
    #[serde(default)]
    pub vendors: HashMap<Vendor, VendorConfig>,
    #[serde(default)]
    pub http: HttpConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("vn", "metalfolio", "metalfolio")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        validate_holdings(
            &config.holdings.existing,
            &config.holdings.investment,
            Local::now().date_naive(),
        )
        .with_context(|| format!("Invalid holdings in {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Page to scrape for each vendor, with configured overrides applied.
    pub fn vendor_urls(&self) -> HashMap<Vendor, String> {
        Vendor::ALL
            .into_iter()
            .map(|vendor| {
                let url = self
                    .vendors
                    .get(&vendor)
                    .map_or_else(|| vendor.default_url().to_string(), |v| v.url.clone());
                (vendor, url)
            })
            .collect()
    }
}

impl HoldingStore for AppConfig {
    fn load_existing(&self) -> Result<Vec<ExistingAsset>> {
        Ok(self.holdings.existing.clone())
    }

    fn load_investment(&self) -> Result<Vec<InvestmentAsset>> {
        Ok(self.holdings.investment.clone())
    }
}
