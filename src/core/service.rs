//! Price acquisition and the state it maintains.
//!
//! [`PriceService`] is built once per process and handed to whoever needs
//! quotes. It is the only writer of the quote cache and the history log.

use crate::core::cache::Cache;
use crate::core::error::PriceError;
use crate::core::holding::{ExistingAsset, InvestmentAsset};
use crate::core::price::{MetalType, PageFetcher, PriceHistoryEntry, PriceQuote, Vendor};
use crate::core::summary::{self, PortfolioSummary};
use crate::core::valuation::{self, AssetValuation};
use chrono::{DateTime, Local, Utc};
use futures::future::join_all;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Outcome of one refresh cycle: `None` marks a vendor that failed this time.
pub type RefreshResult = BTreeMap<Vendor, Option<PriceQuote>>;

pub struct PriceService {
    fetcher: Arc<dyn PageFetcher>,
    urls: HashMap<Vendor, String>,
    cache: Cache<Vendor, PriceQuote>,
    history: Mutex<Vec<PriceHistoryEntry>>,
    last_refresh: Mutex<Option<DateTime<Utc>>>,
    refresh_lock: Mutex<()>,
}

impl PriceService {
    /// Vendors missing from `urls` are read from their default page.
    pub fn new(fetcher: Arc<dyn PageFetcher>, urls: HashMap<Vendor, String>) -> Self {
        Self {
            fetcher,
            urls,
            cache: Cache::new(),
            history: Mutex::new(Vec::new()),
            last_refresh: Mutex::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn url_for(&self, vendor: Vendor) -> &str {
        self.urls
            .get(&vendor)
            .map_or(vendor.default_url(), String::as_str)
    }

    #[instrument(name = "VendorRefresh", skip_all, fields(vendor = %vendor))]
    async fn fetch_quote(&self, vendor: Vendor) -> Result<PriceQuote, PriceError> {
        let url = self.url_for(vendor);
        let html = self
            .fetcher
            .fetch_page(url)
            .await
            .map_err(|e| PriceError::Fetch {
                vendor,
                url: url.to_string(),
                message: format!("{e:#}"),
            })?;
        vendor
            .extract(&html)
            .ok_or(PriceError::NotFound { vendor })
    }

    /// Refreshes every vendor. Never fails as a whole.
    pub async fn refresh_all(&self) -> RefreshResult {
        self.refresh_all_with(&|_, _| {}).await
    }

    /// Like [`refresh_all`](Self::refresh_all), calling `on_vendor_done`
    /// with each vendor and whether it produced a quote, as soon as it
    /// finishes.
    pub async fn refresh_all_with(
        &self,
        on_vendor_done: &(dyn Fn(Vendor, bool) + Send + Sync),
    ) -> RefreshResult {
        let _guard = self.refresh_lock.lock().await;
        info!("Refreshing prices from all vendors...");

        let fetches = Vendor::ALL.into_iter().map(|vendor| async move {
            let result = self.fetch_quote(vendor).await;
            on_vendor_done(vendor, result.is_ok());
            (vendor, result)
        });
        let outcomes = join_all(fetches).await;

        let mut results = RefreshResult::new();
        for (vendor, outcome) in outcomes {
            match outcome {
                Ok(quote) => {
                    info!(
                        "{}: {:.0} VND/{} ({})",
                        vendor, quote.buy_price, quote.unit, quote.product
                    );
                    self.history
                        .lock()
                        .await
                        .push(PriceHistoryEntry::from(&quote));
                    self.cache.put(vendor, quote.clone()).await;
                    results.insert(vendor, Some(quote));
                }
                Err(e) => {
                    warn!("{}", e);
                    results.insert(vendor, None);
                }
            }
        }

        let now = Utc::now();
        *self.last_refresh.lock().await = Some(now);
        info!(
            succeeded = results.values().filter(|q| q.is_some()).count(),
            total = results.len(),
            "Prices refreshed at {}",
            now
        );
        results
    }

    pub async fn get_cached_quote(&self, vendor: Vendor) -> Option<PriceQuote> {
        self.cache.get(&vendor).await
    }

    pub async fn get_all_cached_quotes(&self) -> HashMap<Vendor, PriceQuote> {
        self.cache.snapshot().await
    }

    pub async fn get_last_refresh_timestamp(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.lock().await
    }

    /// History entries matching the filters, oldest first.
    pub async fn get_history(
        &self,
        vendor: Option<Vendor>,
        metal: Option<MetalType>,
    ) -> Vec<PriceHistoryEntry> {
        let mut entries: Vec<_> = self
            .history
            .lock()
            .await
            .iter()
            .filter(|e| vendor.is_none_or(|v| e.vendor == v))
            .filter(|e| metal.is_none_or(|m| e.metal == m))
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.timestamp);
        entries
    }

    /// Values holdings against a snapshot of the cache as of today.
    pub async fn valuate_all(
        &self,
        existing: &[ExistingAsset],
        investment: &[InvestmentAsset],
    ) -> (Vec<AssetValuation>, Vec<AssetValuation>) {
        let quotes = self.cache.snapshot().await;
        debug!(quotes = quotes.len(), "Valuating against cached quotes");
        valuation::valuate_all(existing, investment, &quotes, Local::now().date_naive())
    }

    pub fn summarize(
        &self,
        existing: &[AssetValuation],
        investment: &[AssetValuation],
    ) -> PortfolioSummary {
        summary::summarize(existing, investment)
    }
}
