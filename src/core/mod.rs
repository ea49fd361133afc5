//! Domain logic: units, quotes, holdings, valuation and price acquisition

pub mod cache;
pub mod config;
pub mod error;
pub mod holding;
pub mod log;
pub mod price;
pub mod service;
pub mod summary;
pub mod units;
pub mod valuation;

// Re-export main types for cleaner imports
pub use holding::{AssetCategory, ExistingAsset, HoldingStore, InvestmentAsset};
pub use price::{MetalType, PageFetcher, PriceHistoryEntry, PriceQuote, Vendor};
pub use service::{PriceService, RefreshResult};
pub use summary::PortfolioSummary;
pub use units::Unit;
pub use valuation::AssetValuation;
