//! Error types for price acquisition and holding validation.

use crate::core::price::Vendor;
use chrono::NaiveDate;
use thiserror::Error;

/// Reasons a vendor produced no quote during a refresh cycle.
///
/// None of these abort a refresh; the orchestrator logs them and marks the
/// vendor absent for the cycle.
#[derive(Error, Debug)]
pub enum PriceError {
    /// The page could not be fetched (connection error, timeout, non-2xx).
    #[error("Failed to fetch {url} for {vendor}: {message}")]
    Fetch {
        vendor: Vendor,
        url: String,
        message: String,
    },

    /// The page was fetched but the vendor's product row was not found.
    #[error("Could not find {vendor} price in page")]
    NotFound { vendor: Vendor },
}

/// A holding record that breaks one of its field constraints.
#[derive(Error, Debug, PartialEq)]
pub enum HoldingError {
    #[error("Holding {id}: name must not be empty")]
    EmptyName { id: String },

    #[error("Holding {id}: quantity must be positive, got {quantity}")]
    InvalidQuantity { id: String, quantity: f64 },

    #[error("Holding {id}: purchase price must be positive, got {price}")]
    InvalidPurchasePrice { id: String, price: f64 },

    #[error("Holding {id}: purchase date {date} is in the future")]
    FuturePurchaseDate { id: String, date: NaiveDate },

    #[error("Duplicate holding id: {id}")]
    DuplicateId { id: String },
}
