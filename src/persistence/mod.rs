// src/persistence/mod.rs
pub mod json_file;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{winning_bid, Auction, AuctionId, AuctionStatus, Bid, Errors};

pub use self::memory::MemoryStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Record already exists: {0}")]
    Conflict(String),

    #[error("Auction not found: {0}")]
    Missing(String),

    #[error("Auction no longer accepts bids: {0}")]
    Closed(String),
}

impl From<StoreError> for Errors {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(_) => Errors::StoreUnavailable,
            StoreError::Conflict(_) => Errors::precondition("Record already exists"),
            StoreError::Missing(_) => Errors::not_found("Auction not found"),
            StoreError::Closed(_) => Errors::precondition("Auction has ended"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuctionFilter {
    pub status: Option<AuctionStatus>,
    pub category: Option<String>,
    /// Case-insensitive substring of the product name.
    pub product_name: Option<String>,
}

impl AuctionFilter {
    pub fn matches(&self, auction: &Auction) -> bool {
        if let Some(status) = self.status {
            if auction.status != status {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &auction.category != category {
                return false;
            }
        }
        if let Some(name) = &self.product_name {
            if !auction.product_name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

#[async_trait]
pub trait AuctionStore: Send + Sync {
    async fn create(&self, auction: &Auction) -> Result<(), StoreError>;

    async fn get_by_id(&self, id: AuctionId) -> Result<Option<Auction>, StoreError>;

    async fn list_by_filter(&self, filter: &AuctionFilter) -> Result<Vec<Auction>, StoreError>;

    /// Set every Active auction with `deadline <= now` to Completed and
    /// return how many records changed. Already Completed records are left
    /// alone, so repeating the call with the same `now` returns 0.
    async fn close_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait BidStore: Send + Sync {
    /// Store `bid` only if its auction is Active and `placed_at` is before the
    /// deadline. The check and the write must be atomic with respect to
    /// [`AuctionStore::close_expired`], so no bid lands after a close.
    async fn insert(&self, bid: &Bid) -> Result<(), StoreError>;

    async fn list_by_auction(&self, auction_id: AuctionId) -> Result<Vec<Bid>, StoreError>;

    /// The winning bid for an auction, with ties broken by [`winning_bid`].
    /// Engines that can push the query down may override this, but must keep
    /// the same ordering.
    async fn highest_bid(&self, auction_id: AuctionId) -> Result<Option<Bid>, StoreError> {
        let bids = self.list_by_auction(auction_id).await?;
        Ok(winning_bid(&bids).cloned())
    }
}
