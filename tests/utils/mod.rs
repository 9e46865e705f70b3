#![allow(dead_code)]
use async_trait::async_trait;
use auction_lifecycle::domain::{Auction, AuctionId, Bid, NewAuction};
use auction_lifecycle::money::Amount;
use auction_lifecycle::persistence::{AuctionFilter, AuctionStore, BidStore, MemoryStore, StoreError};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
// See https://users.rust-lang.org/t/sharing-code-and-macros-in-tests-directory/3098/7

// Sample data for tests
pub fn sample_created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 1, 1, 8, 28, 0).unwrap()
}

pub fn sample_duration() -> Duration {
    Duration::hours(24)
}

pub fn sample_deadline() -> DateTime<Utc> {
    sample_created_at() + sample_duration()
}

pub fn sample_input() -> NewAuction {
    NewAuction {
        product_name: "Guitar".to_string(),
        category: "Instruments".to_string(),
        description: "Vintage electric guitar, barely used".to_string(),
        condition: "used".to_string(),
    }
}

pub fn sample_auction() -> Auction {
    Auction::create(sample_input(), sample_created_at(), sample_duration()).unwrap()
}

pub fn auction_named(name: &str, category: &str, created_at: DateTime<Utc>, duration: Duration) -> Auction {
    let input = NewAuction {
        product_name: name.to_string(),
        category: category.to_string(),
        ..sample_input()
    };
    Auction::create(input, created_at, duration).unwrap()
}

pub fn amount(value: f64) -> Amount {
    Amount::new(value).unwrap()
}

pub fn bid_for(auction: &Auction, bidder: &str, value: f64, placed_at: DateTime<Utc>) -> Bid {
    Bid::new(auction.id, bidder.to_string(), amount(value), placed_at)
}

/// Delegates to a `MemoryStore` but makes `close_expired` slow and records
/// how many calls overlapped.
pub struct SlowStore {
    pub inner: MemoryStore,
    pub delay: std::time::Duration,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub calls: AtomicUsize,
}

impl SlowStore {
    pub fn new(inner: MemoryStore, delay: std::time::Duration) -> Self {
        SlowStore {
            inner,
            delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AuctionStore for SlowStore {
    async fn create(&self, auction: &Auction) -> Result<(), StoreError> {
        self.inner.create(auction).await
    }

    async fn get_by_id(&self, id: AuctionId) -> Result<Option<Auction>, StoreError> {
        self.inner.get_by_id(id).await
    }

    async fn list_by_filter(&self, filter: &AuctionFilter) -> Result<Vec<Auction>, StoreError> {
        self.inner.list_by_filter(filter).await
    }

    async fn close_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        let result = self.inner.close_expired(now).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// A store whose sweep fails until `healthy` is set.
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub healthy: AtomicBool,
    pub failures: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        FlakyStore {
            inner,
            healthy: AtomicBool::new(false),
            failures: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AuctionStore for FlakyStore {
    async fn create(&self, auction: &Auction) -> Result<(), StoreError> {
        self.inner.create(auction).await
    }

    async fn get_by_id(&self, id: AuctionId) -> Result<Option<Auction>, StoreError> {
        if !self.healthy.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.inner.get_by_id(id).await
    }

    async fn list_by_filter(&self, filter: &AuctionFilter) -> Result<Vec<Auction>, StoreError> {
        self.inner.list_by_filter(filter).await
    }

    async fn close_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        if !self.healthy.load(Ordering::SeqCst) {
            self.failures.fetch_add(1, Ordering::SeqCst);
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.inner.close_expired(now).await
    }
}

/// Bid side of a shared `MemoryStore` whose inserts arrive `delay` late.
pub struct SlowBids {
    pub inner: Arc<MemoryStore>,
    pub delay: std::time::Duration,
}

#[async_trait]
impl BidStore for SlowBids {
    async fn insert(&self, bid: &Bid) -> Result<(), StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert(bid).await
    }

    async fn list_by_auction(&self, auction_id: AuctionId) -> Result<Vec<Bid>, StoreError> {
        self.inner.list_by_auction(auction_id).await
    }
}

/// Polls `check` until it returns true or `attempts` run out.
pub async fn eventually<F, Fut>(attempts: usize, pause: std::time::Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..attempts {
        if check().await {
            return true;
        }
        tokio::time::sleep(pause).await;
    }
    false
}

pub fn shared_memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}
