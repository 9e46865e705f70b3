// src/persistence/memory.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::{Auction, AuctionId, AuctionStatus, Bid, State};
use super::json_file::Snapshot;
use super::{AuctionFilter, AuctionStore, BidStore, StoreError};

#[derive(Debug, Default)]
struct Records {
    auctions: HashMap<AuctionId, Auction>,
    bids: HashMap<AuctionId, Vec<Bid>>,
}

/// In-process engine backing both store contracts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut records = Records::default();
        for auction in snapshot.auctions {
            records.auctions.insert(auction.id, auction);
        }
        for bid in snapshot.bids {
            records.bids.entry(bid.auction_id).or_default().push(bid);
        }
        MemoryStore {
            records: RwLock::new(records),
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        let records = self.records.read().await;
        let mut auctions: Vec<Auction> = records.auctions.values().cloned().collect();
        auctions.sort_by_key(|auction| (auction.created_at, auction.id));
        let mut bids: Vec<Bid> = records.bids.values().flatten().cloned().collect();
        bids.sort_by_key(|bid| (bid.placed_at, bid.id));
        Snapshot { auctions, bids }
    }
}

#[async_trait]
impl AuctionStore for MemoryStore {
    async fn create(&self, auction: &Auction) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.auctions.contains_key(&auction.id) {
            return Err(StoreError::Conflict(auction.id.to_string()));
        }
        records.auctions.insert(auction.id, auction.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: AuctionId) -> Result<Option<Auction>, StoreError> {
        Ok(self.records.read().await.auctions.get(&id).cloned())
    }

    async fn list_by_filter(&self, filter: &AuctionFilter) -> Result<Vec<Auction>, StoreError> {
        let records = self.records.read().await;
        let mut found: Vec<Auction> = records.auctions
            .values()
            .filter(|auction| filter.matches(auction))
            .cloned()
            .collect();
        found.sort_by_key(|auction| (auction.created_at, auction.id));
        Ok(found)
    }

    async fn close_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut records = self.records.write().await;
        let mut closed = 0;
        for auction in records.auctions.values_mut() {
            if auction.status != AuctionStatus::Active {
                continue;
            }
            let next = auction.inc(now);
            if next.has_ended() {
                *auction = next;
                closed += 1;
            }
        }
        Ok(closed)
    }
}

#[async_trait]
impl BidStore for MemoryStore {
    async fn insert(&self, bid: &Bid) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        match records.auctions.get(&bid.auction_id) {
            None => return Err(StoreError::Missing(bid.auction_id.to_string())),
            Some(auction) if !auction.accepts_bids_at(bid.placed_at) => {
                return Err(StoreError::Closed(bid.auction_id.to_string()));
            },
            Some(_) => {},
        }
        records.bids.entry(bid.auction_id).or_default().push(bid.clone());
        Ok(())
    }

    async fn list_by_auction(&self, auction_id: AuctionId) -> Result<Vec<Bid>, StoreError> {
        let records = self.records.read().await;
        Ok(records.bids.get(&auction_id).cloned().unwrap_or_default())
    }
}
