// src/domain/bids.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::money::Amount;
use super::auctions::Auction;
use super::core::{AuctionId, BidId, Errors, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub id: BidId,
    pub auction_id: AuctionId,
    pub bidder_id: UserId,
    pub amount: Amount,
    pub placed_at: DateTime<Utc>,
}

impl Bid {
    pub fn new(auction_id: AuctionId, bidder_id: UserId, amount: Amount, placed_at: DateTime<Utc>) -> Self {
        Bid {
            id: Uuid::new_v4(),
            auction_id,
            bidder_id,
            amount,
            placed_at,
        }
    }
}

/// Picks the winning bid: highest amount, then earliest `placed_at`, then
/// lowest id. The input order does not matter.
pub fn winning_bid<'a, I>(bids: I) -> Option<&'a Bid>
where
    I: IntoIterator<Item = &'a Bid>,
{
    let mut candidates: Vec<&Bid> = bids.into_iter().collect();
    let highest = candidates.iter().map(|bid| bid.amount).max()?;
    candidates.retain(|bid| bid.amount == highest);
    candidates.sort_by(|a, b| {
        a.placed_at.cmp(&b.placed_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    candidates.into_iter().next()
}

/// A bid counts only while the auction is Active and strictly before its
/// deadline. A bid placed exactly at the deadline is rejected.
pub fn validate_bid(bid: &Bid, auction: &Auction) -> Result<(), Errors> {
    if bid.auction_id != auction.id {
        return Err(Errors::validation("Bid does not belong to this auction"));
    }

    if bid.bidder_id.trim().is_empty() {
        return Err(Errors::validation("Invalid user id"));
    }

    if !auction.accepts_bids_at(bid.placed_at) {
        return Err(Errors::precondition("Auction has ended"));
    }

    Ok(())
}
