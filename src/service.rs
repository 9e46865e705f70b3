use chrono::{Duration, Utc};
use log::{error, info};
use std::future::Future;
use std::sync::Arc;

use crate::context::RequestContext;
use crate::domain::{validate_bid, Auction, AuctionId, AuctionStatus, Bid, Errors, NewAuction, UserId};
use crate::money::Amount;
use crate::persistence::{AuctionFilter, AuctionStore, BidStore, StoreError};

/// A completed auction paired with the bid that won it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinningInfo {
    pub auction: Auction,
    pub bid: Bid,
}

/// Runs one store call under `ctx`. Store outages are logged here, once.
async fn call<T, F>(ctx: &RequestContext, operation: F) -> Result<T, Errors>
where
    F: Future<Output = Result<T, StoreError>>,
{
    ctx.run(async move {
        operation.await.map_err(|err| {
            if let StoreError::Unavailable(_) = err {
                error!("{}", err);
            }
            err
        })
    })
    .await
}

pub struct AuctionService {
    auctions: Arc<dyn AuctionStore>,
    bids: Arc<dyn BidStore>,
    auction_duration: Duration,
}

impl AuctionService {
    pub fn new(auctions: Arc<dyn AuctionStore>, bids: Arc<dyn BidStore>, auction_duration: Duration) -> Self {
        AuctionService {
            auctions,
            bids,
            auction_duration,
        }
    }

    pub async fn create_auction(&self, ctx: &RequestContext, input: NewAuction) -> Result<Auction, Errors> {
        let auction = Auction::create(input, Utc::now(), self.auction_duration)?;
        call(ctx, self.auctions.create(&auction)).await?;

        info!(
            "Auction created, id = {}, deadline = {}, duration = {}s",
            auction.id,
            auction.deadline.to_rfc3339(),
            self.auction_duration.num_seconds()
        );
        Ok(auction)
    }

    pub async fn find_auction_by_id(&self, ctx: &RequestContext, id: AuctionId) -> Result<Auction, Errors> {
        call(ctx, self.auctions.get_by_id(id))
            .await?
            .ok_or_else(|| Errors::not_found("Auction not found"))
    }

    pub async fn find_auctions(&self, ctx: &RequestContext, filter: &AuctionFilter) -> Result<Vec<Auction>, Errors> {
        call(ctx, self.auctions.list_by_filter(filter)).await
    }

    /// Resolves the winner of a completed auction. Safe to call repeatedly;
    /// it never changes any record.
    pub async fn find_winning_bid(&self, ctx: &RequestContext, id: AuctionId) -> Result<WinningInfo, Errors> {
        let auction = self.find_auction_by_id(ctx, id).await?;

        if auction.status != AuctionStatus::Completed {
            return Err(Errors::precondition("Auction is not completed yet"));
        }

        let bid = call(ctx, self.bids.highest_bid(id))
            .await?
            .ok_or_else(|| Errors::not_found("No winning bid found for this auction"))?;

        Ok(WinningInfo { auction, bid })
    }

    pub async fn place_bid(
        &self,
        ctx: &RequestContext,
        auction_id: AuctionId,
        bidder_id: UserId,
        amount: Amount,
    ) -> Result<Bid, Errors> {
        let auction = self.find_auction_by_id(ctx, auction_id).await?;
        let bid = Bid::new(auction_id, bidder_id, amount, Utc::now());
        validate_bid(&bid, &auction)?;

        call(ctx, self.bids.insert(&bid)).await?;
        Ok(bid)
    }

    pub async fn find_bids_by_auction(&self, ctx: &RequestContext, auction_id: AuctionId) -> Result<Vec<Bid>, Errors> {
        let mut bids = call(ctx, self.bids.list_by_auction(auction_id)).await?;
        bids.sort_by_key(|bid| (bid.placed_at, bid.id));
        Ok(bids)
    }
}
