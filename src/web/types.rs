use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::context::RequestContext;
use crate::domain::{Auction, AuctionId, AuctionStatus, Bid, BidId, Errors, NewAuction, ProductCondition, UserId};
use crate::money::Amount;
use crate::persistence::AuctionFilter;
use crate::service::{AuctionService, WinningInfo};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AuctionService>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn request_context(&self) -> RequestContext {
        RequestContext::with_timeout(self.request_timeout)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    pub error: String,
    pub code: u16,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            error: status.canonical_reason().unwrap_or("error").to_lowercase().replace(' ', "_"),
            code: status.as_u16(),
        }
    }
}

impl ResponseError for Errors {
    fn status_code(&self) -> StatusCode {
        match self {
            Errors::ValidationFailed(_) | Errors::PreconditionFailed(_) => StatusCode::BAD_REQUEST,
            Errors::NotFound(_) => StatusCode::NOT_FOUND,
            Errors::StoreUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            Errors::Cancelled => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ApiError::new(status, self.to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAuctionRequest {
    pub product_name: String,
    pub category: String,
    pub description: String,
    pub condition: String,
}

impl From<CreateAuctionRequest> for NewAuction {
    fn from(request: CreateAuctionRequest) -> Self {
        NewAuction {
            product_name: request.product_name,
            category: request.category,
            description: request.description,
            condition: request.condition,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BidRequest {
    pub user_id: UserId,
    pub auction_id: AuctionId,
    pub amount: Amount,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuctionQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "productName")]
    pub product_name: Option<String>,
}

impl AuctionQuery {
    pub fn to_filter(&self) -> Result<AuctionFilter, Errors> {
        let status = match non_blank(&self.status) {
            Some(text) => Some(AuctionStatus::from_str(text)?),
            None => None,
        };
        Ok(AuctionFilter {
            status,
            category: non_blank(&self.category).map(str::to_string),
            product_name: non_blank(&self.product_name).map(str::to_string),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|text| !text.is_empty())
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuctionOutput {
    pub id: AuctionId,
    pub product_name: String,
    pub category: String,
    pub description: String,
    pub condition: ProductCondition,
    pub status: AuctionStatus,
    pub timestamp: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
}

impl From<&Auction> for AuctionOutput {
    fn from(auction: &Auction) -> Self {
        AuctionOutput {
            id: auction.id,
            product_name: auction.product_name.clone(),
            category: auction.category.clone(),
            description: auction.description.clone(),
            condition: auction.condition,
            status: auction.status,
            timestamp: auction.created_at,
            deadline: auction.deadline,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BidOutput {
    pub id: BidId,
    pub user_id: UserId,
    pub auction_id: AuctionId,
    pub amount: Amount,
    pub timestamp: DateTime<Utc>,
}

impl From<&Bid> for BidOutput {
    fn from(bid: &Bid) -> Self {
        BidOutput {
            id: bid.id,
            user_id: bid.bidder_id.clone(),
            auction_id: bid.auction_id,
            amount: bid.amount,
            timestamp: bid.placed_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WinningInfoOutput {
    pub auction: AuctionOutput,
    pub bid: BidOutput,
}

impl From<&WinningInfo> for WinningInfoOutput {
    fn from(info: &WinningInfo) -> Self {
        WinningInfoOutput {
            auction: AuctionOutput::from(&info.auction),
            bid: BidOutput::from(&info.bid),
        }
    }
}
