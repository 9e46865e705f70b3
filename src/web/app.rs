use actix_web::{web, HttpResponse};
use log::info;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{AuctionId, Errors};
use super::types::{AppState, AuctionOutput, AuctionQuery, BidOutput, BidRequest, CreateAuctionRequest, WinningInfoOutput};

fn parse_auction_id(raw: &str) -> Result<AuctionId, Errors> {
    Uuid::parse_str(raw).map_err(|_| Errors::validation("Invalid auction ID"))
}

// List auctions, optionally filtered
async fn get_auctions(
    query: web::Query<AuctionQuery>,
    data: web::Data<AppState>
) -> Result<HttpResponse, Errors> {
    let filter = query.to_filter()?;
    let ctx = data.request_context();
    let auctions = data.service.find_auctions(&ctx, &filter).await?;

    let auction_list: Vec<AuctionOutput> = auctions
        .iter()
        .map(AuctionOutput::from)
        .collect();

    Ok(HttpResponse::Ok().json(auction_list))
}

// Get auction by ID
async fn get_auction(
    path: web::Path<String>,
    data: web::Data<AppState>
) -> Result<HttpResponse, Errors> {
    let auction_id = parse_auction_id(&path.into_inner())?;
    let ctx = data.request_context();
    let auction = data.service.find_auction_by_id(&ctx, auction_id).await?;

    Ok(HttpResponse::Ok().json(AuctionOutput::from(&auction)))
}

async fn create_auction(
    auction_req: web::Json<CreateAuctionRequest>,
    data: web::Data<AppState>
) -> Result<HttpResponse, Errors> {
    let ctx = data.request_context();
    let auction = data.service.create_auction(&ctx, auction_req.into_inner().into()).await?;

    Ok(HttpResponse::Created().json(AuctionOutput::from(&auction)))
}

async fn get_winning_bid(
    path: web::Path<String>,
    data: web::Data<AppState>
) -> Result<HttpResponse, Errors> {
    let auction_id = parse_auction_id(&path.into_inner())?;
    let ctx = data.request_context();
    let winning = data.service.find_winning_bid(&ctx, auction_id).await?;

    Ok(HttpResponse::Ok().json(WinningInfoOutput::from(&winning)))
}

async fn place_bid(
    bid_req: web::Json<BidRequest>,
    data: web::Data<AppState>
) -> Result<HttpResponse, Errors> {
    let BidRequest { user_id, auction_id, amount } = bid_req.into_inner();
    let ctx = data.request_context();
    let bid = data.service.place_bid(&ctx, auction_id, user_id, amount).await?;

    info!("Bid accepted, auction = {}, amount = {}", bid.auction_id, bid.amount);
    Ok(HttpResponse::Created().json(BidOutput::from(&bid)))
}

async fn get_bids(
    path: web::Path<String>,
    data: web::Data<AppState>
) -> Result<HttpResponse, Errors> {
    let auction_id = parse_auction_id(&path.into_inner())?;
    let ctx = data.request_context();
    let bids = data.service.find_bids_by_auction(&ctx, auction_id).await?;

    let bid_list: Vec<BidOutput> = bids.iter().map(BidOutput::from).collect();
    Ok(HttpResponse::Ok().json(bid_list))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

// Configure routes
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .route("/auction", web::get().to(get_auctions))
            .route("/auction", web::post().to(create_auction))
            .route("/auction/winner/{id}", web::get().to(get_winning_bid))
            .route("/auction/{id}", web::get().to(get_auction))
            .route("/bid", web::post().to(place_bid))
            .route("/bid/{id}", web::get().to(get_bids))
            .route("/health", web::get().to(health))
    );
}
