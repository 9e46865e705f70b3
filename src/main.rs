use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use auction_lifecycle::config::Settings;
use auction_lifecycle::persistence::json_file::{read_snapshot, write_snapshot};
use auction_lifecycle::persistence::MemoryStore;
use auction_lifecycle::service::AuctionService;
use auction_lifecycle::sweeper::Sweeper;
use auction_lifecycle::web::app::configure_app;
use auction_lifecycle::web::types::AppState;
use log::{error, info};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

// Main application
pub async fn run_app(settings: Settings) -> std::io::Result<()> {
    let store = match &settings.data_file {
        Some(path) => {
            let snapshot = read_snapshot(path)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            info!("Loaded {} auctions and {} bids from {}", snapshot.auctions.len(), snapshot.bids.len(), path.display());
            Arc::new(MemoryStore::from_snapshot(snapshot))
        },
        None => Arc::new(MemoryStore::new()),
    };

    let app_state = AppState {
        service: Arc::new(AuctionService::new(store.clone(), store.clone(), settings.auction_duration_chrono())),
        request_timeout: settings.request_timeout,
    };

    info!("Starting server on port {}", settings.port);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(Logger::default())
            .configure(configure_app)
    })
    .bind(("0.0.0.0", settings.port))?
    .run();

    let cancel = CancellationToken::new();
    let sweeper = Arc::new(
        Sweeper::new(store.clone(), settings.sweep_interval).with_timeout(settings.request_timeout),
    );
    let sweeper_task = {
        let sweeper = sweeper.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { sweeper.run(cancel).await })
    };

    let served = server.await;

    cancel.cancel();
    if let Err(err) = sweeper_task.await {
        error!("Auction sweeper task failed: {}", err);
    }

    if let Some(path) = &settings.data_file {
        if let Err(err) = write_snapshot(path, &store.snapshot().await) {
            error!("Failed to save snapshot to {}: {}", path.display(), err);
        }
    }

    served
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting application...");

    run_app(Settings::from_env()).await
}
