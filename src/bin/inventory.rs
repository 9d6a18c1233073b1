//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Entry point for the inventory service. Seeds the room catalog, consumes
// `book` events off the shared topic, and serves the catalog over HTTP.
//--------------------------------------------------------------------------------------------------
// To run: cargo run --bin inventory
// Advanced: cargo run --bin inventory -- --port 3001
//--------------------------------------------------------------------------------------------------

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::{info, Level};

use broker::Broker;
use hotel_reservation::{
    api,
    config::Config,
    dispatch::Dispatcher,
    services::inventory::{self, InventoryState, RoomSettlement},
    store::MemoryRooms,
};

const SERVICE: &str = "inventory";
const SUBSCRIPTION: &str = "inventory-sub";

/// CLI options for the inventory service
#[derive(Parser, Debug)]
#[command(name = "inventory", about = "Hotel inventory service")]
struct Opt {
    /// HTTP port to listen on
    #[arg(long, default_value_t = 3001)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let opt = Opt::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Starting inventory service");
    let config = Config::from_env();

    let rooms = Arc::new(MemoryRooms::default());
    inventory::seed_catalog(rooms.as_ref())
        .await
        .context("seeding room catalog")?;

    // Consume `book` events off the shared topic
    let broker = Broker::connect(&config.rabbit_url, &config.app_id)
        .await
        .context("connecting to broker")?;
    let subscription = broker
        .subscribe(&config.topic, SUBSCRIPTION)
        .await
        .context("creating subscription")?;

    let dispatcher = Dispatcher::new(SERVICE, Arc::new(RoomSettlement::new(rooms.clone())));
    tokio::spawn(async move { dispatcher.run(subscription).await });

    // Serve the HTTP API
    let state = Arc::new(InventoryState { rooms });
    let app = inventory::router(state).layer(api::cors_layer(&config.cors_origin));
    let addr = SocketAddr::from(([0, 0, 0, 0], opt.port));
    tokio::spawn(async move {
        if let Err(err) = api::serve(addr, app).await {
            tracing::error!("HTTP server error: {}", err);
        }
    });

    signal::ctrl_c().await?;
    info!("Shutdown signal received, stopping inventory service");
    broker.close().await.context("closing broker connection")?;
    Ok(())
}
