//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Entry point for the realtime gateway. Subscribes to the shared topic and
// fans every event out to connected WebSocket clients.
//--------------------------------------------------------------------------------------------------
// To run: cargo run --bin gateway
// Advanced: cargo run --bin gateway -- --port 3080
//--------------------------------------------------------------------------------------------------

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::{info, Level};

use broker::Broker;
use hotel_reservation::{
    api,
    config::Config,
    gateway::{self, Relay, DEFAULT_RELAY_CAPACITY},
};

const SUBSCRIPTION: &str = "gateway-sub";

/// CLI options for the gateway
#[derive(Parser, Debug)]
#[command(name = "gateway", about = "Hotel realtime event gateway")]
struct Opt {
    /// HTTP port to listen on
    #[arg(long, default_value_t = 3080)]
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

    info!("Starting gateway");
    let config = Config::from_env();

    let broker = Broker::connect(&config.rabbit_url, &config.app_id)
        .await
        .context("connecting to broker")?;
    let subscription = broker
        .subscribe(&config.topic, SUBSCRIPTION)
        .await
        .context("creating subscription")?;

    let relay = Relay::new(DEFAULT_RELAY_CAPACITY);
    tokio::spawn(gateway::run_relay(relay.clone(), subscription));

    // Serve the WebSocket endpoint
    let app = gateway::router(relay).layer(api::cors_layer(&config.cors_origin));
    let addr = SocketAddr::from(([0, 0, 0, 0], opt.port));
    tokio::spawn(async move {
        if let Err(err) = api::serve(addr, app).await {
            tracing::error!("HTTP server error: {}", err);
        }
    });

    signal::ctrl_c().await?;
    info!("Shutdown signal received, stopping gateway");
    broker.close().await.context("closing broker connection")?;
    Ok(())
}
