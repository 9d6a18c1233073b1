//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Entry point for the booking service. Accepts reservations over HTTP,
// publishes `book` events, and consumes `payment` events to settle
// reservations as paid.
//--------------------------------------------------------------------------------------------------
// To run: cargo run --bin booking
// Advanced: cargo run --bin booking -- --port 3002
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
    events::BrokerEventSink,
    services::booking::{self, BookingSettlement, BookingState},
    store::MemoryBookings,
};

const SERVICE: &str = "booking";
const SUBSCRIPTION: &str = "booking-sub";

/// CLI options for the booking service
#[derive(Parser, Debug)]
#[command(name = "booking", about = "Hotel booking service")]
struct Opt {
    /// HTTP port to listen on
    #[arg(long, default_value_t = 3002)]
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

    info!("Starting booking service");
    let config = Config::from_env();

    let broker = Broker::connect(&config.rabbit_url, &config.app_id)
        .await
        .context("connecting to broker")?;
    let publisher = broker
        .topic_publisher(&config.topic)
        .await
        .context("creating topic publisher")?;
    let subscription = broker
        .subscribe(&config.topic, SUBSCRIPTION)
        .await
        .context("creating subscription")?;

    let bookings = Arc::new(MemoryBookings::default());

    // Consume `payment` events off the shared topic
    let dispatcher = Dispatcher::new(SERVICE, Arc::new(BookingSettlement::new(bookings.clone())));
    tokio::spawn(async move { dispatcher.run(subscription).await });

    // Serve the HTTP API
    let state = Arc::new(BookingState {
        bookings,
        events: Arc::new(BrokerEventSink::new(publisher, config.publish_policy)),
        publish_policy: config.publish_policy,
    });
    let app = booking::router(state).layer(api::cors_layer(&config.cors_origin));
    let addr = SocketAddr::from(([0, 0, 0, 0], opt.port));
    tokio::spawn(async move {
        if let Err(err) = api::serve(addr, app).await {
            tracing::error!("HTTP server error: {}", err);
        }
    });

    signal::ctrl_c().await?;
    info!("Shutdown signal received, stopping booking service");
    broker.close().await.context("closing broker connection")?;
    Ok(())
}
