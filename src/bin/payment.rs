//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Entry point for the payment service. Records transactions over HTTP and
// publishes `payment` events. Consumes nothing.
//--------------------------------------------------------------------------------------------------
// To run: cargo run --bin payment
// Advanced: cargo run --bin payment -- --port 3003
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
    events::BrokerEventSink,
    services::payment::{self, PaymentState},
    store::MemoryPayments,
};

/// CLI options for the payment service
#[derive(Parser, Debug)]
#[command(name = "payment", about = "Hotel payment service")]
struct Opt {
    /// HTTP port to listen on
    #[arg(long, default_value_t = 3003)]
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

    info!("Starting payment service");
    let config = Config::from_env();

    let broker = Broker::connect(&config.rabbit_url, &config.app_id)
        .await
        .context("connecting to broker")?;
    let publisher = broker
        .topic_publisher(&config.topic)
        .await
        .context("creating topic publisher")?;

    // Serve the HTTP API
    let state = Arc::new(PaymentState {
        payments: Arc::new(MemoryPayments::default()),
        events: Arc::new(BrokerEventSink::new(publisher, config.publish_policy)),
        publish_policy: config.publish_policy,
    });
    let app = payment::router(state).layer(api::cors_layer(&config.cors_origin));
    let addr = SocketAddr::from(([0, 0, 0, 0], opt.port));
    tokio::spawn(async move {
        if let Err(err) = api::serve(addr, app).await {
            tracing::error!("HTTP server error: {}", err);
        }
    });

    signal::ctrl_c().await?;
    info!("Shutdown signal received, stopping payment service");
    broker.close().await.context("closing broker connection")?;
    Ok(())
}
