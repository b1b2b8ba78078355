use std::sync::Arc;

use clap::Parser;
use dotenv::dotenv;
use foodcast_api::{
    application::{
        http::server::http_server::{router, state},
        logging::init_logging,
    },
    args::Args,
};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();

    let args = Arc::new(Args::parse());
    init_logging(&args.log);

    let app_state = state(args.clone()).await?;
    let router = router(app_state)?;

    let listener = TcpListener::bind(format!("{}:{}", args.server.host, args.server.port)).await?;
    info!(
        address = %listener.local_addr()?,
        root_path = %args.server.root_path,
        "Foodcast API listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
