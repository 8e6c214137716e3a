//! Minimal IRC endpoint - Entry Point
//!
//! Loads configuration, binds the listener and accepts connections
//! until Ctrl-C.

use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use minimal_irc::{Config, Server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=minimal_irc=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("minimal_irc={}", config.log_level))),
        )
        .init();

    // Bind failure aborts startup
    let server = match Server::bind(&config.listen, config.timeouts).await {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };
    info!(
        listen = %config.listen,
        read_timeout = ?config.timeouts.read,
        write_timeout = ?config.timeouts.write,
        "IRC server listening"
    );

    let shutdown = server.shutdown_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
        if shutdown.send(()).is_err() {
            debug!("Shutdown signal had no receivers");
        }
    });

    server.run().await;

    Ok(())
}
