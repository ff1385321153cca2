use std::sync::Arc;

use mimalloc::MiMalloc;
use tokio::signal;
use tracing::{info, warn};

use vigilq::queue::{Broker, BrokerConfig};
use vigilq::{http, telemetry};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const DEFAULT_HTTP_PORT: u16 = 6800;

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                warn!(error = %e, "Failed to install Ctrl+C handler, continuing without it");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler, continuing without it");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();

    let config = BrokerConfig::from_env();
    info!(
        priorities = config.priority_count,
        capacity = config.capacity,
        ack_timeout_ms = config.ack_timeout_ms,
        max_retries = config.max_retries,
        boost_timeout_ms = config.boost_timeout_ms,
        poll_ms = config.poll_interval_ms,
        "Broker configured"
    );

    let broker = Arc::new(Broker::with_error_callback(config, |msg| {
        warn!(message = msg, "broker reported an internal inconsistency");
    }));

    let http_port = std::env::var("HTTP_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_HTTP_PORT);

    let router = http::create_router(Arc::clone(&broker));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", http_port)).await?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = http_port,
        endpoint = %format!("http://0.0.0.0:{}", http_port),
        "vigilq server ready"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Unblocks /pop handlers still parked on the blocking pool.
    broker.shutdown();
    info!("Shutdown complete");

    Ok(())
}
