//! Environmental Station Monitor - Main Entry Point

use anyhow::{anyhow, bail, Context};
use api::{create_router, init_logging, shutdown_signal, AppConfig, AppState};
use metrics_exporter_prometheus::PrometheusBuilder;
use poller::{PollerConfig, PollingLoop};
use sensors::Station;
use std::future::IntoFuture;
use std::process::ExitCode;
use std::sync::Arc;
use storage::Repository;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("station-monitor: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_logging(&config.log).map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    info!("=== Station Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install metrics recorder")?;

    let repository =
        Repository::connect(&config.database).context("invalid database configuration")?;
    match repository.ping().await {
        Ok(()) => info!("Database reachable"),
        Err(e) => warn!("Database not reachable yet, inserts will fail until it is: {}", e),
    }

    let station = Station::new();
    info!("Station ready with {} sensors", station.sensor_count());

    let mut poller = PollingLoop::new(
        station,
        repository.clone(),
        PollerConfig::from_secs(config.polling.interval_secs),
    )?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut poller_handle = tokio::spawn(async move {
        poller.run(shutdown_rx).await;
    });

    let state = Arc::new(AppState::new(repository.clone()).with_metrics(metrics));
    let listener = TcpListener::bind(&config.server.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.addr))?;
    info!("API listening on {}", config.server.addr);

    let server = axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    tokio::select! {
        result = server => {
            result.context("API server failed")?;
        }
        joined = &mut poller_handle => {
            if let Err(e) = joined {
                error!("Polling loop terminated unexpectedly: {}", e);
            }
            repository.close().await;
            bail!("polling loop exited before shutdown");
        }
    }

    info!("Stopping polling loop");
    // the receiver is gone if the loop already returned
    let _ = shutdown_tx.send(true);
    if let Err(e) = poller_handle.await {
        error!("Polling loop panicked during shutdown: {}", e);
    }

    repository.close().await;
    info!("Shutdown complete");
    Ok(())
}
