mod api;
mod cli;
mod router;
mod startup;
mod state;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::sync::Notify;
use tracing::{info, warn};

use flightwatch_core::Config;

use crate::cli::{Cli, Command};
use crate::state::AppState;

/// Resolves once Ctrl-C is received, after waking the poller.
async fn shutdown_signal(poller_stop: Option<Arc<Notify>>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
    if let Some(stop) = poller_stop {
        stop.notify_one();
    }
}

async fn serve(config: &Config, no_poll: bool) -> anyhow::Result<()> {
    let store = startup::open_store(config).await?;

    let poller = if no_poll {
        info!("polling disabled (--no-poll)");
        None
    } else {
        config.validate().context("invalid configuration for polling")?;
        Some(Arc::new(startup::build_poller(config, store.clone())?))
    };

    let state = Arc::new(AppState::new(
        config,
        store,
        poller.as_ref().map(|p| p.last_report()),
    ));
    let app = router::build_router(state, &config.server.cors_origin);

    let poller_task = poller.as_ref().map(|p| {
        let p = p.clone();
        tokio::spawn(async move { p.run().await })
    });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);
    info!("API docs at http://{}/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(poller.as_ref().map(|p| p.shutdown_handle())))
        .await?;

    if let Some(task) = poller_task {
        if let Err(e) = task.await {
            warn!(error = %e, "poller task ended abnormally");
        }
    }
    info!("server stopped");
    Ok(())
}

async fn poll(config: &Config) -> anyhow::Result<()> {
    config.validate().context("invalid configuration for polling")?;
    let store = startup::open_store(config).await?;
    let poller = Arc::new(startup::build_poller(config, store)?);

    tokio::spawn(shutdown_signal(Some(poller.shutdown_handle())));
    poller.run().await;
    Ok(())
}

async fn run_once(config: &Config) -> anyhow::Result<()> {
    config.validate().context("invalid configuration for polling")?;
    let store = startup::open_store(config).await?;
    let poller = startup::build_poller(config, store)?;

    let report = poller.run_cycle().await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.is_clean() {
        warn!(failed_entities = report.failed_entities(), "cycle completed with errors");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Before parsing so `FLIGHTWATCH_PROFILE` can come from .env.
    flightwatch_core::config::load_dotenv();
    let cli = Cli::parse();
    let config = Config::for_profile(&cli.profile);
    config.log_summary();

    match cli.command() {
        Command::Serve { no_poll } => serve(&config, no_poll).await,
        Command::Poll => poll(&config).await,
        Command::RunOnce => run_once(&config).await,
    }
}
