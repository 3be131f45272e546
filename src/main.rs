//! Entry point: parse CLI, load configuration, and run the exporter.

use anyhow::{Context, Result};
use clap::Parser;
use espn_ffl_exporter::{
    cli::{Cli, CollectArgs, Commands},
    collect::{scheduler, Pipeline},
    config::AppConfig,
    metrics::server,
    MetricStore,
};
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Initialize structured logging. `RUST_LOG` wins over the configured level.
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT (Ctrl+C) signal"),
        _ = terminate => info!("Received SIGTERM signal"),
    }
}

async fn run_serve(config: AppConfig, pipeline: Arc<Pipeline>) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let schedules = scheduler::spawn(Arc::clone(&pipeline), &config.schedule, shutdown_rx.clone());

    let mut server_task = {
        let store = Arc::clone(pipeline.store());
        let settings = config.server.clone();
        tokio::spawn(async move { server::serve(&settings, store, shutdown_rx).await })
    };

    info!(
        season = %config.espn.season,
        leagues = pipeline.allow_list().included().count(),
        live = config.schedule.live_enabled,
        "espn-ffl-exporter running"
    );

    // The server only returns early if it could not bind or crashed.
    let early_exit = tokio::select! {
        _ = wait_for_shutdown_signal() => None,
        res = &mut server_task => Some(res),
    };
    let _ = shutdown_tx.send(true);
    let server_result = match early_exit {
        Some(res) => res,
        None => server_task.await,
    };

    for handle in schedules {
        if let Err(e) = handle.await {
            warn!("Collection schedule ended abnormally: {}", e);
        }
    }
    server_result
        .context("metrics server task panicked")?
        .context("metrics server failed")?;

    info!("espn-ffl-exporter stopped");
    Ok(())
}

async fn run_collect(args: CollectArgs, pipeline: Arc<Pipeline>) -> Result<()> {
    let summary = pipeline.run_all(args.cycle).await;
    print!("{}", pipeline.store().export()?);

    if summary.is_success() {
        Ok(())
    } else {
        let leagues: Vec<String> = summary
            .failures
            .iter()
            .map(|(id, e)| format!("{id} ({})", e.kind()))
            .collect();
        anyhow::bail!("{} cycle failed for {}", args.cycle, leagues.join(", "))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    init_logging(&config.logging.level)?;

    let store = Arc::new(MetricStore::new()?);
    let pipeline = Arc::new(Pipeline::from_config(&config, store)?);

    match cli.resolved_command() {
        Commands::Serve(_) => run_serve(config, pipeline).await,
        Commands::Collect(args) => run_collect(args, pipeline).await,
    }
}
