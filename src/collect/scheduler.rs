//! Interval loops that drive the season and live cycles.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use super::{CycleKind, Pipeline};
use crate::config::ScheduleSettings;

/// Run `kind` every `period` until `shutdown` flips to `true`.
///
/// The first cycle runs immediately. A cycle that overruns its period makes
/// the loop skip the missed ticks instead of running back to back.
pub async fn run_every(
    pipeline: Arc<Pipeline>,
    kind: CycleKind,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(cycle = %kind, period_secs = period.as_secs(), "collection schedule started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let summary = pipeline.run_all(kind).await;
                debug!(
                    cycle = %kind,
                    updates = summary.updates(),
                    failures = summary.failures.len(),
                    "scheduled cycle finished"
                );
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!(cycle = %kind, "collection schedule stopped");
}

/// Spawn the season loop, and the live loop when enabled.
pub fn spawn(
    pipeline: Arc<Pipeline>,
    settings: &ScheduleSettings,
    shutdown: watch::Receiver<bool>,
) -> Vec<JoinHandle<()>> {
    let mut handles = vec![tokio::spawn(run_every(
        Arc::clone(&pipeline),
        CycleKind::Season,
        settings.season_interval(),
        shutdown.clone(),
    ))];

    if settings.live_enabled {
        handles.push(tokio::spawn(run_every(
            pipeline,
            CycleKind::Live,
            settings.live_interval(),
            shutdown,
        )));
    }

    handles
}
