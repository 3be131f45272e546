//! Collection cycles: fetch → resolve → update.
//!
//! A cycle covers one league and one kind of data. Every fetch and every
//! validation happens before the first gauge write, and the writes go to the
//! store as one batch, so a failed cycle leaves that league's gauges exactly
//! as the previous successful cycle left them.

pub mod live;
pub mod scheduler;
pub mod season;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::{debug, error, info, warn};

use crate::cli::types::{LeagueId, Season};
use crate::config::{AllowList, AppConfig};
use crate::error::{EspnError, Result};
use crate::espn::EspnClient;
use crate::league::{resolve, CoOwnerPolicy, LabelCollision, OwnershipMap, ResolvedLeague};
use crate::metrics::MetricStore;

pub use live::collect_live;
pub use season::collect_season;


/// The two independently scheduled kinds of collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum CycleKind {
    /// Standings: wins, points for, points against.
    Season,
    /// Scoreboard: points for the current week.
    Live,
}

impl CycleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleKind::Season => "season",
            CycleKind::Live => "live",
        }
    }
}

impl fmt::Display for CycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one successful league cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub league_id: LeagueId,
    pub kind: CycleKind,
    /// Gauge writes applied. Teams sharing an owner label write the same
    /// series, so this can exceed the number of distinct series.
    pub updates: usize,
    /// The league is not allow-listed; nothing was fetched.
    pub skipped: bool,
    /// Owner labels that more than one team collapsed to this cycle.
    pub collisions: Vec<LabelCollision>,
}

/// Outcome of one cycle across every configured league.
#[derive(Debug, Default)]
pub struct CycleSummary {
    pub reports: Vec<CycleReport>,
    pub failures: Vec<(LeagueId, EspnError)>,
}

impl CycleSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn updates(&self) -> usize {
        self.reports.iter().map(|r| r.updates).sum()
    }
}

/// Everything a cycle needs. Shared by both schedules.
pub struct Pipeline {
    client: EspnClient,
    store: Arc<MetricStore>,
    allow_list: AllowList,
    season: Season,
    policy: CoOwnerPolicy,
    /// Last resolved ownership per league, reused by live cycles.
    ownership: RwLock<HashMap<LeagueId, OwnershipMap>>,
}

impl Pipeline {
    pub fn new(
        client: EspnClient,
        store: Arc<MetricStore>,
        allow_list: AllowList,
        season: Season,
        policy: CoOwnerPolicy,
    ) -> Self {
        Self {
            client,
            store,
            allow_list,
            season,
            policy,
            ownership: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &AppConfig, store: Arc<MetricStore>) -> Result<Self> {
        Ok(Self::new(
            EspnClient::new(&config.espn)?,
            store,
            config.allow_list(),
            config.espn.season,
            config.espn.co_owner_policy,
        ))
    }

    pub fn store(&self) -> &Arc<MetricStore> {
        &self.store
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    pub fn cached_ownership(&self, league_id: LeagueId) -> Option<OwnershipMap> {
        self.ownership
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&league_id)
            .cloned()
    }

    fn cache_ownership(&self, league_id: LeagueId, map: OwnershipMap) {
        self.ownership
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(league_id, map);
    }

    /// Fetch standings, resolve ownership, and refresh the ownership cache.
    pub async fn resolve_league(&self, league_id: LeagueId) -> Result<ResolvedLeague> {
        let standings = self.client.fetch_standings(league_id, self.season).await?;
        let league = resolve(&standings, league_id, &self.allow_list, self.policy)?;
        self.cache_ownership(league_id, league.ownership.clone());
        Ok(league)
    }

    fn skipped(&self, league_id: LeagueId, kind: CycleKind) -> CycleReport {
        debug!(%league_id, cycle = %kind, "league not allow-listed, nothing to collect");
        CycleReport {
            league_id,
            kind,
            updates: 0,
            skipped: true,
            collisions: Vec::new(),
        }
    }

    pub async fn run_season(&self, league_id: LeagueId) -> Result<CycleReport> {
        if !self.allow_list.is_allowed(league_id) {
            return Ok(self.skipped(league_id, CycleKind::Season));
        }

        let league = self.resolve_league(league_id).await?;
        let updates = collect_season(&league);
        self.store.apply(&updates);

        Ok(CycleReport {
            league_id,
            kind: CycleKind::Season,
            updates: updates.len(),
            skipped: false,
            collisions: league.ownership.label_collisions(),
        })
    }

    pub async fn run_live(&self, league_id: LeagueId) -> Result<CycleReport> {
        if !self.allow_list.is_allowed(league_id) {
            return Ok(self.skipped(league_id, CycleKind::Live));
        }

        let ownership = match self.cached_ownership(league_id) {
            Some(map) => map,
            None => self.resolve_league(league_id).await?.ownership,
        };

        let scoreboard = self.client.fetch_scoreboard(league_id, self.season).await?;
        let updates = collect_live(&scoreboard, &ownership);
        self.store.apply(&updates);

        Ok(CycleReport {
            league_id,
            kind: CycleKind::Live,
            updates: updates.len(),
            skipped: false,
            collisions: ownership.label_collisions(),
        })
    }

    pub async fn run_cycle(&self, kind: CycleKind, league_id: LeagueId) -> Result<CycleReport> {
        match kind {
            CycleKind::Season => self.run_season(league_id).await,
            CycleKind::Live => self.run_live(league_id).await,
        }
    }

    /// Run `kind` for every configured league, one after another.
    ///
    /// A failing league is logged and counted, then the next league runs.
    /// Nothing is retried; the next scheduled tick is the retry.
    pub async fn run_all(&self, kind: CycleKind) -> CycleSummary {
        let mut summary = CycleSummary::default();

        for league_id in self.allow_list.configured() {
            match self.run_cycle(kind, league_id).await {
                Ok(report) => {
                    if !report.skipped {
                        self.store.record_success(league_id, kind.as_str());
                        info!(
                            %league_id,
                            cycle = %kind,
                            updates = report.updates,
                            collisions = report.collisions.len(),
                            "collection cycle complete"
                        );
                    }
                    summary.reports.push(report);
                }
                Err(e) => {
                    self.store.record_failure(league_id, kind.as_str(), e.kind());
                    log_failure(league_id, kind, &e);
                    summary.failures.push((league_id, e));
                }
            }
        }

        summary
    }
}

fn log_failure(league_id: LeagueId, kind: CycleKind, e: &EspnError) {
    match e {
        EspnError::AccessDenied { .. } => {
            warn!(%league_id, cycle = %kind, "private league, skipping until next cycle")
        }
        e if e.is_data_error() => {
            error!(%league_id, cycle = %kind, kind = e.kind(), "collection cycle failed: {}", e)
        }
        e => warn!(%league_id, cycle = %kind, kind = e.kind(), "collection cycle failed: {}", e),
    }
}
