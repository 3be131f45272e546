//! Process-wide gauge store backed by a Prometheus registry.
//!
//! Gauges are last-write-wins per label tuple. Label tuples are never evicted:
//! an owner or week that stops being reported stays visible at its last value
//! until the process restarts.

use prometheus::{Encoder, GaugeVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::cli::types::{LeagueId, Week};
use crate::error::Result;

pub const WINS: &str = "wins";
pub const POINTS_FOR: &str = "pointsFor";
pub const POINTS_AGAINST: &str = "pointsAgainst";
pub const POINTS_WEEK: &str = "pointsWeek";
pub const COLLECTION_FAILURES: &str = "ffl_collection_failures_total";
pub const COLLECTION_LAST_SUCCESS: &str = "ffl_collection_last_success_timestamp_seconds";

/// The season-to-date gauge families, all labeled by `owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonGauge {
    Wins,
    PointsFor,
    PointsAgainst,
}

impl SeasonGauge {
    pub const ALL: [SeasonGauge; 3] = [
        SeasonGauge::Wins,
        SeasonGauge::PointsFor,
        SeasonGauge::PointsAgainst,
    ];

    pub fn metric_name(&self) -> &'static str {
        match self {
            SeasonGauge::Wins => WINS,
            SeasonGauge::PointsFor => POINTS_FOR,
            SeasonGauge::PointsAgainst => POINTS_AGAINST,
        }
    }
}

/// One gauge write. The variant fixes the label set.
#[derive(Debug, Clone, PartialEq)]
pub enum GaugeUpdate {
    Season {
        gauge: SeasonGauge,
        owner: String,
        value: f64,
    },
    Week {
        owner: String,
        week: Week,
        value: f64,
    },
}

pub struct MetricStore {
    registry: Registry,
    /// Serializes batches against each other and against exports.
    guard: Mutex<()>,
    wins: GaugeVec,
    points_for: GaugeVec,
    points_against: GaugeVec,
    points_week: GaugeVec,
    collection_failures: IntCounterVec,
    collection_last_success: GaugeVec,
}

impl MetricStore {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let wins = GaugeVec::new(Opts::new(WINS, "Number of wins on the season."), &["owner"])?;
        registry.register(Box::new(wins.clone()))?;

        let points_for = GaugeVec::new(
            Opts::new(POINTS_FOR, "Points scored this season."),
            &["owner"],
        )?;
        registry.register(Box::new(points_for.clone()))?;

        let points_against = GaugeVec::new(
            Opts::new(POINTS_AGAINST, "Points scored against this season."),
            &["owner"],
        )?;
        registry.register(Box::new(points_against.clone()))?;

        let points_week = GaugeVec::new(
            Opts::new(POINTS_WEEK, "Points scored on a given week."),
            &["owner", "week"],
        )?;
        registry.register(Box::new(points_week.clone()))?;

        let collection_failures = IntCounterVec::new(
            Opts::new(COLLECTION_FAILURES, "Collection cycles that failed, by reason."),
            &["league", "cycle", "kind"],
        )?;
        registry.register(Box::new(collection_failures.clone()))?;

        let collection_last_success = GaugeVec::new(
            Opts::new(
                COLLECTION_LAST_SUCCESS,
                "Unix time of the last successful collection cycle.",
            ),
            &["league", "cycle"],
        )?;
        registry.register(Box::new(collection_last_success.clone()))?;

        Ok(Self {
            registry,
            guard: Mutex::new(()),
            wins,
            points_for,
            points_against,
            points_week,
            collection_failures,
            collection_last_success,
        })
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded value is (), so a poisoned lock holds no broken state.
        self.guard.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn season_vec(&self, gauge: SeasonGauge) -> &GaugeVec {
        match gauge {
            SeasonGauge::Wins => &self.wins,
            SeasonGauge::PointsFor => &self.points_for,
            SeasonGauge::PointsAgainst => &self.points_against,
        }
    }

    fn write(&self, update: &GaugeUpdate) {
        match update {
            GaugeUpdate::Season {
                gauge,
                owner,
                value,
            } => self
                .season_vec(*gauge)
                .with_label_values(&[owner.as_str()])
                .set(*value),
            GaugeUpdate::Week { owner, week, value } => {
                let week = week.to_string();
                self.points_week
                    .with_label_values(&[owner.as_str(), week.as_str()])
                    .set(*value)
            }
        }
    }

    /// Overwrite a single gauge.
    pub fn set(&self, update: &GaugeUpdate) {
        let _guard = self.lock();
        self.write(update);
    }

    /// Overwrite a batch of gauges. A concurrent export sees all of it or none.
    pub fn apply(&self, updates: &[GaugeUpdate]) {
        let _guard = self.lock();
        for update in updates {
            self.write(update);
        }
    }

    pub fn record_failure(&self, league_id: LeagueId, cycle: &str, kind: &str) {
        let league = league_id.to_string();
        self.collection_failures
            .with_label_values(&[league.as_str(), cycle, kind])
            .inc();
    }

    pub fn record_success(&self, league_id: LeagueId, cycle: &str) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        let league = league_id.to_string();
        self.collection_last_success
            .with_label_values(&[league.as_str(), cycle])
            .set(now);
    }

    /// Text exposition format, as served on `/metrics`.
    pub fn export(&self) -> Result<String> {
        let families = {
            let _guard = self.lock();
            self.registry.gather()
        };
        Ok(TextEncoder::new().encode_to_string(&families)?)
    }

    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    /// Current value of a gauge, if that exact label tuple has been written.
    pub fn value(&self, metric: &str, labels: &[(&str, &str)]) -> Option<f64> {
        let families = {
            let _guard = self.lock();
            self.registry.gather()
        };

        families
            .iter()
            .filter(|family| family.get_name() == metric)
            .flat_map(|family| family.get_metric())
            .find(|m| {
                let pairs = m.get_label();
                pairs.len() == labels.len()
                    && labels.iter().all(|(name, value)| {
                        pairs
                            .iter()
                            .any(|p| p.get_name() == *name && p.get_value() == *value)
                    })
            })
            .map(|m| {
                if m.has_counter() {
                    m.get_counter().get_value()
                } else {
                    m.get_gauge().get_value()
                }
            })
    }

    pub fn season_value(&self, gauge: SeasonGauge, owner: &str) -> Option<f64> {
        self.value(gauge.metric_name(), &[("owner", owner)])
    }

    pub fn week_value(&self, owner: &str, week: Week) -> Option<f64> {
        let week = week.to_string();
        self.value(POINTS_WEEK, &[("owner", owner), ("week", week.as_str())])
    }

    /// Number of label tuples currently held by a metric family.
    pub fn series_count(&self, metric: &str) -> usize {
        let _guard = self.lock();
        self.registry
            .gather()
            .iter()
            .filter(|family| family.get_name() == metric)
            .map(|family| family.get_metric().len())
            .sum()
    }
}
