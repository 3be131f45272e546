//! ESPN Fantasy Football Prometheus Exporter
//!
//! Periodically reads season standings and the live scoreboard for a fixed
//! set of public ESPN fantasy leagues, maps team ids to owner names, and
//! republishes the numbers as Prometheus gauges.
//!
//! ## Pipeline
//!
//! - **Upstream client** ([`espn`]): `standings` and `scoreboard` reads, with
//!   private leagues surfaced as [`EspnError::AccessDenied`]
//! - **Ownership resolver** ([`league`]): team id → `"First L"` display name,
//!   restricted to allow-listed leagues
//! - **Collectors** ([`collect`]): season gauges (`wins`, `pointsFor`,
//!   `pointsAgainst`) and weekly gauges (`pointsWeek`), each cycle applied as
//!   one batch
//! - **Metric store** ([`metrics`]): one registry per process, exported on
//!   `/metrics`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use espn_ffl_exporter::{collect::{CycleKind, Pipeline}, config::AppConfig, MetricStore};
//!
//! # async fn example() -> espn_ffl_exporter::Result<()> {
//! let config = AppConfig::with_default_leagues();
//! let store = Arc::new(MetricStore::new()?);
//! let pipeline = Pipeline::from_config(&config, Arc::clone(&store))?;
//!
//! pipeline.run_all(CycleKind::Season).await;
//! println!("{}", store.export()?);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod collect;
pub mod config;
pub mod error;
pub mod espn;
pub mod league;
pub mod metrics;

// Re-export commonly used types
pub use cli::types::{LeagueId, Season, TeamId, Week};
pub use error::{EspnError, Result};
pub use league::{CoOwnerPolicy, OwnershipMap};
pub use metrics::MetricStore;
