//! Service configuration
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! environment variables. CLI flags are applied last by the binary. Nothing
//! here changes after startup.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::Path;
use std::time::Duration;

use crate::cli::types::{LeagueId, Season, DEFAULT_SEASON};
use crate::error::{EspnError, Result};
use crate::league::CoOwnerPolicy;

pub const BASE_URL_ENV_VAR: &str = "ESPN_FFL_BASE_URL";
pub const SEASON_ENV_VAR: &str = "ESPN_FFL_SEASON";
pub const LEAGUES_ENV_VAR: &str = "ESPN_FFL_LEAGUES";
pub const LISTEN_PORT_ENV_VAR: &str = "ESPN_FFL_LISTEN_PORT";
pub const LOG_LEVEL_ENV_VAR: &str = "LOG_LEVEL";

/// ESPN fantasy football v2 read API.
pub const DEFAULT_BASE_URL: &str = "http://games.espn.com/ffl/api/v2";

/// Leagues known to this deployment.
pub const DEFAULT_LEAGUES: [u32; 2] = [365177, 1010746];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub espn: EspnSettings,
    /// A missing `leagues` table means the default leagues; an explicit
    /// empty list allow-lists nothing.
    #[serde(default = "default_leagues")]
    pub leagues: Vec<LeagueEntry>,
    pub schedule: ScheduleSettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EspnSettings {
    pub base_url: String,
    pub season: Season,
    /// Upper bound on a single upstream request, connect through body.
    pub request_timeout_secs: u64,
    /// Which co-owner names a shared team.
    pub co_owner_policy: CoOwnerPolicy,
}

/// One allow-list row. Only `included` leagues are resolved and exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueEntry {
    pub id: LeagueId,
    #[serde(default = "default_included")]
    pub included: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    pub season_interval_secs: u64,
    pub live_interval_secs: u64,
    pub live_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// trace, debug, info, warn, error (or any `EnvFilter` directive)
    pub level: String,
}

fn default_included() -> bool {
    true
}

fn default_leagues() -> Vec<LeagueEntry> {
    DEFAULT_LEAGUES
        .iter()
        .map(|&id| LeagueEntry {
            id: LeagueId::new(id),
            included: true,
        })
        .collect()
}

impl Default for EspnSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            season: Season::new(DEFAULT_SEASON),
            request_timeout_secs: 10,
            co_owner_policy: CoOwnerPolicy::default(),
        }
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            season_interval_secs: 3600,
            live_interval_secs: 30,
            live_enabled: true,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9898,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl EspnSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl ScheduleSettings {
    pub fn season_interval(&self) -> Duration {
        Duration::from_secs(self.season_interval_secs)
    }

    pub fn live_interval(&self) -> Duration {
        Duration::from_secs(self.live_interval_secs)
    }
}

impl AppConfig {
    /// Defaults with the two known leagues allow-listed.
    pub fn with_default_leagues() -> Self {
        Self {
            leagues: default_leagues(),
            ..Self::default()
        }
    }

    /// Parse a TOML document. Sections left out keep their defaults; an
    /// absent `leagues` table keeps the default league list.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| EspnError::config(format!("invalid TOML: {e}")))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Defaults, or the given file, followed by environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::with_default_leagues(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `ESPN_FFL_*` and `LOG_LEVEL` overrides.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|name| env::var(name).ok())
    }

    /// Apply overrides from any variable source, keyed like the environment.
    pub fn apply_vars<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var(BASE_URL_ENV_VAR) {
            self.espn.base_url = url;
        }
        if let Some(season) = var(SEASON_ENV_VAR) {
            self.espn.season = season.parse().map_err(|_| {
                EspnError::config(format!("invalid {SEASON_ENV_VAR} value: {season}"))
            })?;
        }
        if let Some(list) = var(LEAGUES_ENV_VAR) {
            self.leagues = parse_league_list(&list)?;
        }
        if let Some(port) = var(LISTEN_PORT_ENV_VAR) {
            self.server.port = port.parse().map_err(|_| {
                EspnError::config(format!("invalid {LISTEN_PORT_ENV_VAR} value: {port}"))
            })?;
        }
        if let Some(level) = var(LOG_LEVEL_ENV_VAR) {
            self.logging.level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.espn.base_url.trim().is_empty() {
            return Err(EspnError::config("espn.base_url cannot be empty"));
        }
        if self.espn.season.as_u16() == 0 {
            return Err(EspnError::config("espn.season must be positive"));
        }
        if self.espn.request_timeout_secs == 0 {
            return Err(EspnError::config("espn.request_timeout_secs must be positive"));
        }
        if self.schedule.season_interval_secs == 0 || self.schedule.live_interval_secs == 0 {
            return Err(EspnError::config("schedule intervals must be positive"));
        }
        if self.server.port == 0 {
            return Err(EspnError::config("server.port must be positive"));
        }

        let mut seen = HashSet::new();
        for entry in &self.leagues {
            if entry.id.as_u32() == 0 {
                return Err(EspnError::config("league ids must be positive"));
            }
            if !seen.insert(entry.id) {
                return Err(EspnError::config(format!(
                    "league {} is listed more than once",
                    entry.id
                )));
            }
        }
        Ok(())
    }

    pub fn allow_list(&self) -> AllowList {
        AllowList::from_entries(&self.leagues)
    }
}

/// `"365177, 1010746"` → both leagues included.
fn parse_league_list(list: &str) -> Result<Vec<LeagueEntry>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<LeagueId>()
                .map(|id| LeagueEntry { id, included: true })
                .map_err(|_| EspnError::config(format!("invalid league id in {LEAGUES_ENV_VAR}: {s}")))
        })
        .collect()
}

/// The static set of leagues the exporter is allowed to resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    configured: Vec<LeagueEntry>,
}

impl AllowList {
    pub fn from_entries(entries: &[LeagueEntry]) -> Self {
        Self {
            configured: entries.to_vec(),
        }
    }

    /// Shorthand for tests and one-off runs: every id included.
    pub fn of(ids: &[u32]) -> Self {
        Self {
            configured: ids
                .iter()
                .map(|&id| LeagueEntry {
                    id: LeagueId::new(id),
                    included: true,
                })
                .collect(),
        }
    }

    pub fn is_allowed(&self, league_id: LeagueId) -> bool {
        self.configured
            .iter()
            .any(|entry| entry.id == league_id && entry.included)
    }

    /// Every configured league, included or not, in configuration order.
    pub fn configured(&self) -> impl Iterator<Item = LeagueId> + '_ {
        self.configured.iter().map(|entry| entry.id)
    }

    pub fn included(&self) -> impl Iterator<Item = LeagueId> + '_ {
        self.configured
            .iter()
            .filter(|entry| entry.included)
            .map(|entry| entry.id)
    }
}
