//! CLI argument definitions and parsing structures.

use super::types::{LeagueId, Season};
use crate::collect::CycleKind;
use crate::config::{AppConfig, LeagueEntry};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Export ESPN fantasy football standings and live scores as Prometheus gauges.
#[derive(Debug, Parser)]
#[command(name = "espn-ffl-exporter", version)]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Override the season year (e.g. 2018).
    #[arg(long, global = true)]
    pub season: Option<Season>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run both collection schedules and serve `/metrics` (the default).
    Serve(ServeArgs),

    /// Run one collection cycle and print the resulting exposition to stdout.
    Collect(CollectArgs),
}

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// Port for the metrics endpoint.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Disable the live scoreboard schedule.
    #[arg(long)]
    pub no_live: bool,
}

#[derive(Debug, Args)]
pub struct CollectArgs {
    /// Which cycle to run.
    #[arg(long, value_enum, default_value_t = CycleKind::Season)]
    pub cycle: CycleKind,

    /// Collect only this league (repeatable), replacing the configured list.
    #[arg(long = "league")]
    pub leagues: Vec<LeagueId>,
}

impl Cli {
    pub fn resolved_command(&self) -> Commands {
        match &self.command {
            Some(Commands::Serve(args)) => Commands::Serve(ServeArgs {
                port: args.port,
                no_live: args.no_live,
            }),
            Some(Commands::Collect(args)) => Commands::Collect(CollectArgs {
                cycle: args.cycle,
                leagues: args.leagues.clone(),
            }),
            None => Commands::Serve(ServeArgs::default()),
        }
    }

    /// Flags win over the file and the environment.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(season) = self.season {
            config.espn.season = season;
        }

        match &self.command {
            Some(Commands::Serve(args)) => {
                if let Some(port) = args.port {
                    config.server.port = port;
                }
                if args.no_live {
                    config.schedule.live_enabled = false;
                }
            }
            Some(Commands::Collect(args)) if !args.leagues.is_empty() => {
                config.leagues = args
                    .leagues
                    .iter()
                    .map(|&id| LeagueEntry { id, included: true })
                    .collect();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_serve() {
        let cli = Cli::parse_from(["espn-ffl-exporter"]);
        assert!(matches!(cli.resolved_command(), Commands::Serve(ServeArgs { port: None, no_live: false })));
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from([
            "espn-ffl-exporter",
            "--log-level",
            "debug",
            "serve",
            "--port",
            "9100",
            "--no-live",
        ]);

        let mut config = AppConfig::with_default_leagues();
        cli.apply_overrides(&mut config);

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.server.port, 9100);
        assert!(!config.schedule.live_enabled);
    }

    #[test]
    fn test_collect_with_leagues_replaces_allow_list() {
        let cli = Cli::parse_from([
            "espn-ffl-exporter",
            "collect",
            "--cycle",
            "live",
            "--league",
            "42",
            "--season",
            "2019",
        ]);

        match cli.resolved_command() {
            Commands::Collect(args) => {
                assert_eq!(args.cycle, CycleKind::Live);
                assert_eq!(args.leagues, vec![LeagueId::new(42)]);
            }
            other => panic!("Expected Collect, got {other:?}"),
        }

        let mut config = AppConfig::with_default_leagues();
        cli.apply_overrides(&mut config);
        assert_eq!(config.espn.season, Season::new(2019));
        assert!(config.allow_list().is_allowed(LeagueId::new(42)));
        assert!(!config.allow_list().is_allowed(LeagueId::new(365177)));
    }

    #[test]
    fn test_collect_defaults_to_season_cycle() {
        let cli = Cli::parse_from(["espn-ffl-exporter", "collect"]);
        match cli.resolved_command() {
            Commands::Collect(args) => {
                assert_eq!(args.cycle, CycleKind::Season);
                assert!(args.leagues.is_empty());
            }
            other => panic!("Expected Collect, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_league_id_is_rejected() {
        let result = Cli::try_parse_from(["espn-ffl-exporter", "collect", "--league", "abc"]);
        assert!(result.is_err());
    }
}
