//! Type-safe wrappers for ESPN fantasy identifiers.

pub mod ids;
pub mod time;

pub use ids::{LeagueId, TeamId};
pub use time::{Season, Week, DEFAULT_SEASON};
