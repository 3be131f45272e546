//! ESPN fantasy API access: the HTTP client and the wire types it decodes.

pub mod http;
pub mod types;

pub use http::{EspnClient, View};
pub use types::{Scoreboard, ScoreboardEntry, Standings};
