//! Wire types for the ESPN fantasy v2 `standings` and `scoreboard` views.
//!
//! Decoding is permissive below the top level: unknown fields are ignored and
//! missing or `null` fields fall back to zero values. The top-level containers
//! (`teams`, `scoreboard`) are required.

use crate::cli::types::{TeamId, Week};
use serde::{Deserialize, Deserializer, Serialize};


/// Treat an explicit `null` the same as a missing field.
fn de_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Root of the `standings` view.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Standings {
    pub teams: Vec<StandingsTeam>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StandingsTeam {
    #[serde(rename = "teamAbbrev", default, deserialize_with = "de_null_default")]
    pub team_abbrev: String,
    #[serde(rename = "teamId", default, deserialize_with = "de_null_default")]
    pub team_id: TeamId,
    /// Co-owners in the order ESPN lists them.
    #[serde(default, deserialize_with = "de_null_default")]
    pub owners: Vec<OwnerRecord>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub record: TeamRecord,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OwnerRecord {
    #[serde(rename = "firstName", default, deserialize_with = "de_null_default")]
    pub first_name: String,
    #[serde(rename = "lastName", default, deserialize_with = "de_null_default")]
    pub last_name: String,
    #[serde(rename = "teamId", default, deserialize_with = "de_null_default")]
    pub team_id: TeamId,
}

/// Season-to-date aggregates. Wins arrive as an integer but are exported as a float gauge.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
pub struct TeamRecord {
    #[serde(rename = "overallWins", default, deserialize_with = "de_null_default")]
    pub overall_wins: f64,
    #[serde(rename = "pointsFor", default, deserialize_with = "de_null_default")]
    pub points_for: f64,
    #[serde(rename = "pointsAgainst", default, deserialize_with = "de_null_default")]
    pub points_against: f64,
}

/// Root of the `scoreboard` view.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScoreboardEnvelope {
    pub scoreboard: Scoreboard,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Scoreboard {
    #[serde(rename = "matchupPeriodId", default, deserialize_with = "de_null_default")]
    pub week: Week,
    #[serde(default, deserialize_with = "de_null_default")]
    pub matchups: Vec<Matchup>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Matchup {
    #[serde(default, deserialize_with = "de_null_default")]
    pub teams: Vec<MatchupSide>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct MatchupSide {
    #[serde(rename = "teamId", default, deserialize_with = "de_null_default")]
    pub team_id: TeamId,
    #[serde(default, deserialize_with = "de_null_default")]
    pub score: f64,
}

/// One matchup side flattened out of the scoreboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreboardEntry {
    pub week: Week,
    pub team_id: TeamId,
    pub score: f64,
}

impl Scoreboard {
    /// Every matchup side for the scoreboard's week, in payload order.
    pub fn entries(&self) -> impl Iterator<Item = ScoreboardEntry> + '_ {
        let week = self.week;
        self.matchups.iter().flat_map(move |matchup| {
            matchup.teams.iter().map(move |side| ScoreboardEntry {
                week,
                team_id: side.team_id,
                score: side.score,
            })
        })
    }
}
