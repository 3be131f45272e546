//! Team → owner display name resolution.
//!
//! ESPN teams can have several co-owners. Exported gauges carry a single
//! `owner` label per team, so the co-owner list is collapsed to one display
//! name, `"{first} {last initial}"`, picked by a [`CoOwnerPolicy`].

use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::cli::types::{LeagueId, TeamId};
use crate::config::AllowList;
use crate::error::{EspnError, Result};
use crate::espn::types::{OwnerRecord, Standings, StandingsTeam};

#[cfg(test)]
mod tests;

/// Which co-owner names a shared team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoOwnerPolicy {
    /// The first owner ESPN lists.
    #[default]
    FirstListed,
    /// The last owner ESPN lists. Matches exporters that overwrite per owner.
    LastListed,
}

/// Season-to-date aggregates carried through from the standings record.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SeasonStats {
    pub wins: f64,
    pub points_for: f64,
    pub points_against: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub id: TeamId,
    pub abbrev: String,
    pub owner: String,
    pub stats: SeasonStats,
}

/// Team id → owner display name for one league and season.
///
/// Built once per collection cycle and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipMap(BTreeMap<TeamId, String>);

impl OwnershipMap {
    pub fn get(&self, team_id: TeamId) -> Option<&str> {
        self.0.get(&team_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, TeamId, String> {
        self.0.iter()
    }

    /// Owner labels shared by more than one team.
    ///
    /// Gauges are keyed by owner, so colliding teams write the same series
    /// and the last team written wins.
    pub fn label_collisions(&self) -> Vec<LabelCollision> {
        let mut by_owner: BTreeMap<&str, Vec<TeamId>> = BTreeMap::new();
        for (team_id, owner) in self.iter() {
            by_owner.entry(owner.as_str()).or_default().push(*team_id);
        }

        by_owner
            .into_iter()
            .filter(|(_, team_ids)| team_ids.len() > 1)
            .map(|(owner, team_ids)| LabelCollision {
                owner: owner.to_string(),
                team_ids,
            })
            .collect()
    }
}

impl FromIterator<(TeamId, String)> for OwnershipMap {
    fn from_iter<I: IntoIterator<Item = (TeamId, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A league after ownership resolution: teams with owners attached, plus the map.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLeague {
    pub id: LeagueId,
    pub teams: Vec<Team>,
    pub ownership: OwnershipMap,
}

impl ResolvedLeague {
    pub fn empty(id: LeagueId) -> Self {
        Self {
            id,
            teams: Vec::new(),
            ownership: OwnershipMap::default(),
        }
    }
}

/// Several teams of one league collapsed to the same owner label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCollision {
    pub owner: String,
    /// Ascending.
    pub team_ids: Vec<TeamId>,
}

/// `"Leland"`, `"Someone"` → `"Leland S"`.
///
/// The initial is the first character of the last name, so multi-byte
/// initials survive intact. A blank last name is rejected.
pub fn display_name(team_id: TeamId, owner: &OwnerRecord) -> Result<String> {
    let first = owner.first_name.trim();
    let initial = owner.last_name.trim().chars().next().ok_or_else(|| {
        EspnError::IncompleteOwnerRecord {
            team_id,
            first_name: owner.first_name.clone(),
        }
    })?;

    if first.is_empty() {
        Ok(initial.to_string())
    } else {
        Ok(format!("{first} {initial}"))
    }
}

/// Collapse a team's co-owners to one display name.
///
/// Every owner record is validated, including the ones the policy does not
/// pick. A team without owners is malformed upstream data.
pub fn collapse_owners(team: &StandingsTeam, policy: CoOwnerPolicy) -> Result<String> {
    let names = team
        .owners
        .iter()
        .map(|owner| display_name(team.team_id, owner))
        .collect::<Result<Vec<_>>>()?;

    let picked = match policy {
        CoOwnerPolicy::FirstListed => names.into_iter().next(),
        CoOwnerPolicy::LastListed => names.into_iter().last(),
    };

    picked.ok_or_else(|| EspnError::malformed(format!("team {} has no owners", team.team_id)))
}

/// Build the resolved league for one standings payload.
///
/// Leagues outside the allow-list resolve to an empty league, which is not an
/// error. Otherwise every team must carry a unique id and at least one
/// complete owner record, or the whole league fails.
pub fn resolve(
    standings: &Standings,
    league_id: LeagueId,
    allow_list: &AllowList,
    policy: CoOwnerPolicy,
) -> Result<ResolvedLeague> {
    if !allow_list.is_allowed(league_id) {
        debug!(%league_id, "league not allow-listed, skipping ownership resolution");
        return Ok(ResolvedLeague::empty(league_id));
    }

    let mut seen = HashSet::with_capacity(standings.teams.len());
    let mut teams = Vec::with_capacity(standings.teams.len());

    for entry in &standings.teams {
        if !seen.insert(entry.team_id) {
            return Err(EspnError::malformed(format!(
                "team {} appears more than once in league {league_id} standings",
                entry.team_id
            )));
        }

        let owner = collapse_owners(entry, policy)?;
        teams.push(Team {
            id: entry.team_id,
            abbrev: entry.team_abbrev.clone(),
            owner,
            stats: SeasonStats {
                wins: entry.record.overall_wins,
                points_for: entry.record.points_for,
                points_against: entry.record.points_against,
            },
        });
    }

    let ownership = teams
        .iter()
        .map(|team| (team.id, team.owner.clone()))
        .collect();

    let league = ResolvedLeague {
        id: league_id,
        teams,
        ownership,
    };

    for collision in league.ownership.label_collisions() {
        let team_ids: Vec<String> = collision.team_ids.iter().map(ToString::to_string).collect();
        warn!(
            %league_id,
            owner = %collision.owner,
            teams = %team_ids.join(","),
            "teams share an owner label, their gauges overwrite each other"
        );
    }

    debug!(%league_id, teams = league.teams.len(), "resolved league ownership");
    Ok(league)
}
