//! Live collector: per-week points for each owner from the scoreboard.

use tracing::debug;

use crate::espn::types::Scoreboard;
use crate::league::OwnershipMap;
use crate::metrics::GaugeUpdate;

/// One `pointsWeek` write per matchup side whose team has a known owner.
///
/// Sides with an unknown team id are skipped. An empty scoreboard (no
/// matchups yet) yields no writes.
pub fn collect_live(scoreboard: &Scoreboard, ownership: &OwnershipMap) -> Vec<GaugeUpdate> {
    scoreboard
        .entries()
        .filter_map(|entry| match ownership.get(entry.team_id) {
            Some(owner) => Some(GaugeUpdate::Week {
                owner: owner.to_string(),
                week: entry.week,
                value: entry.score,
            }),
            None => {
                debug!(team_id = %entry.team_id, week = %entry.week, "no owner for team, skipping");
                None
            }
        })
        .collect()
}
