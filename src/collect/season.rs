//! Season-to-date collector: wins and points for/against per owner.

use crate::league::ResolvedLeague;
use crate::metrics::{GaugeUpdate, SeasonGauge};

/// Three gauge writes per team. Pure; the caller applies them as one batch.
pub fn collect_season(league: &ResolvedLeague) -> Vec<GaugeUpdate> {
    league
        .teams
        .iter()
        .flat_map(|team| {
            SeasonGauge::ALL.into_iter().map(move |gauge| {
                let value = match gauge {
                    SeasonGauge::Wins => team.stats.wins,
                    SeasonGauge::PointsFor => team.stats.points_for,
                    SeasonGauge::PointsAgainst => team.stats.points_against,
                };
                GaugeUpdate::Season {
                    gauge,
                    owner: team.owner.clone(),
                    value,
                }
            })
        })
        .collect()
}
