//! Unit tests for ownership resolution

use super::*;
use crate::espn::types::TeamRecord;
use serde_json::json;

fn owner(first: &str, last: &str) -> OwnerRecord {
    OwnerRecord {
        first_name: first.to_string(),
        last_name: last.to_string(),
        team_id: TeamId::default(),
    }
}

fn team(id: u32, owners: Vec<OwnerRecord>) -> StandingsTeam {
    StandingsTeam {
        team_abbrev: format!("T{id}"),
        team_id: TeamId::new(id),
        owners,
        record: TeamRecord {
            overall_wins: id as f64,
            points_for: 100.0 + id as f64,
            points_against: 90.0,
        },
    }
}

fn allowed() -> AllowList {
    AllowList::of(&[365177])
}

const LOEG: LeagueId = LeagueId(365177);

#[cfg(test)]
mod display_name_tests {
    use super::*;

    #[test]
    fn test_first_name_and_last_initial() {
        let name = display_name(TeamId::new(12), &owner("Leland", "Someone")).unwrap();
        assert_eq!(name, "Leland S");
    }

    #[test]
    fn test_multibyte_initial() {
        let name = display_name(TeamId::new(1), &owner("Zoë", "Østergaard")).unwrap();
        assert_eq!(name, "Zoë Ø");
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let name = display_name(TeamId::new(1), &owner(" Ann ", "  lee")).unwrap();
        assert_eq!(name, "Ann l");
    }

    #[test]
    fn test_empty_last_name_is_incomplete() {
        let err = display_name(TeamId::new(9), &owner("Leland", "")).unwrap_err();
        match err {
            EspnError::IncompleteOwnerRecord {
                team_id,
                first_name,
            } => {
                assert_eq!(team_id, TeamId::new(9));
                assert_eq!(first_name, "Leland");
            }
            other => panic!("Expected IncompleteOwnerRecord, got {other:?}"),
        }

        assert!(display_name(TeamId::new(9), &owner("Leland", "   ")).is_err());
    }

    #[test]
    fn test_missing_first_name_keeps_initial() {
        let name = display_name(TeamId::new(1), &owner("", "Smith")).unwrap();
        assert_eq!(name, "S");
    }
}

#[cfg(test)]
mod collapse_tests {
    use super::*;

    #[test]
    fn test_first_listed_wins_by_default() {
        let t = team(4, vec![owner("Pat", "Jones"), owner("Sam", "Kim")]);
        assert_eq!(
            collapse_owners(&t, CoOwnerPolicy::default()).unwrap(),
            "Pat J"
        );
    }

    #[test]
    fn test_last_listed_policy() {
        let t = team(4, vec![owner("Pat", "Jones"), owner("Sam", "Kim")]);
        assert_eq!(
            collapse_owners(&t, CoOwnerPolicy::LastListed).unwrap(),
            "Sam K"
        );
    }

    #[test]
    fn test_incomplete_co_owner_fails_even_if_not_picked() {
        let t = team(4, vec![owner("Pat", "Jones"), owner("Sam", "")]);
        let err = collapse_owners(&t, CoOwnerPolicy::FirstListed).unwrap_err();
        assert_eq!(err.kind(), "incomplete_owner_record");
    }

    #[test]
    fn test_no_owners_is_malformed() {
        let t = team(4, vec![]);
        let err = collapse_owners(&t, CoOwnerPolicy::FirstListed).unwrap_err();
        assert!(matches!(err, EspnError::MalformedResponse { .. }));
        assert!(err.to_string().contains("team 4"));
    }

    #[test]
    fn test_policy_deserializes_kebab_case() {
        let policy: CoOwnerPolicy = serde_json::from_value(json!("last-listed")).unwrap();
        assert_eq!(policy, CoOwnerPolicy::LastListed);
    }
}

#[cfg(test)]
mod resolve_tests {
    use super::*;

    #[test]
    fn test_single_team_scenario() {
        let standings: Standings = serde_json::from_value(json!({
            "teams": [
                {
                    "teamId": 12,
                    "teamAbbrev": "LEL",
                    "owners": [ { "firstName": "Leland", "lastName": "Someone" } ],
                    "record": { "overallWins": 5, "pointsFor": 620.4, "pointsAgainst": 580.1 }
                }
            ]
        }))
        .unwrap();

        let league = resolve(&standings, LOEG, &allowed(), CoOwnerPolicy::default()).unwrap();

        assert_eq!(league.id, LOEG);
        assert_eq!(league.ownership.len(), 1);
        assert_eq!(league.ownership.get(TeamId::new(12)), Some("Leland S"));
        assert_eq!(
            league.teams,
            vec![Team {
                id: TeamId::new(12),
                abbrev: "LEL".to_string(),
                owner: "Leland S".to_string(),
                stats: SeasonStats {
                    wins: 5.0,
                    points_for: 620.4,
                    points_against: 580.1,
                },
            }]
        );
    }

    #[test]
    fn test_one_entry_per_team() {
        let standings = Standings {
            teams: (1..=10)
                .map(|id| team(id, vec![owner("Owner", &format!("Number{id}")), owner("Co", "Owner")]))
                .collect(),
        };

        let league = resolve(&standings, LOEG, &allowed(), CoOwnerPolicy::default()).unwrap();

        assert_eq!(league.ownership.len(), 10);
        assert_eq!(league.teams.len(), 10);
        for id in 1..=10 {
            assert_eq!(league.ownership.get(TeamId::new(id)), Some("Owner N"));
        }

        let collisions = league.ownership.label_collisions();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].team_ids.len(), 10);
    }

    #[test]
    fn test_shared_owner_label_is_reported() {
        let standings = Standings {
            teams: vec![
                team(1, vec![owner("John", "Smith")]),
                team(2, vec![owner("John", "Stone")]),
                team(3, vec![owner("Jane", "Smith")]),
            ],
        };

        let league = resolve(&standings, LOEG, &allowed(), CoOwnerPolicy::default()).unwrap();

        // Both teams keep their own entry; only the label is shared.
        assert_eq!(league.ownership.len(), 3);
        assert_eq!(
            league.ownership.label_collisions(),
            vec![LabelCollision {
                owner: "John S".to_string(),
                team_ids: vec![TeamId::new(1), TeamId::new(2)],
            }]
        );
    }

    #[test]
    fn test_distinct_labels_have_no_collisions() {
        let standings = Standings {
            teams: vec![
                team(1, vec![owner("John", "Smith")]),
                team(2, vec![owner("Jane", "Smith")]),
            ],
        };

        let league = resolve(&standings, LOEG, &allowed(), CoOwnerPolicy::default()).unwrap();
        assert!(league.ownership.label_collisions().is_empty());
        assert!(ResolvedLeague::empty(LOEG).ownership.label_collisions().is_empty());
    }

    #[test]
    fn test_not_allow_listed_resolves_empty() {
        let standings = Standings {
            teams: vec![team(1, vec![owner("Ann", "Lee")])],
        };

        let league = resolve(
            &standings,
            LeagueId::new(999),
            &allowed(),
            CoOwnerPolicy::default(),
        )
        .unwrap();

        assert!(league.ownership.is_empty());
        assert!(league.teams.is_empty());
    }

    #[test]
    fn test_excluded_entry_resolves_empty() {
        let allow = AllowList::from_entries(&[crate::config::LeagueEntry {
            id: LOEG,
            included: false,
        }]);
        let standings = Standings {
            teams: vec![team(1, vec![owner("Ann", "Lee")])],
        };

        let league = resolve(&standings, LOEG, &allow, CoOwnerPolicy::default()).unwrap();
        assert!(league.ownership.is_empty());
    }

    #[test]
    fn test_not_allow_listed_skips_validation() {
        let standings = Standings {
            teams: vec![team(1, vec![])],
        };

        let league = resolve(
            &standings,
            LeagueId::new(999),
            &allowed(),
            CoOwnerPolicy::default(),
        )
        .unwrap();
        assert!(league.teams.is_empty());
    }

    #[test]
    fn test_duplicate_team_id_is_malformed() {
        let standings = Standings {
            teams: vec![
                team(3, vec![owner("Ann", "Lee")]),
                team(3, vec![owner("Bob", "Ray")]),
            ],
        };

        let err = resolve(&standings, LOEG, &allowed(), CoOwnerPolicy::default()).unwrap_err();
        assert!(matches!(err, EspnError::MalformedResponse { .. }));
    }

    #[test]
    fn test_one_bad_team_fails_whole_league() {
        let standings = Standings {
            teams: vec![
                team(1, vec![owner("Ann", "Lee")]),
                team(2, vec![owner("Bob", "")]),
            ],
        };

        let err = resolve(&standings, LOEG, &allowed(), CoOwnerPolicy::default()).unwrap_err();
        assert_eq!(err.kind(), "incomplete_owner_record");
    }

    #[test]
    fn test_empty_standings_resolve_empty() {
        let standings = Standings { teams: vec![] };
        let league = resolve(&standings, LOEG, &allowed(), CoOwnerPolicy::default()).unwrap();
        assert!(league.ownership.is_empty());
    }
}
