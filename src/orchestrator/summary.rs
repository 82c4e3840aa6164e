//! End-of-match summary.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::{GameState, PlayerId, Role, Team};
use crate::rules::MatchResult;

/// Produced once when a match ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    /// `None` on a draw.
    pub winner: Option<Team>,
    pub rounds_played: u32,
    pub final_roles: BTreeMap<PlayerId, Role>,
    pub survivors: BTreeSet<PlayerId>,
}

impl MatchSummary {
    /// Summarize `state` under `result`.
    #[must_use]
    pub fn from_state(state: &GameState, result: MatchResult) -> Self {
        Self {
            winner: result.winner(),
            rounds_played: state.round(),
            final_roles: state
                .assignments()
                .map(|(player, role)| (player.clone(), role))
                .collect(),
            survivors: state.alive_players().into_iter().collect(),
        }
    }

    #[must_use]
    pub fn result(&self) -> MatchResult {
        self.winner.map_or(MatchResult::Draw, MatchResult::Winner)
    }

    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }

    /// Serialize for export.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DeathCause, Preset};

    #[test]
    fn test_summary_from_state() {
        let seats = [
            ("A", Role::Werewolf),
            ("B", Role::Villager),
            ("C", Role::Seer),
            ("D", Role::Witch),
        ];
        let mut state = GameState::with_roles(
            seats.iter().map(|(p, r)| (PlayerId::new(*p), *r)),
            Preset::Small,
        )
        .unwrap();
        state.begin_round();
        state.record_death(&PlayerId::new("A"), DeathCause::VotedOut);

        let summary = MatchSummary::from_state(&state, MatchResult::Winner(Team::Good));

        assert_eq!(summary.winner, Some(Team::Good));
        assert_eq!(summary.rounds_played, 1);
        assert_eq!(summary.final_roles[&PlayerId::new("C")], Role::Seer);
        assert_eq!(summary.survivors.len(), 3);
        assert!(!summary.survivors.contains(&PlayerId::new("A")));
        assert_eq!(summary.result(), MatchResult::Winner(Team::Good));
    }

    #[test]
    fn test_draw_exports_null_winner() {
        let summary = MatchSummary {
            winner: None,
            rounds_played: 20,
            final_roles: BTreeMap::new(),
            survivors: BTreeSet::new(),
        };

        assert!(summary.is_draw());
        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert!(json["winner"].is_null());
        assert_eq!(json["rounds_played"], 20);
    }
}
