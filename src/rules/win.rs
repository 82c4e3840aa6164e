//! Win-condition evaluation.
//!
//! Alive players are split into werewolves, plain villagers and gods
//! (Seer, Witch, Hunter, Guardian). Rules, in order:
//!
//! 1. No werewolves alive: the good team wins.
//! 2. Small preset: werewolves win once villagers AND gods are all dead.
//!    Medium/large presets: werewolves win once villagers OR gods are all
//!    dead.
//! 3. Majority fallback: werewolves win if they are at least as many as
//!    the good players. On by default for medium/large presets, off for
//!    small, where one surviving villager keeps the match going.
//!
//! The small-vs-medium/large difference is part of the ruleset; do not
//! unify it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{GameState, Population, Preset, Team};

/// Population-based win check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinEvaluator {
    /// Forces rule 3 on or off. `None` follows the preset.
    pub majority_fallback: Option<bool>,
}

impl WinEvaluator {
    /// Evaluator with the preset's default fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the numeric-majority fallback on or off for every preset.
    #[must_use]
    pub fn with_majority_fallback(mut self, enabled: bool) -> Self {
        self.majority_fallback = Some(enabled);
        self
    }

    /// Whether rule 3 applies under `preset`.
    #[must_use]
    pub fn majority_applies(&self, preset: Preset) -> bool {
        self.majority_fallback.unwrap_or(!preset.requires_full_wipe())
    }

    /// The winning team, or `None` if the match continues.
    #[must_use]
    pub fn evaluate(&self, state: &GameState) -> Option<Team> {
        let winner = self.evaluate_population(state.preset(), state.population());
        if let Some(team) = winner {
            debug!(team = %team, population = ?state.population(), "win condition met");
        }
        winner
    }

    /// `(ended, winner)` in one call.
    #[must_use]
    pub fn check(&self, state: &GameState) -> (bool, Option<Team>) {
        let winner = self.evaluate(state);
        (winner.is_some(), winner)
    }

    /// Apply the rules to raw counts.
    #[must_use]
    pub fn evaluate_population(&self, preset: Preset, population: Population) -> Option<Team> {
        let Population {
            werewolves,
            villagers,
            gods,
        } = population;

        if werewolves == 0 {
            return Some(Team::Good);
        }

        let wiped = if preset.requires_full_wipe() {
            villagers == 0 && gods == 0
        } else {
            villagers == 0 || gods == 0
        };
        if wiped {
            return Some(Team::Werewolf);
        }

        if self.majority_applies(preset) && werewolves >= population.good() {
            return Some(Team::Werewolf);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pop(werewolves: usize, villagers: usize, gods: usize) -> Population {
        Population {
            werewolves,
            villagers,
            gods,
        }
    }

    #[test]
    fn test_no_werewolves_good_wins() {
        let eval = WinEvaluator::new();
        for preset in [Preset::Small, Preset::Medium, Preset::Large] {
            assert_eq!(eval.evaluate_population(preset, pop(0, 1, 0)), Some(Team::Good));
        }
    }

    #[test]
    fn test_small_requires_both_groups() {
        let eval = WinEvaluator::new();
        assert_eq!(eval.evaluate_population(Preset::Small, pop(2, 0, 0)), Some(Team::Werewolf));
        assert_eq!(eval.evaluate_population(Preset::Small, pop(2, 1, 0)), None);
        assert_eq!(eval.evaluate_population(Preset::Small, pop(1, 0, 2)), None);
    }

    #[test]
    fn test_medium_and_large_either_group() {
        let eval = WinEvaluator::new();
        for preset in [Preset::Medium, Preset::Large] {
            assert_eq!(eval.evaluate_population(preset, pop(3, 0, 3)), Some(Team::Werewolf));
            assert_eq!(eval.evaluate_population(preset, pop(1, 4, 0)), Some(Team::Werewolf));
            assert_eq!(eval.evaluate_population(preset, pop(2, 2, 1)), None);
        }
    }

    #[test]
    fn test_majority_fallback_follows_preset() {
        let eval = WinEvaluator::new();
        assert_eq!(eval.evaluate_population(Preset::Small, pop(2, 1, 0)), None);
        assert_eq!(eval.evaluate_population(Preset::Medium, pop(3, 1, 1)), Some(Team::Werewolf));
        assert_eq!(eval.evaluate_population(Preset::Large, pop(4, 2, 2)), Some(Team::Werewolf));
        assert_eq!(eval.evaluate_population(Preset::Large, pop(3, 2, 2)), None);

        let off = eval.with_majority_fallback(false);
        assert_eq!(off.evaluate_population(Preset::Medium, pop(3, 1, 1)), None);

        let eval = eval.with_majority_fallback(true);
        assert_eq!(eval.evaluate_population(Preset::Small, pop(2, 1, 0)), Some(Team::Werewolf));
        assert_eq!(eval.evaluate_population(Preset::Small, pop(2, 1, 1)), Some(Team::Werewolf));
        assert_eq!(eval.evaluate_population(Preset::Small, pop(1, 1, 1)), None);
    }
}
