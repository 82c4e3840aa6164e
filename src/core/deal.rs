//! Role dealing.
//!
//! The preset multiset is padded with villagers up to the roster size,
//! shuffled, and zipped onto the roster in seat order. A roster shorter
//! than the multiset simply leaves the trailing roles undealt.

use super::config::Preset;
use super::error::ConfigurationError;
use super::player::PlayerId;
use super::rng::GameRng;
use super::role::Role;
use super::state::{validate_roster, GameState};

/// Deal roles from `preset` onto `roster`.
pub fn deal_roles(
    roster: &[PlayerId],
    preset: Preset,
    rng: &mut GameRng,
) -> Result<Vec<(PlayerId, Role)>, ConfigurationError> {
    validate_roster(roster.iter(), roster.len())?;

    let mut roles = preset.roles();
    if roster.len() > roles.len() {
        roles.resize(roster.len(), Role::Villager);
    }
    rng.shuffle(&mut roles);

    Ok(roster.iter().cloned().zip(roles).collect())
}

impl GameState {
    /// Create a state with roles dealt from `preset` using `seed`.
    ///
    /// ```
    /// use werewolf_engine::core::{GameState, PlayerId, Preset};
    ///
    /// let roster = PlayerId::roster(["A", "B", "C", "D", "E", "F"]);
    /// let state = GameState::deal(&roster, Preset::Small, 42).unwrap();
    /// assert_eq!(state.alive_count(), 6);
    /// ```
    pub fn deal(roster: &[PlayerId], preset: Preset, seed: u64) -> Result<Self, ConfigurationError> {
        let mut rng = GameRng::new(seed).for_context("roles");
        let assignments = deal_roles(roster, preset, &mut rng)?;
        GameState::with_roles(assignments, preset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<PlayerId> {
        (0..n).map(|i| PlayerId::new(format!("P{}", i))).collect()
    }

    fn count(dealt: &[(PlayerId, Role)], role: Role) -> usize {
        dealt.iter().filter(|(_, r)| *r == role).count()
    }

    #[test]
    fn test_deal_small() {
        let mut rng = GameRng::new(1);
        let dealt = deal_roles(&names(6), Preset::Small, &mut rng).unwrap();

        assert_eq!(dealt.len(), 6);
        assert_eq!(count(&dealt, Role::Werewolf), 2);
        assert_eq!(count(&dealt, Role::Villager), 2);
        assert_eq!(count(&dealt, Role::Seer), 1);
        assert_eq!(count(&dealt, Role::Witch), 1);
    }

    #[test]
    fn test_deal_pads_with_villagers() {
        let mut rng = GameRng::new(1);
        let dealt = deal_roles(&names(8), Preset::Small, &mut rng).unwrap();

        assert_eq!(dealt.len(), 8);
        assert_eq!(count(&dealt, Role::Werewolf), 2);
        assert_eq!(count(&dealt, Role::Villager), 4);
    }

    #[test]
    fn test_deal_short_roster_truncates() {
        let mut rng = GameRng::new(1);
        let dealt = deal_roles(&names(4), Preset::Small, &mut rng).unwrap();
        assert_eq!(dealt.len(), 4);
    }

    #[test]
    fn test_deal_keeps_seat_order() {
        let roster = names(9);
        let mut rng = GameRng::new(5);
        let dealt = deal_roles(&roster, Preset::Medium, &mut rng).unwrap();

        let seats: Vec<_> = dealt.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(seats, roster);
    }

    #[test]
    fn test_deal_is_seeded() {
        let roster = names(12);
        let a = GameState::deal(&roster, Preset::Large, 77).unwrap();
        let b = GameState::deal(&roster, Preset::Large, 77).unwrap();

        let left: Vec<_> = a.assignments().map(|(_, r)| r).collect();
        let right: Vec<_> = b.assignments().map(|(_, r)| r).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_deal_rejects_three_players() {
        let mut rng = GameRng::new(1);
        let err = deal_roles(&names(3), Preset::Small, &mut rng).unwrap_err();
        assert!(matches!(err, ConfigurationError::TooFewPlayers { count: 3, .. }));
    }
}
