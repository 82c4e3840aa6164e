//! Win condition tests.
//!
//! These tests verify the population rules per preset:
//! - Small: werewolves must clear villagers and gods
//! - Medium/Large: werewolves need to clear either group, or reach parity
//! - Good wins when no werewolf is alive

use werewolf_engine::core::{DeathCause, GameState, MatchConfig, PlayerId, Preset, Role, Team};
use werewolf_engine::rules::{MatchResult, RulesEngine, StandardRules, WinEvaluator};

fn build(seats: &[(&str, Role)], preset: Preset) -> GameState {
    GameState::with_roles(
        seats.iter().map(|(p, r)| (PlayerId::new(*p), *r)),
        preset,
    )
    .unwrap()
}

fn kill(state: &mut GameState, names: &[&str]) {
    for name in names {
        assert!(state.record_death(&PlayerId::new(*name), DeathCause::WerewolfKill));
    }
}

fn small() -> GameState {
    build(
        &[
            ("A", Role::Werewolf),
            ("B", Role::Werewolf),
            ("C", Role::Villager),
            ("D", Role::Villager),
            ("E", Role::Seer),
            ("F", Role::Witch),
        ],
        Preset::Small,
    )
}

fn medium() -> GameState {
    build(
        &[
            ("W1", Role::Werewolf),
            ("W2", Role::Werewolf),
            ("W3", Role::Werewolf),
            ("V1", Role::Villager),
            ("V2", Role::Villager),
            ("V3", Role::Villager),
            ("S", Role::Seer),
            ("Wi", Role::Witch),
            ("H", Role::Hunter),
        ],
        Preset::Medium,
    )
}

/// Small: only werewolves left ends the game.
#[test]
fn test_small_full_wipe() {
    let mut state = small();
    kill(&mut state, &["C", "D", "E", "F"]);

    assert_eq!(WinEvaluator::new().check(&state), (true, Some(Team::Werewolf)));
}

/// Small: one villager left keeps the game going.
#[test]
fn test_small_one_villager_continues() {
    let mut state = small();
    kill(&mut state, &["D", "E", "F"]);

    assert_eq!(WinEvaluator::new().check(&state), (false, None));
}

/// Small: losing every god is not enough.
#[test]
fn test_small_gods_gone_continues() {
    let mut state = small();
    kill(&mut state, &["E", "F"]);

    assert_eq!(WinEvaluator::new().evaluate(&state), None);
}

/// Medium: all villagers dead while gods live is a werewolf win.
#[test]
fn test_medium_villagers_gone() {
    let mut state = medium();
    kill(&mut state, &["V1", "V2", "V3"]);

    assert_eq!(WinEvaluator::new().check(&state), (true, Some(Team::Werewolf)));
}

/// Medium: all gods dead while villagers live is a werewolf win.
#[test]
fn test_medium_gods_gone() {
    let mut state = medium();
    kill(&mut state, &["S", "Wi", "H"]);

    assert_eq!(WinEvaluator::new().evaluate(&state), Some(Team::Werewolf));
}

/// No werewolves alive is a good-team win, whatever else happened.
#[test]
fn test_good_wins() {
    let mut state = medium();
    kill(&mut state, &["W1", "W2", "W3", "V1", "S"]);

    assert_eq!(WinEvaluator::new().check(&state), (true, Some(Team::Good)));
}

/// Medium: three werewolves against one villager and one god is parity,
/// and the default config ends the match.
#[test]
fn test_medium_parity_ends_match() {
    let mut state = medium();
    kill(&mut state, &["V1", "V2", "S", "Wi"]);

    let rules = StandardRules::from_config(&MatchConfig::default());
    assert_eq!(rules.is_terminal(&state), Some(MatchResult::Winner(Team::Werewolf)));
    assert_eq!(WinEvaluator::new().evaluate(&state), Some(Team::Werewolf));
}

/// The majority rule can be forced off for medium and on for small.
#[test]
fn test_majority_fallback_override() {
    let mut state = medium();
    kill(&mut state, &["V1", "V2", "S", "Wi"]);
    let rules = StandardRules::from_config(&MatchConfig::new().with_majority_fallback(false));
    assert_eq!(rules.is_terminal(&state), None);

    let mut state = small();
    kill(&mut state, &["D", "E", "F"]);
    // 2 werewolves vs 1 villager.
    assert_eq!(WinEvaluator::new().evaluate(&state), None);
    assert_eq!(
        WinEvaluator::new()
            .with_majority_fallback(true)
            .evaluate(&state),
        Some(Team::Werewolf)
    );
}
