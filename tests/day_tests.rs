//! Day resolution tests.
//!
//! These tests verify the elimination vote:
//! - A unique plurality eliminates
//! - A tie at the top eliminates no one
//! - The day counter advances either way

use werewolf_engine::core::{DeathCause, GameState, Phase, PlayerId, Preset, Role};
use werewolf_engine::rules::{resolve_day, Ballot};

fn six() -> GameState {
    let seats = [
        ("A", Role::Werewolf),
        ("B", Role::Villager),
        ("C", Role::Seer),
        ("D", Role::Werewolf),
        ("E", Role::Villager),
        ("F", Role::Witch),
    ];
    GameState::with_roles(
        seats.iter().map(|(p, r)| (PlayerId::new(*p), *r)),
        Preset::Small,
    )
    .unwrap()
}

fn id(name: &str) -> PlayerId {
    PlayerId::new(name)
}

/// C=3, A=3 is a tie: nobody is eliminated, the day still counts.
#[test]
fn test_tie_eliminates_no_one() {
    let mut state = six();
    let ballot = Ballot::from_pairs([
        ("A", "C"),
        ("B", "C"),
        ("C", "A"),
        ("D", "A"),
        ("E", "C"),
        ("F", "A"),
    ]);

    let report = resolve_day(&mut state, &ballot);

    assert!(report.eliminated.is_none());
    assert!(report.is_tie());
    assert_eq!(report.tied, vec![id("C"), id("A")]);
    assert_eq!(state.alive_count(), 6);
    assert_eq!(state.day_count(), 1);
    assert_eq!(state.phase(), Phase::Night);
}

/// A single top target is eliminated with cause voted_out.
#[test]
fn test_plurality_eliminates() {
    let mut state = six();
    let ballot = Ballot::from_pairs([("A", "B"), ("B", "D"), ("C", "D"), ("E", "B"), ("F", "D")]);

    let report = resolve_day(&mut state, &ballot);

    assert_eq!(report.eliminated, Some(id("D")));
    assert_eq!(state.cause_of_death(&id("D")), Some(DeathCause::VotedOut));
    assert!(state.log().contains("D was voted out during the day"));
}

/// Votes from the dead and for the dead are ignored.
#[test]
fn test_dead_votes_ignored() {
    let mut state = six();
    state.record_death(&id("B"), DeathCause::WerewolfKill);
    state.record_death(&id("E"), DeathCause::WerewolfKill);

    // B and E are dead; without their votes A leads 2-1.
    let ballot = Ballot::from_pairs([
        ("B", "C"),
        ("E", "C"),
        ("C", "A"),
        ("F", "A"),
        ("A", "C"),
        ("D", "E"),
    ]);
    let report = resolve_day(&mut state, &ballot);

    assert_eq!(report.votes.len(), 3);
    assert_eq!(report.rejected.len(), 3);
    assert_eq!(report.eliminated, Some(id("A")));
}

/// Each call advances the day counter exactly once.
#[test]
fn test_day_counter_increments_every_day() {
    let mut state = six();
    for expected in 1..=3 {
        resolve_day(&mut state, &Ballot::new());
        assert_eq!(state.day_count(), expected);
    }
}

/// A later vote by the same voter replaces the earlier one.
#[test]
fn test_revote_replaces() {
    let mut state = six();
    let ballot = Ballot::new()
        .with_vote("A", "B")
        .with_vote("A", "C")
        .with_vote("D", "C");

    let report = resolve_day(&mut state, &ballot);

    assert_eq!(report.eliminated, Some(id("C")));
    assert_eq!(report.tally, vec![(id("C"), 2)]);
}
