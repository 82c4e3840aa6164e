//! Decision context handed to providers.
//!
//! The context is opaque text. It carries public facts (round, phase,
//! alive players, recent narrative) plus what this actor privately knows:
//! werewolves see their team, seers see their earlier checks.

use crate::core::{GameState, PlayerId, Role};

/// Render the context for `actor`.
///
/// `recent_events` bounds how much of the narrative log is included;
/// `known_roles` is the actor's private knowledge, empty for most roles.
#[must_use]
pub fn decision_context(
    state: &GameState,
    actor: &PlayerId,
    recent_events: usize,
    known_roles: &[(PlayerId, Role)],
) -> String {
    let alive = state.alive_players();
    let alive_names: Vec<&str> = alive.iter().map(PlayerId::as_str).collect();

    let mut out = format!(
        "Round: {}\nPhase: {}\nDay: {}\n\nAlive Players ({}):\n{}\n",
        state.round(),
        state.phase(),
        state.day_count(),
        alive.len(),
        alive_names.join(", "),
    );

    if state.is_werewolf(actor) {
        let team = state.players_with_role(Role::Werewolf);
        let names: Vec<&str> = team.iter().map(PlayerId::as_str).collect();
        out.push_str(&format!("\nWerewolf team: {}\n", names.join(", ")));
    }

    if !known_roles.is_empty() {
        out.push_str("\nKnown roles:\n");
        for (player, role) in known_roles {
            out.push_str(&format!("  {}: {}\n", player, role));
        }
    }

    out.push_str("\nRecent Events:");
    for entry in state.log().recent(recent_events) {
        out.push('\n');
        out.push_str(&entry.text);
    }
    out
}
