//! Game state: roster, roles, life and death, ability usage.
//!
//! ## Invariants
//!
//! - A player's role never changes after assignment.
//! - The alive set only shrinks.
//! - A cause of death is recorded exactly once, at the moment the player
//!   leaves the alive set, and is never overwritten.
//! - Witch ability flags go false → true and stay there.
//!
//! `GameState` uses `im` for the alive set and narrative log so that
//! [`GameState::snapshot`] is cheap enough to take every phase.

use im::HashSet as ImHashSet;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::config::Preset;
use super::error::{ConfigurationError, MIN_PLAYERS};
use super::log::NarrativeLog;
use super::player::PlayerId;
use super::role::{Role, Team};

/// Informational phase marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Night,
    Day,
    Voting,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Night => f.write_str("night"),
            Phase::Day => f.write_str("day"),
            Phase::Voting => f.write_str("voting"),
        }
    }
}

/// How a player left the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    WerewolfKill,
    WitchPoison,
    VotedOut,
    HunterShot,
}

impl DeathCause {
    /// Stable tag used in logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DeathCause::WerewolfKill => "werewolf_kill",
            DeathCause::WitchPoison => "witch_poison",
            DeathCause::VotedOut => "voted_out",
            DeathCause::HunterShot => "hunter_shot",
        }
    }
}

impl std::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A death applied to the state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Death {
    pub player: PlayerId,
    pub cause: DeathCause,
}

/// Alive players split by win-condition group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Population {
    pub werewolves: usize,
    pub villagers: usize,
    pub gods: usize,
}

impl Population {
    /// Alive good-team players.
    #[must_use]
    pub const fn good(&self) -> usize {
        self.villagers + self.gods
    }
}

/// Complete state of one match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    roster: Vec<PlayerId>,
    roles: FxHashMap<PlayerId, Role>,
    preset: Preset,
    alive: ImHashSet<PlayerId>,
    causes: FxHashMap<PlayerId, DeathCause>,

    /// Current phase marker.
    phase: Phase,
    /// Round set by the orchestrator (0 before the first night).
    round: u32,
    /// Completed day phases.
    day_count: u32,

    witch_antidote_used: bool,
    witch_poison_used: bool,
    /// Guardian → player guarded on the previous night.
    last_guarded: FxHashMap<PlayerId, PlayerId>,

    log: NarrativeLog,
}

impl GameState {
    /// Create a state from explicit role assignments, in seat order.
    ///
    /// Fails if fewer than four players are given or an id repeats.
    pub fn with_roles<I>(assignments: I, preset: Preset) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (PlayerId, Role)>,
    {
        let assignments: Vec<(PlayerId, Role)> = assignments.into_iter().collect();
        validate_roster(assignments.iter().map(|(p, _)| p), assignments.len())?;

        let roster: Vec<PlayerId> = assignments.iter().map(|(p, _)| p.clone()).collect();
        let alive: ImHashSet<PlayerId> = roster.iter().cloned().collect();
        let roles: FxHashMap<PlayerId, Role> = assignments.into_iter().collect();

        let mut state = Self {
            roster,
            roles,
            preset,
            alive,
            causes: FxHashMap::default(),
            phase: Phase::Night,
            round: 0,
            day_count: 0,
            witch_antidote_used: false,
            witch_poison_used: false,
            last_guarded: FxHashMap::default(),
            log: NarrativeLog::new(),
        };

        let dealt: Vec<&str> = state
            .roster
            .iter()
            .filter_map(|p| state.roles.get(p))
            .map(|r| r.name())
            .collect();
        let line = format!("Roles assigned: {}", dealt.join(", "));
        state.record(line);

        Ok(state)
    }

    // === Roster & Roles ===

    /// Players in seat order.
    #[must_use]
    pub fn roster(&self) -> &[PlayerId] {
        &self.roster
    }

    /// Roster size.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.roster.len()
    }

    /// Preset this match was dealt from.
    #[must_use]
    pub fn preset(&self) -> Preset {
        self.preset
    }

    /// A player's role, `None` for unknown ids.
    #[must_use]
    pub fn role_of(&self, player: &PlayerId) -> Option<Role> {
        self.roles.get(player).copied()
    }

    /// True if `player` holds `role`.
    #[must_use]
    pub fn has_role(&self, player: &PlayerId, role: Role) -> bool {
        self.role_of(player) == Some(role)
    }

    /// True if `player` plays for the werewolves.
    #[must_use]
    pub fn is_werewolf(&self, player: &PlayerId) -> bool {
        self.role_of(player).map(Role::team) == Some(Team::Werewolf)
    }

    /// Every player and role, in seat order.
    pub fn assignments(&self) -> impl Iterator<Item = (&PlayerId, Role)> + '_ {
        self.roster
            .iter()
            .filter_map(move |p| self.roles.get(p).map(|r| (p, *r)))
    }

    /// All players (alive or dead) holding `role`, in seat order.
    #[must_use]
    pub fn players_with_role(&self, role: Role) -> Vec<PlayerId> {
        self.roster
            .iter()
            .filter(|p| self.has_role(p, role))
            .cloned()
            .collect()
    }

    // === Life & Death ===

    /// True if `player` is alive.
    #[must_use]
    pub fn is_alive(&self, player: &PlayerId) -> bool {
        self.alive.contains(player)
    }

    /// Alive players in seat order.
    #[must_use]
    pub fn alive_players(&self) -> Vec<PlayerId> {
        self.roster
            .iter()
            .filter(|p| self.alive.contains(*p))
            .cloned()
            .collect()
    }

    /// Alive holders of `role`, in seat order.
    #[must_use]
    pub fn alive_with_role(&self, role: Role) -> Vec<PlayerId> {
        self.roster
            .iter()
            .filter(|p| self.alive.contains(*p) && self.has_role(p, role))
            .cloned()
            .collect()
    }

    /// Number of alive players.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive.len()
    }

    /// Alive players grouped for win evaluation.
    #[must_use]
    pub fn population(&self) -> Population {
        let mut population = Population::default();
        for player in self.roster.iter().filter(|p| self.alive.contains(*p)) {
            match self.role_of(player) {
                Some(Role::Werewolf) => population.werewolves += 1,
                Some(Role::Villager) => population.villagers += 1,
                Some(_) => population.gods += 1,
                None => {}
            }
        }
        population
    }

    /// How `player` died, if they have.
    #[must_use]
    pub fn cause_of_death(&self, player: &PlayerId) -> Option<DeathCause> {
        self.causes.get(player).copied()
    }

    /// Number of recorded deaths.
    #[must_use]
    pub fn death_count(&self) -> usize {
        self.causes.len()
    }

    /// Remove `player` from the alive set with `cause`.
    ///
    /// Returns `false` (and changes nothing) if the player is unknown,
    /// already dead, or already has a recorded cause.
    pub fn record_death(&mut self, player: &PlayerId, cause: DeathCause) -> bool {
        if !self.alive.contains(player) || self.causes.contains_key(player) {
            return false;
        }
        self.causes.insert(player.clone(), cause);
        self.alive.remove(player);
        tracing::debug!(player = %player, cause = %cause, "player died");
        true
    }

    // === Phase & Counters ===

    /// Current phase marker.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Set the phase marker.
    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Current round.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Start the next round; it always begins at night.
    pub fn begin_round(&mut self) -> u32 {
        self.round += 1;
        self.phase = Phase::Night;
        self.round
    }

    /// Completed day phases.
    #[must_use]
    pub fn day_count(&self) -> u32 {
        self.day_count
    }

    pub(crate) fn finish_day(&mut self) {
        self.day_count += 1;
        self.phase = Phase::Night;
    }

    // === Abilities ===

    /// True once the witch's antidote has been spent.
    #[must_use]
    pub fn witch_antidote_used(&self) -> bool {
        self.witch_antidote_used
    }

    /// True once the witch's poison has been spent.
    #[must_use]
    pub fn witch_poison_used(&self) -> bool {
        self.witch_poison_used
    }

    pub(crate) fn consume_antidote(&mut self) {
        self.witch_antidote_used = true;
    }

    pub(crate) fn consume_poison(&mut self) {
        self.witch_poison_used = true;
    }

    /// Who `guardian` protected on the previous night.
    #[must_use]
    pub fn last_guarded(&self, guardian: &PlayerId) -> Option<&PlayerId> {
        self.last_guarded.get(guardian)
    }

    pub(crate) fn set_last_guarded(&mut self, guardian: &PlayerId, target: &PlayerId) {
        self.last_guarded.insert(guardian.clone(), target.clone());
    }

    // === Narrative ===

    /// The narrative log.
    #[must_use]
    pub fn log(&self) -> &NarrativeLog {
        &self.log
    }

    /// Append a narrative entry for the current round and phase.
    pub fn record(&mut self, text: impl Into<String>) {
        self.log.push(self.round, self.phase, text);
    }

    // === Checkpointing ===

    /// Cheap copy of the whole state, for per-phase checkpoints.
    #[must_use]
    pub fn snapshot(&self) -> Self {
        self.clone()
    }
}

/// Reject short rosters and repeated ids.
pub(crate) fn validate_roster<'a>(
    roster: impl Iterator<Item = &'a PlayerId>,
    count: usize,
) -> Result<(), ConfigurationError> {
    if count < MIN_PLAYERS {
        return Err(ConfigurationError::TooFewPlayers {
            count,
            minimum: MIN_PLAYERS,
        });
    }

    let mut seen = FxHashSet::default();
    for player in roster {
        if !seen.insert(player) {
            return Err(ConfigurationError::DuplicatePlayer(player.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn six() -> GameState {
        GameState::with_roles(
            vec![
                (PlayerId::new("A"), Role::Werewolf),
                (PlayerId::new("B"), Role::Werewolf),
                (PlayerId::new("C"), Role::Villager),
                (PlayerId::new("D"), Role::Villager),
                (PlayerId::new("E"), Role::Seer),
                (PlayerId::new("F"), Role::Witch),
            ],
            Preset::Small,
        )
        .unwrap()
    }

    #[test]
    fn test_new_state() {
        let state = six();

        assert_eq!(state.player_count(), 6);
        assert_eq!(state.alive_count(), 6);
        assert_eq!(state.phase(), Phase::Night);
        assert_eq!(state.day_count(), 0);
        assert!(!state.witch_antidote_used());
        assert!(!state.witch_poison_used());
        assert!(state.log().contains("Roles assigned"));
    }

    #[test]
    fn test_too_few_players() {
        let result = GameState::with_roles(
            vec![
                (PlayerId::new("A"), Role::Werewolf),
                (PlayerId::new("B"), Role::Villager),
                (PlayerId::new("C"), Role::Seer),
            ],
            Preset::Small,
        );
        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::TooFewPlayers { count: 3, minimum: 4 }
        );
    }

    #[test]
    fn test_duplicate_player() {
        let result = GameState::with_roles(
            vec![
                (PlayerId::new("A"), Role::Werewolf),
                (PlayerId::new("B"), Role::Villager),
                (PlayerId::new("A"), Role::Seer),
                (PlayerId::new("D"), Role::Witch),
            ],
            Preset::Small,
        );
        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::DuplicatePlayer(PlayerId::new("A"))
        );
    }

    #[test]
    fn test_record_death_once() {
        let mut state = six();
        let c = PlayerId::new("C");

        assert!(state.record_death(&c, DeathCause::VotedOut));
        assert!(!state.record_death(&c, DeathCause::WitchPoison));

        assert_eq!(state.cause_of_death(&c), Some(DeathCause::VotedOut));
        assert_eq!(state.alive_count(), 5);
        assert_eq!(state.death_count(), 1);
        assert!(!state.record_death(&PlayerId::new("nobody"), DeathCause::VotedOut));
    }

    #[test]
    fn test_population() {
        let mut state = six();
        state.record_death(&PlayerId::new("E"), DeathCause::WerewolfKill);

        let population = state.population();
        assert_eq!(population.werewolves, 2);
        assert_eq!(population.villagers, 2);
        assert_eq!(population.gods, 1);
        assert_eq!(population.good(), 3);
    }

    #[test]
    fn test_alive_players_in_seat_order() {
        let mut state = six();
        state.record_death(&PlayerId::new("B"), DeathCause::VotedOut);

        let alive: Vec<_> = state.alive_players().iter().map(|p| p.to_string()).collect();
        assert_eq!(alive, vec!["A", "C", "D", "E", "F"]);
        assert_eq!(state.alive_with_role(Role::Werewolf), vec![PlayerId::new("A")]);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut state = six();
        let before = state.snapshot();

        state.record_death(&PlayerId::new("A"), DeathCause::VotedOut);

        assert!(before.is_alive(&PlayerId::new("A")));
        assert!(!state.is_alive(&PlayerId::new("A")));
    }

    #[test]
    fn test_state_serde() {
        let state = six();
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();

        assert_eq!(back.roster(), state.roster());
        assert_eq!(back.role_of(&PlayerId::new("E")), Some(Role::Seer));
        assert_eq!(back.alive_count(), 6);
    }
}
