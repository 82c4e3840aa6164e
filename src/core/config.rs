//! Match configuration.
//!
//! - `Preset`: role multiset plus win-rule variant, keyed by intended roster size
//! - `MatchConfig`: everything the orchestrator needs at construction
//!
//! Configuration is passed explicitly into the orchestrator; there is no
//! process-wide state.

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Role preset, keyed by intended roster size (6/9/12).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// 6 players: 2 werewolves, 2 villagers, seer, witch.
    Small,
    /// 9 players: 3 werewolves, 3 villagers, seer, witch, hunter.
    Medium,
    /// 12 players: 4 werewolves, 4 villagers, seer, witch, hunter, guardian.
    Large,
}

impl Preset {
    /// Pick the preset whose multiset best fits a roster.
    #[must_use]
    pub const fn for_roster_size(players: usize) -> Preset {
        if players < 9 {
            Preset::Small
        } else if players < 12 {
            Preset::Medium
        } else {
            Preset::Large
        }
    }

    /// Number of roles in the multiset.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Preset::Small => 6,
            Preset::Medium => 9,
            Preset::Large => 12,
        }
    }

    /// The fixed role multiset, before padding or shuffling.
    #[must_use]
    pub fn roles(self) -> Vec<Role> {
        let (wolves, villagers) = match self {
            Preset::Small => (2, 2),
            Preset::Medium => (3, 3),
            Preset::Large => (4, 4),
        };

        let mut roles = Vec::with_capacity(self.size());
        roles.extend(std::iter::repeat(Role::Werewolf).take(wolves));
        roles.extend(std::iter::repeat(Role::Villager).take(villagers));
        roles.push(Role::Seer);
        roles.push(Role::Witch);
        if self != Preset::Small {
            roles.push(Role::Hunter);
        }
        if self == Preset::Large {
            roles.push(Role::Guardian);
        }
        roles
    }

    /// Werewolves must clear both villagers and gods (small) rather than
    /// either group (medium/large).
    #[must_use]
    pub const fn requires_full_wipe(self) -> bool {
        matches!(self, Preset::Small)
    }
}

/// Configuration for one match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Role preset. `None` picks one from the roster size.
    pub preset: Option<Preset>,

    /// Seed for role dealing.
    pub seed: u64,

    /// Night/day cycles before the match is declared a draw.
    pub max_rounds: u32,

    /// Discussion passes over alive players each day.
    pub discussion_rounds: u32,

    /// Narrative entries included in each decision context.
    pub context_events: usize,

    /// Force the "werewolves >= good players" win rule on or off.
    /// `None` applies it on medium and large presets only.
    pub majority_fallback: Option<bool>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            preset: None,
            seed: 0,
            max_rounds: 20,
            discussion_rounds: 3,
            context_events: 5,
            majority_fallback: None,
        }
    }
}

impl MatchConfig {
    /// Create a default match config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the role preset.
    #[must_use]
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = Some(preset);
        self
    }

    /// Set the dealing seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the round budget.
    #[must_use]
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Set discussion passes per day.
    #[must_use]
    pub fn with_discussion_rounds(mut self, rounds: u32) -> Self {
        self.discussion_rounds = rounds;
        self
    }

    /// Set how many recent narrative entries go into decision context.
    #[must_use]
    pub fn with_context_events(mut self, events: usize) -> Self {
        self.context_events = events;
        self
    }

    /// Force the numeric-majority fallback win rule on or off.
    #[must_use]
    pub fn with_majority_fallback(mut self, enabled: bool) -> Self {
        self.majority_fallback = Some(enabled);
        self
    }

    /// The preset actually used for a roster of `players`.
    #[must_use]
    pub fn effective_preset(&self, players: usize) -> Preset {
        self.preset.unwrap_or_else(|| Preset::for_roster_size(players))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(roles: &[Role], role: Role) -> usize {
        roles.iter().filter(|&&r| r == role).count()
    }

    #[test]
    fn test_small_multiset() {
        let roles = Preset::Small.roles();
        assert_eq!(roles.len(), 6);
        assert_eq!(count(&roles, Role::Werewolf), 2);
        assert_eq!(count(&roles, Role::Villager), 2);
        assert_eq!(count(&roles, Role::Seer), 1);
        assert_eq!(count(&roles, Role::Witch), 1);
        assert_eq!(count(&roles, Role::Hunter), 0);
    }

    #[test]
    fn test_medium_multiset() {
        let roles = Preset::Medium.roles();
        assert_eq!(roles.len(), 9);
        assert_eq!(count(&roles, Role::Werewolf), 3);
        assert_eq!(count(&roles, Role::Villager), 3);
        assert_eq!(count(&roles, Role::Hunter), 1);
        assert_eq!(count(&roles, Role::Guardian), 0);
    }

    #[test]
    fn test_large_multiset() {
        let roles = Preset::Large.roles();
        assert_eq!(roles.len(), 12);
        assert_eq!(count(&roles, Role::Werewolf), 4);
        assert_eq!(count(&roles, Role::Villager), 4);
        assert_eq!(count(&roles, Role::Hunter), 1);
        assert_eq!(count(&roles, Role::Guardian), 1);
    }

    #[test]
    fn test_preset_for_roster_size() {
        assert_eq!(Preset::for_roster_size(4), Preset::Small);
        assert_eq!(Preset::for_roster_size(6), Preset::Small);
        assert_eq!(Preset::for_roster_size(9), Preset::Medium);
        assert_eq!(Preset::for_roster_size(11), Preset::Medium);
        assert_eq!(Preset::for_roster_size(12), Preset::Large);
        assert_eq!(Preset::for_roster_size(15), Preset::Large);
    }

    #[test]
    fn test_config_builder() {
        let config = MatchConfig::new()
            .with_preset(Preset::Medium)
            .with_seed(7)
            .with_max_rounds(5)
            .with_discussion_rounds(1)
            .with_majority_fallback(true);

        assert_eq!(config.effective_preset(6), Preset::Medium);
        assert_eq!(config.seed, 7);
        assert_eq!(config.max_rounds, 5);
        assert_eq!(config.discussion_rounds, 1);
        assert_eq!(config.majority_fallback, Some(true));
        assert_eq!(MatchConfig::default().majority_fallback, None);

        assert_eq!(MatchConfig::default().effective_preset(12), Preset::Large);
        assert_eq!(MatchConfig::default().max_rounds, 20);
    }
}
