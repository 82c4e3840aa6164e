//! Role catalog and team affiliation.
//!
//! The role set is closed. Behaviour per role is looked up through
//! [`crate::rules::capability`], never through the role type itself.

use serde::{Deserialize, Serialize};

/// A player's hidden role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Werewolf,
    Villager,
    Seer,
    Witch,
    Hunter,
    Guardian,
}

impl Role {
    /// Every role, in catalog order.
    pub const ALL: [Role; 6] = [
        Role::Werewolf,
        Role::Villager,
        Role::Seer,
        Role::Witch,
        Role::Hunter,
        Role::Guardian,
    ];

    /// Team this role plays for.
    #[must_use]
    pub const fn team(self) -> Team {
        match self {
            Role::Werewolf => Team::Werewolf,
            _ => Team::Good,
        }
    }

    /// Non-villager good role with a special ability.
    #[must_use]
    pub const fn is_god(self) -> bool {
        matches!(self, Role::Seer | Role::Witch | Role::Hunter | Role::Guardian)
    }

    /// Lowercase name, as used in logs and strategy file names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Role::Werewolf => "werewolf",
            Role::Villager => "villager",
            Role::Seer => "seer",
            Role::Witch => "witch",
            Role::Hunter => "hunter",
            Role::Guardian => "guardian",
        }
    }

    /// Capitalized name for narrative lines.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Role::Werewolf => "Werewolf",
            Role::Villager => "Villager",
            Role::Seer => "Seer",
            Role::Witch => "Witch",
            Role::Hunter => "Hunter",
            Role::Guardian => "Guardian",
        }
    }

    /// Parse a lowercase or capitalized role name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|role| role.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Team affiliation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Good,
    Werewolf,
}

impl Team {
    /// Name used in `[WINNER]` log lines.
    #[must_use]
    pub const fn winner_label(self) -> &'static str {
        match self {
            Team::Good => "villagers",
            Team::Werewolf => "werewolves",
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Team::Good => f.write_str("good"),
            Team::Werewolf => f.write_str("werewolf"),
        }
    }
}
