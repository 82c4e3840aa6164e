//! Error types.
//!
//! - `ConfigurationError` — fatal, only at match construction
//! - `InvalidAction` — an ineligible decision; always recovered as "no action"
//!
//! Provider failures live in [`crate::provider::ProviderError`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::player::PlayerId;

/// Minimum roster size for a playable match.
pub const MIN_PLAYERS: usize = 4;

/// Errors raised while creating a match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("need at least {minimum} players to play, got {count}")]
    TooFewPlayers { count: usize, minimum: usize },

    #[error("player id {0} appears more than once in the roster")]
    DuplicatePlayer(PlayerId),
}

/// Single-use witch abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    Antidote,
    Poison,
}

impl std::fmt::Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ability::Antidote => f.write_str("antidote"),
            Ability::Poison => f.write_str("poison"),
        }
    }
}

/// Why a decision was rejected.
///
/// Never surfaced to callers: the engine records it in the narrative log
/// as a declined/invalid event and carries on as if the actor passed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum InvalidAction {
    #[error("{0} cannot act")]
    InactiveActor(PlayerId),

    #[error("{0} is not alive")]
    DeadTarget(PlayerId),

    #[error("{0} is not a legal target")]
    NotLegal(PlayerId),

    #[error("cannot target self")]
    SelfTarget,

    #[error("{0} was guarded last night")]
    RepeatGuard(PlayerId),

    #[error("werewolves cannot attack werewolf {0}")]
    FriendlyFire(PlayerId),

    #[error("the {0} has already been used")]
    AbilityUsed(Ability),

    #[error("there is no victim to save")]
    NoVictim,

    #[error("unrecognized action {0:?}")]
    Malformed(String),

    #[error("no decision given")]
    Declined,
}
