//! # werewolf-engine
//!
//! A deterministic rules engine for a hidden-role social-deduction game
//! (Werewolf/Mafia) with a turn orchestrator.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed, same decisions, same match. Randomness
//!    only enters through `GameRng` (role dealing, random providers).
//!
//! 2. **Decisions Are External**: The engine never picks a move. It asks a
//!    `DecisionProvider`, validates the answer, and treats anything invalid
//!    as "no action".
//!
//! 3. **Capabilities, Not Subclasses**: Roles are a closed enum; what a role
//!    does at night or on death is looked up in a capability table.
//!
//! ## Architecture
//!
//! - **Simultaneous Night**: Guardian → Werewolf → Seer → Witch resolve
//!   against the dusk alive set; deaths apply together at dawn.
//!
//! - **Persistent Data Structures**: O(1) state snapshots via `im`, usable
//!   as per-phase checkpoints.
//!
//! - **Always Terminates**: A match ends with a winner or a draw once the
//!   round budget is spent.
//!
//! ## Modules
//!
//! - `core`: Players, roles, state, RNG, configuration, errors, narrative log
//! - `rules`: Capability table, night/day resolution, win conditions
//! - `provider`: Decision provider trait, retry/backoff, scripted/random/seated providers
//! - `strategy`: Per-role strategy directives loaded from disk
//! - `orchestrator`: The match loop and its summary
//!
//! ## Example
//!
//! ```
//! use werewolf_engine::{MatchConfig, PlayerId, RandomProvider, StrategyStore, TurnOrchestrator};
//!
//! let roster = PlayerId::roster(["A", "B", "C", "D", "E", "F"]);
//! let config = MatchConfig::new().with_seed(3).with_discussion_rounds(0);
//! let mut game =
//!     TurnOrchestrator::new(config, &roster, RandomProvider::new(3), StrategyStore::new()).unwrap();
//!
//! let summary = game.run();
//! assert!(summary.rounds_played <= 20);
//! ```

pub mod core;
pub mod orchestrator;
pub mod provider;
pub mod rules;
pub mod strategy;

// Re-export commonly used types
pub use crate::core::{
    Ability, ConfigurationError, Death, DeathCause, GameRng, GameState,
    InvalidAction, LogEntry, MatchConfig, NarrativeLog, Phase, PlayerId, Population, Preset, Role,
    Team,
};

pub use crate::rules::{
    resolve_day, resolve_night, AttackOutcome, Ballot, DayReport, DecisionKind, MatchResult,
    NightAction, NightActions, NightReport, RulesEngine, StandardRules, WinEvaluator,
};

pub use crate::provider::{
    BackoffConfig, DecisionProvider, DecisionRequest, ProviderError, RandomProvider, RetryPolicy,
    RetryingProvider, ScriptedProvider, SeatedProvider, Speech, SpeechRequest, TransientKind,
};

pub use crate::strategy::{StrategyError, StrategyStore};

pub use crate::orchestrator::{MatchSummary, TurnOrchestrator};
