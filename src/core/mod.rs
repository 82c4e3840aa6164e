//! Core types: players, roles, state, RNG, configuration, errors.
//!
//! Everything here is independent of how decisions are made. The rules
//! engines in [`crate::rules`] are the only code that mutates a
//! `GameState` during play.

pub mod config;
pub mod deal;
pub mod error;
pub mod log;
pub mod player;
pub mod rng;
pub mod role;
pub mod state;

pub use config::{MatchConfig, Preset};
pub use deal::deal_roles;
pub use error::{Ability, ConfigurationError, InvalidAction, MIN_PLAYERS};
pub use log::{LogEntry, NarrativeLog};
pub use player::PlayerId;
pub use rng::GameRng;
pub use role::{Role, Team};
pub use state::{Death, DeathCause, GameState, Phase, Population};
