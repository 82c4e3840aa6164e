//! Rules: what each role can do and how a phase resolves.
//!
//! - `capability`: role → night step and revenge triggers
//! - `night`: simultaneous night resolution
//! - `day`: vote tally with no-elimination ties
//! - `win`: population-based win conditions
//! - `engine`: the `RulesEngine` seam the orchestrator drives

pub mod capability;
pub mod day;
pub mod engine;
pub mod night;
pub mod win;

pub use capability::{acts_at_night, triggers_revenge, NIGHT_ORDER};
pub use day::{resolve_day, Ballot, DayReport};
pub use engine::{DecisionKind, MatchResult, RulesEngine, StandardRules};
pub use night::{
    resolve_night, tally_attack, AttackOutcome, AttackTally, Inspection, NightAction, NightActions,
    NightReport, Rejection,
};
pub use win::WinEvaluator;
