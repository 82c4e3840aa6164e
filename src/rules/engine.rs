//! Rules engine: legal targets, phase resolution, termination.
//!
//! `RulesEngine` is the seam the orchestrator drives. `StandardRules`
//! is the only ruleset; it bundles the win evaluator with the night and
//! day resolution functions.

use serde::{Deserialize, Serialize};

use crate::core::{GameState, MatchConfig, PlayerId, Role, Team};

use super::day::{resolve_day, Ballot, DayReport};
use super::night::{resolve_night, NightActions, NightReport};
use super::win::WinEvaluator;

/// Result of a completed match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    /// One team won.
    Winner(Team),
    /// Round budget ran out with no winner.
    Draw,
}

impl MatchResult {
    /// Check if a team won.
    #[must_use]
    pub fn is_winner(&self, team: Team) -> bool {
        matches!(self, MatchResult::Winner(t) if *t == team)
    }

    /// The winning team, `None` on a draw.
    #[must_use]
    pub fn winner(&self) -> Option<Team> {
        match self {
            MatchResult::Winner(team) => Some(*team),
            MatchResult::Draw => None,
        }
    }
}

/// What a decision is for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    /// Guardian: whom to protect.
    Guard,
    /// Werewolf: whom to attack.
    Attack,
    /// Seer: whom to check.
    Inspect,
    /// Witch: `save`, `poison:<id>`, or nothing. Carries tonight's victim.
    Witch { victim: Option<PlayerId> },
    /// Day vote.
    Vote,
    /// Hunter revenge shot.
    Shoot,
}

impl DecisionKind {
    /// Short name for logs and scripts.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            DecisionKind::Guard => "guard",
            DecisionKind::Attack => "attack",
            DecisionKind::Inspect => "inspect",
            DecisionKind::Witch { .. } => "witch",
            DecisionKind::Vote => "vote",
            DecisionKind::Shoot => "shoot",
        }
    }

    /// The night decision a role makes, if any.
    #[must_use]
    pub fn night_for(role: Role) -> Option<DecisionKind> {
        match role {
            Role::Guardian => Some(DecisionKind::Guard),
            Role::Werewolf => Some(DecisionKind::Attack),
            Role::Seer => Some(DecisionKind::Inspect),
            Role::Witch => Some(DecisionKind::Witch { victim: None }),
            Role::Hunter | Role::Villager => None,
        }
    }
}

impl std::fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Rules engine trait.
///
/// The orchestrator calls these methods during play. Resolution must be
/// deterministic for a given state and set of decisions.
pub trait RulesEngine {
    /// The win evaluator in use.
    fn evaluator(&self) -> &WinEvaluator;

    /// Players `actor` may name for `kind`, in seat order.
    ///
    /// Returns empty if the actor is dead, except for a hunter's revenge
    /// shot which is taken after death. Orchestrator-held knowledge (such
    /// as the seer's earlier checks) is applied by the caller.
    fn legal_targets(&self, state: &GameState, actor: &PlayerId, kind: &DecisionKind) -> Vec<PlayerId>;

    /// Resolve one night.
    fn resolve_night(&self, state: &mut GameState, actions: &NightActions) -> NightReport {
        resolve_night(state, actions)
    }

    /// Resolve one day vote.
    fn resolve_day(&self, state: &mut GameState, ballot: &Ballot) -> DayReport {
        resolve_day(state, ballot)
    }

    /// Check if the match is over.
    ///
    /// Returns `Some(result)` if a team has won, `None` if play continues.
    /// A draw is decided by the round budget, never here.
    fn is_terminal(&self, state: &GameState) -> Option<MatchResult> {
        self.evaluator().evaluate(state).map(MatchResult::Winner)
    }
}

/// The standard six-role ruleset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardRules {
    win: WinEvaluator,
}

impl StandardRules {
    /// Rules with default win evaluation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules configured from a match config.
    #[must_use]
    pub fn from_config(config: &MatchConfig) -> Self {
        Self {
            win: WinEvaluator {
                majority_fallback: config.majority_fallback,
            },
        }
    }
}

impl RulesEngine for StandardRules {
    fn evaluator(&self) -> &WinEvaluator {
        &self.win
    }

    fn legal_targets(&self, state: &GameState, actor: &PlayerId, kind: &DecisionKind) -> Vec<PlayerId> {
        if !state.is_alive(actor) && *kind != DecisionKind::Shoot {
            return Vec::new();
        }

        let alive = state.alive_players().into_iter();
        match kind {
            DecisionKind::Guard => {
                let last = state.last_guarded(actor).cloned();
                alive.filter(|p| Some(p) != last.as_ref()).collect()
            }
            DecisionKind::Attack => alive.filter(|p| !state.is_werewolf(p)).collect(),
            DecisionKind::Inspect
            | DecisionKind::Witch { .. }
            | DecisionKind::Vote
            | DecisionKind::Shoot => alive.filter(|p| p != actor).collect(),
        }
    }
}
