//! Day resolution: the elimination vote.
//!
//! Each alive player may vote for one other alive player. A unique
//! plurality eliminates its target; any tie at the top eliminates no one.
//! There is never a random tie-break.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::log::tags;
use crate::core::{DeathCause, GameState, InvalidAction, Phase, PlayerId};

use super::night::Rejection;

/// Voter → target for one day.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Ballot {
    votes: FxHashMap<PlayerId, PlayerId>,
}

impl Ballot {
    /// An empty ballot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vote, replacing the voter's earlier one.
    pub fn cast(&mut self, voter: PlayerId, target: PlayerId) {
        self.votes.insert(voter, target);
    }

    /// Record a vote (builder pattern).
    #[must_use]
    pub fn with_vote(mut self, voter: impl Into<PlayerId>, target: impl Into<PlayerId>) -> Self {
        self.cast(voter.into(), target.into());
        self
    }

    /// Build a ballot from `(voter, target)` pairs.
    pub fn from_pairs<I, V, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (V, T)>,
        V: Into<PlayerId>,
        T: Into<PlayerId>,
    {
        let mut ballot = Self::new();
        for (voter, target) in pairs {
            ballot.cast(voter.into(), target.into());
        }
        ballot
    }

    /// The vote cast by `voter`, if any.
    #[must_use]
    pub fn vote_of(&self, voter: &PlayerId) -> Option<&PlayerId> {
        self.votes.get(voter)
    }

    /// Number of votes cast.
    #[must_use]
    pub fn len(&self) -> usize {
        self.votes.len()
    }

    /// True if nobody voted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}

/// Everything a day vote produced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayReport {
    /// Counted votes, in voter seat order.
    pub votes: Vec<(PlayerId, PlayerId)>,
    /// Target → votes, in order of first vote.
    pub tally: Vec<(PlayerId, usize)>,
    /// The eliminated player, if the top count was unique.
    pub eliminated: Option<PlayerId>,
    /// Players tied at the top count when no one was eliminated.
    pub tied: Vec<PlayerId>,
    /// Votes that were not counted.
    pub rejected: Vec<Rejection>,
}

impl DayReport {
    /// True when the vote ended in a tie at the top.
    #[must_use]
    pub fn is_tie(&self) -> bool {
        self.tied.len() > 1
    }
}

/// Resolve the day vote, advance the day counter, and return to `Night`.
pub fn resolve_day(state: &mut GameState, ballot: &Ballot) -> DayReport {
    state.set_phase(Phase::Voting);
    let mut report = DayReport::default();

    for voter in state.roster().to_vec() {
        let Some(target) = ballot.vote_of(&voter) else {
            continue;
        };

        let verdict = if !state.is_alive(&voter) {
            Err(InvalidAction::InactiveActor(voter.clone()))
        } else if *target == voter {
            Err(InvalidAction::SelfTarget)
        } else if !state.is_alive(target) {
            Err(InvalidAction::DeadTarget(target.clone()))
        } else {
            Ok(target.clone())
        };

        match verdict {
            Ok(target) => {
                match report.tally.iter_mut().find(|(t, _)| *t == target) {
                    Some((_, count)) => *count += 1,
                    None => report.tally.push((target.clone(), 1)),
                }
                report.votes.push((voter, target));
            }
            Err(reason) => {
                warn!(voter = %voter, reason = %reason, "vote rejected");
                let role = state.role_of(&voter);
                state.record(format!("{} vote from {}: {}", tags::INVALID, voter, reason));
                if let Some(role) = role {
                    report.rejected.push(Rejection {
                        actor: voter,
                        role,
                        reason,
                    });
                }
            }
        }
    }

    if let Some(top) = report.tally.iter().map(|(_, count)| *count).max() {
        let leaders: Vec<PlayerId> = report
            .tally
            .iter()
            .filter(|(_, count)| *count == top)
            .map(|(target, _)| target.clone())
            .collect();

        if leaders.len() == 1 {
            let eliminated = leaders[0].clone();
            if state.record_death(&eliminated, DeathCause::VotedOut) {
                state.record(format!("{} was voted out during the day", eliminated));
                report.eliminated = Some(eliminated);
            }
        } else {
            let names: Vec<&str> = leaders.iter().map(PlayerId::as_str).collect();
            state.record(format!("Vote tied between {}; no one is eliminated", names.join(", ")));
            report.tied = leaders;
        }
    }

    state.finish_day();
    info!(
        day = state.day_count(),
        eliminated = ?report.eliminated,
        tie = report.is_tie(),
        "day resolved"
    );
    report
}
