//! Night resolution.
//!
//! Night abilities resolve in a fixed order, Guardian → Werewolf → Seer →
//! Witch, against the alive set as it stood at dusk. No one dies until
//! every ability has resolved; then poison and the werewolf attack are
//! settled together:
//!
//! | guarded | antidoted | attack victim |
//! |---------|-----------|---------------|
//! | no      | no        | dies          |
//! | yes     | no        | survives      |
//! | no      | yes       | survives      |
//! | yes     | yes       | dies          |
//!
//! Poison always kills and takes precedence: a poisoned attack victim dies
//! of poison and the table above is skipped for them.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::core::log::tags;
use crate::core::{Ability, Death, DeathCause, GameState, InvalidAction, Phase, PlayerId, Role, Team};

use super::capability::{capability, NIGHT_ORDER};

/// A single night decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NightAction {
    /// Guard, attack or inspect a player.
    Target(PlayerId),
    /// Witch: spend the antidote on tonight's attack victim.
    Save,
    /// Witch: spend the poison on a player.
    Poison(PlayerId),
}

impl NightAction {
    /// Witch tag for the antidote.
    pub const SAVE_TAG: &'static str = "save";
    /// Witch tag prefix for the poison.
    pub const POISON_PREFIX: &'static str = "poison:";

    /// Parse the witch's tagged action string (`save` or `poison:<id>`).
    ///
    /// ```
    /// use werewolf_engine::core::PlayerId;
    /// use werewolf_engine::rules::NightAction;
    ///
    /// assert_eq!(NightAction::parse_witch("save"), Ok(NightAction::Save));
    /// assert_eq!(
    ///     NightAction::parse_witch("poison:Bob"),
    ///     Ok(NightAction::Poison(PlayerId::new("Bob")))
    /// );
    /// assert!(NightAction::parse_witch("poison:").is_err());
    /// ```
    pub fn parse_witch(tag: &str) -> Result<NightAction, InvalidAction> {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case(Self::SAVE_TAG) {
            return Ok(NightAction::Save);
        }
        if let Some(target) = tag.strip_prefix(Self::POISON_PREFIX) {
            let target = target.trim();
            if !target.is_empty() {
                return Ok(NightAction::Poison(PlayerId::new(target)));
            }
        }
        Err(InvalidAction::Malformed(tag.to_string()))
    }

    /// Render in the provider tag alphabet.
    #[must_use]
    pub fn to_tag(&self) -> String {
        match self {
            NightAction::Target(target) => target.to_string(),
            NightAction::Save => Self::SAVE_TAG.to_string(),
            NightAction::Poison(target) => format!("{}{}", Self::POISON_PREFIX, target),
        }
    }
}

/// Actor → decision for one night.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NightActions {
    actions: FxHashMap<PlayerId, NightAction>,
}

impl NightActions {
    /// No decisions yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a decision, replacing any earlier one from the same actor.
    pub fn set(&mut self, actor: PlayerId, action: NightAction) {
        self.actions.insert(actor, action);
    }

    /// Record a targeted decision (builder pattern).
    #[must_use]
    pub fn with_target(mut self, actor: impl Into<PlayerId>, target: impl Into<PlayerId>) -> Self {
        self.set(actor.into(), NightAction::Target(target.into()));
        self
    }

    /// Record any decision (builder pattern).
    #[must_use]
    pub fn with_action(mut self, actor: impl Into<PlayerId>, action: NightAction) -> Self {
        self.set(actor.into(), action);
        self
    }

    /// The decision `actor` made, if any.
    #[must_use]
    pub fn get(&self, actor: &PlayerId) -> Option<&NightAction> {
        self.actions.get(actor)
    }

    /// Number of recorded decisions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True if nobody decided anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// A decision the engine refused.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub actor: PlayerId,
    pub role: Role,
    pub reason: InvalidAction,
}

/// Werewolf votes for tonight's victim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackTally {
    /// Target → votes, in order of first vote.
    pub votes: Vec<(PlayerId, usize)>,
    /// The single selected victim.
    pub target: Option<PlayerId>,
    /// Werewolf votes that were not counted.
    pub rejected: Vec<Rejection>,
}

/// Count werewolf votes without touching the state.
///
/// Werewolves vote in seat order. A vote counts if the target is alive,
/// not the voter, and not a werewolf. The victim is the target with the
/// most votes; on a tie, the target that received its first vote earliest.
#[must_use]
pub fn tally_attack(state: &GameState, actions: &NightActions) -> AttackTally {
    let mut tally = AttackTally::default();

    for wolf in state.alive_with_role(Role::Werewolf) {
        let verdict = match actions.get(&wolf) {
            None => Err(InvalidAction::Declined),
            Some(NightAction::Target(target)) => attack_target_check(state, &wolf, target),
            Some(other) => Err(InvalidAction::Malformed(other.to_tag())),
        };

        match verdict {
            Ok(target) => match tally.votes.iter_mut().find(|(t, _)| *t == target) {
                Some((_, count)) => *count += 1,
                None => tally.votes.push((target, 1)),
            },
            Err(reason) => tally.rejected.push(Rejection {
                actor: wolf,
                role: Role::Werewolf,
                reason,
            }),
        }
    }

    let mut best: Option<&(PlayerId, usize)> = None;
    for entry in &tally.votes {
        if best.map_or(true, |(_, count)| entry.1 > *count) {
            best = Some(entry);
        }
    }
    tally.target = best.map(|(target, _)| target.clone());
    tally
}

fn attack_target_check(
    state: &GameState,
    wolf: &PlayerId,
    target: &PlayerId,
) -> Result<PlayerId, InvalidAction> {
    if target == wolf {
        Err(InvalidAction::SelfTarget)
    } else if !state.is_alive(target) {
        Err(InvalidAction::DeadTarget(target.clone()))
    } else if state.is_werewolf(target) {
        Err(InvalidAction::FriendlyFire(target.clone()))
    } else {
        Ok(target.clone())
    }
}

/// What happened to the werewolves' victim.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackOutcome {
    /// No valid werewolf vote.
    #[default]
    NoAttack,
    /// Unprotected; the victim died.
    Killed,
    /// Guarded only; survived.
    Guarded,
    /// Antidoted only; survived.
    Saved,
    /// Guarded and antidoted; the protections cancel and the victim died.
    DoubleProtected,
    /// The victim was also poisoned and died of the poison.
    Poisoned,
}

/// One seer check. Private to that seer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspection {
    pub seer: PlayerId,
    pub target: PlayerId,
    pub role: Role,
}

/// Everything a night produced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightReport {
    /// Werewolf votes and selected victim.
    pub attack: AttackTally,
    /// Resolution of the attack.
    pub outcome: AttackOutcome,
    /// Players validly guarded tonight.
    pub guarded: SmallVec<[PlayerId; 1]>,
    /// Player the antidote was spent on.
    pub saved: Option<PlayerId>,
    /// Player the poison was spent on.
    pub poisoned: Option<PlayerId>,
    /// Seer checks.
    pub inspections: SmallVec<[Inspection; 1]>,
    /// The antidote was consumed tonight.
    pub antidote_consumed: bool,
    /// The poison was consumed tonight.
    pub poison_consumed: bool,
    /// Deaths applied at dawn, poison first.
    pub deaths: SmallVec<[Death; 2]>,
    /// Decisions that were refused.
    pub rejected: Vec<Rejection>,
}

impl NightReport {
    /// The werewolves' chosen victim, before protections.
    #[must_use]
    pub fn attack_target(&self) -> Option<&PlayerId> {
        self.attack.target.as_ref()
    }

    /// The attack victim, if the attack killed them.
    #[must_use]
    pub fn werewolf_death(&self) -> Option<&PlayerId> {
        self.death_by(DeathCause::WerewolfKill)
    }

    /// The poisoned player, if the poison killed them.
    #[must_use]
    pub fn poison_death(&self) -> Option<&PlayerId> {
        self.death_by(DeathCause::WitchPoison)
    }

    fn death_by(&self, cause: DeathCause) -> Option<&PlayerId> {
        self.deaths
            .iter()
            .find(|d| d.cause == cause)
            .map(|d| &d.player)
    }
}

/// In-progress night, threaded through the per-role steps.
pub(crate) struct NightResolution<'a> {
    state: &'a mut GameState,
    actions: &'a NightActions,
    report: NightReport,
}

impl<'a> NightResolution<'a> {
    fn new(state: &'a mut GameState, actions: &'a NightActions) -> Self {
        Self {
            state,
            actions,
            report: NightReport::default(),
        }
    }

    fn reject(&mut self, actor: &PlayerId, role: Role, reason: InvalidAction) {
        warn!(actor = %actor, role = %role, reason = %reason, "night action rejected");
        self.state.record(format!(
            "{} {} {}: {}",
            tags::INVALID,
            role.title(),
            actor,
            reason
        ));
        self.report.rejected.push(Rejection {
            actor: actor.clone(),
            role,
            reason,
        });
    }

    /// Apply poison and the attack to the alive set.
    fn settle(mut self) -> NightReport {
        if let Some(poisoned) = self.report.poisoned.clone() {
            if self.state.record_death(&poisoned, DeathCause::WitchPoison) {
                self.state.record(format!("{} died by witch poison", poisoned));
                self.report.deaths.push(Death {
                    player: poisoned,
                    cause: DeathCause::WitchPoison,
                });
            }
        }

        let Some(victim) = self.report.attack.target.clone() else {
            self.report.outcome = AttackOutcome::NoAttack;
            return self.report;
        };

        if self.report.poison_death() == Some(&victim) {
            self.report.outcome = AttackOutcome::Poisoned;
            return self.report;
        }

        let guarded = self.report.guarded.contains(&victim);
        let saved = self.report.saved.as_ref() == Some(&victim);

        self.report.outcome = match (guarded, saved) {
            (true, true) => {
                self.state.record(format!(
                    "{} was guarded and saved by the witch; the protections cancel and the victim dies",
                    victim
                ));
                AttackOutcome::DoubleProtected
            }
            (true, false) => {
                self.state.record(format!("{} was protected by guardian", victim));
                AttackOutcome::Guarded
            }
            (false, true) => {
                self.state.record(format!("{} was saved by witch", victim));
                AttackOutcome::Saved
            }
            (false, false) => AttackOutcome::Killed,
        };

        let dies = matches!(
            self.report.outcome,
            AttackOutcome::Killed | AttackOutcome::DoubleProtected
        );
        if dies && self.state.record_death(&victim, DeathCause::WerewolfKill) {
            self.state.record(format!("{} was killed at night", victim));
            self.report.deaths.push(Death {
                player: victim,
                cause: DeathCause::WerewolfKill,
            });
        }

        self.report
    }
}

/// Resolve one night and move the state to `Day`.
pub fn resolve_night(state: &mut GameState, actions: &NightActions) -> NightReport {
    state.set_phase(Phase::Night);

    let mut night = NightResolution::new(state, actions);
    for role in NIGHT_ORDER {
        let actors = night.state.alive_with_role(role);
        if actors.is_empty() {
            continue;
        }
        if let Some(step) = capability(role).night {
            step(&mut night, &actors);
        }
    }
    let report = night.settle();

    state.set_phase(Phase::Day);
    info!(
        round = state.round(),
        outcome = ?report.outcome,
        deaths = report.deaths.len(),
        "night resolved"
    );
    report
}

// =============================================================================
// Role steps
// =============================================================================

pub(crate) fn guard_step(night: &mut NightResolution<'_>, guardians: &[PlayerId]) {
    let actions = night.actions;
    for guardian in guardians {
        let verdict = match actions.get(guardian) {
            None => Err(InvalidAction::Declined),
            Some(NightAction::Target(target)) => {
                if !night.state.is_alive(target) {
                    Err(InvalidAction::DeadTarget(target.clone()))
                } else if night.state.last_guarded(guardian) == Some(target) {
                    Err(InvalidAction::RepeatGuard(target.clone()))
                } else {
                    Ok(target.clone())
                }
            }
            Some(other) => Err(InvalidAction::Malformed(other.to_tag())),
        };

        match verdict {
            Ok(target) => {
                debug!(guardian = %guardian, target = %target, "guard placed");
                night.state.set_last_guarded(guardian, &target);
                night
                    .state
                    .record(format!("Guardian {} guarded {} this night", guardian, target));
                if !night.report.guarded.contains(&target) {
                    night.report.guarded.push(target);
                }
            }
            Err(reason) => night.reject(guardian, Role::Guardian, reason),
        }
    }
}

pub(crate) fn attack_step(night: &mut NightResolution<'_>, _werewolves: &[PlayerId]) {
    let tally = tally_attack(night.state, night.actions);

    for rejection in &tally.rejected {
        night.reject(&rejection.actor, rejection.role, rejection.reason.clone());
    }
    if let Some(target) = &tally.target {
        debug!(target = %target, votes = ?tally.votes, "attack target selected");
        night.state.record(format!("Werewolves attacked {}", target));
    }

    // `reject` already copied the refused votes into `report.rejected`.
    night.report.attack = AttackTally {
        rejected: Vec::new(),
        ..tally
    };
}

pub(crate) fn inspect_step(night: &mut NightResolution<'_>, seers: &[PlayerId]) {
    let actions = night.actions;
    for seer in seers {
        let verdict = match actions.get(seer) {
            None => Err(InvalidAction::Declined),
            Some(NightAction::Target(target)) if target == seer => Err(InvalidAction::SelfTarget),
            Some(NightAction::Target(target)) => match night.state.role_of(target) {
                Some(role) if night.state.is_alive(target) => Ok((target.clone(), role)),
                _ => Err(InvalidAction::DeadTarget(target.clone())),
            },
            Some(other) => Err(InvalidAction::Malformed(other.to_tag())),
        };

        match verdict {
            Ok((target, role)) => {
                let side = match role.team() {
                    Team::Werewolf => "werewolf",
                    Team::Good => "good",
                };
                night
                    .state
                    .record(format!("Seer {} checked {}: {} team", seer, target, side));
                night.report.inspections.push(Inspection {
                    seer: seer.clone(),
                    target,
                    role,
                });
            }
            Err(reason) => night.reject(seer, Role::Seer, reason),
        }
    }
}

pub(crate) fn witch_step(night: &mut NightResolution<'_>, witches: &[PlayerId]) {
    let actions = night.actions;
    for witch in witches {
        let Some(action) = actions.get(witch) else {
            night.state.record(format!("Witch {} did nothing", witch));
            continue;
        };

        match action {
            NightAction::Save => {
                if night.state.witch_antidote_used() {
                    night.reject(witch, Role::Witch, InvalidAction::AbilityUsed(Ability::Antidote));
                    continue;
                }
                let Some(victim) = night.report.attack.target.clone() else {
                    night.reject(witch, Role::Witch, InvalidAction::NoVictim);
                    continue;
                };
                night.state.consume_antidote();
                night
                    .state
                    .record(format!("Witch {} used antidote to save {}", witch, victim));
                night.report.saved = Some(victim);
                night.report.antidote_consumed = true;
            }
            NightAction::Poison(target) => {
                let target = target.clone();
                if night.state.witch_poison_used() {
                    night.reject(witch, Role::Witch, InvalidAction::AbilityUsed(Ability::Poison));
                } else if &target == witch {
                    night.reject(witch, Role::Witch, InvalidAction::SelfTarget);
                } else if !night.state.is_alive(&target) {
                    night.reject(witch, Role::Witch, InvalidAction::DeadTarget(target));
                } else {
                    night.state.consume_poison();
                    night.state.record(format!("Witch {} poisoned {}", witch, target));
                    night.report.poisoned = Some(target);
                    night.report.poison_consumed = true;
                }
            }
            NightAction::Target(_) => {
                let reason = InvalidAction::Malformed(action.to_tag());
                night.reject(witch, Role::Witch, reason);
            }
        }
    }
}
