//! Turn orchestration.
//!
//! `TurnOrchestrator` drives a match: night → win check → day → win check,
//! until a team wins or the round budget runs out. It asks the decision
//! provider for every choice, validates answers against the legal target
//! sets, and chains death-triggered abilities (last words, the hunter's
//! revenge shot).
//!
//! Provider failures and invalid answers are never fatal: the actor is
//! treated as passing and the match carries on, so every match ends.

pub mod context;
pub mod summary;

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::core::log::tags;
use crate::core::{
    ConfigurationError, DeathCause, GameState, InvalidAction, MatchConfig, Phase, PlayerId, Role,
};
use crate::provider::{
    interpret_target, interpret_witch, DecisionProvider, DecisionRequest, ProviderError, Speech,
    SpeechRequest,
};
use crate::rules::{
    tally_attack, triggers_revenge, Ballot, DecisionKind, MatchResult, NightAction, NightActions,
    NightReport, RulesEngine, StandardRules, NIGHT_ORDER,
};
use crate::strategy::StrategyStore;

pub use context::decision_context;
pub use summary::MatchSummary;

const RULE: &str = "============================================================";

/// Runs one match against a decision provider.
pub struct TurnOrchestrator<P> {
    config: MatchConfig,
    rules: StandardRules,
    state: GameState,
    provider: P,
    strategies: StrategyStore,
    /// Seer → checks in the order made. Private to each seer.
    seer_knowledge: FxHashMap<PlayerId, Vec<(PlayerId, Role)>>,
    result: Option<MatchResult>,
}

impl<P: DecisionProvider> TurnOrchestrator<P> {
    /// Deal roles for `roster` and prepare a match.
    ///
    /// Fails if the roster has fewer than four players or repeats an id.
    pub fn new(
        config: MatchConfig,
        roster: &[PlayerId],
        provider: P,
        strategies: StrategyStore,
    ) -> Result<Self, ConfigurationError> {
        let preset = config.effective_preset(roster.len());
        let state = GameState::deal(roster, preset, config.seed)?;
        info!(players = roster.len(), ?preset, seed = config.seed, "match created");
        Ok(Self::from_state(config, state, provider, strategies))
    }

    /// Run a match from a prepared state (fixed roles, mid-game checkpoints).
    pub fn from_state(
        config: MatchConfig,
        state: GameState,
        provider: P,
        strategies: StrategyStore,
    ) -> Self {
        Self {
            rules: StandardRules::from_config(&config),
            config,
            state,
            provider,
            strategies,
            seer_knowledge: FxHashMap::default(),
            result: None,
        }
    }

    // === Accessors ===

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn into_provider(self) -> P {
        self.provider
    }

    /// The result, once the match has ended.
    pub fn result(&self) -> Option<MatchResult> {
        self.result
    }

    /// What `seer` has learned, in check order.
    pub fn seer_knowledge(&self, seer: &PlayerId) -> &[(PlayerId, Role)] {
        self.seer_knowledge.get(seer).map_or(&[], Vec::as_slice)
    }

    // === Match Loop ===

    /// Play until a team wins or the round budget is spent.
    pub fn run(&mut self) -> MatchSummary {
        if self.result.is_none() && self.state.round() == 0 {
            self.state.record(format!("{RULE}\nWEREWOLF GAME STARTING\n{RULE}"));
            info!(max_rounds = self.config.max_rounds, "match starting");
        }

        while self.result.is_none() {
            self.play_round();
        }
        self.summary()
    }

    /// Play one night and day. Returns the result if the match ended.
    ///
    /// Once the budget is spent without a winner the match is a draw.
    pub fn play_round(&mut self) -> Option<MatchResult> {
        if let Some(result) = self.result {
            return Some(result);
        }
        if self.state.round() >= self.config.max_rounds {
            return Some(self.finish(MatchResult::Draw));
        }

        let round = self.state.begin_round();
        self.state.record(format!("{RULE}\nROUND {round}\n{RULE}"));
        debug!(round, "round starting");

        if let Some(result) = self.night_turn() {
            return Some(self.finish(result));
        }
        if let Some(result) = self.day_turn() {
            return Some(self.finish(result));
        }

        if self.state.round() >= self.config.max_rounds {
            return Some(self.finish(MatchResult::Draw));
        }
        None
    }

    /// Summary of the match so far (draw if unfinished).
    pub fn summary(&self) -> MatchSummary {
        MatchSummary::from_state(&self.state, self.result.unwrap_or(MatchResult::Draw))
    }

    // === Night ===

    fn night_turn(&mut self) -> Option<MatchResult> {
        self.state.set_phase(Phase::Night);
        self.state.record(tags::NIGHT_PHASE);

        let mut actions = NightActions::new();
        for role in NIGHT_ORDER {
            let actors = self.state.alive_with_role(role);
            if actors.is_empty() {
                continue;
            }
            self.state.record(night_tag(role));

            for actor in actors {
                if role == Role::Witch {
                    self.witch_decision(&actor, &mut actions);
                    continue;
                }
                let Some(kind) = DecisionKind::night_for(role) else {
                    continue;
                };
                let legal = self.legal_targets(&actor, &kind);
                if legal.is_empty() {
                    continue;
                }
                let answer = self.ask(&actor, role, &kind, &legal);
                match interpret_target(answer.as_deref(), &legal) {
                    Ok(Some(target)) => {
                        debug!(actor = %actor, kind = %kind, target = %target, "night decision");
                        actions.set(actor, NightAction::Target(target));
                    }
                    Ok(None) => {}
                    Err(reason) => self.reject(&actor, role, &reason),
                }
            }
        }

        let report = self.rules.resolve_night(&mut self.state, &actions);
        self.learn(&report);

        if let Some(result) = self.rules.is_terminal(&self.state) {
            return Some(result);
        }

        self.state.record(tags::MORNING);
        if report.deaths.is_empty() {
            self.state.record("Everyone survived the night!");
        }
        for death in &report.deaths {
            self.state.record(format!(
                "{} {} died during the night ({})",
                tags::DEAD,
                death.player,
                death.cause
            ));
        }

        self.after_deaths(report.deaths.iter().map(|d| (d.player.clone(), d.cause)).collect())
    }

    fn witch_decision(&mut self, witch: &PlayerId, actions: &mut NightActions) {
        let victim = tally_attack(&self.state, actions).target;
        let can_save = victim.is_some() && !self.state.witch_antidote_used();
        let can_poison = !self.state.witch_poison_used();
        if !can_save && !can_poison {
            return;
        }

        let kind = DecisionKind::Witch { victim };
        let legal = if can_poison {
            self.legal_targets(witch, &kind)
        } else {
            Vec::new()
        };
        let answer = self.ask(witch, Role::Witch, &kind, &legal);
        match interpret_witch(answer.as_deref(), &legal) {
            Ok(Some(action)) => {
                debug!(witch = %witch, action = %action.to_tag(), "witch decision");
                actions.set(witch.clone(), action);
            }
            Ok(None) => {}
            Err(reason) => self.reject(witch, Role::Witch, &reason),
        }
    }

    /// Record seer checks into each seer's private knowledge.
    fn learn(&mut self, report: &NightReport) {
        for inspection in &report.inspections {
            let known = self
                .seer_knowledge
                .entry(inspection.seer.clone())
                .or_default();
            if !known.iter().any(|(p, _)| *p == inspection.target) {
                known.push((inspection.target.clone(), inspection.role));
            }
        }
    }

    // === Day ===

    fn day_turn(&mut self) -> Option<MatchResult> {
        self.state.set_phase(Phase::Day);
        self.state.record(tags::DAY_PHASE);
        self.state
            .record(format!("Day {} Discussion", self.state.day_count() + 1));
        let alive = self.state.alive_players();
        let names: Vec<&str> = alive.iter().map(PlayerId::as_str).collect();
        self.state
            .record(format!("Alive players: {}", names.join(", ")));

        for pass in 1..=self.config.discussion_rounds {
            self.state
                .record(format!("--- Discussion Round {} ---", pass));
            for speaker in self.state.alive_players() {
                if let Some(statement) = self.speak(&speaker, Speech::Discussion { pass }) {
                    self.state.record(format!("{}: {}", speaker, statement));
                }
            }
        }

        self.state.set_phase(Phase::Voting);
        self.state.record(tags::VOTING);
        let mut ballot = Ballot::new();
        for voter in self.state.alive_players() {
            let Some(role) = self.state.role_of(&voter) else {
                continue;
            };
            let legal = self.legal_targets(&voter, &DecisionKind::Vote);
            let answer = self.ask(&voter, role, &DecisionKind::Vote, &legal);
            match interpret_target(answer.as_deref(), &legal) {
                Ok(Some(target)) => {
                    self.state
                        .record(format!("  {} votes for: {}", voter, target));
                    ballot.cast(voter, target);
                }
                Ok(None) => self.state.record(format!("  {} abstains", voter)),
                Err(reason) => self.reject(&voter, role, &reason),
            }
        }

        let report = self.rules.resolve_day(&mut self.state, &ballot);
        match &report.eliminated {
            Some(player) => {
                let role = self.state.role_of(player).map_or("unknown", Role::name);
                self.state.record(format!(
                    "{} {} was eliminated by vote!\n   Role: {}",
                    tags::ELIMINATED,
                    player,
                    role
                ));
            }
            None if report.is_tie() => self.state.record("No one was eliminated (tie vote)"),
            None => self.state.record("No one was eliminated"),
        }

        if let Some(result) = self.rules.is_terminal(&self.state) {
            return Some(result);
        }

        let deaths = report
            .eliminated
            .into_iter()
            .map(|p| (p, DeathCause::VotedOut))
            .collect();
        self.after_deaths(deaths)
    }

    // === Death Chain ===

    /// Last words for each death, then any revenge shots.
    ///
    /// Revenge victims get last words but never a further shot. Returns
    /// the result if a shot ended the match.
    fn after_deaths(&mut self, deaths: Vec<(PlayerId, DeathCause)>) -> Option<MatchResult> {
        for (player, cause) in deaths {
            self.last_words(&player);

            let Some(role) = self.state.role_of(&player) else {
                continue;
            };
            if !triggers_revenge(role, cause) {
                continue;
            }
            if let Some(shot) = self.revenge_shot(&player, role) {
                self.last_words(&shot);
                if let Some(result) = self.rules.is_terminal(&self.state) {
                    return Some(result);
                }
            }
        }
        None
    }

    fn last_words(&mut self, player: &PlayerId) {
        if let Some(statement) = self.speak(player, Speech::LastWords) {
            self.state.record(format!(
                "{} {}'s final statement:\n  {}: {}",
                tags::LAST_WORDS,
                player,
                player,
                statement
            ));
        }
    }

    /// One shoot decision over the alive players. Returns the shot player.
    fn revenge_shot(&mut self, hunter: &PlayerId, role: Role) -> Option<PlayerId> {
        self.state.record(format!(
            "{} {} activates hunter ability!",
            tags::HUNTER_SKILL,
            hunter
        ));

        let kind = DecisionKind::Shoot;
        let legal = self.legal_targets(hunter, &kind);
        if legal.is_empty() {
            return None;
        }

        let context = self.context_for(hunter, role);
        let strategy = self.strategies.rules_for(role);
        let request = DecisionRequest {
            actor: hunter,
            role,
            kind: &kind,
            context: &context,
            legal_targets: &legal,
            strategy,
        };
        let answer = match self.provider.choose_shoot_target(&request) {
            Ok(answer) => answer,
            Err(err) => {
                self.provider_failed(hunter, role, &err);
                None
            }
        };

        let target = match interpret_target(answer.as_deref(), &legal) {
            Ok(Some(target)) => target,
            Ok(None) => {
                self.state
                    .record(format!("  {} holds their fire", hunter));
                return None;
            }
            Err(reason) => {
                self.reject(hunter, role, &reason);
                return None;
            }
        };

        if !self.state.record_death(&target, DeathCause::HunterShot) {
            return None;
        }
        let target_role = self.state.role_of(&target).map_or("unknown", Role::name);
        self.state.record(format!(
            "  {} shoots {}!\n  {} ({}) is killed!",
            hunter, target, target, target_role
        ));
        info!(hunter = %hunter, target = %target, "revenge shot");
        Some(target)
    }

    // === Provider Plumbing ===

    fn legal_targets(&self, actor: &PlayerId, kind: &DecisionKind) -> Vec<PlayerId> {
        let legal = self.rules.legal_targets(&self.state, actor, kind);
        if *kind != DecisionKind::Inspect {
            return legal;
        }

        // Seers re-check only once everyone else has been checked.
        let known = self.seer_knowledge(actor);
        let unchecked: Vec<PlayerId> = legal
            .iter()
            .filter(|p| !known.iter().any(|(k, _)| k == *p))
            .cloned()
            .collect();
        if unchecked.is_empty() {
            legal
        } else {
            unchecked
        }
    }

    fn context_for(&self, actor: &PlayerId, role: Role) -> String {
        let known = if role == Role::Seer {
            self.seer_knowledge(actor)
        } else {
            &[]
        };
        decision_context(&self.state, actor, self.config.context_events, known)
    }

    /// Ask for a decision. Failures are logged and become a pass.
    fn ask(
        &mut self,
        actor: &PlayerId,
        role: Role,
        kind: &DecisionKind,
        legal: &[PlayerId],
    ) -> Option<String> {
        let context = self.context_for(actor, role);
        let strategy = self.strategies.rules_for(role);
        let request = DecisionRequest {
            actor,
            role,
            kind,
            context: &context,
            legal_targets: legal,
            strategy,
        };
        match self.provider.choose(&request) {
            Ok(answer) => answer,
            Err(err) => {
                self.provider_failed(actor, role, &err);
                None
            }
        }
    }

    fn speak(&mut self, actor: &PlayerId, occasion: Speech) -> Option<String> {
        let role = self.state.role_of(actor)?;
        let context = self.context_for(actor, role);
        let strategy = self.strategies.rules_for(role);
        let request = SpeechRequest {
            actor,
            role,
            occasion,
            context: &context,
            strategy,
        };
        match self.provider.speak(&request) {
            Ok(statement) => statement.filter(|s| !s.trim().is_empty()),
            Err(err) => {
                warn!(actor = %actor, error = %err, "speech failed");
                None
            }
        }
    }

    fn provider_failed(&mut self, actor: &PlayerId, role: Role, err: &ProviderError) {
        warn!(actor = %actor, role = %role, error = %err, "provider failed, treating as no action");
        self.state.record(format!(
            "{} {} {}: {}",
            tags::INVALID,
            role.title(),
            actor,
            err
        ));
    }

    fn reject(&mut self, actor: &PlayerId, role: Role, reason: &InvalidAction) {
        warn!(actor = %actor, role = %role, reason = %reason, "decision rejected");
        self.state.record(format!(
            "{} {} {}: {}",
            tags::INVALID,
            role.title(),
            actor,
            reason
        ));
    }

    // === Finish ===

    fn finish(&mut self, result: MatchResult) -> MatchResult {
        self.state.record(format!("{RULE}\nGAME OVER\n{RULE}"));
        match result {
            MatchResult::Winner(team) => self
                .state
                .record(format!("{} {}", tags::WINNER, team.winner_label())),
            MatchResult::Draw => self.state.record(tags::DRAW),
        }
        self.state
            .record(format!("Rounds played: {}", self.state.round()));

        let mut lines = vec!["Final Roles:".to_string()];
        for (player, role) in self.state.assignments() {
            let status = if self.state.is_alive(player) { "alive" } else { "dead" };
            lines.push(format!("  {} {}: {}", status, player, role));
        }
        self.state.record(lines.join("\n"));

        info!(?result, rounds = self.state.round(), "match finished");
        self.result = Some(result);
        result
    }
}

fn night_tag(role: Role) -> &'static str {
    match role {
        Role::Guardian => tags::GUARDIAN,
        Role::Werewolf => tags::WEREWOLVES,
        Role::Seer => tags::SEER,
        _ => tags::WITCH,
    }
}
