//! Deterministic provider fed from a script.
//!
//! Answers are queued per `(actor, decision kind)`. Each request pops the
//! next answer; an empty queue falls back to a repeating answer if one was
//! set, otherwise the actor passes. Every request is recorded so tests can
//! check what was asked and with which legal targets.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use super::{DecisionProvider, DecisionRequest, ProviderError, SpeechRequest};
use crate::core::PlayerId;
use crate::rules::DecisionKind;

type Answer = Result<Option<String>, ProviderError>;

/// A request as the provider saw it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub actor: PlayerId,
    pub kind: DecisionKind,
    pub legal_targets: Vec<PlayerId>,
    pub context: String,
}

/// Provider that replays scripted answers.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    queued: FxHashMap<(PlayerId, String), VecDeque<Answer>>,
    repeating: FxHashMap<(PlayerId, String), String>,
    speeches: FxHashMap<PlayerId, VecDeque<String>>,
    history: Vec<RecordedRequest>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, actor: impl Into<PlayerId>, kind: &str, answer: Answer) {
        self.queued
            .entry((actor.into(), kind.to_string()))
            .or_default()
            .push_back(answer);
    }

    /// Queue an answer for `actor` deciding `kind` (`"vote"`, `"witch"`, ...).
    #[must_use]
    pub fn with_answer(
        mut self,
        actor: impl Into<PlayerId>,
        kind: &str,
        answer: impl Into<String>,
    ) -> Self {
        self.push(actor, kind, Ok(Some(answer.into())));
        self
    }

    /// Queue an explicit pass.
    #[must_use]
    pub fn with_pass(mut self, actor: impl Into<PlayerId>, kind: &str) -> Self {
        self.push(actor, kind, Ok(None));
        self
    }

    /// Queue a failed call.
    #[must_use]
    pub fn with_failure(
        mut self,
        actor: impl Into<PlayerId>,
        kind: &str,
        error: ProviderError,
    ) -> Self {
        self.push(actor, kind, Err(error));
        self
    }

    /// Answer used whenever the queue for `(actor, kind)` is empty.
    #[must_use]
    pub fn with_repeating(
        mut self,
        actor: impl Into<PlayerId>,
        kind: &str,
        answer: impl Into<String>,
    ) -> Self {
        self.repeating
            .insert((actor.into(), kind.to_string()), answer.into());
        self
    }

    /// Queue a statement for discussion or last words.
    #[must_use]
    pub fn with_speech(mut self, actor: impl Into<PlayerId>, text: impl Into<String>) -> Self {
        self.speeches
            .entry(actor.into())
            .or_default()
            .push_back(text.into());
        self
    }

    /// Every decision request received, in order.
    #[must_use]
    pub fn history(&self) -> &[RecordedRequest] {
        &self.history
    }

    /// Requests received from `actor` for decisions named `kind`.
    pub fn requests(&self, actor: &PlayerId, kind: &str) -> impl Iterator<Item = &RecordedRequest> {
        let actor = actor.clone();
        let kind = kind.to_string();
        self.history
            .iter()
            .filter(move |r| r.actor == actor && r.kind.name() == kind)
    }

    fn answer(&mut self, request: &DecisionRequest<'_>) -> Answer {
        self.history.push(RecordedRequest {
            actor: request.actor.clone(),
            kind: request.kind.clone(),
            legal_targets: request.legal_targets.to_vec(),
            context: request.context.to_string(),
        });

        let key = (request.actor.clone(), request.kind.name().to_string());
        if let Some(answer) = self.queued.get_mut(&key).and_then(VecDeque::pop_front) {
            return answer;
        }
        Ok(self.repeating.get(&key).cloned())
    }
}

impl DecisionProvider for ScriptedProvider {
    fn choose(&mut self, request: &DecisionRequest<'_>) -> Result<Option<String>, ProviderError> {
        self.answer(request)
    }

    fn speak(&mut self, request: &SpeechRequest<'_>) -> Result<Option<String>, ProviderError> {
        Ok(self
            .speeches
            .get_mut(request.actor)
            .and_then(VecDeque::pop_front))
    }
}
