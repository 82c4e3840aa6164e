//! Decision providers: the boundary to whatever picks each move.
//!
//! The engine never reasons about strategy. For every decision it builds a
//! [`DecisionRequest`] (role, narrative context, legal targets, strategy
//! directives) and asks a [`DecisionProvider`] for a target id or a tagged
//! witch action. Anything the provider returns is validated; failures and
//! invalid answers become "no action".
//!
//! ## Providers
//!
//! - [`ScriptedProvider`]: fixed answers per actor and decision kind
//! - [`RandomProvider`]: uniform choice over legal targets
//! - [`SeatedProvider`]: routes each player to its own provider
//! - [`RetryingProvider`]: exponential backoff on transient failures

pub mod random;
pub mod response;
pub mod retry;
pub mod scripted;
pub mod seated;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{PlayerId, Role};
use crate::rules::DecisionKind;

pub use random::RandomProvider;
pub use response::{interpret_target, interpret_witch};
pub use retry::{call_with_retry, BackoffConfig, RetryPolicy, RetryingProvider};
pub use scripted::{RecordedRequest, ScriptedProvider};
pub use seated::SeatedProvider;

/// Classified transient failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransientKind {
    Timeout,
    ConnectionReset,
    RateLimited,
}

impl std::fmt::Display for TransientKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransientKind::Timeout => f.write_str("timeout"),
            TransientKind::ConnectionReset => f.write_str("connection reset"),
            TransientKind::RateLimited => f.write_str("rate limited"),
        }
    }
}

/// A provider call that did not produce an answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Worth retrying.
    #[error("{kind}: {message}")]
    Transient { kind: TransientKind, message: String },

    /// Retrying will not help.
    #[error("provider failed: {0}")]
    Fatal(String),
}

impl ProviderError {
    /// A transient failure of `kind`.
    pub fn transient(kind: TransientKind, message: impl Into<String>) -> Self {
        ProviderError::Transient {
            kind,
            message: message.into(),
        }
    }

    /// A non-retryable failure.
    pub fn fatal(message: impl Into<String>) -> Self {
        ProviderError::Fatal(message.into())
    }

    /// True if the call may succeed on retry.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::Transient { .. })
    }
}

/// Everything a provider sees for one decision.
#[derive(Clone, Debug)]
pub struct DecisionRequest<'a> {
    /// Player deciding.
    pub actor: &'a PlayerId,
    /// Their role.
    pub role: Role,
    /// What is being decided.
    pub kind: &'a DecisionKind,
    /// Opaque narrative context.
    pub context: &'a str,
    /// Acceptable targets, in seat order.
    pub legal_targets: &'a [PlayerId],
    /// Strategy directives for the role, passed through unmodified.
    pub strategy: &'a [String],
}

/// Why a player is being asked to speak.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speech {
    /// Day discussion pass (1-based).
    Discussion { pass: u32 },
    /// Final statement after dying.
    LastWords,
}

/// A request for free text. Never affects state.
#[derive(Clone, Debug)]
pub struct SpeechRequest<'a> {
    pub actor: &'a PlayerId,
    pub role: Role,
    pub occasion: Speech,
    pub context: &'a str,
    pub strategy: &'a [String],
}

/// Source of decisions for one or more players.
///
/// `Ok(None)` means the actor passes. Errors are never fatal to a match.
pub trait DecisionProvider {
    /// Pick a target id or a tagged witch action.
    fn choose(&mut self, request: &DecisionRequest<'_>) -> Result<Option<String>, ProviderError>;

    /// Pick a hunter revenge target among alive players.
    fn choose_shoot_target(
        &mut self,
        request: &DecisionRequest<'_>,
    ) -> Result<Option<String>, ProviderError> {
        self.choose(request)
    }

    /// Produce a statement for discussion or last words.
    fn speak(&mut self, _request: &SpeechRequest<'_>) -> Result<Option<String>, ProviderError> {
        Ok(None)
    }
}

impl<P: DecisionProvider + ?Sized> DecisionProvider for Box<P> {
    fn choose(&mut self, request: &DecisionRequest<'_>) -> Result<Option<String>, ProviderError> {
        (**self).choose(request)
    }

    fn choose_shoot_target(
        &mut self,
        request: &DecisionRequest<'_>,
    ) -> Result<Option<String>, ProviderError> {
        (**self).choose_shoot_target(request)
    }

    fn speak(&mut self, request: &SpeechRequest<'_>) -> Result<Option<String>, ProviderError> {
        (**self).speak(request)
    }
}

impl<P: DecisionProvider + ?Sized> DecisionProvider for &mut P {
    fn choose(&mut self, request: &DecisionRequest<'_>) -> Result<Option<String>, ProviderError> {
        (**self).choose(request)
    }

    fn choose_shoot_target(
        &mut self,
        request: &DecisionRequest<'_>,
    ) -> Result<Option<String>, ProviderError> {
        (**self).choose_shoot_target(request)
    }

    fn speak(&mut self, request: &SpeechRequest<'_>) -> Result<Option<String>, ProviderError> {
        (**self).speak(request)
    }
}
