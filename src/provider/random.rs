//! Uniform random provider, for simulations and property tests.

use super::{DecisionProvider, DecisionRequest, ProviderError};
use crate::core::GameRng;
use crate::rules::{DecisionKind, NightAction};

/// Picks uniformly among legal targets. Never fails.
///
/// The witch passes, saves, or poisons with equal odds.
#[derive(Clone, Debug)]
pub struct RandomProvider {
    rng: GameRng,
}

impl RandomProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed).for_context("provider"),
        }
    }

    pub fn from_rng(rng: GameRng) -> Self {
        Self { rng }
    }
}

impl DecisionProvider for RandomProvider {
    fn choose(&mut self, request: &DecisionRequest<'_>) -> Result<Option<String>, ProviderError> {
        if let DecisionKind::Witch { victim } = request.kind {
            return Ok(match self.rng.gen_range_usize(0..3) {
                0 => None,
                1 if victim.is_some() => Some(NightAction::Save.to_tag()),
                1 => None,
                _ => self
                    .rng
                    .choose(request.legal_targets)
                    .map(|t| NightAction::Poison(t.clone()).to_tag()),
            });
        }

        Ok(self
            .rng
            .choose(request.legal_targets)
            .map(|t| t.to_string()))
    }
}
