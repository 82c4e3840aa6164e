//! Routes each player to its own provider.

use rustc_hash::FxHashMap;
use tracing::debug;

use super::{DecisionProvider, DecisionRequest, ProviderError, RandomProvider, SpeechRequest};
use crate::core::{GameRng, PlayerId};

/// One provider per seat, with an optional fallback for unseated players.
///
/// Players with neither a seat nor a fallback always pass.
#[derive(Default)]
pub struct SeatedProvider {
    seats: FxHashMap<PlayerId, Box<dyn DecisionProvider>>,
    fallback: Option<Box<dyn DecisionProvider>>,
}

impl SeatedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat `player` with `provider`, replacing any earlier seat.
    #[must_use]
    pub fn with_seat(
        mut self,
        player: impl Into<PlayerId>,
        provider: impl DecisionProvider + 'static,
    ) -> Self {
        self.seats.insert(player.into(), Box::new(provider));
        self
    }

    /// Provider for players without a seat.
    #[must_use]
    pub fn with_fallback(mut self, provider: impl DecisionProvider + 'static) -> Self {
        self.fallback = Some(Box::new(provider));
        self
    }

    /// Seat every player with its own random provider.
    ///
    /// Streams are forked in seat order from the `"provider"` stream of
    /// `seed`, so one player's choices never shift another's.
    pub fn random_seats(roster: &[PlayerId], seed: u64) -> Self {
        let mut rng = GameRng::new(seed).for_context("provider");
        roster.iter().fold(Self::new(), |seated, player| {
            seated.with_seat(player.clone(), RandomProvider::from_rng(rng.fork()))
        })
    }

    /// True if `player` has a dedicated provider.
    #[must_use]
    pub fn is_seated(&self, player: &PlayerId) -> bool {
        self.seats.contains_key(player)
    }

    fn route(&mut self, player: &PlayerId) -> Option<&mut Box<dyn DecisionProvider>> {
        match self.seats.get_mut(player) {
            Some(provider) => Some(provider),
            None => {
                debug!(player = %player, "no seat, using fallback");
                self.fallback.as_mut()
            }
        }
    }
}

impl DecisionProvider for SeatedProvider {
    fn choose(&mut self, request: &DecisionRequest<'_>) -> Result<Option<String>, ProviderError> {
        match self.route(request.actor) {
            Some(provider) => provider.choose(request),
            None => Ok(None),
        }
    }

    fn choose_shoot_target(
        &mut self,
        request: &DecisionRequest<'_>,
    ) -> Result<Option<String>, ProviderError> {
        match self.route(request.actor) {
            Some(provider) => provider.choose_shoot_target(request),
            None => Ok(None),
        }
    }

    fn speak(&mut self, request: &SpeechRequest<'_>) -> Result<Option<String>, ProviderError> {
        match self.route(request.actor) {
            Some(provider) => provider.speak(request),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Role;
    use crate::provider::ScriptedProvider;
    use crate::rules::DecisionKind;

    fn vote(provider: &mut SeatedProvider, actor: &str) -> Option<String> {
        let actor = PlayerId::new(actor);
        let legal = PlayerId::roster(["A", "B", "C"]);
        provider
            .choose(&DecisionRequest {
                actor: &actor,
                role: Role::Villager,
                kind: &DecisionKind::Vote,
                context: "",
                legal_targets: &legal,
                strategy: &[],
            })
            .unwrap()
    }

    #[test]
    fn test_routes_by_actor() {
        let mut provider = SeatedProvider::new()
            .with_seat("A", ScriptedProvider::new().with_answer("A", "vote", "B"))
            .with_seat("B", ScriptedProvider::new().with_answer("B", "vote", "C"));

        assert!(provider.is_seated(&PlayerId::new("A")));
        assert_eq!(vote(&mut provider, "A"), Some("B".into()));
        assert_eq!(vote(&mut provider, "B"), Some("C".into()));
        assert_eq!(vote(&mut provider, "C"), None);
    }

    #[test]
    fn test_fallback_for_unseated() {
        let mut provider = SeatedProvider::new()
            .with_fallback(ScriptedProvider::new().with_answer("C", "vote", "A"));

        assert_eq!(vote(&mut provider, "C"), Some("A".into()));
    }

    #[test]
    fn test_random_seats_are_independent() {
        let roster = PlayerId::roster(["A", "B", "C"]);

        // Interleaving A's decisions must not change what B picks.
        let mut both = SeatedProvider::random_seats(&roster, 5);
        let from_both: Vec<_> = (0..10)
            .map(|_| {
                vote(&mut both, "A");
                vote(&mut both, "B")
            })
            .collect();

        let mut only_b = SeatedProvider::random_seats(&roster, 5);
        let from_b: Vec<_> = (0..10).map(|_| vote(&mut only_b, "B")).collect();

        assert_eq!(from_both, from_b);
        assert!(from_b.iter().all(Option::is_some));
        assert!(roster.iter().all(|p| only_b.is_seated(p)));
    }
}
