//! Turning provider answers into engine decisions.
//!
//! Providers answer with free strings. An answer naming a legal target
//! (or, for the witch, using the `save` / `poison:<id>` alphabet) is
//! taken as is. Otherwise empty answers and the usual "pass" words mean
//! no action. Player ids win over pass words, so a player called "None"
//! can still be voted for.

use crate::core::{InvalidAction, PlayerId};
use crate::rules::NightAction;

const PASS_WORDS: [&str; 4] = ["none", "pass", "skip", "abstain"];

fn is_pass(answer: &str) -> bool {
    answer.is_empty() || PASS_WORDS.iter().any(|w| answer.eq_ignore_ascii_case(w))
}

/// Match an answer against the legal target list.
///
/// `Ok(None)` for a pass, `Err` for anything else not in `legal`.
pub fn interpret_target(
    answer: Option<&str>,
    legal: &[PlayerId],
) -> Result<Option<PlayerId>, InvalidAction> {
    let Some(answer) = answer.map(str::trim) else {
        return Ok(None);
    };
    if let Some(target) = legal.iter().find(|p| p.as_str() == answer) {
        return Ok(Some(target.clone()));
    }
    if is_pass(answer) {
        return Ok(None);
    }
    Err(InvalidAction::NotLegal(PlayerId::new(answer)))
}

/// Parse a witch answer. Poison targets must be in `legal`.
pub fn interpret_witch(
    answer: Option<&str>,
    legal: &[PlayerId],
) -> Result<Option<NightAction>, InvalidAction> {
    let Some(answer) = answer.map(str::trim) else {
        return Ok(None);
    };

    match NightAction::parse_witch(answer) {
        Ok(NightAction::Poison(target)) if !legal.contains(&target) => {
            Err(InvalidAction::NotLegal(target))
        }
        Ok(action) => Ok(Some(action)),
        Err(_) if is_pass(answer) => Ok(None),
        Err(err) => Err(err),
    }
}
