//! Role capability table.
//!
//! Maps each role to what it can do: a night step (run once per night for
//! all alive holders of the role) and the death causes that trigger a
//! revenge shot. Adding a role means adding a row here, not a subtype.

use crate::core::{DeathCause, PlayerId, Role};

use super::night::{self, NightResolution};

/// Order in which night abilities resolve.
///
/// The guard must be known before the attack is settled, and the witch
/// needs the attack victim before choosing the antidote.
pub const NIGHT_ORDER: [Role; 4] = [Role::Guardian, Role::Werewolf, Role::Seer, Role::Witch];

/// Night behaviour for all alive holders of one role.
pub(crate) type NightStep = for<'a> fn(&mut NightResolution<'a>, &[PlayerId]);

/// What a role can do.
#[derive(Clone, Copy)]
pub(crate) struct Capability {
    pub(crate) night: Option<NightStep>,
    pub(crate) revenge_on: &'static [DeathCause],
}

pub(crate) fn capability(role: Role) -> Capability {
    match role {
        Role::Guardian => Capability {
            night: Some(night::guard_step),
            revenge_on: &[],
        },
        Role::Werewolf => Capability {
            night: Some(night::attack_step),
            revenge_on: &[],
        },
        Role::Seer => Capability {
            night: Some(night::inspect_step),
            revenge_on: &[],
        },
        Role::Witch => Capability {
            night: Some(night::witch_step),
            revenge_on: &[],
        },
        Role::Hunter => Capability {
            night: None,
            revenge_on: &[DeathCause::WerewolfKill, DeathCause::VotedOut],
        },
        Role::Villager => Capability {
            night: None,
            revenge_on: &[],
        },
    }
}

/// True if `role` acts during the night.
#[must_use]
pub fn acts_at_night(role: Role) -> bool {
    capability(role).night.is_some()
}

/// True if a holder of `role` dying of `cause` gets a revenge shot.
#[must_use]
pub fn triggers_revenge(role: Role, cause: DeathCause) -> bool {
    capability(role).revenge_on.contains(&cause)
}
