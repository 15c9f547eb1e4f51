//! Topic lock state machine.
//!
//! A topic is unlocked, locked by a moderator, or locked by its starter.
//! The stored value is a `SMALLINT` (0, 1, 2); anything else is rejected
//! when the row is loaded.
//!
//! ```text
//!                    privileged               owner
//!   Unlocked  ───────────────────▶ ModLocked   Unlocked ─────▶ OwnerLocked
//!   ModLocked ───────────────────▶ Unlocked    (privileged only)
//!   OwnerLocked ─────────────────▶ Unlocked    (owner or privileged)
//! ```

use serde::Serialize;

use crate::error::CoreError;
use crate::permissions::Authority;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    Unlocked,
    ModLocked,
    OwnerLocked,
}

impl LockState {
    pub fn as_i16(self) -> i16 {
        match self {
            LockState::Unlocked => 0,
            LockState::ModLocked => 1,
            LockState::OwnerLocked => 2,
        }
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(LockState::Unlocked),
            1 => Some(LockState::ModLocked),
            2 => Some(LockState::OwnerLocked),
            _ => None,
        }
    }

    pub fn is_locked(self) -> bool {
        self != LockState::Unlocked
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LockError {
    #[error("This topic was locked by a moderator and cannot be unlocked by its starter")]
    LockedByModerator,
}

impl From<LockError> for CoreError {
    fn from(err: LockError) -> Self {
        CoreError::Forbidden(err.to_string())
    }
}

/// Apply a lock toggle by an actor with the given authority.
///
/// [`Authority::Any`] is the privileged (`lock_any`) actor;
/// [`Authority::Own`] is the topic starter holding only `lock_own`.
pub fn toggle(current: LockState, authority: Authority) -> Result<LockState, LockError> {
    match (current, authority) {
        (LockState::Unlocked, Authority::Any) => Ok(LockState::ModLocked),
        (LockState::Unlocked, Authority::Own) => Ok(LockState::OwnerLocked),
        (LockState::ModLocked, Authority::Any) => Ok(LockState::Unlocked),
        (LockState::ModLocked, Authority::Own) => Err(LockError::LockedByModerator),
        (LockState::OwnerLocked, _) => Ok(LockState::Unlocked),
    }
}

/// Name of the moderation-log / notification event for a transition.
pub fn event_name(next: LockState) -> &'static str {
    if next.is_locked() {
        "lock"
    } else {
        "unlock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATES: [LockState; 3] = [
        LockState::Unlocked,
        LockState::ModLocked,
        LockState::OwnerLocked,
    ];

    #[test]
    fn stored_values_round_trip() {
        for state in STATES {
            assert_eq!(LockState::from_i16(state.as_i16()), Some(state));
        }
        assert_eq!(LockState::from_i16(3), None);
        assert_eq!(LockState::from_i16(-1), None);
    }

    #[test]
    fn full_transition_table() {
        let expected = [
            (LockState::Unlocked, Authority::Any, Ok(LockState::ModLocked)),
            (LockState::Unlocked, Authority::Own, Ok(LockState::OwnerLocked)),
            (LockState::ModLocked, Authority::Any, Ok(LockState::Unlocked)),
            (
                LockState::ModLocked,
                Authority::Own,
                Err(LockError::LockedByModerator),
            ),
            (LockState::OwnerLocked, Authority::Any, Ok(LockState::Unlocked)),
            (LockState::OwnerLocked, Authority::Own, Ok(LockState::Unlocked)),
        ];
        for (from, authority, result) in expected {
            assert_eq!(toggle(from, authority), result, "{from:?} by {authority:?}");
        }
    }

    #[test]
    fn owner_cannot_unlock_mod_lock_repeatedly() {
        for _ in 0..3 {
            assert!(toggle(LockState::ModLocked, Authority::Own).is_err());
        }
    }

    #[test]
    fn lock_error_is_forbidden() {
        let err: CoreError = LockError::LockedByModerator.into();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[test]
    fn event_names() {
        assert_eq!(event_name(LockState::ModLocked), "lock");
        assert_eq!(event_name(LockState::OwnerLocked), "lock");
        assert_eq!(event_name(LockState::Unlocked), "unlock");
    }
}
