//! Karma state machine.
//!
//! Each (executor, target) pair has at most one live log entry recording
//! the last direction and when it was applied. Entries older than the wait
//! window are removed by a sweep before every evaluation, so an absent
//! entry and an expired entry mean the same thing.

use chrono::{DateTime, Duration, Utc};

use crate::actions::KarmaSubAction;
use crate::error::CoreError;
use crate::types::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KarmaDirection {
    Applaud,
    Smite,
}

impl KarmaDirection {
    /// The value stored in `log_karma.action`.
    pub fn as_i16(self) -> i16 {
        match self {
            KarmaDirection::Applaud => 1,
            KarmaDirection::Smite => -1,
        }
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            1 => Some(KarmaDirection::Applaud),
            -1 => Some(KarmaDirection::Smite),
            _ => None,
        }
    }
}

impl From<KarmaSubAction> for KarmaDirection {
    fn from(sa: KarmaSubAction) -> Self {
        match sa {
            KarmaSubAction::Applaud => KarmaDirection::Applaud,
            KarmaSubAction::Smite => KarmaDirection::Smite,
        }
    }
}

/// Longest wait window honoured, in hours (ten years).
pub const MAX_WAIT_HOURS: i64 = 87_600;

/// The live log entry for an (executor, target) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KarmaPrior {
    pub direction: KarmaDirection,
    pub log_time: Timestamp,
}

/// How the rate limit applies to this actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KarmaPolicy {
    /// Wait window in hours. Zero disables the limit.
    pub wait_hours: i64,
    /// False for moderators exempt from the time restriction.
    pub restricted: bool,
}

impl KarmaPolicy {
    /// Build the policy for one actor.
    ///
    /// Moderators (`moderate_forum`) are exempt unless the forum restricts
    /// admins too.
    pub fn new(wait_hours: i64, restrict_admins: bool, is_moderator: bool) -> Self {
        Self {
            wait_hours: wait_hours.clamp(0, MAX_WAIT_HOURS),
            restricted: restrict_admins || !is_moderator,
        }
    }

    pub fn window(&self) -> Duration {
        Duration::hours(self.wait_hours.clamp(0, MAX_WAIT_HOURS))
    }
}

/// Log entries older than this are swept before evaluation.
pub fn sweep_cutoff(now: Timestamp, wait_hours: i64) -> Timestamp {
    now.checked_sub_signed(Duration::hours(wait_hours.clamp(0, MAX_WAIT_HOURS)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// The mutation to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KarmaChange {
    /// No live entry: record one and add a point to the direction's counter.
    Fresh(KarmaDirection),
    /// Live entry in the other direction: move one point across.
    Reverse {
        from: KarmaDirection,
        to: KarmaDirection,
    },
}

/// Counter deltas for `members.karma_good` / `members.karma_bad`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KarmaDelta {
    pub good: i32,
    pub bad: i32,
}

impl KarmaChange {
    pub fn direction(&self) -> KarmaDirection {
        match *self {
            KarmaChange::Fresh(dir) => dir,
            KarmaChange::Reverse { to, .. } => to,
        }
    }

    pub fn delta(&self) -> KarmaDelta {
        let mut delta = KarmaDelta::default();
        let bump = |d: &mut KarmaDelta, dir: KarmaDirection, by: i32| match dir {
            KarmaDirection::Applaud => d.good += by,
            KarmaDirection::Smite => d.bad += by,
        };
        match *self {
            KarmaChange::Fresh(dir) => bump(&mut delta, dir, 1),
            KarmaChange::Reverse { from, to } => {
                bump(&mut delta, from, -1);
                bump(&mut delta, to, 1);
            }
        }
        delta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum KarmaError {
    #[error("You cannot repeat a karma action without waiting {hours} hours")]
    WaitTime { hours: i64 },
}

impl From<KarmaError> for CoreError {
    fn from(err: KarmaError) -> Self {
        CoreError::RateLimited(err.to_string())
    }
}

/// Decide what a karma action does given the pair's live log entry.
pub fn decide(
    policy: KarmaPolicy,
    prior: Option<KarmaPrior>,
    direction: KarmaDirection,
    now: Timestamp,
) -> Result<KarmaChange, KarmaError> {
    if !policy.restricted || policy.wait_hours == 0 {
        return Ok(KarmaChange::Fresh(direction));
    }

    let live = prior.filter(|p| now - p.log_time < policy.window());
    match live {
        None => Ok(KarmaChange::Fresh(direction)),
        Some(p) if p.direction == direction => Err(KarmaError::WaitTime {
            hours: policy.wait_hours,
        }),
        Some(p) => Ok(KarmaChange::Reverse {
            from: p.direction,
            to: direction,
        }),
    }
}
