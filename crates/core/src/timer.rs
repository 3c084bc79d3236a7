//! Timer tokens and effects.
//!
//! A session never sleeps. Transitions that need time to pass return
//! [`Effect`]s; the host arms or cancels the matching timers and hands the
//! [`TimerToken`] back through [`Session::fire`](crate::Session::fire) once it
//! is due. A token is only honoured while it is the most recent one armed for
//! its kind in the current epoch, so a callback that outlives a reset, a pause
//! or a new round is dropped.

use arrayvec::ArrayVec;

/// The three timers a session can arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Turns a mismatched pair face-down again.
    FlipBack,
    /// Timed-mode one-second countdown.
    Countdown,
    /// Endless-mode pause before the next deal.
    NextRound,
}

impl TimerKind {
    pub const ALL: [TimerKind; 3] = [TimerKind::FlipBack, TimerKind::Countdown, TimerKind::NextRound];

    pub(crate) fn slot(&self) -> usize {
        match self {
            TimerKind::FlipBack => 0,
            TimerKind::Countdown => 1,
            TimerKind::NextRound => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerKind::FlipBack => "flip_back",
            TimerKind::Countdown => "countdown",
            TimerKind::NextRound => "next_round",
        }
    }
}

/// Identity of one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub kind: TimerKind,
    /// Session epoch the timer belongs to.
    pub epoch: u32,
    /// Arm sequence number within the session.
    pub seq: u32,
}

/// Side effect requested by a session transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Schedule `token` to fire after `delay_ms`, replacing any timer of the same kind.
    Arm { token: TimerToken, delay_ms: u32 },
    /// Drop any pending timer of this kind.
    Cancel(TimerKind),
    /// Load fresh content and call [`Session::deal`](crate::Session::deal).
    DealNextRound,
}

/// Effects produced by a single transition (stack-only, never more than four).
pub type Effects = ArrayVec<Effect, 4>;

/// A timer the session is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ArmedTimer {
    pub token: TimerToken,
    pub due_ms: u64,
}
