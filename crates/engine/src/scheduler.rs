//! Timer queue driven by session effects.
//!
//! Holds at most one pending timer per [`TimerKind`]. Arming a kind that is
//! already pending cancels the old entry first, so a superseded timer can
//! never fire.

use memory_match_core::{Effect, TimerKind, TimerToken};
use tracing::trace;

/// A pending timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    pub token: TimerToken,
    pub due_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `token` at `due_ms`, replacing any pending timer of its kind.
    pub fn arm(&mut self, token: TimerToken, due_ms: u64) {
        self.cancel(token.kind);
        trace!(timer = token.kind.as_str(), seq = token.seq, due_ms, "timer armed");
        self.pending.push(Scheduled { token, due_ms });
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.pending.retain(|s| s.token.kind != kind);
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Apply one effect relative to `now_ms`.
    ///
    /// Returns `true` for [`Effect::DealNextRound`], which the caller handles.
    pub fn apply(&mut self, effect: Effect, now_ms: u64) -> bool {
        match effect {
            Effect::Arm { token, delay_ms } => {
                self.arm(token, now_ms.saturating_add(u64::from(delay_ms)));
                false
            }
            Effect::Cancel(kind) => {
                self.cancel(kind);
                false
            }
            Effect::DealNextRound => true,
        }
    }

    /// Earliest pending deadline.
    pub fn next_due(&self) -> Option<u64> {
        self.pending.iter().map(|s| s.due_ms).min()
    }

    /// Remove and return the earliest timer due at or before `now_ms`.
    ///
    /// Timers due at the same instant come out in arming order.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Scheduled> {
        let (index, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due_ms <= now_ms)
            .min_by_key(|(_, s)| (s.due_ms, s.token.seq))?;
        Some(self.pending.swap_remove(index))
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|s| s.token.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
