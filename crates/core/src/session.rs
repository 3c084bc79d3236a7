//! Session module - the game session state machine
//!
//! A [`Session`] owns the board and every counter of a game. All transitions
//! are synchronous and take the host clock reading (`now_ms`, monotonic
//! milliseconds) as an argument, which keeps the state machine deterministic
//! and testable without real time passing.
//!
//! Turn flow:
//!
//! ```text
//! Idle --flip--> OneFlipped --flip--> Resolving --match (immediate)--> Idle
//!                                         \------FlipBack fired-------> Idle
//! ```
//!
//! While a pair is resolving every other flip is rejected (turn lock).

use arrayvec::ArrayVec;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::deck::{self, distinct_items};
use crate::rng::DeckRng;
use crate::scoring::{calculate_accuracy, calculate_score};
use crate::timer::{ArmedTimer, Effect, Effects, TimerKind, TimerToken};
use crate::types::*;

/// Non-fatal problems found while dealing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoadWarning {
    /// The provider returned nothing; the board is empty and unplayable.
    #[error("no content available for {requested} pairs; the board is empty")]
    ContentUnavailable { requested: usize },

    /// The provider returned fewer items than requested; the board is smaller.
    #[error("only {received} of {requested} items available; playing a reduced board")]
    InsufficientContent { requested: usize, received: usize },
}

/// Result of [`Session::deal`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dealt {
    pub effects: Effects,
    pub warning: Option<LoadWarning>,
}

/// Delays used by a session, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimings {
    pub mismatch_delay_ms: u32,
    pub round_transition_ms: u32,
    pub countdown_tick_ms: u32,
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            mismatch_delay_ms: MISMATCH_DELAY_MS,
            round_transition_ms: ROUND_TRANSITION_MS,
            countdown_tick_ms: COUNTDOWN_TICK_MS,
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct Session {
    config: GameConfig,
    timings: SessionTimings,
    items: Vec<Item>,
    cards: Vec<Card>,
    /// Face-up cards of the current turn that are not matched yet.
    flipped: ArrayVec<usize, 2>,
    matched_pairs: u32,
    moves: u32,
    score: u32,
    time_remaining: Option<u32>,
    phase: Phase,
    outcome: Option<Outcome>,
    /// Bumped on every deal and reset; timer tokens from older epochs are ignored.
    epoch: u32,
    seq: u32,
    armed: [Option<ArmedTimer>; 3],
    /// Remaining delay of timers cancelled by a pause.
    suspended: [Option<u32>; 3],
    /// Clock reading the elapsed time is measured from (rebased on resume).
    started_at_ms: u64,
    /// Elapsed time while paused or over.
    frozen_elapsed_ms: Option<u64>,
    round: u32,
    carried_score: u64,
}

impl Session {
    /// Create a session waiting for content.
    pub fn new(config: GameConfig) -> Self {
        Self::with_timings(config, SessionTimings::default())
    }

    pub fn with_timings(config: GameConfig, timings: SessionTimings) -> Self {
        Self {
            config,
            timings,
            items: Vec::new(),
            cards: Vec::new(),
            flipped: ArrayVec::new(),
            matched_pairs: 0,
            moves: 0,
            score: 0,
            time_remaining: config.time_limit_secs(),
            phase: Phase::Loading,
            outcome: None,
            epoch: 0,
            seq: 0,
            armed: [None; 3],
            suspended: [None; 3],
            started_at_ms: 0,
            frozen_elapsed_ms: None,
            round: 1,
            carried_score: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn timings(&self) -> &SessionTimings {
        &self.timings
    }

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Item shown on the card at `index`.
    pub fn item_for(&self, index: usize) -> Option<&Item> {
        let card = self.cards.get(index)?;
        self.items.iter().find(|item| item.id == card.item_id)
    }

    /// Indices of face-up cards waiting to be resolved.
    pub fn flipped(&self) -> &[usize] {
        &self.flipped
    }

    pub fn matched_pairs(&self) -> u32 {
        self.matched_pairs
    }

    pub fn total_pairs(&self) -> u32 {
        (self.cards.len() / 2) as u32
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> Option<u32> {
        self.time_remaining
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Endless round number (starts at 1).
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Sum of the final scores of cleared endless rounds.
    pub fn carried_score(&self) -> u64 {
        self.carried_score
    }

    /// Token currently armed for `kind`, if any.
    pub fn armed_token(&self, kind: TimerKind) -> Option<TimerToken> {
        self.armed[kind.slot()].map(|armed| armed.token)
    }

    /// Whether an endless round clear is waiting for its reshuffle.
    pub fn round_transition_pending(&self) -> bool {
        self.armed[TimerKind::NextRound.slot()].is_some()
    }

    /// Elapsed play time, excluding paused periods.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        if let Some(frozen) = self.frozen_elapsed_ms {
            return frozen;
        }
        match self.phase {
            Phase::Playing => now_ms.saturating_sub(self.started_at_ms),
            Phase::Loading | Phase::Paused | Phase::Over => 0,
        }
    }

    /// Elapsed play time in whole seconds.
    pub fn elapsed_secs(&self, now_ms: u64) -> u32 {
        (self.elapsed_ms(now_ms) / 1000).min(u64::from(u32::MAX)) as u32
    }

    /// Lay out a freshly shuffled board and start playing.
    ///
    /// Only valid while loading; otherwise nothing happens. Duplicate item ids
    /// are dropped and a short item list produces a smaller board.
    pub fn deal(&mut self, items: Vec<Item>, rng: &mut DeckRng, now_ms: u64) -> Dealt {
        let mut dealt = Dealt::default();
        if self.phase != Phase::Loading {
            debug!(phase = self.phase.as_str(), "deal ignored outside loading");
            return dealt;
        }

        let requested = self.config.card_count.pairs();
        let items = distinct_items(items, requested);
        dealt.warning = match items.len() {
            0 => Some(LoadWarning::ContentUnavailable { requested }),
            received if received < requested => Some(LoadWarning::InsufficientContent {
                requested,
                received,
            }),
            _ => None,
        };
        if let Some(warning) = dealt.warning {
            warn!(%warning, "dealing degraded board");
        }

        self.cards = deck::deal(&items, rng);
        self.items = items;
        self.flipped.clear();
        self.matched_pairs = 0;
        self.moves = 0;
        self.score = 0;
        self.time_remaining = self.config.time_limit_secs();
        self.outcome = None;
        self.epoch = self.epoch.wrapping_add(1);
        self.armed = [None; 3];
        self.suspended = [None; 3];
        self.started_at_ms = now_ms;
        self.frozen_elapsed_ms = None;
        self.phase = Phase::Playing;

        if self.time_remaining.is_some() {
            let tick = self.timings.countdown_tick_ms;
            dealt.effects.push(self.arm(TimerKind::Countdown, tick, now_ms));
        }

        info!(
            mode = self.config.mode.as_str(),
            cards = self.cards.len(),
            epoch = self.epoch,
            round = self.round,
            seed = rng.seed(),
            "board dealt"
        );
        dealt
    }

    /// Reveal the card at `index`.
    ///
    /// Rejected silently when not playing, when the index is out of range,
    /// when the card is already face-up or matched, or while a pair resolves.
    pub fn flip(&mut self, index: usize, now_ms: u64) -> Effects {
        let mut effects = Effects::new();
        if self.phase != Phase::Playing || self.flipped.is_full() {
            return effects;
        }
        match self.cards.get(index) {
            Some(card) if card.is_hidden() => {}
            _ => return effects,
        }

        self.cards[index].is_flipped = true;
        self.flipped.push(index);

        if let &[first, second] = self.flipped.as_slice() {
            self.resolve_turn(first, second, now_ms, &mut effects);
        }
        effects
    }

    fn resolve_turn(&mut self, first: usize, second: usize, now_ms: u64, effects: &mut Effects) {
        self.moves = self.moves.saturating_add(1);

        if self.cards[first].pair_id != self.cards[second].pair_id {
            debug!(first, second, moves = self.moves, "mismatch");
            let delay = self.timings.mismatch_delay_ms;
            effects.push(self.arm(TimerKind::FlipBack, delay, now_ms));
            return;
        }

        self.cards[first].is_matched = true;
        self.cards[second].is_matched = true;
        self.flipped.clear();
        self.matched_pairs += 1;
        self.rescore(now_ms);
        debug!(
            first,
            second,
            matched = self.matched_pairs,
            moves = self.moves,
            score = self.score,
            "match"
        );

        if self.matched_pairs == self.total_pairs() {
            self.finish(Outcome::Won, now_ms, effects);
            if self.config.mode == GameMode::Endless {
                let delay = self.timings.round_transition_ms;
                effects.push(self.arm(TimerKind::NextRound, delay, now_ms));
            }
        }
    }

    /// Suspend play. Pending timers are cancelled and keep their remaining delay.
    pub fn pause(&mut self, now_ms: u64) -> Effects {
        let mut effects = Effects::new();
        if self.phase != Phase::Playing {
            return effects;
        }

        self.frozen_elapsed_ms = Some(self.elapsed_ms(now_ms));
        for kind in TimerKind::ALL {
            if let Some(armed) = self.armed[kind.slot()].take() {
                let remaining = armed.due_ms.saturating_sub(now_ms).min(u64::from(u32::MAX));
                self.suspended[kind.slot()] = Some(remaining as u32);
                effects.push(Effect::Cancel(kind));
            }
        }
        self.phase = Phase::Paused;
        debug!(elapsed_ms = ?self.frozen_elapsed_ms, "paused");
        effects
    }

    /// Continue after [`pause`](Self::pause), re-arming suspended timers.
    pub fn resume(&mut self, now_ms: u64) -> Effects {
        let mut effects = Effects::new();
        if self.phase != Phase::Paused {
            return effects;
        }

        let elapsed = self.frozen_elapsed_ms.take().unwrap_or(0);
        self.started_at_ms = now_ms.saturating_sub(elapsed);
        self.phase = Phase::Playing;
        for kind in TimerKind::ALL {
            if let Some(remaining) = self.suspended[kind.slot()].take() {
                effects.push(self.arm(kind, remaining, now_ms));
            }
        }
        debug!(elapsed_ms = elapsed, "resumed");
        effects
    }

    /// Discard the board and every pending timer; the session waits for a new deal.
    pub fn reset(&mut self) -> Effects {
        let mut effects = Effects::new();
        for kind in TimerKind::ALL {
            self.disarm(kind, &mut effects);
        }
        let epoch = self.epoch.wrapping_add(1);
        *self = Self::with_timings(self.config, self.timings);
        self.epoch = epoch;
        info!(epoch, "session reset");
        effects
    }

    /// Deliver a due timer. Tokens that are no longer armed are ignored.
    pub fn fire(&mut self, token: TimerToken, now_ms: u64) -> Effects {
        let mut effects = Effects::new();
        let slot = token.kind.slot();
        match self.armed[slot] {
            Some(armed) if armed.token == token => self.armed[slot] = None,
            _ => {
                debug!(
                    timer = token.kind.as_str(),
                    epoch = token.epoch,
                    seq = token.seq,
                    "stale timer ignored"
                );
                return effects;
            }
        }

        match token.kind {
            TimerKind::FlipBack => self.flip_back(),
            TimerKind::Countdown => self.count_down(now_ms, &mut effects),
            TimerKind::NextRound => self.close_round(&mut effects),
        }
        effects
    }

    /// Apply a player/host command.
    pub fn apply(&mut self, command: Command, now_ms: u64) -> Effects {
        match command {
            Command::Flip(index) => self.flip(index, now_ms),
            Command::Pause => self.pause(now_ms),
            Command::Resume => self.resume(now_ms),
            Command::Reset => self.reset(),
        }
    }

    /// Final statistics; `None` until the session is over.
    pub fn stats(&self) -> Option<GameStats> {
        if self.phase != Phase::Over {
            return None;
        }
        let elapsed_secs = (self.frozen_elapsed_ms.unwrap_or(0) / 1000).min(u64::from(u32::MAX));
        Some(GameStats {
            final_score: self.score,
            moves: self.moves,
            time_elapsed: elapsed_secs as u32,
            matched_pairs: self.matched_pairs,
            accuracy: calculate_accuracy(self.matched_pairs, self.moves),
        })
    }

    fn flip_back(&mut self) {
        for index in self.flipped.drain(..) {
            if let Some(card) = self.cards.get_mut(index) {
                if !card.is_matched {
                    card.is_flipped = false;
                }
            }
        }
    }

    fn count_down(&mut self, now_ms: u64, effects: &mut Effects) {
        if self.phase != Phase::Playing {
            return;
        }
        let Some(remaining) = self.time_remaining else {
            return;
        };

        let remaining = remaining.saturating_sub(1);
        self.time_remaining = Some(remaining);
        if remaining == 0 {
            self.finish(Outcome::TimedOut, now_ms, effects);
        } else {
            let tick = self.timings.countdown_tick_ms;
            effects.push(self.arm(TimerKind::Countdown, tick, now_ms));
        }
    }

    fn close_round(&mut self, effects: &mut Effects) {
        if self.config.mode != GameMode::Endless || self.outcome != Some(Outcome::Won) {
            return;
        }
        self.carried_score += u64::from(self.score);
        self.round = self.round.saturating_add(1);
        self.phase = Phase::Loading;
        self.outcome = None;
        self.frozen_elapsed_ms = None;
        self.cards.clear();
        self.items.clear();
        info!(
            round = self.round,
            carried_score = self.carried_score,
            "endless round cleared"
        );
        effects.push(Effect::DealNextRound);
    }

    fn finish(&mut self, outcome: Outcome, now_ms: u64, effects: &mut Effects) {
        self.frozen_elapsed_ms = Some(self.elapsed_ms(now_ms));
        self.phase = Phase::Over;
        self.outcome = Some(outcome);
        self.rescore(now_ms);
        self.disarm(TimerKind::Countdown, effects);
        info!(
            outcome = ?outcome,
            score = self.score,
            moves = self.moves,
            matched = self.matched_pairs,
            "session over"
        );
    }

    fn rescore(&mut self, now_ms: u64) {
        self.score = calculate_score(
            self.config.mode,
            self.cards.len() as u32,
            self.matched_pairs,
            self.moves,
            self.elapsed_secs(now_ms),
        )
        .total;
    }

    fn arm(&mut self, kind: TimerKind, delay_ms: u32, now_ms: u64) -> Effect {
        self.seq = self.seq.wrapping_add(1);
        let token = TimerToken {
            kind,
            epoch: self.epoch,
            seq: self.seq,
        };
        self.armed[kind.slot()] = Some(ArmedTimer {
            token,
            due_ms: now_ms.saturating_add(u64::from(delay_ms)),
        });
        Effect::Arm { token, delay_ms }
    }

    fn disarm(&mut self, kind: TimerKind, effects: &mut Effects) {
        if self.armed[kind.slot()].take().is_some() {
            effects.push(Effect::Cancel(kind));
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
