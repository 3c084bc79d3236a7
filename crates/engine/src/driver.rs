//! Game driver - binds a session to a clock, a timer queue and a content source.
//!
//! The driver is the only place where time passes and content is loaded.
//! Every public operation first delivers the timers that are already due, so
//! a command never observes a state the clock has moved past.

use memory_match_content::ContentProvider;
use memory_match_core::types::{Command, GameConfig, GameStats, Item, Phase};
use memory_match_core::{DeckRng, Effects, LoadWarning, Session, SessionSnapshot};
use tracing::{debug, warn};

use crate::clock::{Clock, TokioClock};
use crate::config::EngineConfig;
use crate::scheduler::Scheduler;

pub struct GameDriver<P, C = TokioClock> {
    session: Session,
    scheduler: Scheduler,
    provider: P,
    rng: DeckRng,
    clock: C,
    last_warning: Option<LoadWarning>,
}

impl<P: ContentProvider, C: Clock> GameDriver<P, C> {
    pub fn new(session: Session, provider: P, rng: DeckRng, clock: C) -> Self {
        Self {
            session,
            scheduler: Scheduler::new(),
            provider,
            rng,
            clock,
            last_warning: None,
        }
    }

    /// Driver for `game` using the engine's timings and seed.
    pub fn from_config(game: GameConfig, engine: &EngineConfig, provider: P, clock: C) -> Self {
        let session = Session::with_timings(game, engine.timings);
        Self::new(session, provider, engine.deck_rng(), clock)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Warning reported by the most recent deal.
    pub fn last_warning(&self) -> Option<LoadWarning> {
        self.last_warning
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Next clock reading at which [`pump`](Self::pump) has work to do.
    pub fn next_deadline(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot(self.clock.now_ms())
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        self.session.snapshot_into(out, self.clock.now_ms());
    }

    pub fn stats(&self) -> Option<GameStats> {
        self.session.stats()
    }

    /// Load content and deal a board. Does nothing unless the session is loading.
    pub async fn start(&mut self) -> Option<LoadWarning> {
        if self.session.phase() != Phase::Loading {
            debug!(phase = self.session.phase().as_str(), "start ignored");
            return None;
        }

        let items = self.load_items().await;
        let now = self.clock.now_ms();
        let dealt = self.session.deal(items, &mut self.rng, now);
        self.apply_effects(dealt.effects, now);
        self.last_warning = dealt.warning;
        dealt.warning
    }

    /// Discard the current game, cancel every pending timer and deal again.
    pub async fn restart(&mut self) -> Option<LoadWarning> {
        let now = self.clock.now_ms();
        let effects = self.session.reset();
        self.apply_effects(effects, now);
        self.scheduler.cancel_all();
        self.start().await
    }

    pub async fn flip(&mut self, index: usize) {
        self.pump().await;
        let now = self.clock.now_ms();
        let effects = self.session.flip(index, now);
        self.apply_effects(effects, now);
    }

    pub async fn pause(&mut self) {
        self.pump().await;
        let now = self.clock.now_ms();
        let effects = self.session.pause(now);
        self.apply_effects(effects, now);
    }

    pub async fn resume(&mut self) {
        self.pump().await;
        let now = self.clock.now_ms();
        let effects = self.session.resume(now);
        self.apply_effects(effects, now);
    }

    pub async fn apply(&mut self, command: Command) {
        debug!(command = command.name(), "command");
        match command {
            Command::Flip(index) => self.flip(index).await,
            Command::Pause => self.pause().await,
            Command::Resume => self.resume().await,
            Command::Reset => {
                self.restart().await;
            }
        }
    }

    /// Fire every timer due by now, in deadline order.
    ///
    /// Timers fire at their own deadline, so a late pump replays the missed
    /// countdown ticks exactly. An endless round transition loads and deals
    /// the next board before returning. Returns the number of timers fired.
    pub async fn pump(&mut self) -> usize {
        let mut fired = 0;
        while let Some(due) = self.scheduler.pop_due(self.clock.now_ms()) {
            fired += 1;
            let effects = self.session.fire(due.token, due.due_ms);
            if self.apply_effects(effects, due.due_ms) {
                self.start().await;
            }
        }
        fired
    }

    fn apply_effects(&mut self, effects: Effects, now_ms: u64) -> bool {
        let mut deal_next = false;
        for effect in effects {
            deal_next |= self.scheduler.apply(effect, now_ms);
        }
        deal_next
    }

    async fn load_items(&self) -> Vec<Item> {
        let count = self.session.config().card_count.pairs();
        match self.provider.get_items(count).await {
            Ok(items) => items,
            Err(err) => {
                warn!(error = %err, requested = count, "content provider failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use async_trait::async_trait;
    use memory_match_content::{CatalogProvider, ContentError};
    use memory_match_core::types::{CardCount, GameMode, Outcome};
    use memory_match_core::TimerKind;
    use std::collections::HashMap;

    struct FailingProvider;

    #[async_trait]
    impl ContentProvider for FailingProvider {
        async fn get_items(&self, _count: usize) -> Result<Vec<Item>, ContentError> {
            Err(ContentError::Transport("connection refused".into()))
        }
    }

    fn driver(mode: GameMode, count: CardCount) -> GameDriver<CatalogProvider, ManualClock> {
        let session = Session::new(GameConfig::new(mode, count));
        let provider = CatalogProvider::builtin().with_seed(11);
        GameDriver::new(session, provider, DeckRng::new(12345), ManualClock::new(0))
    }

    fn pairs<P: ContentProvider, C: Clock>(driver: &GameDriver<P, C>) -> Vec<(usize, usize)> {
        let mut by_pair: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, card) in driver.session().cards().iter().enumerate() {
            by_pair.entry(card.pair_id.as_str()).or_default().push(i);
        }
        let mut out: Vec<(usize, usize)> = by_pair.values().map(|v| (v[0], v[1])).collect();
        out.sort_unstable();
        out
    }

    #[tokio::test]
    async fn test_start_deals_board() {
        let mut driver = driver(GameMode::Classic, CardCount::Eight);
        assert!(driver.start().await.is_none());

        let snap = driver.snapshot();
        assert_eq!(snap.phase, Phase::Playing);
        assert_eq!(snap.cards.len(), 8);
        assert!(driver.scheduler().is_empty());

        // Second start is ignored.
        assert!(driver.start().await.is_none());
        assert_eq!(driver.session().epoch(), 1);
    }

    #[tokio::test]
    async fn test_mismatch_flips_back_when_clock_passes_delay() {
        let mut driver = driver(GameMode::Classic, CardCount::Eight);
        driver.start().await;
        let p = pairs(&driver);
        let (a, b) = (p[0].0, p[1].0);

        driver.flip(a).await;
        driver.flip(b).await;
        assert!(driver.scheduler().is_pending(TimerKind::FlipBack));

        driver.clock().advance(999);
        assert_eq!(driver.pump().await, 0);
        assert!(driver.session().cards()[a].is_flipped);

        driver.clock().advance(1);
        assert_eq!(driver.pump().await, 1);
        assert!(!driver.session().cards()[a].is_flipped);
        assert!(driver.session().flipped().is_empty());
    }

    #[tokio::test]
    async fn test_flip_delivers_due_flip_back_first() {
        let mut driver = driver(GameMode::Classic, CardCount::Eight);
        driver.start().await;
        let p = pairs(&driver);
        let (a, b) = (p[0].0, p[1].0);

        driver.flip(a).await;
        driver.flip(b).await;
        driver.clock().advance(1_500);

        // The turn lock is released by the due flip-back before the flip applies.
        driver.flip(p[2].0).await;
        assert_eq!(driver.session().flipped(), &[p[2].0]);
    }

    #[tokio::test]
    async fn test_restart_cancels_pending_flip_back() {
        let mut driver = driver(GameMode::Classic, CardCount::Eight);
        driver.start().await;
        let p = pairs(&driver);
        driver.flip(p[0].0).await;
        driver.flip(p[1].0).await;

        driver.clock().advance(200);
        driver.restart().await;
        assert_eq!(driver.session().epoch(), 3);
        assert!(driver.scheduler().is_empty());

        let first = pairs(&driver)[0].0;
        driver.flip(first).await;
        let before = driver.snapshot();

        driver.clock().advance(5_000);
        assert_eq!(driver.pump().await, 0);
        let after = driver.snapshot();
        assert_eq!(after.cards, before.cards);
        assert_eq!(after.flipped, vec![first]);
        assert_eq!(after.moves, 0);
    }

    #[tokio::test]
    async fn test_timed_countdown_catches_up() {
        let mut driver = driver(GameMode::Timed, CardCount::Four);
        driver.start().await;

        driver.clock().advance(10_500);
        assert_eq!(driver.pump().await, 10);
        assert_eq!(driver.session().time_remaining(), Some(50));

        driver.clock().advance(60_000);
        driver.pump().await;
        let snap = driver.snapshot();
        assert_eq!(snap.phase, Phase::Over);
        assert_eq!(snap.outcome, Some(Outcome::TimedOut));
        assert_eq!(snap.time_remaining, Some(0));
        assert_eq!(driver.stats().unwrap().time_elapsed, 60);
        assert!(driver.scheduler().is_empty());
    }

    #[tokio::test]
    async fn test_pause_freezes_countdown() {
        let mut driver = driver(GameMode::Timed, CardCount::Four);
        driver.start().await;

        driver.clock().advance(2_400);
        driver.pause().await;
        assert_eq!(driver.session().time_remaining(), Some(58));
        assert!(driver.scheduler().is_empty());

        driver.clock().advance(30_000);
        assert_eq!(driver.pump().await, 0);

        driver.resume().await;
        assert_eq!(driver.next_deadline(), Some(32_400 + 600));
        driver.clock().advance(600);
        driver.pump().await;
        assert_eq!(driver.session().time_remaining(), Some(57));
        assert_eq!(driver.snapshot().time_elapsed, 3);
    }

    #[tokio::test]
    async fn test_endless_deals_next_round() {
        let mut driver = driver(GameMode::Endless, CardCount::Four);
        driver.start().await;

        for (a, b) in pairs(&driver) {
            driver.flip(a).await;
            driver.flip(b).await;
        }
        let snap = driver.snapshot();
        assert_eq!(snap.outcome, Some(Outcome::Won));
        assert!(snap.round_transition_pending);
        assert_eq!(snap.stats.map(|s| s.final_score), Some(330));

        driver.clock().advance(1_500);
        assert_eq!(driver.pump().await, 1);

        let snap = driver.snapshot();
        assert_eq!(snap.phase, Phase::Playing);
        assert_eq!(snap.round, 2);
        assert_eq!(snap.carried_score, 330);
        assert_eq!(snap.moves, 0);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.cards.len(), 4);
        assert!(snap.cards.iter().all(|c| c.is_hidden()));
        assert_ne!(snap.epoch, 1);
        assert!(!snap.round_transition_pending);
    }

    #[tokio::test]
    async fn test_transport_failure_deals_empty_board() {
        let session = Session::new(GameConfig::new(GameMode::Classic, CardCount::Six));
        let mut driver =
            GameDriver::new(session, FailingProvider, DeckRng::new(1), ManualClock::new(0));

        let warning = driver.start().await;
        assert_eq!(warning, Some(LoadWarning::ContentUnavailable { requested: 3 }));
        assert_eq!(driver.last_warning(), warning);
        assert_eq!(driver.session().phase(), Phase::Playing);
        assert!(!driver.snapshot().playable());
    }

    #[tokio::test]
    async fn test_apply_reset_redeals() {
        let mut driver = driver(GameMode::Classic, CardCount::Four);
        driver.start().await;
        driver.apply(Command::Flip(0)).await;
        driver.apply(Command::Reset).await;

        let snap = driver.snapshot();
        assert_eq!(snap.phase, Phase::Playing);
        assert!(snap.flipped.is_empty());
        assert_eq!(snap.epoch, 3);
    }
}
