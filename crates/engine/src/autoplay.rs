//! Perfect-memory autoplayer on simulated time.
//!
//! The player only learns a card's pair id by flipping it, then never
//! forgets it. Each turn it completes a remembered pair when it knows one;
//! otherwise it reveals an unseen card and, if the partner is remembered,
//! flips that, or else one more unseen card.

use std::collections::BTreeMap;

use memory_match_content::ContentProvider;
use memory_match_core::types::{GameStats, Phase};
use tracing::debug;

use crate::clock::ManualClock;
use crate::driver::GameDriver;

#[derive(Debug, Clone)]
pub struct AutoPlayer {
    think_ms: u64,
    /// Revealed, unmatched cards: board index -> pair id.
    seen: BTreeMap<usize, String>,
}

impl AutoPlayer {
    /// `think_ms` of simulated time passes before every flip.
    pub fn new(think_ms: u64) -> Self {
        Self {
            think_ms,
            seen: BTreeMap::new(),
        }
    }

    /// Deal if needed and play up to `rounds` boards (more than one only in endless mode).
    pub async fn play<P: ContentProvider>(
        &mut self,
        driver: &mut GameDriver<P, ManualClock>,
        rounds: u32,
    ) -> Vec<GameStats> {
        let mut results = Vec::new();
        if driver.session().phase() == Phase::Loading {
            driver.start().await;
        }

        while let Some(stats) = self.play_board(driver).await {
            results.push(stats);
            if results.len() as u32 >= rounds || !driver.session().round_transition_pending() {
                break;
            }
            let delay = driver.session().timings().round_transition_ms;
            self.wait(driver, u64::from(delay)).await;
        }
        results
    }

    /// Play the current board to the end.
    ///
    /// Returns `None` when the board can never end (empty board without a countdown).
    pub async fn play_board<P: ContentProvider>(
        &mut self,
        driver: &mut GameDriver<P, ManualClock>,
    ) -> Option<GameStats> {
        self.seen.clear();
        while driver.session().phase() == Phase::Playing {
            if self.take_turn(driver).await {
                continue;
            }
            // Nothing left to flip; only a countdown can end the board.
            if driver.session().config().time_limit_secs().is_none() {
                return None;
            }
            let tick = driver.session().timings().countdown_tick_ms;
            self.wait(driver, u64::from(tick)).await;
        }
        driver.stats()
    }

    async fn take_turn<P: ContentProvider>(
        &mut self,
        driver: &mut GameDriver<P, ManualClock>,
    ) -> bool {
        let first = match self.known_pair() {
            Some((first, _)) => first,
            None => match self.unseen(driver) {
                Some(index) => index,
                None => return false,
            },
        };
        self.reveal(driver, first).await;

        let second = match self.partner_of(first).or_else(|| self.unseen(driver)) {
            Some(index) => index,
            None => return false,
        };
        self.reveal(driver, second).await;

        let matched = driver
            .session()
            .cards()
            .get(first)
            .is_some_and(|card| card.is_matched);
        if matched {
            self.seen.remove(&first);
            self.seen.remove(&second);
        } else if driver.session().flipped().len() == 2 {
            let delay = driver.session().timings().mismatch_delay_ms;
            self.wait(driver, u64::from(delay)).await;
        }
        true
    }

    async fn reveal<P: ContentProvider>(
        &mut self,
        driver: &mut GameDriver<P, ManualClock>,
        index: usize,
    ) {
        driver.clock().advance(self.think_ms);
        driver.flip(index).await;
        if let Some(card) = driver.session().cards().get(index) {
            if card.is_flipped {
                debug!(index, pair = %card.pair_id, "revealed");
                self.seen.insert(index, card.pair_id.clone());
            }
        }
    }

    async fn wait<P: ContentProvider>(&self, driver: &mut GameDriver<P, ManualClock>, ms: u64) {
        driver.clock().advance(ms);
        driver.pump().await;
    }

    fn known_pair(&self) -> Option<(usize, usize)> {
        self.seen
            .keys()
            .find_map(|&index| self.partner_of(index).map(|partner| (index, partner)))
    }

    fn partner_of(&self, index: usize) -> Option<usize> {
        let pair_id = self.seen.get(&index)?;
        self.seen
            .iter()
            .find(|(&other, id)| other != index && *id == pair_id)
            .map(|(&other, _)| other)
    }

    fn unseen<P: ContentProvider>(&self, driver: &GameDriver<P, ManualClock>) -> Option<usize> {
        driver
            .session()
            .cards()
            .iter()
            .enumerate()
            .find(|(i, card)| card.is_hidden() && !self.seen.contains_key(i))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memory_match_content::CatalogProvider;
    use memory_match_core::types::{CardCount, GameConfig, GameMode, Outcome};
    use memory_match_core::{DeckRng, Session};

    fn driver(config: GameConfig) -> GameDriver<CatalogProvider, ManualClock> {
        let provider = CatalogProvider::builtin().with_seed(21);
        GameDriver::new(Session::new(config), provider, DeckRng::new(2024), ManualClock::new(0))
    }

    #[tokio::test]
    async fn test_clears_classic_board() {
        let mut driver = driver(GameConfig::new(GameMode::Classic, CardCount::Sixteen));
        let results = AutoPlayer::new(250).play(&mut driver, 1).await;

        assert_eq!(results.len(), 1);
        let stats = results[0];
        assert_eq!(stats.matched_pairs, 8);
        assert!(stats.moves >= 8 && stats.moves <= 16, "moves = {}", stats.moves);
        assert_eq!(driver.session().outcome(), Some(Outcome::Won));
    }

    #[tokio::test]
    async fn test_plays_several_endless_rounds() {
        let mut driver = driver(GameConfig::new(GameMode::Endless, CardCount::Six));
        let results = AutoPlayer::new(100).play(&mut driver, 3).await;

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|s| s.matched_pairs == 3));
        assert_eq!(driver.session().round(), 3);
        let carried: u64 = results[..2].iter().map(|s| u64::from(s.final_score)).sum();
        assert_eq!(driver.session().carried_score(), carried);
    }

    #[tokio::test]
    async fn test_slow_player_times_out() {
        // 16 flips at 20 s each cannot fit in the 240 s countdown.
        let mut driver = driver(GameConfig::new(GameMode::Timed, CardCount::Sixteen));
        let results = AutoPlayer::new(20_000).play(&mut driver, 1).await;

        assert_eq!(results.len(), 1);
        assert_eq!(driver.session().outcome(), Some(Outcome::TimedOut));
        assert_eq!(results[0].time_elapsed, 240);
        assert!(results[0].matched_pairs < 8);
    }

    #[tokio::test]
    async fn test_same_seed_same_game() {
        let config = GameConfig::new(GameMode::Classic, CardCount::Twelve);
        let a = AutoPlayer::new(250).play(&mut driver(config), 1).await;
        let b = AutoPlayer::new(250).play(&mut driver(config), 1).await;
        assert_eq!(a, b);
    }
}
