//! Snapshot module - read-only session views for rendering
//!
//! [`Session::snapshot_into`] refills an existing snapshot so a host that
//! publishes on every change can reuse one buffer.

use serde::{Deserialize, Serialize};

use crate::session::Session;
use crate::types::{Card, GameMode, GameStats, Item, Outcome, Phase};

/// Read-only view of a session for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub mode: GameMode,
    pub phase: Phase,
    pub outcome: Option<Outcome>,
    pub cards: Vec<Card>,
    pub items: Vec<Item>,
    pub flipped: Vec<usize>,
    pub matched_pairs: u32,
    pub total_pairs: u32,
    pub moves: u32,
    pub score: u32,
    pub time_remaining: Option<u32>,
    pub time_elapsed: u32,
    pub epoch: u32,
    pub round: u32,
    pub carried_score: u64,
    pub round_transition_pending: bool,
    pub stats: Option<GameStats>,
}

impl SessionSnapshot {
    pub fn clear(&mut self) {
        self.mode = GameMode::Classic;
        self.phase = Phase::Loading;
        self.outcome = None;
        self.cards.clear();
        self.items.clear();
        self.flipped.clear();
        self.matched_pairs = 0;
        self.total_pairs = 0;
        self.moves = 0;
        self.score = 0;
        self.time_remaining = None;
        self.time_elapsed = 0;
        self.epoch = 0;
        self.round = 1;
        self.carried_score = 0;
        self.round_transition_pending = false;
        self.stats = None;
    }

    /// Whether the board currently accepts flips.
    pub fn playable(&self) -> bool {
        self.phase == Phase::Playing && self.flipped.len() < 2 && !self.cards.is_empty()
    }

    /// Indices of cards that can still be revealed.
    pub fn hidden_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.is_hidden())
            .map(|(i, _)| i)
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        let mut s = Self {
            mode: GameMode::Classic,
            phase: Phase::Loading,
            outcome: None,
            cards: Vec::new(),
            items: Vec::new(),
            flipped: Vec::new(),
            matched_pairs: 0,
            total_pairs: 0,
            moves: 0,
            score: 0,
            time_remaining: None,
            time_elapsed: 0,
            epoch: 0,
            round: 1,
            carried_score: 0,
            round_transition_pending: false,
            stats: None,
        };
        s.clear();
        s
    }
}

impl Session {
    /// Write the current state into `out`, reusing its buffers.
    pub fn snapshot_into(&self, out: &mut SessionSnapshot, now_ms: u64) {
        out.mode = self.mode();
        out.phase = self.phase();
        out.outcome = self.outcome();
        out.cards.clear();
        out.cards.extend_from_slice(self.cards());
        out.items.clear();
        out.items.extend_from_slice(self.items());
        out.flipped.clear();
        out.flipped.extend_from_slice(self.flipped());
        out.matched_pairs = self.matched_pairs();
        out.total_pairs = self.total_pairs();
        out.moves = self.moves();
        out.score = self.score();
        out.time_remaining = self.time_remaining();
        out.time_elapsed = self.elapsed_secs(now_ms);
        out.epoch = self.epoch();
        out.round = self.round();
        out.carried_score = self.carried_score();
        out.round_transition_pending = self.round_transition_pending();
        out.stats = self.stats();
    }

    pub fn snapshot(&self, now_ms: u64) -> SessionSnapshot {
        let mut s = SessionSnapshot::default();
        self.snapshot_into(&mut s, now_ms);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::DeckRng;
    use crate::types::{CardCount, GameConfig};

    fn items(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| Item::new(format!("h{i}"), format!("Style {i}"), format!("img://{i}")))
            .collect()
    }

    #[test]
    fn test_snapshot_mirrors_session() {
        let mut session = Session::new(GameConfig::new(GameMode::Timed, CardCount::Six));
        session.deal(items(3), &mut DeckRng::new(9), 0);
        session.flip(2, 4_200);

        let snap = session.snapshot(4_200);
        assert_eq!(snap.mode, GameMode::Timed);
        assert_eq!(snap.phase, Phase::Playing);
        assert_eq!(snap.cards.len(), 6);
        assert_eq!(snap.items.len(), 3);
        assert_eq!(snap.flipped, vec![2]);
        assert_eq!(snap.total_pairs, 3);
        assert_eq!(snap.time_remaining, Some(90));
        assert_eq!(snap.time_elapsed, 4);
        assert_eq!(snap.epoch, 1);
        assert!(snap.playable());
        assert_eq!(snap.hidden_indices().count(), 5);
        assert!(snap.stats.is_none());
    }

    #[test]
    fn test_snapshot_into_reuses_buffers() {
        let mut session = Session::new(GameConfig::new(GameMode::Classic, CardCount::Four));
        session.deal(items(2), &mut DeckRng::new(1), 0);

        let mut snap = session.snapshot(0);
        session.reset();
        session.snapshot_into(&mut snap, 0);

        assert_eq!(snap.phase, Phase::Loading);
        assert!(snap.cards.is_empty());
        assert!(!snap.playable());
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let snap = SessionSnapshot::default();
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["phase"], "loading");
        assert_eq!(json["matchedPairs"], 0);
        assert_eq!(json["roundTransitionPending"], false);
    }
}
