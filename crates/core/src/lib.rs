//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the rules, the session state machine and the scoring
//! policy of the memory-matching game. It has **no dependencies** on
//! rendering, networking or wall-clock time:
//!
//! - **Deterministic**: the same seed deals the same board
//! - **Clock-free**: every transition receives the host clock reading
//! - **Side-effect free**: timers are requested as [`Effect`]s, never slept on
//!
//! # Module Structure
//!
//! - [`deck`]: building pairs of cards from loaded items
//! - [`rng`]: seedable Fisher-Yates shuffling
//! - [`scoring`]: match points, move headroom, time bonus and mode multipliers
//! - [`session`]: the session state machine (flip, pause, resume, reset, stats)
//! - [`snapshot`]: serializable view for the presentation layer
//! - [`timer`]: timer tokens and effects with stale-callback suppression
//!
//! # Game Rules
//!
//! - Two cards per item, shuffled uniformly
//! - A turn reveals two cards; a pair stays face-up, a mismatch flips back after 1000ms
//! - A third card cannot be revealed while a mismatch is showing
//! - **Classic** ends when every pair is found
//! - **Timed** also ends when the countdown reaches zero
//! - **Endless** reshuffles a fresh board 1500ms after every clear
//!
//! # Example
//!
//! ```
//! use memory_match_core::{DeckRng, Session};
//! use memory_match_core::types::{CardCount, GameConfig, GameMode, Item, Phase};
//!
//! let items: Vec<Item> = (0..2)
//!     .map(|i| Item::new(format!("h{i}"), format!("Style {i}"), format!("img://{i}")))
//!     .collect();
//!
//! let mut session = Session::new(GameConfig::new(GameMode::Classic, CardCount::Four));
//! session.deal(items, &mut DeckRng::new(12345), 0);
//! assert_eq!(session.phase(), Phase::Playing);
//!
//! // Reveal a card; the second flip of a turn resolves it.
//! session.flip(0, 250);
//! assert_eq!(session.flipped(), &[0]);
//! ```

pub mod deck;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod timer;

pub use memory_match_types as types;

// Re-export commonly used types for convenience
pub use rng::DeckRng;
pub use scoring::{calculate_accuracy, calculate_score, ScoreResult};
pub use session::{Dealt, LoadWarning, Session, SessionTimings};
pub use snapshot::SessionSnapshot;
pub use timer::{Effect, Effects, TimerKind, TimerToken};
