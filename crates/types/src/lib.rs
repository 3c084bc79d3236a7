//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data structures with no I/O, making them usable in any
//! context (session logic, content loading, presentation, runtime channels).
//!
//! # Board Sizes
//!
//! A board always holds an even number of cards, one pair per item:
//!
//! | Cards | Pairs | Difficulty | Timed limit |
//! |-------|-------|------------|-------------|
//! | 4     | 2     | Easy       | 60s         |
//! | 6     | 3     | Medium     | 90s         |
//! | 8     | 4     | Hard       | 120s        |
//! | 12    | 6     | Expert     | 180s        |
//! | 16    | 8     | Expert     | 240s        |
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MISMATCH_DELAY_MS` | 1000 | Time a mismatched pair stays face-up |
//! | `ROUND_TRANSITION_MS` | 1500 | Celebratory pause before an endless reshuffle |
//! | `COUNTDOWN_TICK_MS` | 1000 | Timed-mode countdown period |
//!
//! # Examples
//!
//! ```
//! use memory_match_types::{CardCount, Command, GameConfig, GameMode};
//!
//! let config = GameConfig::new(GameMode::Timed, CardCount::Eight);
//! assert_eq!(config.card_count.pairs(), 4);
//! assert_eq!(config.time_limit_secs(), Some(120));
//!
//! assert_eq!(GameMode::from_str("endless"), Some(GameMode::Endless));
//! assert_eq!(Command::from_str("flip:3"), Some(Command::Flip(3)));
//! assert_eq!(CardCount::try_from(12).unwrap(), CardCount::Twelve);
//! assert!(CardCount::try_from(10).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long a mismatched pair stays face-up before flipping back (1000ms)
pub const MISMATCH_DELAY_MS: u32 = 1000;

/// Pause between clearing an endless round and the reshuffle (1500ms)
pub const ROUND_TRANSITION_MS: u32 = 1500;

/// Countdown period in timed mode (1 second)
pub const COUNTDOWN_TICK_MS: u32 = 1000;

/// Points awarded per matched pair
pub const MATCH_POINTS: u32 = 100;

/// Points per card of headroom between the card count and the moves taken
pub const MOVE_BONUS_POINTS: u32 = 10;

/// Timed-mode bonus per elapsed second
pub const TIME_BONUS_PER_SECOND: u32 = 2;

/// Supported board sizes, smallest first
pub const SUPPORTED_CARD_COUNTS: [u8; 5] = [4, 6, 8, 12, 16];

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unsupported card count {0} (expected one of 4, 6, 8, 12, 16)")]
    UnsupportedCardCount(u32),

    #[error("unknown game mode '{0}' (expected classic, timed or endless)")]
    UnknownMode(String),

    #[error("unknown difficulty '{0}'")]
    UnknownDifficulty(String),

    #[error("time limit must be at least one second")]
    ZeroTimeLimit,
}

/// Game modes
///
/// - **Classic**: no time limit, single round
/// - **Timed**: countdown to failure
/// - **Endless**: rounds reshuffle automatically after every clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Classic,
    Timed,
    Endless,
}

impl GameMode {
    /// Parse mode from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(GameMode::Classic),
            "timed" => Some(GameMode::Timed),
            "endless" => Some(GameMode::Endless),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Timed => "timed",
            GameMode::Endless => "endless",
        }
    }

    /// Score multiplier in tenths (1.0x classic, 1.2x timed, 1.5x endless).
    ///
    /// Kept as an integer so the final floor in the score formula is exact.
    pub fn multiplier_tenths(&self) -> u32 {
        match self {
            GameMode::Classic => 10,
            GameMode::Timed => 12,
            GameMode::Endless => 15,
        }
    }
}

/// Supported board sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum CardCount {
    Four,
    Six,
    Eight,
    Twelve,
    Sixteen,
}

impl CardCount {
    pub const ALL: [CardCount; 5] = [
        CardCount::Four,
        CardCount::Six,
        CardCount::Eight,
        CardCount::Twelve,
        CardCount::Sixteen,
    ];

    /// Number of cards on the board
    pub fn cards(&self) -> usize {
        match self {
            CardCount::Four => 4,
            CardCount::Six => 6,
            CardCount::Eight => 8,
            CardCount::Twelve => 12,
            CardCount::Sixteen => 16,
        }
    }

    /// Number of distinct items needed
    pub fn pairs(&self) -> usize {
        self.cards() / 2
    }

    /// Default timed-mode limit in seconds
    pub fn time_limit_secs(&self) -> u32 {
        match self {
            CardCount::Four => 60,
            CardCount::Six => 90,
            CardCount::Eight => 120,
            CardCount::Twelve => 180,
            CardCount::Sixteen => 240,
        }
    }

    /// Difficulty label shown for this board size
    pub fn difficulty(&self) -> Difficulty {
        match self {
            CardCount::Four => Difficulty::Easy,
            CardCount::Six => Difficulty::Medium,
            CardCount::Eight => Difficulty::Hard,
            CardCount::Twelve | CardCount::Sixteen => Difficulty::Expert,
        }
    }
}

impl TryFrom<u32> for CardCount {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(CardCount::Four),
            6 => Ok(CardCount::Six),
            8 => Ok(CardCount::Eight),
            12 => Ok(CardCount::Twelve),
            16 => Ok(CardCount::Sixteen),
            other => Err(ConfigError::UnsupportedCardCount(other)),
        }
    }
}

impl From<CardCount> for u32 {
    fn from(value: CardCount) -> Self {
        value.cards() as u32
    }
}

/// Informational difficulty label; it has no effect on the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

/// Session configuration supplied by the caller
///
/// `difficulty` and `time_limit` are informational. The countdown length is
/// always taken from the card-count table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawGameConfig")]
pub struct GameConfig {
    pub mode: GameMode,
    pub card_count: CardCount,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
}

/// Wire form of [`GameConfig`], validated on the way in.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGameConfig {
    mode: GameMode,
    card_count: CardCount,
    #[serde(default)]
    difficulty: Option<Difficulty>,
    #[serde(default)]
    time_limit: Option<u32>,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = ConfigError;

    fn try_from(raw: RawGameConfig) -> Result<Self, Self::Error> {
        let mut config = GameConfig::new(raw.mode, raw.card_count);
        if let Some(difficulty) = raw.difficulty {
            config.difficulty = difficulty;
        }
        match raw.time_limit {
            Some(secs) => config.with_time_limit(secs),
            None => Ok(config),
        }
    }
}

impl GameConfig {
    pub fn new(mode: GameMode, card_count: CardCount) -> Self {
        Self {
            mode,
            card_count,
            difficulty: card_count.difficulty(),
            time_limit: None,
        }
    }

    /// Record the caller's requested time limit. It does not change the countdown.
    pub fn with_time_limit(mut self, secs: u32) -> Result<Self, ConfigError> {
        if secs == 0 {
            return Err(ConfigError::ZeroTimeLimit);
        }
        self.time_limit = Some(secs);
        Ok(self)
    }

    /// Countdown length in seconds from the card-count table, `None` outside timed mode.
    pub fn time_limit_secs(&self) -> Option<u32> {
        match self.mode {
            GameMode::Timed => Some(self.card_count.time_limit_secs()),
            GameMode::Classic | GameMode::Endless => None,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(GameMode::Classic, CardCount::Eight)
    }
}

/// Opaque content unit used to skin a pair of cards
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    #[serde(alias = "name")]
    pub display_name: String,
    #[serde(alias = "imageUrl")]
    pub image_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "gender")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            image_ref: image_ref.into(),
            category: None,
            tags: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A single card on the board
///
/// Two cards share an `item_id`/`pair_id` per item. `is_matched` implies
/// `is_flipped`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub item_id: String,
    pub pair_id: String,
    pub is_flipped: bool,
    pub is_matched: bool,
}

impl Card {
    /// Face-down card for the given pair.
    pub fn new(id: impl Into<String>, item_id: impl Into<String>, pair_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            item_id: item_id.into(),
            pair_id: pair_id.into(),
            is_flipped: false,
            is_matched: false,
        }
    }

    /// Whether the card can be revealed this turn.
    pub fn is_hidden(&self) -> bool {
        !self.is_flipped && !self.is_matched
    }
}

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Loading,
    Playing,
    Paused,
    Over,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Loading => "loading",
            Phase::Playing => "playing",
            Phase::Paused => "paused",
            Phase::Over => "over",
        }
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Won,
    TimedOut,
}

/// Final statistics, available once a session is over
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub final_score: u32,
    pub moves: u32,
    pub time_elapsed: u32,
    pub matched_pairs: u32,
    /// Percentage of turns that found a pair, rounded to two decimals.
    pub accuracy: f64,
}

/// Player/host commands
///
/// These are used by the runtime channel and the binary; a flip carries the
/// board index of the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Flip(usize),
    Pause,
    Resume,
    Reset,
}

impl Command {
    /// Parse a command (`"flip:3"`, `"pause"`, `"resume"`, `"reset"`).
    ///
    /// # Examples
    ///
    /// ```
    /// use memory_match_types::Command;
    ///
    /// assert_eq!(Command::from_str("Flip:0"), Some(Command::Flip(0)));
    /// assert_eq!(Command::from_str("pause"), Some(Command::Pause));
    /// assert_eq!(Command::from_str("flip:x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        if let Some(index) = lower.strip_prefix("flip:") {
            return index.trim().parse().ok().map(Command::Flip);
        }
        match lower.as_str() {
            "pause" => Some(Command::Pause),
            "resume" => Some(Command::Resume),
            "reset" | "restart" => Some(Command::Reset),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Flip(_) => "flip",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::Reset => "reset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults() {
        assert_eq!(MISMATCH_DELAY_MS, 1000);
        assert_eq!(ROUND_TRANSITION_MS, 1500);
        assert_eq!(COUNTDOWN_TICK_MS, 1000);
    }

    #[test]
    fn card_count_table() {
        for (count, raw) in CardCount::ALL.iter().zip(SUPPORTED_CARD_COUNTS) {
            assert_eq!(count.cards(), raw as usize);
            assert_eq!(count.cards() % 2, 0);
            assert_eq!(CardCount::try_from(raw as u32), Ok(*count));
        }
        assert_eq!(CardCount::Four.time_limit_secs(), 60);
        assert_eq!(CardCount::Sixteen.time_limit_secs(), 240);
        assert_eq!(
            CardCount::try_from(7),
            Err(ConfigError::UnsupportedCardCount(7))
        );
    }

    #[test]
    fn time_limit_only_in_timed_mode() {
        let classic = GameConfig::new(GameMode::Classic, CardCount::Six);
        assert_eq!(classic.time_limit_secs(), None);

        let timed = GameConfig::new(GameMode::Timed, CardCount::Six);
        assert_eq!(timed.time_limit_secs(), Some(90));

        assert_eq!(timed.with_time_limit(0), Err(ConfigError::ZeroTimeLimit));
    }

    #[test]
    fn requested_time_limit_does_not_change_countdown() {
        let config: GameConfig =
            serde_json::from_str(r#"{"mode":"timed","cardCount":8,"timeLimit":30}"#).unwrap();
        assert_eq!(config.time_limit, Some(30));
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.time_limit_secs(), Some(120));

        let built = GameConfig::new(GameMode::Timed, CardCount::Six)
            .with_time_limit(30)
            .unwrap();
        assert_eq!(built.time_limit_secs(), Some(90));
    }

    #[test]
    fn zero_time_limit_rejected_when_deserializing() {
        let parsed =
            serde_json::from_str::<GameConfig>(r#"{"mode":"timed","cardCount":4,"timeLimit":0}"#);
        let err = parsed.unwrap_err();
        assert!(err.to_string().contains("at least one second"), "{err}");
    }

    #[test]
    fn mode_multipliers() {
        assert_eq!(GameMode::Classic.multiplier_tenths(), 10);
        assert_eq!(GameMode::Timed.multiplier_tenths(), 12);
        assert_eq!(GameMode::Endless.multiplier_tenths(), 15);
    }

    #[test]
    fn config_serde_uses_plain_card_count() {
        let config = GameConfig::new(GameMode::Endless, CardCount::Twelve);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"mode":"endless","cardCount":12,"difficulty":"expert"}"#
        );

        let bad = r#"{"mode":"classic","cardCount":5,"difficulty":"easy"}"#;
        assert!(serde_json::from_str::<GameConfig>(bad).is_err());
    }

    #[test]
    fn item_accepts_legacy_field_names() {
        let json = r#"{"id":"m1","name":"Classic Fade","imageUrl":"https://x/1.png","gender":"men"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.display_name, "Classic Fade");
        assert_eq!(item.image_ref, "https://x/1.png");
        assert_eq!(item.category.as_deref(), Some("men"));
    }

    #[test]
    fn command_parsing() {
        assert_eq!(Command::from_str("flip: 12"), Some(Command::Flip(12)));
        assert_eq!(Command::from_str("RESTART"), Some(Command::Reset));
        assert_eq!(Command::from_str("hold"), None);
        assert_eq!(Command::Flip(1).name(), "flip");
    }
}
