//! Scoring module - match points, move headroom and mode multipliers
//!
//! Compatibility note:
//! The formula intentionally rewards *elapsed* time in timed mode (not time
//! remaining). Saved scores from earlier releases were produced this way, so
//! it must not be "fixed":
//!
//! ```text
//! score = floor((pairs*100 + max(0, (cards - moves)*10) + time_bonus) * multiplier)
//! time_bonus = 2 * elapsed_secs   (timed mode only)
//! multiplier = 1.0 classic, 1.2 timed, 1.5 endless
//! ```

use crate::types::{GameMode, MATCH_POINTS, MOVE_BONUS_POINTS, TIME_BONUS_PER_SECOND};

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    pub match_points: u32,
    pub move_bonus: u32,
    pub time_bonus: u32,
    /// Multiplier in tenths (10 = 1.0x).
    pub multiplier_tenths: u32,
    pub total: u32,
}

/// Points for matched pairs
pub fn calculate_match_points(matched_pairs: u32) -> u32 {
    matched_pairs.saturating_mul(MATCH_POINTS)
}

/// Bonus for finishing in fewer moves than there are cards
pub fn calculate_move_bonus(card_count: u32, moves: u32) -> u32 {
    card_count.saturating_sub(moves).saturating_mul(MOVE_BONUS_POINTS)
}

/// Timed-mode bonus; zero for the other modes
pub fn calculate_time_bonus(mode: GameMode, elapsed_secs: u32) -> u32 {
    match mode {
        GameMode::Timed => elapsed_secs.saturating_mul(TIME_BONUS_PER_SECOND),
        GameMode::Classic | GameMode::Endless => 0,
    }
}

/// Calculate the complete score for a session.
pub fn calculate_score(
    mode: GameMode,
    card_count: u32,
    matched_pairs: u32,
    moves: u32,
    elapsed_secs: u32,
) -> ScoreResult {
    let match_points = calculate_match_points(matched_pairs);
    let move_bonus = calculate_move_bonus(card_count, moves);
    let time_bonus = calculate_time_bonus(mode, elapsed_secs);
    let multiplier_tenths = mode.multiplier_tenths();

    let raw = u64::from(match_points) + u64::from(move_bonus) + u64::from(time_bonus);
    let total = (raw * u64::from(multiplier_tenths) / 10).min(u64::from(u32::MAX)) as u32;

    ScoreResult {
        match_points,
        move_bonus,
        time_bonus,
        multiplier_tenths,
        total,
    }
}

/// Percentage of turns that found a pair, rounded to two decimals.
///
/// Returns 0 when no turn has been taken.
pub fn calculate_accuracy(matched_pairs: u32, moves: u32) -> f64 {
    if moves == 0 {
        return 0.0;
    }
    let pct = f64::from(matched_pairs) / f64::from(moves) * 100.0;
    (pct * 100.0).round() / 100.0
}
