//! Centralized rule constants for Farkle.
//!
//! Only the single documented ruleset is supported, so the numbers live in
//! code rather than in configuration.

// Dice ---------------------------------------------------------------------
pub const DICE_PER_TURN: u8 = 6;
pub const MIN_FACE: u8 = 1;
pub const MAX_FACE: u8 = 6;

// Match thresholds -----------------------------------------------------------
pub const WINNING_SCORE: i32 = 10_000;
pub const OPENING_MINIMUM: i32 = 500;
pub const TRIPLE_FARKLE_PENALTY: i32 = -1_000;
pub const MAX_DANGER_LEVEL: u8 = 2;

// Point table ----------------------------------------------------------------
pub const STRAIGHT_POINTS: u32 = 1_500;
pub const TWO_TRIPLES_POINTS: u32 = 2_500;
pub const THREE_PAIRS_POINTS: u32 = 1_500;
pub const FOUR_KIND_WITH_PAIR_POINTS: u32 = 1_500;
pub const TRIPLE_ONES_POINTS: u32 = 300;
pub const TRIPLE_FACE_MULTIPLIER: u32 = 100;
pub const FOUR_KIND_POINTS: u32 = 1_000;
pub const FIVE_KIND_POINTS: u32 = 2_000;
pub const SIX_KIND_POINTS: u32 = 3_000;
pub const SINGLE_ONE_POINTS: u32 = 100;
pub const SINGLE_FIVE_POINTS: u32 = 50;

/// Probability of rolling a Farkle, indexed by the number of dice rolled.
/// Index 0 is unused.
pub const FARKLE_ODDS: [f64; 7] = [
    0.0,
    2.0 / 3.0,
    1.0 / 2.3,
    1.0 / 3.6,
    1.0 / 6.4,
    1.0 / 13.0,
    1.0 / 43.2,
];

/// Farkle probability for rolling `dice` dice, or `None` outside 1..=6.
#[must_use]
pub fn farkle_odds(dice: u8) -> Option<f64> {
    if dice == 0 {
        return None;
    }
    FARKLE_ODDS.get(usize::from(dice)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn farkle_odds_shrink_with_more_dice() {
        assert!(farkle_odds(0).is_none());
        assert!(farkle_odds(7).is_none());
        let odds: Vec<f64> = (1..=6).filter_map(farkle_odds).collect();
        assert_eq!(odds.len(), 6);
        assert!(odds.windows(2).all(|pair| pair[0] > pair[1]));
    }
}
