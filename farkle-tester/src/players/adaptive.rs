//! A strategy that reads the score situation at the start of each turn.
use farkle_game::constants::{DICE_PER_TURN, MAX_DANGER_LEVEL, WINNING_SCORE};
use farkle_game::{Player, RollOutcome, RollResult, TurnController, TurnFault};

/// Deficit that counts as falling behind once the leader passes 5000.
const CATCH_UP_GAP: i32 = 1_500;
const CATCH_UP_LEADER: i32 = 5_000;

/// Attitude for a whole turn, picked before the first roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Posture {
    /// Someone has crossed the winning line; keep rolling until ahead.
    Chase,
    /// Two zero turns in a row; take one scoring and stop.
    Safe,
    /// Not on the board yet; push for the opening minimum.
    Open,
    /// Well behind a strong leader.
    CatchUp,
    Cruise,
}

impl Posture {
    #[must_use]
    pub fn choose(my_score: i32, high_score: i32, danger_level: u8) -> Self {
        if high_score >= WINNING_SCORE && high_score > my_score {
            Self::Chase
        } else if danger_level == MAX_DANGER_LEVEL {
            Self::Safe
        } else if my_score == 0 {
            Self::Open
        } else if high_score - my_score >= CATCH_UP_GAP && high_score >= CATCH_UP_LEADER {
            Self::CatchUp
        } else {
            Self::Cruise
        }
    }

    /// Turn total worth banking, for postures that work to a target.
    #[must_use]
    pub const fn target(self) -> Option<u32> {
        match self {
            Self::Open => Some(500),
            Self::CatchUp => Some(900),
            Self::Cruise => Some(250),
            Self::Chase | Self::Safe => None,
        }
    }

    #[must_use]
    pub const fn commentary(self) -> &'static str {
        match self {
            Self::Chase => "Time for hot dice!",
            Self::Safe => "I need to play it safe!",
            Self::Open => "I am ready to start!",
            Self::CatchUp => "I need to catch up!",
            Self::Cruise => "No need to risk that much.",
        }
    }
}

/// Which option to take and whether to roll again afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Decision {
    index: usize,
    roll_again: bool,
}

/// Picks a [`Posture`] per turn and plays towards its target.
#[derive(Debug, Clone)]
pub struct AdaptivePlayer {
    name: String,
}

impl AdaptivePlayer {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Player for AdaptivePlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn take_turn(&mut self, turn: &mut TurnController<'_>) -> Result<String, TurnFault> {
        let my_score = turn.my_score();
        let high_score = turn.high_score();
        let posture = Posture::choose(my_score, high_score, turn.my_danger_level());

        loop {
            let in_hand = turn.dice_remaining();
            let RollResult::Scored(options) = turn.roll(posture.commentary())? else {
                return Ok(format!("Farkle after roll #{}!", turn.rolls()));
            };
            let decision = decide(posture, &options, turn.turn_points(), my_score, high_score, in_hand);
            let gained = options.get(decision.index).map_or(0, |scoring| scoring.points);
            turn.score_as(decision.index, roll_remark(turn.turn_points() + gained))?;
            if !decision.roll_again {
                break;
            }
        }

        Ok(closing_remark(turn.turn_points(), my_score).to_string())
    }
}

fn decide(
    posture: Posture,
    options: &RollOutcome,
    turn_points: u32,
    my_score: i32,
    high_score: i32,
    in_hand: u8,
) -> Decision {
    let Some(best) = options.best() else {
        return Decision {
            index: 0,
            roll_again: false,
        };
    };
    let hot_dice = best.dice_used() == in_hand;

    match (posture, posture.target()) {
        (Posture::Safe, _) => Decision {
            index: 0,
            roll_again: false,
        },
        (_, Some(target)) if best.points + turn_points < target => Decision {
            index: leanest_option(options),
            roll_again: true,
        },
        (_, Some(_)) => Decision {
            index: 0,
            roll_again: hot_dice,
        },
        (_, None) => {
            let banked = my_score + i32::try_from(turn_points + best.points).unwrap_or(i32::MAX);
            Decision {
                index: 0,
                roll_again: banked < high_score,
            }
        }
    }
}

/// Highest scoring among the options that set aside the fewest dice.
fn leanest_option(options: &RollOutcome) -> usize {
    let fewest = options
        .iter()
        .map(farkle_game::Scoring::dice_used)
        .min()
        .unwrap_or(DICE_PER_TURN);
    // Options are ordered by points, so the first match scores highest.
    options
        .iter()
        .position(|scoring| scoring.dice_used() == fewest)
        .unwrap_or(0)
}

fn roll_remark(turn_points: u32) -> &'static str {
    match turn_points {
        2_500.. => "I am the ultimate Farkle player!!!",
        900.. => "That was a great roll!",
        300.. => "Totally worth it!",
        _ => "Better than nothing.",
    }
}

fn closing_remark(turn_points: u32, my_score: i32) -> &'static str {
    let total = i64::from(my_score) + i64::from(turn_points);
    if total >= i64::from(WINNING_SCORE) {
        return "Good match!";
    }
    match turn_points {
        1_500.. => "Wow! That is a lot!",
        900.. => "You know what? I will take it.",
        300.. => "That was pretty good.",
        _ => "At least I didn't farkle.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farkle_game::{EventLog, ScoreLedger, ScriptedDice, parse_dice, scorings_for};

    fn options(values: &[u8]) -> RollOutcome {
        scorings_for(&parse_dice(values).unwrap())
    }

    #[test]
    fn posture_follows_the_score_situation() {
        assert_eq!(Posture::choose(8_000, 10_200, 2), Posture::Chase);
        assert_eq!(Posture::choose(3_000, 4_000, 2), Posture::Safe);
        assert_eq!(Posture::choose(0, 4_000, 0), Posture::Open);
        assert_eq!(Posture::choose(4_000, 6_000, 1), Posture::CatchUp);
        assert_eq!(Posture::choose(4_000, 5_000, 0), Posture::Cruise);
        assert_eq!(Posture::choose(10_500, 10_500, 0), Posture::Cruise);
    }

    #[test]
    fn below_target_keeps_the_fewest_dice() {
        // 150 (1,5), 100 (1), 50 (5): a single 1 is the leanest high option.
        let decision = decide(Posture::Open, &options(&[1, 5, 2, 3, 4, 4]), 0, 0, 0, 6);
        assert_eq!(
            decision,
            Decision {
                index: 1,
                roll_again: true
            }
        );
    }

    #[test]
    fn at_target_takes_best_and_stops_unless_hot() {
        let decision = decide(Posture::Cruise, &options(&[1, 1, 1, 2, 3, 4]), 0, 1_000, 2_000, 6);
        assert_eq!(
            decision,
            Decision {
                index: 0,
                roll_again: false
            }
        );
        let decision = decide(Posture::Cruise, &options(&[5, 5, 5]), 100, 1_000, 2_000, 3);
        assert!(decision.roll_again);
    }

    #[test]
    fn chase_rolls_until_ahead_and_safe_stops() {
        let roll = options(&[1, 2, 3, 4, 6, 6]);
        assert!(decide(Posture::Chase, &roll, 0, 9_000, 10_400, 6).roll_again);
        assert!(!decide(Posture::Chase, &roll, 1_400, 9_000, 10_400, 6).roll_again);
        assert!(!decide(Posture::Safe, &roll, 0, 9_000, 10_400, 6).roll_again);
    }

    #[test]
    fn plays_a_whole_opening_turn() {
        let ledger = ScoreLedger::new(["Ben", "Jessica"]).unwrap();
        let mut dice =
            ScriptedDice::from_values(&[&[1, 5, 2, 3, 4, 4], &[5, 5, 5, 2, 3]]).unwrap();
        let mut log = EventLog::default();
        let mut turn = TurnController::new("Ben", &ledger, &mut dice, &mut log);

        let remark = AdaptivePlayer::new("Ben").take_turn(&mut turn).unwrap();
        // 100 then 500 reaches the opening target with two dice left.
        assert_eq!(turn.turn_points(), 600);
        assert_eq!(turn.rolls(), 2);
        assert_eq!(remark, "That was pretty good.");
        assert_eq!(turn.finish().unwrap().delta(), 600);
    }
}
