//! Turn controller: the strict roll → score protocol for one player's turn.
//!
//! A turn starts in [`TurnPhase::AwaitingRoll`]. Each successful
//! [`TurnController::roll`] must be followed by exactly one
//! [`TurnController::score_as`]. A roll with no scoring ends the turn as a
//! Farkle; otherwise the player banks by ending the turn after a score.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DICE_PER_TURN;
use crate::dice::{Dice, DiceError, DiceSource, DieFace, format_dice, set_aside};
use crate::events::{MatchEvent, MatchObserver};
use crate::ledger::ScoreLedger;
use crate::scoring::{RollOutcome, scorings_for};

/// Out-of-order use of the turn protocol by a player.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("roll requested while a selection is pending")]
    RollBeforeScoring,
    #[error("score_as requested without a pending roll")]
    ScoreWithoutRoll,
    #[error("the turn has already ended")]
    TurnOver,
    #[error("no dice available to roll")]
    NoDice,
    #[error("turn returned without rolling")]
    NeverRolled,
    #[error("turn returned with a roll left unscored")]
    UnscoredRoll,
    #[error("selected dice do not match the roll: {0}")]
    SelectionMismatch(#[from] DiceError),
}

/// Anything that goes wrong while a player is taking a turn.
#[derive(Debug, Error)]
pub enum TurnFault {
    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Player(#[from] anyhow::Error),
    #[error("player panicked: {0}")]
    Panicked(String),
}

/// How a turn finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnEnd {
    Farkled,
    Banked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    AwaitingRoll,
    AwaitingSelection,
    Ended(TurnEnd),
}

/// Result of a roll: scoring options, or a Farkle that ended the turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollResult {
    Scored(RollOutcome),
    Farkle,
}

impl RollResult {
    #[must_use]
    pub const fn is_farkle(&self) -> bool {
        matches!(self, Self::Farkle)
    }

    #[must_use]
    pub const fn options(&self) -> Option<&RollOutcome> {
        match self {
            Self::Scored(options) => Some(options),
            Self::Farkle => None,
        }
    }
}

/// Transient per-turn bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub dice_remaining: u8,
    pub points: u32,
    pub farkled: bool,
}

impl Default for TurnState {
    fn default() -> Self {
        Self {
            dice_remaining: DICE_PER_TURN,
            points: 0,
            farkled: false,
        }
    }
}

/// Net result handed back to the match once the turn is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSummary {
    pub points: u32,
    pub farkled: bool,
    pub rolls: u32,
}

impl TurnSummary {
    /// Delta to record in the ledger; 0 after a Farkle.
    #[must_use]
    pub fn delta(&self) -> i32 {
        if self.farkled {
            0
        } else {
            i32::try_from(self.points).unwrap_or(i32::MAX)
        }
    }
}

/// Handle given to a player for the duration of one turn.
pub struct TurnController<'a> {
    player: &'a str,
    ledger: &'a ScoreLedger,
    dice: &'a mut dyn DiceSource,
    observer: &'a mut dyn MatchObserver,
    state: TurnState,
    phase: TurnPhase,
    last_roll: Dice,
    options: RollOutcome,
    rolls: u32,
}

impl<'a> TurnController<'a> {
    pub fn new(
        player: &'a str,
        ledger: &'a ScoreLedger,
        dice: &'a mut dyn DiceSource,
        observer: &'a mut dyn MatchObserver,
    ) -> Self {
        Self {
            player,
            ledger,
            dice,
            observer,
            state: TurnState::default(),
            phase: TurnPhase::AwaitingRoll,
            last_roll: Dice::new(),
            options: RollOutcome::default(),
            rolls: 0,
        }
    }

    /// Roll every die still in hand.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] if a selection is pending or the turn is over.
    pub fn roll(&mut self, commentary: &str) -> Result<RollResult, ProtocolError> {
        match self.phase {
            TurnPhase::AwaitingRoll => {}
            TurnPhase::AwaitingSelection => return Err(ProtocolError::RollBeforeScoring),
            TurnPhase::Ended(_) => return Err(ProtocolError::TurnOver),
        }
        if self.state.dice_remaining == 0 {
            return Err(ProtocolError::NoDice);
        }

        let dice = self.dice.roll(self.state.dice_remaining);
        let options = scorings_for(&dice);
        self.rolls += 1;
        log::debug!(
            "{} roll #{}: {} ({} options)",
            self.player,
            self.rolls,
            format_dice(&dice),
            options.len()
        );
        self.observer.notify(&MatchEvent::Rolled {
            player: self.player.to_string(),
            commentary: commentary.to_string(),
            dice: dice.clone(),
            options: options.clone(),
        });
        self.last_roll = dice;

        if options.is_farkle() {
            let danger_level = self.ledger.farkle_danger_level(self.player);
            self.state.points = 0;
            self.state.farkled = true;
            self.phase = TurnPhase::Ended(TurnEnd::Farkled);
            self.options = RollOutcome::default();
            self.observer.notify(&MatchEvent::Farkled {
                player: self.player.to_string(),
                danger_level,
            });
            return Ok(RollResult::Farkle);
        }

        self.options = options.clone();
        self.phase = TurnPhase::AwaitingSelection;
        Ok(RollResult::Scored(options))
    }

    /// Take the scoring at `index` from the pending roll and return how many
    /// dice the next roll will use. An out-of-range index takes the best
    /// option instead. Setting aside every die in hand restores all six.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] if there is no pending roll.
    pub fn score_as(&mut self, index: usize, commentary: &str) -> Result<u8, ProtocolError> {
        match self.phase {
            TurnPhase::AwaitingSelection => {}
            TurnPhase::AwaitingRoll => return Err(ProtocolError::ScoreWithoutRoll),
            TurnPhase::Ended(_) => return Err(ProtocolError::TurnOver),
        }

        let index = if index < self.options.len() {
            index
        } else {
            log::warn!(
                "{} picked scoring {index} of {}; using 0",
                self.player,
                self.options.len()
            );
            self.observer.notify(&MatchEvent::InvalidSelection {
                player: self.player.to_string(),
                index,
                options: self.options.len(),
            });
            0
        };
        let choice = self
            .options
            .get(index)
            .cloned()
            .ok_or(ProtocolError::ScoreWithoutRoll)?;

        let unscored = set_aside(&self.last_roll, &choice.dice)?;
        let dice_remaining = match u8::try_from(unscored.len()).unwrap_or(0) {
            0 => DICE_PER_TURN,
            left => left,
        };
        self.state.points += choice.points;
        self.state.dice_remaining = dice_remaining;
        self.phase = TurnPhase::AwaitingRoll;
        self.options = RollOutcome::default();

        self.observer.notify(&MatchEvent::Scored {
            player: self.player.to_string(),
            commentary: commentary.to_string(),
            points: choice.points,
            dice: choice.dice,
            dice_remaining,
            turn_points: self.state.points,
        });
        Ok(dice_remaining)
    }

    /// Bank the points scored so far and end the turn.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] unless at least one roll has been scored and
    /// no selection is pending.
    pub fn end_turn(&mut self) -> Result<u32, ProtocolError> {
        match self.phase {
            TurnPhase::AwaitingRoll if self.rolls > 0 => {
                self.phase = TurnPhase::Ended(TurnEnd::Banked);
                Ok(self.state.points)
            }
            TurnPhase::AwaitingRoll => Err(ProtocolError::NeverRolled),
            TurnPhase::AwaitingSelection => Err(ProtocolError::UnscoredRoll),
            TurnPhase::Ended(_) => Err(ProtocolError::TurnOver),
        }
    }

    /// Close the turn once the player has returned. Returning after a score
    /// banks implicitly.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] if the player never rolled or left a roll
    /// unscored.
    pub fn finish(mut self) -> Result<TurnSummary, ProtocolError> {
        match self.phase {
            TurnPhase::Ended(_) => {}
            TurnPhase::AwaitingRoll | TurnPhase::AwaitingSelection => {
                self.end_turn()?;
            }
        }
        Ok(TurnSummary {
            points: self.state.points,
            farkled: self.state.farkled,
            rolls: self.rolls,
        })
    }

    #[must_use]
    pub const fn player(&self) -> &str {
        self.player
    }

    #[must_use]
    pub const fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub const fn state(&self) -> &TurnState {
        &self.state
    }

    #[must_use]
    pub const fn dice_remaining(&self) -> u8 {
        self.state.dice_remaining
    }

    #[must_use]
    pub const fn turn_points(&self) -> u32 {
        self.state.points
    }

    #[must_use]
    pub const fn rolls(&self) -> u32 {
        self.rolls
    }

    /// Dice from the most recent roll.
    #[must_use]
    pub fn last_roll(&self) -> &[DieFace] {
        &self.last_roll
    }

    /// Options for the pending roll; empty unless a selection is pending.
    #[must_use]
    pub const fn options(&self) -> &RollOutcome {
        &self.options
    }

    #[must_use]
    pub fn score_for(&self, player: &str) -> i32 {
        self.ledger.score_for(player)
    }

    #[must_use]
    pub fn my_score(&self) -> i32 {
        self.ledger.score_for(self.player)
    }

    #[must_use]
    pub fn high_score(&self) -> i32 {
        self.ledger.high_score()
    }

    #[must_use]
    pub fn farkle_danger_level(&self, player: &str) -> u8 {
        self.ledger.farkle_danger_level(player)
    }

    #[must_use]
    pub fn my_danger_level(&self) -> u8 {
        self.ledger.farkle_danger_level(self.player)
    }

    pub fn player_names(&self) -> impl Iterator<Item = &str> {
        self.ledger.player_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use crate::events::EventLog;

    struct Fixture {
        ledger: ScoreLedger,
        dice: ScriptedDice,
        log: EventLog,
    }

    impl Fixture {
        fn new(rolls: &[&[u8]]) -> Self {
            Self {
                ledger: ScoreLedger::new(["Ben", "Jessica"]).unwrap(),
                dice: ScriptedDice::from_values(rolls).unwrap(),
                log: EventLog::default(),
            }
        }

        fn turn(&mut self) -> TurnController<'_> {
            TurnController::new("Ben", &self.ledger, &mut self.dice, &mut self.log)
        }
    }

    #[test]
    fn roll_then_score_then_bank() {
        let mut fixture = Fixture::new(&[&[1, 5, 2, 3, 4, 6]]);
        let mut turn = fixture.turn();
        assert_eq!(turn.phase(), TurnPhase::AwaitingRoll);

        let result = turn.roll("here goes").unwrap();
        let options = result.options().unwrap();
        assert_eq!(options.best().map(|s| s.points), Some(1500));
        assert_eq!(turn.phase(), TurnPhase::AwaitingSelection);

        assert_eq!(turn.score_as(0, "straight!").unwrap(), 6);
        assert_eq!(turn.turn_points(), 1500);
        assert_eq!(turn.end_turn(), Ok(1500));
        assert_eq!(turn.phase(), TurnPhase::Ended(TurnEnd::Banked));

        let summary = turn.finish().unwrap();
        assert_eq!(summary.delta(), 1500);
        assert_eq!(summary.rolls, 1);
    }

    #[test]
    fn partial_selection_leaves_remaining_dice() {
        let mut fixture = Fixture::new(&[&[1, 5, 2, 3, 4, 4], &[5, 2, 3, 3, 4]]);
        let mut turn = fixture.turn();
        turn.roll("").unwrap();
        // Options: 150 (1,5), 100 (1), 50 (5).
        assert_eq!(turn.score_as(1, "just the one").unwrap(), 5);
        turn.roll("").unwrap();
        assert_eq!(turn.last_roll().len(), 5);
        assert_eq!(turn.score_as(0, "").unwrap(), 4);
        assert_eq!(turn.turn_points(), 150);
        assert_eq!(turn.finish().unwrap().delta(), 150);
    }

    #[test]
    fn farkle_zeroes_turn_and_ends_it() {
        let mut fixture = Fixture::new(&[&[1, 1, 1, 2, 3, 4], &[2, 3, 4]]);
        let mut turn = fixture.turn();
        turn.roll("").unwrap();
        assert_eq!(turn.score_as(0, "").unwrap(), 3);
        assert_eq!(turn.roll("push it").unwrap(), RollResult::Farkle);
        assert_eq!(turn.phase(), TurnPhase::Ended(TurnEnd::Farkled));
        assert_eq!(turn.turn_points(), 0);
        assert_eq!(turn.roll(""), Err(ProtocolError::TurnOver));

        let summary = turn.finish().unwrap();
        assert!(summary.farkled);
        assert_eq!(summary.delta(), 0);
        assert_eq!(
            fixture
                .log
                .count_where(|event| matches!(event, MatchEvent::Farkled { .. })),
            1
        );
    }

    #[test]
    fn hot_dice_restore_all_six() {
        let mut fixture = Fixture::new(&[&[1, 1, 5, 2, 3, 4], &[1, 5, 5]]);
        let mut turn = fixture.turn();
        turn.roll("").unwrap();
        // 250 (1,1,5) leaves three dice.
        assert_eq!(turn.score_as(0, "").unwrap(), 3);
        turn.roll("").unwrap();
        assert_eq!(turn.options().best().map(|s| s.points), Some(200));
        assert_eq!(turn.score_as(0, "hot dice").unwrap(), 6);
        assert_eq!(turn.dice_remaining(), 6);
        assert_eq!(turn.turn_points(), 450);
    }

    #[test]
    fn out_of_range_index_takes_best_option() {
        let mut fixture = Fixture::new(&[&[1, 5, 2, 3, 4, 4]]);
        let mut turn = fixture.turn();
        turn.roll("").unwrap();
        assert_eq!(turn.score_as(99, "").unwrap(), 4);
        assert_eq!(turn.turn_points(), 150);
        drop(turn);
        assert_eq!(
            fixture
                .log
                .count_where(|event| matches!(event, MatchEvent::InvalidSelection { index: 99, .. })),
            1
        );
    }

    #[test]
    fn protocol_violations_are_reported() {
        let mut fixture = Fixture::new(&[&[1, 2, 3, 4, 6, 6]]);
        let mut turn = fixture.turn();
        assert_eq!(turn.score_as(0, ""), Err(ProtocolError::ScoreWithoutRoll));
        assert_eq!(turn.end_turn(), Err(ProtocolError::NeverRolled));
        turn.roll("").unwrap();
        assert_eq!(turn.roll(""), Err(ProtocolError::RollBeforeScoring));
        assert_eq!(turn.end_turn(), Err(ProtocolError::UnscoredRoll));
        assert_eq!(turn.finish(), Err(ProtocolError::UnscoredRoll));
    }

    #[test]
    fn returning_without_rolling_is_a_violation() {
        let mut fixture = Fixture::new(&[]);
        let turn = fixture.turn();
        assert_eq!(turn.finish(), Err(ProtocolError::NeverRolled));
    }

    #[test]
    fn match_queries_read_the_ledger() {
        let mut fixture = Fixture::new(&[]);
        fixture.ledger.add_score("Jessica", 700).unwrap();
        let turn = fixture.turn();
        assert_eq!(turn.player(), "Ben");
        assert_eq!(turn.my_score(), 0);
        assert_eq!(turn.score_for("Jessica"), 700);
        assert_eq!(turn.high_score(), 700);
        assert_eq!(turn.my_danger_level(), 0);
        assert_eq!(turn.farkle_danger_level("Jessica"), 0);
        assert_eq!(turn.player_names().collect::<Vec<_>>(), vec!["Ben", "Jessica"]);
    }

    #[test]
    fn fault_wraps_player_errors() {
        let fault = TurnFault::from(anyhow::anyhow!("strategy crashed"));
        assert_eq!(fault.to_string(), "strategy crashed");
        let fault = TurnFault::from(ProtocolError::NoDice);
        assert_eq!(fault.to_string(), "protocol violation: no dice available to roll");
    }
}
