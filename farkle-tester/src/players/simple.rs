use farkle_game::{Player, RollResult, TurnController, TurnFault};

/// Rolls once each turn and always takes the highest scoring.
#[derive(Debug, Clone)]
pub struct SimplePlayer {
    name: String,
}

impl SimplePlayer {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Player for SimplePlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn take_turn(&mut self, turn: &mut TurnController<'_>) -> Result<String, TurnFault> {
        let RollResult::Scored(options) = turn.roll("Let's roll!")? else {
            return Ok(format!("Farkle after roll #{}!", turn.rolls()));
        };
        let points = options.best().map_or(0, |best| best.points);
        let commentary = format!("{points} points looks good to me.");
        turn.score_as(0, &commentary)?;
        Ok(commentary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farkle_game::{EventLog, ScoreLedger, ScriptedDice, TurnPhase};

    #[test]
    fn takes_best_scoring_and_stops() {
        let ledger = ScoreLedger::new(["Jessica"]).unwrap();
        let mut dice = ScriptedDice::from_values(&[&[1, 1, 1, 2, 3, 4]]).unwrap();
        let mut log = EventLog::default();
        let mut turn = TurnController::new("Jessica", &ledger, &mut dice, &mut log);

        let mut player = SimplePlayer::new("Jessica");
        let commentary = player.take_turn(&mut turn).unwrap();
        assert_eq!(commentary, "300 points looks good to me.");
        assert_eq!(turn.rolls(), 1);
        assert_eq!(turn.phase(), TurnPhase::AwaitingRoll);
        assert_eq!(turn.finish().unwrap().delta(), 300);
    }

    #[test]
    fn farkle_ends_the_turn_quietly() {
        let ledger = ScoreLedger::new(["Jessica"]).unwrap();
        let mut dice = ScriptedDice::from_values(&[&[2, 3, 4, 6, 6, 2]]).unwrap();
        let mut log = EventLog::default();
        let mut turn = TurnController::new("Jessica", &ledger, &mut dice, &mut log);

        let commentary = SimplePlayer::new("Jessica").take_turn(&mut turn).unwrap();
        assert_eq!(commentary, "Farkle after roll #1!");
        assert!(turn.finish().unwrap().farkled);
    }
}
