//! The capability every participant in a match provides.
use crate::turn::{TurnController, TurnFault};

/// A seat at the table.
///
/// During `take_turn` a player must call [`TurnController::roll`] at least
/// once and follow every successful roll with exactly one
/// [`TurnController::score_as`]. Returning after a score banks the turn;
/// a Farkle ends it early. Any `Err` or panic removes the player from the
/// rest of the match.
pub trait Player {
    /// Unique, stable display name.
    fn name(&self) -> &str;

    /// Play one turn and return closing commentary.
    ///
    /// # Errors
    ///
    /// Returns [`TurnFault`] when the player cannot complete the turn.
    fn take_turn(&mut self, turn: &mut TurnController<'_>) -> Result<String, TurnFault>;
}

impl<P: Player + ?Sized> Player for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn take_turn(&mut self, turn: &mut TurnController<'_>) -> Result<String, TurnFault> {
        (**self).take_turn(turn)
    }
}
