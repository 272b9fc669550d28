//! Farkle Game Engine
//!
//! Platform-agnostic rules for the dice game Farkle: the scoring engine,
//! the per-turn roll/score protocol, the score ledger and the match
//! orchestrator. Presentation and player strategies live outside this
//! crate and talk to it through [`Player`] and [`MatchObserver`].

pub mod config;
pub mod constants;
pub mod dice;
pub mod events;
pub mod game;
pub mod histogram;
pub mod ledger;
pub mod player;
pub mod scoring;
pub mod turn;

// Re-export commonly used types
pub use config::{ConfigError, MatchConfig};
pub use constants::{FARKLE_ODDS, OPENING_MINIMUM, WINNING_SCORE, farkle_odds};
pub use dice::{
    Dice, DiceError, DiceSource, DieFace, RandomDice, ScriptedDice, format_dice, parse_dice,
    set_aside,
};
pub use events::{EventLog, LogObserver, MatchEvent, MatchObserver, Observers};
pub use game::{FarkleMatch, MatchError, MatchResult, PlayerStanding};
pub use histogram::{Histogram, histogram};
pub use ledger::{LedgerEntry, LedgerError, PlayerLedger, ScoreLedger};
pub use player::Player;
pub use scoring::{RollOutcome, Scoring, kind_points, scorings_for};
pub use turn::{
    ProtocolError, RollResult, TurnController, TurnEnd, TurnFault, TurnPhase, TurnState,
    TurnSummary,
};
