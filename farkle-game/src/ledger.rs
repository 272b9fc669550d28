//! Per-player score sheet with opening minimum and Farkle-streak penalty.
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{MAX_DANGER_LEVEL, OPENING_MINIMUM, TRIPLE_FARKLE_PENALTY, WINNING_SCORE};

const COLUMN_WIDTH: usize = 12;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("no ledger column for player '{0}'")]
    UnknownPlayer(String),
    #[error("player '{0}' already has a ledger column")]
    DuplicatePlayer(String),
}

/// One recorded turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntry {
    Points(i32),
    /// A sub-500 opening turn; counts as nothing and breaks Farkle streaks.
    NoScore,
}

impl LedgerEntry {
    /// Contribution to the running total.
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Self::Points(points) => points,
            Self::NoScore => 0,
        }
    }
}

impl fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Points(points) => write!(f, "{points}"),
            Self::NoScore => f.write_str("*"),
        }
    }
}

/// Append-only turn history for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerLedger {
    pub name: String,
    pub entries: Vec<LedgerEntry>,
}

impl PlayerLedger {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn total(&self) -> i32 {
        self.entries.iter().map(|entry| entry.value()).sum()
    }

    /// Trailing Farkle streak, 0 through 2.
    #[must_use]
    pub fn danger_level(&self) -> u8 {
        let [.., before, last] = self.entries.as_slice() else {
            return 0;
        };
        match (before, last) {
            (_, LedgerEntry::NoScore) => 0,
            (_, LedgerEntry::Points(points)) if *points > 0 => 0,
            (LedgerEntry::Points(0), LedgerEntry::Points(0)) => MAX_DANGER_LEVEL,
            _ => 1,
        }
    }

    /// Whether a real score is already on the books.
    #[must_use]
    pub fn is_on_board(&self) -> bool {
        matches!(self.entries.last(), Some(LedgerEntry::Points(_)))
    }

    fn record(&mut self, delta: i32) -> LedgerEntry {
        let entry = if !self.is_on_board() {
            if delta >= OPENING_MINIMUM {
                LedgerEntry::Points(delta)
            } else {
                LedgerEntry::NoScore
            }
        } else if delta == 0 && self.danger_level() == MAX_DANGER_LEVEL {
            LedgerEntry::Points(TRIPLE_FARKLE_PENALTY)
        } else {
            LedgerEntry::Points(delta)
        };
        self.entries.push(entry);
        entry
    }
}

/// Score sheet for every player in a match, in seating order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLedger {
    players: Vec<PlayerLedger>,
}

impl ScoreLedger {
    /// Open a column per player.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicatePlayer`] if a name repeats.
    pub fn new<I, S>(names: I) -> Result<Self, LedgerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ledger = Self::default();
        for name in names {
            let name = name.into();
            if ledger.column(&name).is_some() {
                return Err(LedgerError::DuplicatePlayer(name));
            }
            ledger.players.push(PlayerLedger::new(name));
        }
        Ok(ledger)
    }

    fn column(&self, player: &str) -> Option<&PlayerLedger> {
        self.players.iter().find(|column| column.name == player)
    }

    /// Record a finished turn and return the entry actually written.
    ///
    /// Until a player opens with at least 500 points, smaller turns are
    /// written as [`LedgerEntry::NoScore`]. Once on the board, a third
    /// consecutive zero turn is written as a 1000 point penalty.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownPlayer`] if `player` has no column.
    pub fn add_score(&mut self, player: &str, delta: i32) -> Result<LedgerEntry, LedgerError> {
        let column = self
            .players
            .iter_mut()
            .find(|column| column.name == player)
            .ok_or_else(|| LedgerError::UnknownPlayer(player.to_string()))?;
        Ok(column.record(delta))
    }

    /// Running total; 0 for unknown players.
    #[must_use]
    pub fn score_for(&self, player: &str) -> i32 {
        self.column(player).map_or(0, PlayerLedger::total)
    }

    /// Trailing zero-turn streak; 0 for unknown players.
    #[must_use]
    pub fn farkle_danger_level(&self, player: &str) -> u8 {
        self.column(player).map_or(0, PlayerLedger::danger_level)
    }

    #[must_use]
    pub fn entries(&self, player: &str) -> Option<&[LedgerEntry]> {
        self.column(player).map(|column| column.entries.as_slice())
    }

    /// Highest total among players at or past the winning score.
    ///
    /// This is not simply the first seat to qualify: a later seat with a
    /// larger total wins, so an overtake during the bonus round is reported.
    /// Ties go to the earlier seat.
    #[must_use]
    pub fn winner(&self) -> Option<&str> {
        self.players
            .iter()
            .map(|column| (column, column.total()))
            .filter(|&(_, total)| total >= WINNING_SCORE)
            .fold(None, |best: Option<(&PlayerLedger, i32)>, (column, total)| {
                match best {
                    Some((_, best_total)) if best_total >= total => best,
                    _ => Some((column, total)),
                }
            })
            .map(|(column, _)| column.name.as_str())
    }

    /// Highest total on the sheet; 0 when empty.
    #[must_use]
    pub fn high_score(&self) -> i32 {
        self.players
            .iter()
            .map(PlayerLedger::total)
            .max()
            .unwrap_or(0)
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerLedger> {
        self.players.iter()
    }

    pub fn player_names(&self) -> impl Iterator<Item = &str> {
        self.players.iter().map(|column| column.name.as_str())
    }
}

impl fmt::Display for ScoreLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = |fill: char| -> String {
            let cell: String = std::iter::repeat_n(fill, COLUMN_WIDTH).collect();
            format!("{}+", format!("+{cell}").repeat(self.players.len()))
        };

        for column in &self.players {
            write!(f, "|{:>COLUMN_WIDTH$}", column.name)?;
        }
        writeln!(f, "|")?;
        writeln!(f, "{}", rule('-'))?;

        let rows = self
            .players
            .iter()
            .map(|column| column.entries.len())
            .max()
            .unwrap_or(0);
        for row in 0..rows {
            for column in &self.players {
                let cell = column
                    .entries
                    .get(row)
                    .map(ToString::to_string)
                    .unwrap_or_default();
                write!(f, "|{cell:>COLUMN_WIDTH$}")?;
            }
            writeln!(f, "|")?;
        }

        writeln!(f, "{}", rule('='))?;
        for column in &self.players {
            write!(f, "|{:>COLUMN_WIDTH$}", column.total())?;
        }
        write!(f, "|")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(name: &str) -> ScoreLedger {
        ScoreLedger::new([name]).unwrap()
    }

    #[test]
    fn opening_needs_five_hundred() {
        let mut ledger = single("David");
        assert_eq!(ledger.add_score("David", 300), Ok(LedgerEntry::NoScore));
        assert_eq!(ledger.score_for("David"), 0);
        assert_eq!(ledger.add_score("David", 0), Ok(LedgerEntry::NoScore));
        assert_eq!(ledger.add_score("David", 600), Ok(LedgerEntry::Points(600)));
        assert_eq!(ledger.score_for("David"), 600);
        assert_eq!(ledger.add_score("David", 150), Ok(LedgerEntry::Points(150)));
        assert_eq!(ledger.score_for("David"), 750);
    }

    #[test]
    fn third_consecutive_farkle_costs_a_thousand() {
        let mut ledger = single("P");
        ledger.add_score("P", 300).unwrap();
        assert_eq!(ledger.entries("P"), Some(&[LedgerEntry::NoScore][..]));
        ledger.add_score("P", 600).unwrap();
        assert_eq!(ledger.farkle_danger_level("P"), 0);

        ledger.add_score("P", 0).unwrap();
        assert_eq!(ledger.score_for("P"), 600);
        assert_eq!(ledger.farkle_danger_level("P"), 1);

        ledger.add_score("P", 0).unwrap();
        assert_eq!(ledger.farkle_danger_level("P"), 2);

        assert_eq!(
            ledger.add_score("P", 0),
            Ok(LedgerEntry::Points(TRIPLE_FARKLE_PENALTY))
        );
        assert_eq!(ledger.score_for("P"), -400);
        assert_eq!(
            ledger.entries("P").unwrap(),
            &[
                LedgerEntry::NoScore,
                LedgerEntry::Points(600),
                LedgerEntry::Points(0),
                LedgerEntry::Points(0),
                LedgerEntry::Points(-1000),
            ]
        );
        assert_eq!(ledger.farkle_danger_level("P"), 1);
    }

    #[test]
    fn danger_level_resets_on_points() {
        let mut ledger = single("P");
        ledger.add_score("P", 1000).unwrap();
        ledger.add_score("P", 0).unwrap();
        ledger.add_score("P", 350).unwrap();
        assert_eq!(ledger.farkle_danger_level("P"), 0);
        ledger.add_score("P", 0).unwrap();
        assert_eq!(ledger.farkle_danger_level("P"), 1);
    }

    #[test]
    fn danger_level_is_zero_with_short_history() {
        let mut ledger = single("P");
        assert_eq!(ledger.farkle_danger_level("P"), 0);
        ledger.add_score("P", 0).unwrap();
        ledger.add_score("P", 0).unwrap();
        assert_eq!(ledger.farkle_danger_level("P"), 0);
        assert_eq!(ledger.farkle_danger_level("nobody"), 0);
    }

    #[test]
    fn winner_requires_ten_thousand() {
        let mut ledger = ScoreLedger::new(["A", "B"]).unwrap();
        ledger.add_score("A", 9_500).unwrap();
        ledger.add_score("B", 700).unwrap();
        assert_eq!(ledger.winner(), None);
        assert_eq!(ledger.high_score(), 9_500);

        ledger.add_score("A", 500).unwrap();
        assert_eq!(ledger.winner(), Some("A"));

        ledger.add_score("B", 9_900).unwrap();
        assert_eq!(ledger.winner(), Some("B"));
        assert_eq!(ledger.high_score(), 10_600);
    }

    #[test]
    fn later_seat_with_higher_total_wins() {
        let mut ledger = ScoreLedger::new(["A", "B"]).unwrap();
        ledger.add_score("A", 10_000).unwrap();
        ledger.add_score("B", 10_500).unwrap();
        assert_eq!(ledger.winner(), Some("B"));
    }

    #[test]
    fn winner_ties_go_to_earlier_seat() {
        let mut ledger = ScoreLedger::new(["A", "B"]).unwrap();
        ledger.add_score("A", 10_000).unwrap();
        ledger.add_score("B", 10_000).unwrap();
        assert_eq!(ledger.winner(), Some("A"));
    }

    #[test]
    fn unknown_and_duplicate_players_are_errors() {
        assert_eq!(
            ScoreLedger::new(["A", "A"]),
            Err(LedgerError::DuplicatePlayer("A".to_string()))
        );
        let mut ledger = single("A");
        assert_eq!(
            ledger.add_score("Z", 500),
            Err(LedgerError::UnknownPlayer("Z".to_string()))
        );
        assert_eq!(ledger.score_for("Z"), 0);
        assert!(ledger.entries("Z").is_none());
    }

    #[test]
    fn score_sheet_renders_columns_and_totals() {
        let mut ledger = ScoreLedger::new(["David", "Aaron"]).unwrap();
        ledger.add_score("David", 1200).unwrap();
        ledger.add_score("Aaron", 100).unwrap();
        ledger.add_score("David", 0).unwrap();

        let sheet = ledger.to_string();
        let lines: Vec<&str> = sheet.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "|       David|       Aaron|");
        assert_eq!(lines[1], "+------------+------------+");
        assert_eq!(lines[2], "|        1200|           *|");
        assert_eq!(lines[3], "|           0|            |");
        assert_eq!(lines[4], "+============+============+");
        assert_eq!(lines[5], "|        1200|           0|");
    }
}
