//! Player implementations and roster parsing.
mod adaptive;
mod human;
mod simple;

use std::fmt;
use std::str::FromStr;

use farkle_game::Player;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use adaptive::AdaptivePlayer;
pub use human::HumanPlayer;
pub use simple::SimplePlayer;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("roster is empty")]
    Empty,
    #[error("roster entry '{0}' must look like NAME:STRATEGY")]
    MissingStrategy(String),
    #[error("roster entry '{0}' has an empty name")]
    EmptyName(String),
    #[error("unknown strategy '{0}' (expected simple, adaptive or human)")]
    UnknownStrategy(String),
}

/// Built-in decision strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Simple,
    Adaptive,
    Human,
}

impl StrategyKind {
    pub const ALL: [Self; 3] = [Self::Simple, Self::Adaptive, Self::Human];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Adaptive => "adaptive",
            Self::Human => "human",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Simple => "Rolls once per turn and banks the best scoring",
            Self::Adaptive => "Adjusts its target to the score situation and Farkle danger",
            Self::Human => "Prompts on the console for every decision",
        }
    }

    #[must_use]
    pub fn create_player(self, name: &str) -> Box<dyn Player> {
        match self {
            Self::Simple => Box::new(SimplePlayer::new(name)),
            Self::Adaptive => Box::new(AdaptivePlayer::new(name)),
            Self::Human => Box::new(HumanPlayer::console(name)),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StrategyKind {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RosterError::UnknownStrategy(s.trim().to_string()))
    }
}

/// One seat in a roster: a name and the strategy that plays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub name: String,
    pub strategy: StrategyKind,
}

impl PlayerSpec {
    #[must_use]
    pub fn create_player(&self) -> Box<dyn Player> {
        self.strategy.create_player(&self.name)
    }
}

impl FromStr for PlayerSpec {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, strategy) = s
            .split_once(':')
            .ok_or_else(|| RosterError::MissingStrategy(s.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName(s.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            strategy: strategy.parse()?,
        })
    }
}

/// Parse roster entries such as `["Ben:adaptive", "Jessica:simple"]`.
///
/// # Errors
///
/// Returns [`RosterError`] for an empty roster or a malformed entry.
/// Duplicate names are left for the match to reject.
pub fn parse_roster(entries: &[String]) -> Result<Vec<PlayerSpec>, RosterError> {
    if entries.is_empty() {
        return Err(RosterError::Empty);
    }
    entries.iter().map(|entry| entry.parse()).collect()
}

#[must_use]
pub fn has_human(roster: &[PlayerSpec]) -> bool {
    roster
        .iter()
        .any(|spec| spec.strategy == StrategyKind::Human)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn roster_entries_parse() {
        let roster = parse_roster(&entries(&["Ben:adaptive", " Jessica : SIMPLE"])).unwrap();
        assert_eq!(
            roster,
            vec![
                PlayerSpec {
                    name: "Ben".to_string(),
                    strategy: StrategyKind::Adaptive,
                },
                PlayerSpec {
                    name: "Jessica".to_string(),
                    strategy: StrategyKind::Simple,
                },
            ]
        );
        assert!(!has_human(&roster));
        assert_eq!(roster[0].create_player().name(), "Ben");
    }

    #[test]
    fn malformed_rosters_are_rejected() {
        assert_eq!(parse_roster(&[]), Err(RosterError::Empty));
        assert_eq!(
            parse_roster(&entries(&["Ben"])),
            Err(RosterError::MissingStrategy("Ben".to_string()))
        );
        assert_eq!(
            parse_roster(&entries(&[":simple"])),
            Err(RosterError::EmptyName(":simple".to_string()))
        );
        assert_eq!(
            parse_roster(&entries(&["Ben:reckless"])),
            Err(RosterError::UnknownStrategy("reckless".to_string()))
        );
    }

    #[test]
    fn strategy_keys_round_trip() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.key().parse::<StrategyKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.key());
            assert!(!kind.description().is_empty());
        }
        let roster = parse_roster(&entries(&["Me:human"])).unwrap();
        assert!(has_human(&roster));
    }
}
