//! Structured match notifications.
//!
//! The core performs no I/O. Console narration, speech or logging subscribe
//! through [`MatchObserver`].
use serde::{Deserialize, Serialize};

use crate::dice::{Dice, format_dice};
use crate::ledger::LedgerEntry;
use crate::scoring::RollOutcome;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    MatchStarted {
        players: Vec<String>,
    },
    TurnStarted {
        player: String,
        turn: u32,
        score: i32,
        danger_level: u8,
    },
    PlayerSkipped {
        player: String,
    },
    Rolled {
        player: String,
        commentary: String,
        dice: Dice,
        options: RollOutcome,
    },
    InvalidSelection {
        player: String,
        index: usize,
        options: usize,
    },
    Scored {
        player: String,
        commentary: String,
        points: u32,
        dice: Dice,
        dice_remaining: u8,
        turn_points: u32,
    },
    Farkled {
        player: String,
        /// Streak before this Farkle is recorded.
        danger_level: u8,
    },
    TurnEnded {
        player: String,
        commentary: String,
        delta: i32,
        recorded: LedgerEntry,
    },
    OpeningScoreMissed {
        player: String,
        points: u32,
    },
    PlayerEliminated {
        player: String,
        reason: String,
    },
    BonusRoundStarted {
        leader: String,
        score: i32,
    },
    MatchEnded {
        winner: Option<String>,
        turns: u32,
    },
}

impl MatchEvent {
    /// Player the event concerns, if any.
    #[must_use]
    pub fn player(&self) -> Option<&str> {
        match self {
            Self::TurnStarted { player, .. }
            | Self::PlayerSkipped { player }
            | Self::Rolled { player, .. }
            | Self::InvalidSelection { player, .. }
            | Self::Scored { player, .. }
            | Self::Farkled { player, .. }
            | Self::TurnEnded { player, .. }
            | Self::OpeningScoreMissed { player, .. }
            | Self::PlayerEliminated { player, .. } => Some(player.as_str()),
            Self::BonusRoundStarted { leader, .. } => Some(leader.as_str()),
            Self::MatchStarted { .. } | Self::MatchEnded { .. } => None,
        }
    }

    /// One-line plain description.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::MatchStarted { players } => format!("Play beginning: {}", players.join(", ")),
            Self::TurnStarted { player, turn, .. } => format!("Turn {turn}: {player}'s turn"),
            Self::PlayerSkipped { player } => format!("skip {player}"),
            Self::Rolled { player, dice, .. } => {
                format!("{player} rolled {}", format_dice(dice))
            }
            Self::InvalidSelection {
                player,
                index,
                options,
            } => format!(
                "{player} chose option {index} of {options}; using the best option instead"
            ),
            Self::Scored {
                player,
                points,
                dice,
                ..
            } => format!(
                "{player} scores {points}, setting aside {}",
                format_dice(dice)
            ),
            Self::Farkled { player, .. } => format!("{player}: Farkle!"),
            Self::TurnEnded { player, recorded, .. } => {
                format!("{player}'s turn is over ({recorded})")
            }
            Self::OpeningScoreMissed { player, points } => {
                format!("{player} needs at least 500 points to get on the board (had {points})")
            }
            Self::PlayerEliminated { player, reason } => {
                format!("{player} will sit out the rest of this match: {reason}")
            }
            Self::BonusRoundStarted { leader, score } => {
                format!("{leader} has reached {score} points. Everyone else gets one more turn.")
            }
            Self::MatchEnded { winner, turns } => match winner {
                Some(name) => format!("Game over after {turns} turns. Congratulations, {name}!"),
                None => format!("Game over after {turns} turns with no winner."),
            },
        }
    }
}

/// Receiver for match events.
pub trait MatchObserver {
    fn notify(&mut self, event: &MatchEvent);
}

/// Fan-out to any number of observers.
#[derive(Default)]
pub struct Observers {
    observers: Vec<Box<dyn MatchObserver>>,
}

impl Observers {
    pub fn push(&mut self, observer: Box<dyn MatchObserver>) {
        self.observers.push(observer);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl MatchObserver for Observers {
    fn notify(&mut self, event: &MatchEvent) {
        for observer in &mut self.observers {
            observer.notify(event);
        }
    }
}

/// Collects events in order. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: std::rc::Rc<std::cell::RefCell<Vec<MatchEvent>>>,
}

impl EventLog {
    #[must_use]
    pub fn events(&self) -> Vec<MatchEvent> {
        self.events.borrow().clone()
    }

    #[must_use]
    pub fn count_where(&self, predicate: impl Fn(&MatchEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|event| predicate(event)).count()
    }
}

impl MatchObserver for EventLog {
    fn notify(&mut self, event: &MatchEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Forwards events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl MatchObserver for LogObserver {
    fn notify(&mut self, event: &MatchEvent) {
        match event {
            MatchEvent::InvalidSelection { .. } | MatchEvent::PlayerEliminated { .. } => {
                log::warn!("{}", event.describe());
            }
            MatchEvent::MatchStarted { .. }
            | MatchEvent::BonusRoundStarted { .. }
            | MatchEvent::MatchEnded { .. } => log::info!("{}", event.describe()),
            _ => log::debug!("{}", event.describe()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observers_fan_out_to_shared_logs() {
        let log = EventLog::default();
        let mut observers = Observers::default();
        observers.push(Box::new(log.clone()));
        observers.push(Box::new(LogObserver));
        assert_eq!(observers.len(), 2);

        observers.notify(&MatchEvent::PlayerSkipped {
            player: "Ben".to_string(),
        });
        assert_eq!(log.events().len(), 1);
        assert_eq!(log.events()[0].player(), Some("Ben"));
        assert_eq!(
            log.count_where(|event| matches!(event, MatchEvent::PlayerSkipped { .. })),
            1
        );
    }

    #[test]
    fn events_serialize_with_tag() {
        let event = MatchEvent::MatchEnded {
            winner: Some("Jessica".to_string()),
            turns: 40,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"match_ended\""));
        assert!(event.describe().contains("Jessica"));
    }
}
