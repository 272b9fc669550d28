//! Match orchestration: round-robin turns, win detection, the bonus round
//! and fault isolation.
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, MatchConfig};
use crate::dice::{DiceSource, RandomDice};
use crate::events::{MatchEvent, MatchObserver, Observers};
use crate::ledger::{LedgerEntry, LedgerError, ScoreLedger};
use crate::player::Player;
use crate::turn::{TurnController, TurnFault, TurnSummary};

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("a match needs at least one player")]
    NoPlayers,
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Final standing for one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStanding {
    pub name: String,
    pub score: i32,
    pub farkles: u32,
    pub eliminated: bool,
}

/// Plain-data summary of a finished match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: Option<String>,
    pub turns_played: u32,
    /// Seating order.
    pub totals: Vec<PlayerStanding>,
    pub total_farkles: u32,
    /// Elimination order.
    pub eliminated: Vec<String>,
    pub bonus_round: bool,
    pub score_sheet: String,
}

impl MatchResult {
    #[must_use]
    pub fn standing(&self, player: &str) -> Option<&PlayerStanding> {
        self.totals.iter().find(|standing| standing.name == player)
    }

    #[must_use]
    pub fn farkles_for(&self, player: &str) -> u32 {
        self.standing(player).map_or(0, |standing| standing.farkles)
    }

    #[must_use]
    pub fn score_for(&self, player: &str) -> i32 {
        self.standing(player).map_or(0, |standing| standing.score)
    }
}

struct Seat {
    player: Box<dyn Player>,
    name: String,
    farkles: u32,
    eliminated: bool,
}

/// A single game of Farkle between a fixed roster.
pub struct FarkleMatch {
    config: MatchConfig,
    seats: Vec<Seat>,
    ledger: ScoreLedger,
    dice: Box<dyn DiceSource>,
    observers: Observers,
    /// Rotation slots consumed, skipped seats included.
    slot: usize,
    turns_played: u32,
    eliminated: Vec<String>,
    bonus_round: bool,
    finished: bool,
}

impl FarkleMatch {
    /// Seat `players` with dice drawn from the config's seed, or from OS
    /// entropy when no seed is set.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] for an empty roster, a repeated name or an
    /// invalid config.
    pub fn new(players: Vec<Box<dyn Player>>, config: MatchConfig) -> Result<Self, MatchError> {
        let dice: Box<dyn DiceSource> = Box::new(
            config
                .seed
                .map_or_else(RandomDice::from_entropy, RandomDice::from_seed),
        );
        Self::with_dice(players, config, dice)
    }

    /// Seat `players` using an explicit dice source.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] for an empty roster, a repeated name or an
    /// invalid config.
    pub fn with_dice(
        players: Vec<Box<dyn Player>>,
        config: MatchConfig,
        dice: Box<dyn DiceSource>,
    ) -> Result<Self, MatchError> {
        config.validate()?;
        if players.is_empty() {
            return Err(MatchError::NoPlayers);
        }
        let ledger = ScoreLedger::new(players.iter().map(|player| player.name().to_string()))?;
        let seats = players
            .into_iter()
            .map(|player| Seat {
                name: player.name().to_string(),
                player,
                farkles: 0,
                eliminated: false,
            })
            .collect();

        Ok(Self {
            config,
            seats,
            ledger,
            dice,
            observers: Observers::default(),
            slot: 0,
            turns_played: 0,
            eliminated: Vec::new(),
            bonus_round: false,
            finished: false,
        })
    }

    pub fn observe(&mut self, observer: Box<dyn MatchObserver>) {
        self.observers.push(observer);
    }

    /// Play until a winner emerges and the bonus round completes, every
    /// player is eliminated, or the configured turn limit is reached.
    ///
    /// Calling this again after the match has finished returns the same
    /// result without playing further turns.
    pub fn play(&mut self) -> MatchResult {
        if self.finished {
            return self.result();
        }

        let names: Vec<String> = self.player_names().map(ToString::to_string).collect();
        log::info!("match starting with {}", names.join(", "));
        self.observers
            .notify(&MatchEvent::MatchStarted { players: names });

        let leader = loop {
            if self.should_stop() {
                return self.conclude();
            }
            let seat = self.next_seat();
            self.play_slot(seat);
            if let Some(leader) = self.ledger.winner() {
                break leader.to_string();
            }
        };

        self.run_bonus_round(&leader);
        self.conclude()
    }

    fn run_bonus_round(&mut self, leader: &str) {
        self.bonus_round = true;
        let score = self.ledger.score_for(leader);
        log::info!("{leader} reached {score}; bonus round begins");
        self.observers.notify(&MatchEvent::BonusRoundStarted {
            leader: leader.to_string(),
            score,
        });

        for _ in 1..self.seats.len() {
            if self.should_stop() {
                break;
            }
            let seat = self.next_seat();
            if self.seats[seat].name == leader {
                continue;
            }
            self.play_slot(seat);
        }
    }

    fn should_stop(&self) -> bool {
        let limit_hit = self
            .config
            .turn_limit
            .is_some_and(|limit| self.turns_played >= limit);
        limit_hit || self.seats.iter().all(|seat| seat.eliminated)
    }

    fn next_seat(&mut self) -> usize {
        let seat = self.slot % self.seats.len();
        self.slot += 1;
        seat
    }

    fn play_slot(&mut self, index: usize) {
        let name = self.seats[index].name.clone();
        if self.seats[index].eliminated {
            self.observers
                .notify(&MatchEvent::PlayerSkipped { player: name });
            return;
        }

        self.turns_played += 1;
        self.observers.notify(&MatchEvent::TurnStarted {
            player: name.clone(),
            turn: self.turns_played,
            score: self.ledger.score_for(&name),
            danger_level: self.ledger.farkle_danger_level(&name),
        });

        let (outcome, farkled) = {
            let seat = &mut self.seats[index];
            let mut turn = TurnController::new(
                &name,
                &self.ledger,
                self.dice.as_mut(),
                &mut self.observers,
            );
            let attempt =
                panic::catch_unwind(AssertUnwindSafe(|| seat.player.take_turn(&mut turn)));
            let farkled = turn.state().farkled;
            let outcome = match attempt {
                Ok(Ok(commentary)) => turn
                    .finish()
                    .map(|summary| (summary, commentary))
                    .map_err(TurnFault::from),
                Ok(Err(fault)) => Err(fault),
                Err(payload) => Err(TurnFault::Panicked(panic_message(payload.as_ref()))),
            };
            (outcome, farkled)
        };

        match outcome {
            Ok((summary, commentary)) => self.record_turn(index, &summary, commentary),
            Err(fault) => {
                // A Farkle rolled before the fault still counts.
                if farkled {
                    self.seats[index].farkles += 1;
                }
                self.eliminate(index, &fault);
            }
        }
    }

    fn record_turn(&mut self, index: usize, summary: &TurnSummary, commentary: String) {
        let seat = &mut self.seats[index];
        if summary.farkled {
            seat.farkles += 1;
        }
        let name = seat.name.clone();
        let delta = summary.delta();

        let recorded = match self.ledger.add_score(&name, delta) {
            Ok(entry) => entry,
            Err(err) => {
                log::error!("could not record turn for {name}: {err}");
                return;
            }
        };
        if recorded == LedgerEntry::NoScore && !summary.farkled {
            self.observers.notify(&MatchEvent::OpeningScoreMissed {
                player: name.clone(),
                points: summary.points,
            });
        }
        log::debug!("{name} ends turn with {delta}, recorded {recorded}");
        self.observers.notify(&MatchEvent::TurnEnded {
            player: name,
            commentary,
            delta,
            recorded,
        });
    }

    fn eliminate(&mut self, index: usize, fault: &TurnFault) {
        let seat = &mut self.seats[index];
        seat.eliminated = true;
        let name = seat.name.clone();
        log::warn!("eliminating {name}: {fault}");
        self.eliminated.push(name.clone());
        self.observers.notify(&MatchEvent::PlayerEliminated {
            player: name,
            reason: fault.to_string(),
        });
    }

    fn conclude(&mut self) -> MatchResult {
        self.finished = true;
        let winner = self.ledger.winner().map(ToString::to_string);
        match &winner {
            Some(name) => log::info!("{name} wins after {} turns", self.turns_played),
            None => log::info!("match stopped after {} turns without a winner", self.turns_played),
        }
        self.observers.notify(&MatchEvent::MatchEnded {
            winner,
            turns: self.turns_played,
        });
        self.result()
    }

    /// Snapshot of the match as it stands.
    #[must_use]
    pub fn result(&self) -> MatchResult {
        let totals: Vec<PlayerStanding> = self
            .seats
            .iter()
            .map(|seat| PlayerStanding {
                name: seat.name.clone(),
                score: self.ledger.score_for(&seat.name),
                farkles: seat.farkles,
                eliminated: seat.eliminated,
            })
            .collect();
        MatchResult {
            winner: self.ledger.winner().map(ToString::to_string),
            turns_played: self.turns_played,
            total_farkles: totals.iter().map(|standing| standing.farkles).sum(),
            totals,
            eliminated: self.eliminated.clone(),
            bonus_round: self.bonus_round,
            score_sheet: self.ledger.to_string(),
        }
    }

    #[must_use]
    pub const fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    #[must_use]
    pub const fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub const fn turns_played(&self) -> u32 {
        self.turns_played
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn winner(&self) -> Option<&str> {
        self.ledger.winner()
    }

    #[must_use]
    pub fn score_for(&self, player: &str) -> i32 {
        self.ledger.score_for(player)
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
    pub fn farkles_for(&self, player: &str) -> u32 {
        self.seats
            .iter()
            .find(|seat| seat.name == player)
            .map_or(0, |seat| seat.farkles)
    }

    /// Names in elimination order.
    #[must_use]
    pub fn eliminated(&self) -> &[String] {
        &self.eliminated
    }

    pub fn player_names(&self) -> impl Iterator<Item = &str> {
        self.seats.iter().map(|seat| seat.name.as_str())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
