//! Batch execution of matches over seeds and iterations.
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use colored::Colorize;
use farkle_game::{FarkleMatch, LogObserver, MatchConfig, MatchResult};
use serde::{Deserialize, Serialize};

use crate::narrator::ConsoleNarrator;
use crate::players::PlayerSpec;

/// One played match and the seed that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub seed: u64,
    pub iteration: usize,
    pub result: MatchResult,
}

/// Aggregate numbers for one seat across a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerTally {
    pub name: String,
    pub strategy: String,
    pub wins: usize,
    pub farkles: u32,
    pub eliminations: usize,
    pub average_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub matches: usize,
    /// Matches that ended without a winner.
    pub unfinished: usize,
    pub average_turns: f64,
    pub players: Vec<PlayerTally>,
    pub records: Vec<MatchRecord>,
}

impl SeriesSummary {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_records(roster: &[PlayerSpec], records: Vec<MatchRecord>) -> Self {
        let matches = records.len();
        let unfinished = records
            .iter()
            .filter(|record| record.result.winner.is_none())
            .count();
        let total_turns: u64 = records
            .iter()
            .map(|record| u64::from(record.result.turns_played))
            .sum();

        let players = roster
            .iter()
            .map(|spec| {
                let results = records.iter().map(|record| &record.result);
                let wins = results
                    .clone()
                    .filter(|result| result.winner.as_deref() == Some(spec.name.as_str()))
                    .count();
                let farkles = results.clone().map(|result| result.farkles_for(&spec.name)).sum();
                let eliminations = results
                    .clone()
                    .filter(|result| result.eliminated.contains(&spec.name))
                    .count();
                let total_score: i64 = results
                    .map(|result| i64::from(result.score_for(&spec.name)))
                    .sum();
                PlayerTally {
                    name: spec.name.clone(),
                    strategy: spec.strategy.to_string(),
                    wins,
                    farkles,
                    eliminations,
                    average_score: mean(total_score as f64, matches),
                }
            })
            .collect();

        Self {
            matches,
            unfinished,
            average_turns: mean(total_turns as f64, matches),
            players,
            records,
        }
    }

    /// Seat with the most wins, ties going to the earlier seat.
    #[must_use]
    pub fn leader(&self) -> Option<&PlayerTally> {
        self.players
            .iter()
            .rev()
            .max_by_key(|tally| tally.wins)
            .filter(|tally| tally.wins > 0)
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Plays a roster through a series of seeded matches.
pub struct SeriesRunner {
    roster: Vec<PlayerSpec>,
    config: MatchConfig,
    narrate: bool,
    show_options: bool,
}

impl SeriesRunner {
    #[must_use]
    pub const fn new(roster: Vec<PlayerSpec>, config: MatchConfig) -> Self {
        Self {
            roster,
            config,
            narrate: false,
            show_options: false,
        }
    }

    /// Print a running commentary for every match.
    #[must_use]
    pub fn narrated(mut self, show_options: bool) -> Self {
        self.narrate = true;
        self.show_options = show_options;
        self
    }

    #[must_use]
    pub fn roster(&self) -> &[PlayerSpec] {
        &self.roster
    }

    /// Play `iterations` matches for each seed. Iteration `i` of seed `s`
    /// uses seed `s + i`.
    ///
    /// # Errors
    ///
    /// Returns an error if a match cannot be set up from the roster.
    pub fn run(&self, seeds: &[u64], iterations: usize) -> Result<(SeriesSummary, Duration)> {
        let start = Instant::now();
        let mut records = Vec::with_capacity(seeds.len() * iterations);

        for &seed in seeds {
            for iteration in 0..iterations {
                let match_seed = seed.wrapping_add(u64::try_from(iteration).unwrap_or(u64::MAX));
                let result = self
                    .play_one(match_seed)
                    .with_context(|| format!("match with seed {match_seed} could not start"))?;
                if self.narrate {
                    println!("{}", result.score_sheet);
                }
                log::info!(
                    "seed {match_seed}: winner {} after {} turns",
                    result.winner.as_deref().unwrap_or("none"),
                    result.turns_played
                );
                records.push(MatchRecord {
                    seed: match_seed,
                    iteration,
                    result,
                });
            }
        }

        Ok((
            SeriesSummary::from_records(&self.roster, records),
            start.elapsed(),
        ))
    }

    /// Play a single match with the given dice seed.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty roster, duplicate names or an invalid
    /// config.
    pub fn play_one(&self, seed: u64) -> Result<MatchResult> {
        let config = MatchConfig {
            seed: Some(seed),
            ..self.config.clone()
        };
        let players = self.roster.iter().map(PlayerSpec::create_player).collect();
        let mut game = FarkleMatch::new(players, config)?;
        game.observe(Box::new(LogObserver));
        if self.narrate {
            println!("{}", format!("🎮 Match seed {seed}").bright_cyan());
            game.observe(Box::new(ConsoleNarrator::new(self.show_options)));
        }
        Ok(game.play())
    }
}
