//! Die faces, dice multisets and the sources that produce rolls.
use std::collections::VecDeque;
use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::constants::{MAX_FACE, MIN_FACE};

/// Dice held inline; a roll never exceeds six dice.
pub type Dice = SmallVec<[DieFace; 6]>;

/// Errors raised when die values or selections are malformed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiceError {
    #[error("die face {0} is outside 1..=6")]
    FaceOutOfRange(u8),
    #[error("cannot set aside {face}: not present in the remaining dice")]
    NotInRoll { face: DieFace },
}

/// The value showing on top of a single die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DieFace(u8);

impl DieFace {
    pub const ONE: Self = Self(1);
    pub const FIVE: Self = Self(5);
    pub const ALL: [Self; 6] = [Self(1), Self(2), Self(3), Self(4), Self(5), Self(6)];

    /// Validate a raw face value.
    ///
    /// # Errors
    ///
    /// Returns [`DiceError::FaceOutOfRange`] for values outside 1..=6.
    pub const fn new(value: u8) -> Result<Self, DiceError> {
        if value >= MIN_FACE && value <= MAX_FACE {
            Ok(Self(value))
        } else {
            Err(DiceError::FaceOutOfRange(value))
        }
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Faces that score on their own (1s and 5s).
    #[must_use]
    pub const fn is_counter(self) -> bool {
        self.0 == 1 || self.0 == 5
    }
}

impl TryFrom<u8> for DieFace {
    type Error = DiceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DieFace> for u8 {
    fn from(face: DieFace) -> Self {
        face.0
    }
}

impl fmt::Display for DieFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Convert raw values into dice, rejecting anything that is not a face.
///
/// # Errors
///
/// Returns [`DiceError::FaceOutOfRange`] for the first invalid value.
pub fn parse_dice(values: &[u8]) -> Result<Dice, DiceError> {
    values.iter().copied().map(DieFace::new).collect()
}

/// Remove `selected` from `dice`, one die per selected face.
///
/// Neither input is modified; the remaining dice are returned in their
/// original order.
///
/// # Errors
///
/// Returns [`DiceError::NotInRoll`] if a selected face is not available.
pub fn set_aside(dice: &[DieFace], selected: &[DieFace]) -> Result<Dice, DiceError> {
    let mut remaining: Dice = dice.iter().copied().collect();
    for &face in selected {
        let idx = remaining
            .iter()
            .position(|&held| held == face)
            .ok_or(DiceError::NotInRoll { face })?;
        remaining.remove(idx);
    }
    Ok(remaining)
}

/// Space separated faces, e.g. `1 5 5`.
#[must_use]
pub fn format_dice(dice: &[DieFace]) -> String {
    dice.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Anything able to produce independent uniform die faces.
pub trait DiceSource {
    /// Roll `count` dice.
    fn roll(&mut self, count: u8) -> Dice;
}

/// Dice backed by a ChaCha stream so matches can be replayed from a seed.
#[derive(Debug, Clone)]
pub struct RandomDice {
    rng: ChaCha20Rng,
}

impl RandomDice {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_os_rng(),
        }
    }
}

impl DiceSource for RandomDice {
    fn roll(&mut self, count: u8) -> Dice {
        (0..count)
            .map(|_| DieFace(self.rng.random_range(MIN_FACE..=MAX_FACE)))
            .collect()
    }
}

/// Replays a fixed queue of rolls.
///
/// Scripted rolls longer than requested are truncated. When the script is
/// short or exhausted the missing dice come from a seeded [`RandomDice`].
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    script: VecDeque<Dice>,
    fallback: RandomDice,
}

impl ScriptedDice {
    pub fn new<I>(rolls: I) -> Self
    where
        I: IntoIterator<Item = Dice>,
    {
        Self {
            script: rolls.into_iter().collect(),
            fallback: RandomDice::from_seed(0),
        }
    }

    /// Build a script from raw face values.
    ///
    /// # Errors
    ///
    /// Returns [`DiceError::FaceOutOfRange`] if any value is not a face.
    pub fn from_values(rolls: &[&[u8]]) -> Result<Self, DiceError> {
        let parsed = rolls
            .iter()
            .map(|roll| parse_dice(roll))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(parsed))
    }

    /// Rolls still queued.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self, count: u8) -> Dice {
        let wanted = usize::from(count);
        let mut dice = self.script.pop_front().unwrap_or_default();
        dice.truncate(wanted);
        if dice.len() < wanted {
            let missing = u8::try_from(wanted - dice.len()).unwrap_or(0);
            dice.extend(self.fallback.roll(missing));
        }
        dice
    }
}
