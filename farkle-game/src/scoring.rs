//! Scoring engine: every legal way to score a roll.
//!
//! Special patterns (straight, two triples, three pairs, four of a kind with
//! a pair) are detected on the whole roll. Otherwise the lowest run of the
//! sorted roll decides: a run of three or more is scored as n-of-a-kind,
//! shorter runs contribute their 1s and 5s and the rest of the roll is
//! scored recursively and merged.
use serde::{Deserialize, Serialize};

use crate::constants::{
    FIVE_KIND_POINTS, FOUR_KIND_POINTS, FOUR_KIND_WITH_PAIR_POINTS, SINGLE_FIVE_POINTS,
    SINGLE_ONE_POINTS, SIX_KIND_POINTS, STRAIGHT_POINTS, THREE_PAIRS_POINTS,
    TRIPLE_FACE_MULTIPLIER, TRIPLE_ONES_POINTS, TWO_TRIPLES_POINTS,
};
use crate::dice::{Dice, DieFace};
use crate::histogram::Histogram;

/// One legal way to score part of a roll.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Scoring {
    pub points: u32,
    /// Dice set aside for these points, ascending.
    pub dice: Dice,
}

impl Scoring {
    #[must_use]
    pub fn new(points: u32, mut dice: Dice) -> Self {
        dice.sort_unstable();
        Self { points, dice }
    }

    fn repeated(points: u32, face: DieFace, count: u8) -> Self {
        Self::new(points, std::iter::repeat_n(face, usize::from(count)).collect())
    }

    /// Number of dice this scoring consumes.
    #[must_use]
    pub fn dice_used(&self) -> u8 {
        u8::try_from(self.dice.len()).unwrap_or(u8::MAX)
    }

    fn combine(&self, other: &Self) -> Self {
        let mut dice = self.dice.clone();
        dice.extend(other.dice.iter().copied());
        Self::new(self.points + other.points, dice)
    }
}

/// All scorings for a single roll, highest points first. Empty means Farkle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RollOutcome(Vec<Scoring>);

impl RollOutcome {
    #[must_use]
    pub fn is_farkle(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Scoring> {
        self.0.get(index)
    }

    /// The highest scoring option.
    #[must_use]
    pub fn best(&self) -> Option<&Scoring> {
        self.0.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scoring> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Scoring] {
        &self.0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Scoring> {
        self.0
    }
}

impl<'a> IntoIterator for &'a RollOutcome {
    type Item = &'a Scoring;
    type IntoIter = std::slice::Iter<'a, Scoring>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Enumerate every legal scoring of `dice`.
///
/// Identical `(points, dice)` pairs are reported once and the result is
/// ordered by points descending. An empty roll yields an empty outcome.
#[must_use]
pub fn scorings_for(dice: &[DieFace]) -> RollOutcome {
    let mut sorted: Dice = dice.iter().copied().collect();
    sorted.sort_unstable();

    let mut scorings = candidate_scorings(&sorted);
    scorings.sort_unstable_by(|a, b| b.cmp(a));
    scorings.dedup();
    RollOutcome(scorings)
}

/// Points for `count` matching dice of `face`, 3 through 6.
#[must_use]
pub fn kind_points(face: DieFace, count: u8) -> u32 {
    match count {
        3 if face == DieFace::ONE => TRIPLE_ONES_POINTS,
        3 => u32::from(face.value()) * TRIPLE_FACE_MULTIPLIER,
        4 => FOUR_KIND_POINTS,
        5 => FIVE_KIND_POINTS,
        6 => SIX_KIND_POINTS,
        _ => 0,
    }
}

fn candidate_scorings(sorted: &[DieFace]) -> Vec<Scoring> {
    let Some(&lowest) = sorted.first() else {
        return Vec::new();
    };

    if sorted.len() == 1 {
        return counter_scorings(lowest, 1);
    }

    let hist = Histogram::of(sorted);
    let whole = || Dice::from_slice(sorted);
    let mut scorings = Vec::new();

    if hist.faces_with_count(1) == 6 {
        scorings.push(Scoring::new(STRAIGHT_POINTS, whole()));
        scorings.extend(merge(
            &counter_scorings(DieFace::ONE, 1),
            &counter_scorings(DieFace::FIVE, 1),
        ));
    } else if hist.faces_with_count(3) == 2 {
        scorings.push(Scoring::new(TWO_TRIPLES_POINTS, whole()));
        for face in hist.faces_with(3) {
            scorings.extend(kind_scorings(face, 3));
        }
        scorings.extend(held_counters(&hist));
    } else if hist.faces_with_count(2) == 3 {
        scorings.push(Scoring::new(THREE_PAIRS_POINTS, whole()));
        scorings.extend(held_counters(&hist));
    } else if let (Some(quad), Some(_)) = (
        hist.first_face_with_count(4),
        hist.first_face_with_count(2),
    ) {
        scorings.push(Scoring::new(FOUR_KIND_WITH_PAIR_POINTS, whole()));
        scorings.extend(kind_scorings(quad, 4));
        scorings.extend(held_counters(&hist));
    } else {
        let run = hist.count(lowest);
        if run >= 3 {
            scorings.extend(kind_scorings(lowest, run));
            scorings.extend(held_counters(&hist));
        } else {
            let head = if lowest.is_counter() {
                counter_scorings(lowest, run)
            } else {
                Vec::new()
            };
            let tail = scorings_for(&sorted[usize::from(run)..]).into_vec();
            scorings = merge(&head, &tail);
        }
    }

    scorings
}

/// Cumulative n-of-a-kind scorings for 3 up to `count` dice of `face`.
fn kind_scorings(face: DieFace, count: u8) -> Vec<Scoring> {
    (3..=count.min(6))
        .map(|k| Scoring::repeated(kind_points(face, k), face, k))
        .collect()
}

/// Cumulative single-die scorings for 1..=`count` dice showing a 1 or 5.
fn counter_scorings(face: DieFace, count: u8) -> Vec<Scoring> {
    let each = match face {
        DieFace::ONE => SINGLE_ONE_POINTS,
        DieFace::FIVE => SINGLE_FIVE_POINTS,
        _ => return Vec::new(),
    };
    (1..=count)
        .map(|k| Scoring::repeated(each * u32::from(k), face, k))
        .collect()
}

fn held_counters(hist: &Histogram) -> Vec<Scoring> {
    let mut scorings = counter_scorings(DieFace::ONE, hist.count(DieFace::ONE));
    scorings.extend(counter_scorings(DieFace::FIVE, hist.count(DieFace::FIVE)));
    scorings
}

/// Union of both sides plus every pairing of one scoring from each side.
fn merge(left: &[Scoring], right: &[Scoring]) -> Vec<Scoring> {
    let mut merged = Vec::with_capacity(left.len() + right.len() + left.len() * right.len());
    merged.extend_from_slice(left);
    merged.extend_from_slice(right);
    for a in left {
        for b in right {
            merged.push(a.combine(b));
        }
    }
    merged
}
