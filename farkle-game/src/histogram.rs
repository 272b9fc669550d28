//! Face tallies for a roll.
use crate::dice::DieFace;

/// Occurrences of each face 1..=6 in a roll. Returned by value per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Histogram {
    counts: [u8; 6],
}

impl Histogram {
    #[must_use]
    pub fn of(dice: &[DieFace]) -> Self {
        let mut counts = [0u8; 6];
        for face in dice {
            counts[usize::from(face.value() - 1)] += 1;
        }
        Self { counts }
    }

    #[must_use]
    pub const fn count(&self, face: DieFace) -> u8 {
        self.counts[(face.value() - 1) as usize]
    }

    /// Counts ordered by face, index 0 holding the 1s.
    #[must_use]
    pub const fn counts(&self) -> [u8; 6] {
        self.counts
    }

    /// Number of distinct faces appearing exactly `n` times.
    #[must_use]
    pub fn faces_with_count(&self, n: u8) -> usize {
        self.counts.iter().filter(|&&count| count == n).count()
    }

    /// Lowest face appearing exactly `n` times.
    #[must_use]
    pub fn first_face_with_count(&self, n: u8) -> Option<DieFace> {
        self.faces_with(n).next()
    }

    /// Faces appearing exactly `n` times, ascending.
    pub fn faces_with(&self, n: u8) -> impl Iterator<Item = DieFace> + '_ {
        DieFace::ALL
            .into_iter()
            .filter(move |&face| self.count(face) == n)
    }
}

/// Tally the faces of `dice`.
#[must_use]
pub fn histogram(dice: &[DieFace]) -> Histogram {
    Histogram::of(dice)
}
