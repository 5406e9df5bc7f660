//! Board coordinates.
//!
//! A coordinate is a tuple of non-negative ordinates, one per board axis.
//! Axis 0 is the outermost (vertical for a 2-D board). Boards are 2-4
//! dimensional in practice, so coordinates are stored inline.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A position on an N-dimensional board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord(SmallVec<[usize; 4]>);

impl Coord {
    /// Create a coordinate from its ordinates.
    #[must_use]
    pub fn new(ordinates: impl IntoIterator<Item = usize>) -> Self {
        Self(ordinates.into_iter().collect())
    }

    /// Number of axes.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// The ordinate along one axis.
    #[must_use]
    pub fn axis(&self, axis: usize) -> usize {
        self.0[axis]
    }

    /// View the ordinates as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Offset this coordinate by `factor` steps along `step`, staying inside
    /// a board of the given dimensions.
    ///
    /// Returns `None` if any resulting ordinate would leave the board.
    /// Out-of-bounds positions never match ("stop" topology).
    #[must_use]
    pub fn stepped(&self, step: &[i8], factor: i64, dims: &[usize]) -> Option<Coord> {
        debug_assert_eq!(self.ndim(), step.len());
        debug_assert_eq!(self.ndim(), dims.len());

        let mut out = SmallVec::with_capacity(self.ndim());
        for axis in 0..self.ndim() {
            let ordinate = self.0[axis] as i64 + factor * step[axis] as i64;
            if ordinate < 0 || ordinate >= dims[axis] as i64 {
                return None;
            }
            out.push(ordinate as usize);
        }
        Some(Coord(out))
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, ordinate) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{ordinate}")?;
        }
        write!(f, ")")
    }
}

impl From<&[usize]> for Coord {
    fn from(ordinates: &[usize]) -> Self {
        Self(ordinates.iter().copied().collect())
    }
}

impl<const N: usize> From<[usize; N]> for Coord {
    fn from(ordinates: [usize; N]) -> Self {
        Self(ordinates.into_iter().collect())
    }
}

impl From<Vec<usize>> for Coord {
    fn from(ordinates: Vec<usize>) -> Self {
        Self(ordinates.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_basics() {
        let c = Coord::from([3, 4]);
        assert_eq!(c.ndim(), 2);
        assert_eq!(c.axis(0), 3);
        assert_eq!(c.axis(1), 4);
        assert_eq!(format!("{}", c), "(3, 4)");
    }

    #[test]
    fn test_stepped_in_bounds() {
        let c = Coord::from([3, 4]);
        let stepped = c.stepped(&[-1, 1], 2, &[19, 19]).unwrap();
        assert_eq!(stepped, Coord::from([1, 6]));
    }

    #[test]
    fn test_stepped_negative_factor() {
        let c = Coord::from([3, 4]);
        let stepped = c.stepped(&[0, 1], -3, &[19, 19]).unwrap();
        assert_eq!(stepped, Coord::from([3, 1]));
    }

    #[test]
    fn test_stepped_out_of_bounds() {
        let c = Coord::from([1, 0]);
        assert!(c.stepped(&[-1, 0], 2, &[19, 19]).is_none());
        assert!(c.stepped(&[0, -1], 1, &[19, 19]).is_none());
        assert!(c.stepped(&[1, 0], 18, &[19, 19]).is_none());
    }

    #[test]
    fn test_stepped_three_dimensions() {
        let c = Coord::from([2, 2, 2]);
        let stepped = c.stepped(&[1, -1, 0], 2, &[5, 5, 5]).unwrap();
        assert_eq!(stepped, Coord::from([4, 0, 2]));
    }

    #[test]
    fn test_coord_serialization() {
        let c = Coord::from([7, 0, 12]);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "[7,0,12]");
        let back: Coord = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
