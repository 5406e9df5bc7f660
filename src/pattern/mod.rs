//! Pattern compilation.
//!
//! A pattern is a 1-D string of cell predicates matched along a line of the
//! board in some orientation:
//!
//! - `.` matches any cell
//! - `-` matches an empty cell
//! - `#` matches any stone
//! - `A`-`Z` matches a stone and binds the letter to its player; repeated
//!   uses of the same letter must match the same player
//! - `a`-`z` matches a stone belonging to a *different* player than the
//!   binding of the corresponding uppercase letter
//! - `[x]` marks the cell that must coincide with the move being resolved;
//!   at most one center may appear. A pattern without a center may anchor
//!   the move at any of its cells.
//!
//! Compilation validates the string once at load time so the matcher never
//! re-parses. A lowercase letter whose uppercase partner never appears is
//! rejected here: its inequality constraint would be unsatisfiable to even
//! state.

pub mod matcher;

pub use matcher::{find_matches, AliasBindings, Match};

use thiserror::Error;

/// A malformed pattern string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The empty pattern cannot contain the move.
    #[error("pattern is empty")]
    Empty,

    /// More than one `[x]` center marker.
    #[error("pattern has more than one center")]
    MultipleCenters,

    /// A `[` not followed by exactly one predicate and `]`.
    #[error("unterminated center marker")]
    UnterminatedCenter,

    /// A character that is not a predicate or center bracket.
    #[error("invalid pattern character '{0}'")]
    InvalidChar(char),

    /// A lowercase letter with no uppercase partner in the pattern.
    #[error("lowercase '{0}' has no uppercase partner")]
    UnpairedLowercase(char),
}

/// A single compiled cell predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellPredicate {
    /// `.` - always matches.
    Any,
    /// `-` - matches an empty cell.
    Empty,
    /// `#` - matches any stone.
    AnyStone,
    /// An uppercase letter: matches a stone, binding the letter (0-25).
    Same(u8),
    /// A lowercase letter: matches a stone of a player other than the
    /// corresponding uppercase binding.
    Opposite(u8),
}

impl CellPredicate {
    fn from_char(c: char) -> Result<Self, PatternError> {
        match c {
            '.' => Ok(Self::Any),
            '-' => Ok(Self::Empty),
            '#' => Ok(Self::AnyStone),
            'A'..='Z' => Ok(Self::Same(c as u8 - b'A')),
            'a'..='z' => Ok(Self::Opposite(c as u8 - b'a')),
            other => Err(PatternError::InvalidChar(other)),
        }
    }
}

/// A compiled pattern: a dense predicate sequence plus center metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    cells: Vec<CellPredicate>,
    center: Option<usize>,
    source: String,
}

impl Pattern {
    /// Compile a pattern string.
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let mut cells = Vec::with_capacity(source.len());
        let mut center = None;

        let mut chars = source.chars();
        while let Some(c) = chars.next() {
            if c == '[' {
                if center.is_some() {
                    return Err(PatternError::MultipleCenters);
                }
                let predicate = chars.next().ok_or(PatternError::UnterminatedCenter)?;
                if predicate == ']' {
                    return Err(PatternError::UnterminatedCenter);
                }
                if chars.next() != Some(']') {
                    return Err(PatternError::UnterminatedCenter);
                }
                center = Some(cells.len());
                cells.push(CellPredicate::from_char(predicate)?);
            } else if c == ']' {
                return Err(PatternError::InvalidChar(']'));
            } else {
                cells.push(CellPredicate::from_char(c)?);
            }
        }

        if cells.is_empty() {
            return Err(PatternError::Empty);
        }

        // Every inequality constraint needs an uppercase partner to bind.
        for cell in &cells {
            if let CellPredicate::Opposite(letter) = cell {
                let paired = cells
                    .iter()
                    .any(|c| matches!(c, CellPredicate::Same(l) if l == letter));
                if !paired {
                    return Err(PatternError::UnpairedLowercase((letter + b'a') as char));
                }
            }
        }

        Ok(Self {
            cells,
            center,
            source: source.to_string(),
        })
    }

    /// The predicate sequence.
    #[must_use]
    pub fn cells(&self) -> &[CellPredicate] {
        &self.cells
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Compiled patterns are never empty, but the conventional pair exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Index of the cell that must coincide with the move, if fixed.
    #[must_use]
    pub fn center(&self) -> Option<usize> {
        self.center
    }

    /// The original pattern string.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl std::str::FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}
