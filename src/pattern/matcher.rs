//! Pattern matching against the board.
//!
//! Given a compiled pattern, a board, and the coordinate of the move being
//! resolved, the matcher enumerates every admissible match that contains the
//! move. Enumeration order is the determinism contract: orientations in
//! canonical order, then anchor placements in ascending pattern-index order.
//! No `(orientation, anchor)` pair is ever emitted twice.

use rustc_hash::FxHashSet;

use crate::board::{orientations, Board};
use crate::core::{Coord, PlayerId};

use super::{CellPredicate, Pattern};

/// Letter-to-player bindings established during a match attempt.
///
/// A small fixed array keyed by letter index; patterns use at most 26
/// letters by construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AliasBindings {
    slots: [Option<PlayerId>; 26],
}

impl AliasBindings {
    fn new() -> Self {
        Self { slots: [None; 26] }
    }

    /// The player bound to a letter (0 = `A`), if any.
    #[must_use]
    pub fn get(&self, letter: u8) -> Option<PlayerId> {
        self.slots[letter as usize]
    }

    /// Bind a letter, or verify an existing binding. Returns false on
    /// conflict.
    fn bind(&mut self, letter: u8, player: PlayerId) -> bool {
        match self.slots[letter as usize] {
            None => {
                self.slots[letter as usize] = Some(player);
                true
            }
            Some(bound) => bound == player,
        }
    }
}

impl Default for AliasBindings {
    fn default() -> Self {
        Self::new()
    }
}

/// A concrete instantiation of a pattern on the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    /// Index into the canonical orientation table.
    pub orientation: usize,

    /// Coordinate of the first pattern cell.
    pub anchor: Coord,

    /// Coordinate of the cell the move occupies.
    pub center: Coord,

    /// Coordinates of every pattern cell, in pattern order.
    pub cells: Vec<Coord>,

    /// Letter bindings established by this match.
    pub bindings: AliasBindings,
}

impl Match {
    /// Whether another match covers the same cells in reverse order.
    ///
    /// Both matches lie on the same line through the center, so reversed
    /// cell-sequence equality is exactly cell-set equality.
    #[must_use]
    pub fn is_reverse_of(&self, other: &Match) -> bool {
        self.cells.len() == other.cells.len()
            && self.cells.iter().rev().eq(other.cells.iter())
    }
}

/// Enumerate all matches of `pattern` on `board` that contain `mv`.
///
/// For each orientation `v` and each admissible interpretation of the move
/// as the `i`-th pattern cell, the candidate window is `mv + (k - i) * v`
/// for `k` in `0..len`. Windows that leave the board are rejected. When the
/// pattern fixes a center only `i = center` is tried.
#[must_use]
pub fn find_matches(pattern: &Pattern, board: &Board, mv: &Coord) -> Vec<Match> {
    let table = orientations(board.ndim());
    let len = pattern.len();
    let mut matches = Vec::new();
    let mut seen: FxHashSet<(usize, Coord)> = FxHashSet::default();

    let anchors: Vec<usize> = match pattern.center() {
        Some(center) => vec![center],
        None => (0..len).collect(),
    };

    for (orientation, step) in table.iter().enumerate() {
        for &i in &anchors {
            let Some(cells) = window(board, mv, step, i, len) else {
                continue;
            };
            let Some(bindings) = check_window(pattern, board, &cells) else {
                continue;
            };

            // A pattern cannot match twice at the same (orientation, anchor).
            if !seen.insert((orientation, cells[0].clone())) {
                continue;
            }

            matches.push(Match {
                orientation,
                anchor: cells[0].clone(),
                center: mv.clone(),
                cells,
                bindings,
            });
        }
    }

    matches
}

/// Compute the window of cell coordinates, or None if it leaves the board.
fn window(board: &Board, mv: &Coord, step: &[i8], i: usize, len: usize) -> Option<Vec<Coord>> {
    let dims = board.dimensions();
    (0..len)
        .map(|k| mv.stepped(step, k as i64 - i as i64, dims))
        .collect()
}

/// Check every predicate against the window, producing the alias bindings.
///
/// Two passes: the first handles `.`/`-`/`#` and binds uppercase letters,
/// the second verifies lowercase inequalities. Lowercase cells may precede
/// their uppercase partner in the pattern, so inequality cannot be checked
/// until all bindings are established.
fn check_window(pattern: &Pattern, board: &Board, cells: &[Coord]) -> Option<AliasBindings> {
    let mut bindings = AliasBindings::new();

    for (predicate, coord) in pattern.cells().iter().zip(cells) {
        let stone = board.get(coord);
        match predicate {
            CellPredicate::Any => {}
            CellPredicate::Empty => {
                if stone.is_some() {
                    return None;
                }
            }
            CellPredicate::AnyStone | CellPredicate::Opposite(_) => {
                stone?;
            }
            CellPredicate::Same(letter) => {
                if !bindings.bind(*letter, stone?) {
                    return None;
                }
            }
        }
    }

    for (predicate, coord) in pattern.cells().iter().zip(cells) {
        if let CellPredicate::Opposite(letter) = predicate {
            // The uppercase partner exists by compile-time validation, and
            // every uppercase cell binds in the first pass.
            let bound = bindings.get(*letter)?;
            if board.get(coord) == Some(bound) {
                return None;
            }
        }
    }

    Some(bindings)
}
