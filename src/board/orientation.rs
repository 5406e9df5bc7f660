//! Orientation enumeration.
//!
//! An orientation is a non-zero step vector in `{-1, 0, 1}^N`. Patterns are
//! matched along every orientation in turn, so their order is part of the
//! engine's determinism contract: ascending lexicographic order of the step
//! vector, with axis 0 most significant and `-1 < 0 < 1`. For a 2-D board
//! this yields 8 orientations, the first pointing toward the top-left.
//!
//! The table for each dimension count is computed once and memoized.

use std::sync::{Arc, Mutex, OnceLock};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// A single step vector, one entry per board axis.
pub type Step = SmallVec<[i8; 4]>;

static TABLES: OnceLock<Mutex<FxHashMap<usize, Arc<[Step]>>>> = OnceLock::new();

/// The canonical orientation table for an `ndim`-dimensional board.
///
/// Contains `3^ndim - 1` entries in ascending lexicographic order.
#[must_use]
pub fn orientations(ndim: usize) -> Arc<[Step]> {
    assert!(ndim > 0, "Orientations require at least one axis");

    let tables = TABLES.get_or_init(|| Mutex::new(FxHashMap::default()));
    let mut tables = tables.lock().unwrap_or_else(|poison| poison.into_inner());
    Arc::clone(
        tables
            .entry(ndim)
            .or_insert_with(|| enumerate(ndim).into()),
    )
}

/// The index of the orientation `-v` given the index of `v`.
///
/// Lexicographic order is reversed by negation, so the table is symmetric
/// around its middle once the zero vector is removed.
#[must_use]
pub const fn reverse_index(index: usize, count: usize) -> usize {
    count - 1 - index
}

fn enumerate(ndim: usize) -> Vec<Step> {
    let total = 3usize.pow(ndim as u32);
    let mut steps = Vec::with_capacity(total - 1);

    for mut code in 0..total {
        // Decode `code` as an ndim-digit ternary number, most significant
        // digit first, mapping digits 0,1,2 to -1,0,1.
        let mut step: Step = SmallVec::from_elem(0, ndim);
        for axis in (0..ndim).rev() {
            step[axis] = (code % 3) as i8 - 1;
            code /= 3;
        }
        if step.iter().any(|&d| d != 0) {
            steps.push(step);
        }
    }

    steps
}
