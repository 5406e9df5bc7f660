//! The board: an N-dimensional grid plus the orientation tables patterns
//! are matched along.

pub mod grid;
pub mod orientation;

pub use grid::{Board, EMPTY};
pub use orientation::{orientations, reverse_index, Step};
