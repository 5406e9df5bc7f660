//! The save-game document.
//!
//! A save is a plain JSON object: the board as nested integer arrays with
//! `-1` for empty cells, scores keyed by qualified memo, the player who
//! moved last (`-1` before the first move), and the names of the loaded
//! datapacks. Restoring validates the document against the ruleset it is
//! being loaded into; the winner is recomputed from thresholds rather
//! than trusted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::board::{Board, EMPTY};
use crate::core::{PlayerId, SaveError};
use crate::engine::Ruleset;
use crate::score::ScoreStore;
use crate::state::GameState;

fn default_num_players() -> usize {
    2
}

/// A serialized game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveDoc {
    /// Nested integer arrays matching the board's dimensionality.
    pub board: Value,

    /// Per-memo arrays of per-player values. Sorted keys keep the
    /// document byte-stable across runs.
    pub scores: BTreeMap<String, Vec<i64>>,

    #[serde(default = "default_num_players")]
    pub num_players: usize,

    /// The player who moved last; `-1` for none.
    pub active_player: i64,

    /// Names of the datapacks the game was created with, in load order.
    pub datapacks: Vec<String>,
}

impl SaveDoc {
    /// Serialize a game state.
    #[must_use]
    pub fn capture(ruleset: &Ruleset, state: &GameState) -> Self {
        let scores = ruleset
            .scores()
            .iter()
            .map(|spec| (spec.name.clone(), state.scores().values_for(&spec.name)))
            .collect();

        Self {
            board: nest_cells(state.board().dimensions(), state.board().cells()),
            scores,
            num_players: state.num_players(),
            active_player: state
                .active_player()
                .map_or(EMPTY, |player| player.index() as i64),
            datapacks: ruleset.pack_order().to_vec(),
        }
    }

    /// Rebuild a game state, validating the document against the ruleset.
    pub fn restore(&self, ruleset: &Ruleset) -> Result<GameState, SaveError> {
        if self.num_players == 0 || self.num_players > 255 {
            return Err(SaveError::InvalidPlayerCount(self.num_players));
        }
        if self.datapacks != ruleset.pack_order() {
            return Err(SaveError::DatapackMismatch {
                expected: ruleset.pack_order().to_vec(),
                found: self.datapacks.clone(),
            });
        }

        let found_shape = shape_of(&self.board)?;
        if found_shape != ruleset.dimensions() {
            return Err(SaveError::BoardShape {
                expected: ruleset.dimensions().to_vec(),
                found: found_shape,
            });
        }
        let mut cells = Vec::new();
        flatten_cells(&self.board, self.num_players, &mut cells)?;
        let board = Board::from_cells(ruleset.dimensions(), cells);

        let memos: Vec<String> = ruleset
            .scores()
            .iter()
            .map(|spec| spec.name.clone())
            .collect();
        let mut scores = ScoreStore::new(memos.iter().cloned(), self.num_players);
        for (memo, values) in &self.scores {
            if !memos.iter().any(|known| known == memo) {
                return Err(SaveError::UnknownMemo(memo.clone()));
            }
            if values.len() != self.num_players {
                return Err(SaveError::ScoreArity {
                    memo: memo.clone(),
                    expected: self.num_players,
                    found: values.len(),
                });
            }
            for (player, &value) in PlayerId::all(self.num_players).zip(values) {
                if value < 0 {
                    return Err(SaveError::NegativeScore {
                        memo: memo.clone(),
                        value,
                    });
                }
                scores.set(memo, player, value);
            }
        }

        let active_player = match self.active_player {
            EMPTY => None,
            index if index >= 0 && (index as usize) < self.num_players => {
                Some(PlayerId::new(index as u8))
            }
            other => return Err(SaveError::InvalidActivePlayer(other)),
        };

        let mut state = GameState::from_parts(
            board,
            scores,
            active_player,
            None,
            self.num_players,
        );
        state.set_winner(ruleset.detect_winner(&state));
        Ok(state)
    }
}

/// Row-major cells to nested arrays, outermost axis first.
fn nest_cells(dims: &[usize], cells: &[Option<PlayerId>]) -> Value {
    if dims.len() == 1 {
        Value::from(
            cells
                .iter()
                .map(|cell| cell.map_or(EMPTY, |player| player.index() as i64))
                .collect::<Vec<i64>>(),
        )
    } else {
        let chunk = cells.len() / dims[0];
        Value::from(
            cells
                .chunks(chunk)
                .map(|slice| nest_cells(&dims[1..], slice))
                .collect::<Vec<Value>>(),
        )
    }
}

/// The shape of a nested array, rejecting ragged or non-integer input.
fn shape_of(value: &Value) -> Result<Vec<usize>, SaveError> {
    match value {
        Value::Array(items) if !items.is_empty() => {
            if items.iter().all(Value::is_i64) {
                return Ok(vec![items.len()]);
            }
            let first = shape_of(&items[0])?;
            for item in &items[1..] {
                if shape_of(item)? != first {
                    return Err(SaveError::MalformedBoard);
                }
            }
            let mut shape = vec![items.len()];
            shape.extend(first);
            Ok(shape)
        }
        _ => Err(SaveError::MalformedBoard),
    }
}

/// Flatten nested arrays into row-major cells, validating every value.
fn flatten_cells(
    value: &Value,
    num_players: usize,
    out: &mut Vec<Option<PlayerId>>,
) -> Result<(), SaveError> {
    match value {
        Value::Array(items) => {
            for item in items {
                if let Some(cell) = item.as_i64() {
                    match cell {
                        EMPTY => out.push(None),
                        id if id >= 0 && (id as usize) < num_players => {
                            out.push(Some(PlayerId::new(id as u8)));
                        }
                        bad => return Err(SaveError::InvalidCell(bad)),
                    }
                } else {
                    flatten_cells(item, num_players, out)?;
                }
            }
            Ok(())
        }
        _ => Err(SaveError::MalformedBoard),
    }
}
