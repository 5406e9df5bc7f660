//! Rule actions.
//!
//! Actions are the mutations a rule applies once its matches are retained:
//! score actions update a player's counter, board actions write or remove
//! stones. Both are serde types declared directly in datapacks.

use serde::{Deserialize, Serialize};

use crate::core::{ApplyError, PlayerId};
use crate::pattern::Match;
use crate::state::GameState;

use super::{resolve_player_index, LOCATION_CENTER};

/// Arithmetic applied by a score action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreOp {
    /// Replace the score with the value.
    Set,
    /// Add the value to the score.
    Add,
    /// Multiply the score by the value.
    Multiply,
}

impl ScoreOp {
    /// Apply the operation. Scores are clamped below at zero.
    #[must_use]
    pub fn apply(self, previous: i64, value: i64) -> i64 {
        let next = match self {
            ScoreOp::Set => value,
            ScoreOp::Add => previous + value,
            ScoreOp::Multiply => previous * value,
        };
        next.max(0)
    }
}

/// Update a player's score counter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreAction {
    /// Whose counter: `-2` active player, `-1` owner at center, `>= 0`
    /// owner of the stone at that match cell.
    pub player_index: i32,

    /// The qualified memo of the counter.
    pub memo: String,

    /// The arithmetic to apply.
    pub operation: ScoreOp,

    /// The operand.
    pub value: i64,
}

impl ScoreAction {
    /// Apply this action for one match.
    pub fn apply(
        &self,
        state: &mut GameState,
        m: &Match,
        active: PlayerId,
        name: &str,
    ) -> Result<(), ApplyError> {
        let player = resolve_player_index(state, m, self.player_index, active, name)?
            .ok_or_else(|| ApplyError::EmptyCellReference {
                name: name.to_string(),
                index: self.player_index,
                coord: m.center.clone(),
            })?;

        let previous = state.scores().get(&self.memo, player);
        let next = self.operation.apply(previous, self.value);
        state.scores_mut().set(&self.memo, player, next);
        Ok(())
    }
}

/// Write or remove a stone at a match cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardAction {
    /// Which cell: `-1` the center, `>= 0` that match cell.
    pub location_index: i32,

    /// What to write: `-3` remove, `-2` the active player, `-1` the owner
    /// at center (removal if the center was emptied earlier in the turn),
    /// `>= 0` the owner of the stone at that match cell.
    pub player_index: i32,
}

impl BoardAction {
    /// Apply this action for one match. Overwrites any existing stone.
    pub fn apply(
        &self,
        state: &mut GameState,
        m: &Match,
        active: PlayerId,
        name: &str,
    ) -> Result<(), ApplyError> {
        let player = resolve_player_index(state, m, self.player_index, active, name)?;
        let location = if self.location_index == LOCATION_CENTER {
            m.center.clone()
        } else {
            m.cells[self.location_index as usize].clone()
        };
        state.board_mut().set(&location, player);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::core::Coord;
    use crate::pattern::{find_matches, Pattern};

    fn capture_state() -> (GameState, Match) {
        // X O O X along the row at (9,9)..(9,12).
        let mut board = Board::new(&[19, 19]);
        board.set(&Coord::from([9, 9]), Some(PlayerId::new(0)));
        board.set(&Coord::from([9, 10]), Some(PlayerId::new(1)));
        board.set(&Coord::from([9, 11]), Some(PlayerId::new(1)));
        board.set(&Coord::from([9, 12]), Some(PlayerId::new(0)));
        let state = GameState::new(board, vec!["pente.captures".to_string()], 2);

        let pattern = Pattern::compile("[A]aaA").unwrap();
        let m = find_matches(&pattern, state.board(), &Coord::from([9, 9]))
            .into_iter()
            .next()
            .unwrap();
        (state, m)
    }

    #[test]
    fn test_score_op_arithmetic() {
        assert_eq!(ScoreOp::Set.apply(3, 7), 7);
        assert_eq!(ScoreOp::Add.apply(3, 2), 5);
        assert_eq!(ScoreOp::Multiply.apply(3, 4), 12);
    }

    #[test]
    fn test_score_op_clamps_at_zero() {
        assert_eq!(ScoreOp::Add.apply(2, -5), 0);
        assert_eq!(ScoreOp::Set.apply(10, -1), 0);
        assert_eq!(ScoreOp::Multiply.apply(3, -2), 0);
    }

    #[test]
    fn test_score_action_center_owner() {
        let (mut state, m) = capture_state();
        let action = ScoreAction {
            player_index: -1,
            memo: "pente.captures".to_string(),
            operation: ScoreOp::Add,
            value: 2,
        };

        action.apply(&mut state, &m, PlayerId::new(0), "t").unwrap();
        assert_eq!(state.scores().get("pente.captures", PlayerId::new(0)), 2);
        assert_eq!(state.scores().get("pente.captures", PlayerId::new(1)), 0);
    }

    #[test]
    fn test_score_action_empty_cell_is_datapack_error() {
        let (mut state, m) = capture_state();
        state.board_mut().set(&Coord::from([9, 10]), None);

        let action = ScoreAction {
            player_index: 1,
            memo: "pente.captures".to_string(),
            operation: ScoreOp::Add,
            value: 1,
        };
        let err = action
            .apply(&mut state, &m, PlayerId::new(0), "pente.capture")
            .unwrap_err();
        assert!(matches!(err, ApplyError::EmptyCellReference { index: 1, .. }));
    }

    #[test]
    fn test_board_action_remove() {
        let (mut state, m) = capture_state();
        let remove = BoardAction {
            location_index: 1,
            player_index: -3,
        };

        remove.apply(&mut state, &m, PlayerId::new(0), "t").unwrap();
        assert!(state.board().is_empty_at(&Coord::from([9, 10])));
        assert!(!state.board().is_empty_at(&Coord::from([9, 11])));
    }

    #[test]
    fn test_board_action_write_active_player() {
        let (mut state, m) = capture_state();
        let write = BoardAction {
            location_index: 1,
            player_index: -2,
        };

        write.apply(&mut state, &m, PlayerId::new(0), "t").unwrap();
        assert_eq!(
            state.board().get(&Coord::from([9, 10])),
            Some(PlayerId::new(0))
        );
    }

    #[test]
    fn test_board_action_center_location() {
        let (mut state, m) = capture_state();
        let clear_center = BoardAction {
            location_index: -1,
            player_index: -3,
        };

        clear_center
            .apply(&mut state, &m, PlayerId::new(0), "t")
            .unwrap();
        assert!(state.board().is_empty_at(&Coord::from([9, 9])));
    }

    #[test]
    fn test_action_serialization() {
        let json = r#"{"player_index": -1, "memo": "pente.captures", "operation": "add", "value": 2}"#;
        let action: ScoreAction = serde_json::from_str(json).unwrap();
        assert_eq!(action.operation, ScoreOp::Add);
        assert_eq!(action.value, 2);

        let json = r#"{"location_index": 2, "player_index": -3}"#;
        let action: BoardAction = serde_json::from_str(json).unwrap();
        assert_eq!(action.location_index, 2);
        assert_eq!(action.player_index, -3);
    }
}
