//! Rules, restrictions, and the pieces they share.
//!
//! A rule watches for a pattern around the move just played and applies
//! score and board actions to every retained match. A restriction is a
//! rule-shaped check that can only accept or reject the move. Both filter
//! their matches through the same condition types, and both resolve
//! "player index" references the same way.

pub mod action;
pub mod condition;
pub mod restriction;
pub mod rule;

pub use action::{BoardAction, ScoreAction, ScoreOp};
pub use condition::Condition;
pub use restriction::{DisjunctionRestriction, PatternRestriction, Restriction};
pub use rule::{MultimatchMode, Rule, RulePriority};

use crate::core::{ApplyError, PlayerId};
use crate::pattern::Match;
use crate::state::GameState;

/// Rogue player-index value meaning "remove the stone" (board actions only).
pub const PLAYER_REMOVE: i32 = -3;
/// Rogue player-index value meaning "the active player".
pub const PLAYER_ACTIVE: i32 = -2;
/// Rogue player-index value meaning "the owner of the center stone".
pub const PLAYER_AT_CENTER: i32 = -1;

/// Rogue location-index value meaning "the center cell".
pub const LOCATION_CENTER: i32 = -1;

/// Resolve a datapack player index against a match.
///
/// `Ok(None)` means "no player": either the explicit remove value, or an
/// empty center referenced by `-1`. A non-negative index naming an empty
/// cell is a datapack authoring error: the pattern was supposed to
/// guarantee a stone there.
pub(crate) fn resolve_player_index(
    state: &GameState,
    m: &Match,
    index: i32,
    active: PlayerId,
    name: &str,
) -> Result<Option<PlayerId>, ApplyError> {
    match index {
        PLAYER_REMOVE => Ok(None),
        PLAYER_ACTIVE => Ok(Some(active)),
        PLAYER_AT_CENTER => Ok(state.board().get(&m.center)),
        i if i >= 0 => {
            let coord = &m.cells[i as usize];
            match state.board().get(coord) {
                Some(player) => Ok(Some(player)),
                None => Err(ApplyError::EmptyCellReference {
                    name: name.to_string(),
                    index,
                    coord: coord.clone(),
                }),
            }
        }
        // The loader rejects indices below the smallest rogue value.
        _ => unreachable!("player index {index} validated at load"),
    }
}
