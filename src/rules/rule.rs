//! Rules: pattern-triggered actions applied after each move.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{orientations, reverse_index};
use crate::core::{ApplyError, Coord, PlayerId};
use crate::pattern::{find_matches, Match, Pattern};
use crate::state::GameState;

use super::{BoardAction, Condition, ScoreAction};

/// Execution priority of a rule.
///
/// Buckets execute in declaration order below; within a bucket, rules run
/// in datapack load order, then declaration order within a datapack.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RulePriority {
    Earliest,
    Earlier,
    Early,
    #[default]
    Default,
    Late,
    Later,
    Latest,
}

/// How many matches of a rule's pattern are applied per turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultimatchMode {
    /// Only the first match in enumeration order.
    One,
    /// All matches, except reverse-orientation duplicates: a match at
    /// orientation `-v` covering the same cells as an already-retained
    /// match at `v` is dropped.
    #[default]
    Half,
    /// Every match.
    All,
}

/// A rule: a pattern plus the conditions and actions attached to it.
///
/// Patterns arrive compiled; the loader built this from a `RuleDoc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    /// The pattern matched around the move.
    pub pattern: Pattern,

    /// How many matches to retain.
    pub multimatch: MultimatchMode,

    /// Conditions every retained match must satisfy.
    pub conditions: Vec<Condition>,

    /// Score actions, applied for every retained match before any board
    /// action runs.
    pub score_actions: Vec<ScoreAction>,

    /// Board actions, applied after all score actions.
    pub board_actions: Vec<BoardAction>,

    /// If set, the rule only fires on this player's turns.
    pub active_player: Option<PlayerId>,
}

impl Rule {
    /// Apply this rule for the move at `mv`. Returns whether it fired.
    ///
    /// Matches are collected against the current board, filtered by the
    /// conditions, thinned by the multimatch mode, and then actions run in
    /// two phases: every score action for every retained match first, then
    /// every board action. The board therefore never changes between the
    /// score computations of a single rule; later rules do see this rule's
    /// board mutations.
    pub fn invoke(
        &self,
        name: &str,
        state: &mut GameState,
        mv: &Coord,
        active: PlayerId,
    ) -> Result<bool, ApplyError> {
        if self.active_player.is_some_and(|p| p != active) {
            return Ok(false);
        }

        let retained = self.retained_matches(name, state, mv, active)?;
        if retained.is_empty() {
            return Ok(false);
        }

        debug!(rule = name, matches = retained.len(), "rule fired");

        for m in &retained {
            for action in &self.score_actions {
                action.apply(state, m, active, name)?;
            }
        }
        for m in &retained {
            for action in &self.board_actions {
                action.apply(state, m, active, name)?;
            }
        }

        Ok(true)
    }

    /// Collect, filter, and thin this rule's matches without acting on them.
    pub fn retained_matches(
        &self,
        name: &str,
        state: &GameState,
        mv: &Coord,
        active: PlayerId,
    ) -> Result<Vec<Match>, ApplyError> {
        let orientation_count = orientations(state.board().ndim()).len();
        let mut retained: Vec<Match> = Vec::new();

        'matches: for m in find_matches(&self.pattern, state.board(), mv) {
            for condition in &self.conditions {
                if !condition.evaluate(state, &m, active, name)? {
                    continue 'matches;
                }
            }

            match self.multimatch {
                MultimatchMode::One => {
                    retained.push(m);
                    break;
                }
                MultimatchMode::All => retained.push(m),
                MultimatchMode::Half => {
                    let reverse = reverse_index(m.orientation, orientation_count);
                    let duplicate = retained
                        .iter()
                        .any(|kept| kept.orientation == reverse && kept.is_reverse_of(&m));
                    if !duplicate {
                        retained.push(m);
                    }
                }
            }
        }

        Ok(retained)
    }
}
