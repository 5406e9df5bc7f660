//! Match conditions.
//!
//! Conditions filter the matches a rule or restriction found before any
//! action runs. They are serde tagged unions so datapacks declare them
//! directly; the loader validates memo references and index ranges, the
//! evaluator here only reads state.

use serde::{Deserialize, Serialize};

use crate::core::{ApplyError, PlayerId};
use crate::pattern::Match;
use crate::state::GameState;

use super::resolve_player_index;

/// A condition on a single match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// Bound a player's score counter.
    ///
    /// The player is resolved from `player_index` against the match
    /// (`-2` active player, `-1` owner at center, `>= 0` owner at that
    /// match cell). At least one bound is present, enforced at load.
    Score {
        player_index: i32,
        memo: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        minimum: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        maximum: Option<i64>,
    },

    /// Bound the move's ordinates along the listed axes.
    ///
    /// Axes beyond the board's dimensionality are inert.
    Coords {
        axes: Vec<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        minimum: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        maximum: Option<i64>,
    },
}

impl Condition {
    /// Whether the condition accepts a match.
    ///
    /// `name` is the owning rule or restriction, for error reporting.
    pub fn evaluate(
        &self,
        state: &GameState,
        m: &Match,
        active: PlayerId,
        name: &str,
    ) -> Result<bool, ApplyError> {
        match self {
            Condition::Score {
                player_index,
                memo,
                minimum,
                maximum,
            } => {
                let player = resolve_player_index(state, m, *player_index, active, name)?
                    .ok_or_else(|| ApplyError::EmptyCellReference {
                        name: name.to_string(),
                        index: *player_index,
                        coord: m.center.clone(),
                    })?;
                let score = state.scores().get(memo, player);
                Ok(minimum.is_none_or(|min| score >= min)
                    && maximum.is_none_or(|max| score <= max))
            }

            Condition::Coords {
                axes,
                minimum,
                maximum,
            } => {
                for axis in 0..m.center.ndim() {
                    if !axes.contains(&axis) {
                        continue;
                    }
                    let ordinate = m.center.axis(axis) as i64;
                    if minimum.is_some_and(|min| ordinate < min)
                        || maximum.is_some_and(|max| ordinate > max)
                    {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }
}
