//! Score counters.
//!
//! ## ScoreSpec
//!
//! A declared score counter: its qualified memo, an optional display name,
//! and an optional win threshold. Specs live in the ruleset.
//!
//! ## ScoreStore
//!
//! Per-player integer values for every registered memo, defaulting to 0.
//! Values never drop below zero; the clamp is applied by [`ScoreOp`]
//! before a value reaches the store, and the store enforces it again on
//! direct writes.
//!
//! [`ScoreOp`]: crate::rules::ScoreOp

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, PlayerMap};

/// A score counter declaration, as it appears in a datapack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSpec {
    /// Qualified memo, e.g. `pente.captures`.
    pub name: String,

    /// Shown to players when present; purely-internal counters omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// When present, the first player whose value strictly exceeds this
    /// wins the game.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<i64>,
}

/// Per-player score values keyed by qualified memo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreStore {
    values: FxHashMap<String, PlayerMap<i64>>,
    num_players: usize,
}

impl ScoreStore {
    /// Create a store with every memo zeroed for every player.
    #[must_use]
    pub fn new(memos: impl IntoIterator<Item = String>, num_players: usize) -> Self {
        let values = memos
            .into_iter()
            .map(|memo| (memo, PlayerMap::with_value(num_players, 0)))
            .collect();
        Self {
            values,
            num_players,
        }
    }

    /// Number of players the store tracks.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.num_players
    }

    /// A player's value for a memo; 0 if never set.
    #[must_use]
    pub fn get(&self, memo: &str, player: PlayerId) -> i64 {
        self.values
            .get(memo)
            .map_or(0, |per_player| per_player[player])
    }

    /// Write a player's value for a memo, clamped below at zero.
    pub fn set(&mut self, memo: &str, player: PlayerId, value: i64) {
        let per_player = self
            .values
            .entry(memo.to_string())
            .or_insert_with(|| PlayerMap::with_value(self.num_players, 0));
        per_player[player] = value.max(0);
    }

    /// All players' values for a memo, ordered by player index.
    ///
    /// Memos that were never written read as all zeros.
    #[must_use]
    pub fn values_for(&self, memo: &str) -> Vec<i64> {
        self.values
            .get(memo)
            .map_or_else(|| vec![0; self.num_players], |map| map.as_slice().to_vec())
    }
}
