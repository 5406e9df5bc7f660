//! The merged ruleset and the turn pipeline.
//!
//! A [`Ruleset`] is the immutable product of loading a set of datapacks:
//! the board dimensions, the registered score specs, the top-level
//! restrictions, and the rules in their total execution order. It exposes
//! the whole engine API:
//!
//! - [`Ruleset::new_game`] - fresh state
//! - [`Ruleset::is_legal`] - pure legality check for a candidate move
//! - [`Ruleset::apply`] - resolve one turn, returning the next state
//!
//! A turn runs restrictions, places the stone, applies every rule in
//! order, then checks win thresholds. `apply` mutates a clone and returns
//! it, so any error leaves the caller's state untouched.

use tracing::debug;

use crate::core::{ApplyError, Coord, PlayerId};
use crate::board::Board;
use crate::rules::{Restriction, Rule, RulePriority};
use crate::score::ScoreSpec;
use crate::state::GameState;

/// A restriction with its qualified name and owning datapack.
#[derive(Clone, Debug)]
pub struct RegisteredRestriction {
    pub name: String,
    pub owner: String,
    pub restriction: Restriction,
}

/// A rule with its qualified name, owning datapack, and priority.
///
/// The priority is fixed at registration; overrides replace the rule body
/// but keep the original's place in the execution order.
#[derive(Clone, Debug)]
pub struct RegisteredRule {
    pub name: String,
    pub owner: String,
    pub priority: RulePriority,
    pub rule: Rule,
}

/// An immutable merged ruleset.
///
/// Built by [`load`]; free to share read-only once built.
///
/// [`load`]: crate::data::load
#[derive(Clone, Debug)]
pub struct Ruleset {
    display_name: String,
    dimensions: Vec<usize>,
    scores: Vec<ScoreSpec>,
    restrictions: Vec<RegisteredRestriction>,
    rules: Vec<RegisteredRule>,
    pack_order: Vec<String>,
}

impl Ruleset {
    pub(crate) fn new(
        display_name: String,
        dimensions: Vec<usize>,
        scores: Vec<ScoreSpec>,
        restrictions: Vec<RegisteredRestriction>,
        rules: Vec<RegisteredRule>,
        pack_order: Vec<String>,
    ) -> Self {
        Self {
            display_name,
            dimensions,
            scores,
            restrictions,
            rules,
            pack_order,
        }
    }

    /// Display names of the loaded packs, joined in load order.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Board dimensions, outermost axis first.
    #[must_use]
    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    /// Registered score specs, in registration order.
    #[must_use]
    pub fn scores(&self) -> &[ScoreSpec] {
        &self.scores
    }

    /// Top-level restrictions, in registration order.
    #[must_use]
    pub fn restrictions(&self) -> &[RegisteredRestriction] {
        &self.restrictions
    }

    /// Rules in execution order: priority bucket, then datapack load
    /// order, then declaration order.
    #[must_use]
    pub fn rules(&self) -> &[RegisteredRule] {
        &self.rules
    }

    /// The resolved datapack load order.
    #[must_use]
    pub fn pack_order(&self) -> &[String] {
        &self.pack_order
    }

    /// Start a new game with an empty board.
    #[must_use]
    pub fn new_game(&self, num_players: usize) -> GameState {
        let memos = self.scores.iter().map(|spec| spec.name.clone());
        GameState::new(Board::new(&self.dimensions), memos, num_players)
    }

    /// Whether the next player may move at `mv`.
    ///
    /// Pure: the state is never mutated, and two consecutive calls agree.
    /// Datapack authoring errors inside restriction evaluation read as
    /// "not legal" here; [`Ruleset::apply`] surfaces them as errors.
    #[must_use]
    pub fn is_legal(&self, state: &GameState, mv: &Coord) -> bool {
        if state.is_terminal() || self.validate_placement(state, mv).is_err() {
            return false;
        }
        let mover = state.next_player();
        let hypothetical = self.with_stone_placed(state, mv, mover);
        self.restrictions_hold(&hypothetical, mv, mover)
            .unwrap_or(false)
    }

    /// Resolve one turn: place the next player's stone at `mv`, run every
    /// rule, and check win thresholds.
    ///
    /// Returns the post-turn state; on any error the input state is
    /// untouched and no partial turn escapes.
    pub fn apply(&self, state: &GameState, mv: &Coord) -> Result<GameState, ApplyError> {
        if state.is_terminal() {
            return Err(ApplyError::GameOver);
        }
        self.validate_placement(state, mv)?;

        let mover = state.next_player();
        let mut next = self.with_stone_placed(state, mv, mover);

        if !self.restrictions_hold(&next, mv, mover)? {
            return Err(ApplyError::Restricted(mv.clone()));
        }

        for entry in &self.rules {
            entry.rule.invoke(&entry.name, &mut next, mv, mover)?;
        }

        next.set_winner(self.detect_winner(&next));
        if let Some(winner) = next.winner() {
            debug!(%winner, "game over");
        }

        Ok(next)
    }

    /// The winner recorded in a state, if the game has ended.
    #[must_use]
    pub fn winner(&self, state: &GameState) -> Option<PlayerId> {
        state.winner()
    }

    /// Scores with display names, paired with per-player values.
    #[must_use]
    pub fn displayable_scores(&self, state: &GameState) -> Vec<(String, Vec<i64>)> {
        self.scores
            .iter()
            .filter_map(|spec| {
                spec.display_name
                    .as_ref()
                    .map(|display| (display.clone(), state.scores().values_for(&spec.name)))
            })
            .collect()
    }

    /// Check thresholds against the state. First spec in registration
    /// order wins; among players exceeding it, the lowest id.
    pub(crate) fn detect_winner(&self, state: &GameState) -> Option<PlayerId> {
        let mut winner: Option<PlayerId> = None;
        for spec in &self.scores {
            let Some(threshold) = spec.threshold else {
                continue;
            };
            for player in PlayerId::all(state.num_players()) {
                if state.scores().get(&spec.name, player) > threshold
                    && winner.is_none_or(|best| player < best)
                {
                    winner = Some(player);
                }
            }
        }
        winner
    }

    /// Structural placement checks: arity, bounds, cell vacancy.
    fn validate_placement(&self, state: &GameState, mv: &Coord) -> Result<(), ApplyError> {
        if mv.ndim() != self.dimensions.len() {
            return Err(ApplyError::WrongDimensions {
                coord: mv.clone(),
                expected: self.dimensions.len(),
                found: mv.ndim(),
            });
        }
        if !state.board().in_bounds(mv) {
            return Err(ApplyError::OutOfBounds(mv.clone()));
        }
        if !state.board().is_empty_at(mv) {
            return Err(ApplyError::Occupied(mv.clone()));
        }
        Ok(())
    }

    /// Clone the state with the mover's stone placed and the turn handed
    /// over. Restrictions and rules both see this post-placement view.
    fn with_stone_placed(&self, state: &GameState, mv: &Coord, mover: PlayerId) -> GameState {
        let mut next = state.clone();
        next.set_active_player(Some(mover));
        next.board_mut().set(mv, Some(mover));
        next
    }

    /// Whether every top-level restriction holds.
    fn restrictions_hold(
        &self,
        state: &GameState,
        mv: &Coord,
        mover: PlayerId,
    ) -> Result<bool, ApplyError> {
        for entry in &self.restrictions {
            if !entry.restriction.holds(&entry.name, state, mv, mover)? {
                debug!(restriction = %entry.name, %mv, "move blocked");
                return Ok(false);
            }
        }
        Ok(true)
    }
}
