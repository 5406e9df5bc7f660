//! Mutable game state.
//!
//! Everything that changes during play: the board, the score store, whose
//! move was last, and the winner once the game ends. The loaded ruleset is
//! deliberately *not* part of the state; it is immutable and shared.
//!
//! State only mutates inside [`Ruleset::apply`], which works on a clone and
//! returns it, so a failed turn never leaves a half-applied state behind.
//!
//! [`Ruleset::apply`]: crate::engine::Ruleset::apply

use crate::board::Board;
use crate::core::PlayerId;
use crate::score::ScoreStore;

/// The complete state of a game in progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    scores: ScoreStore,
    active_player: Option<PlayerId>,
    winner: Option<PlayerId>,
    num_players: usize,
}

impl GameState {
    /// Create a fresh state: empty counters, no moves made.
    #[must_use]
    pub fn new(board: Board, memos: impl IntoIterator<Item = String>, num_players: usize) -> Self {
        assert!(num_players > 0, "Must have at least 1 player");
        assert!(num_players <= 255, "At most 255 players supported");

        Self {
            board,
            scores: ScoreStore::new(memos, num_players),
            active_player: None,
            winner: None,
            num_players,
        }
    }

    /// Reassemble a state from its parts. Used by the save codec.
    pub(crate) fn from_parts(
        board: Board,
        scores: ScoreStore,
        active_player: Option<PlayerId>,
        winner: Option<PlayerId>,
        num_players: usize,
    ) -> Self {
        Self {
            board,
            scores,
            active_player,
            winner,
            num_players,
        }
    }

    /// The board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// The score store.
    #[must_use]
    pub fn scores(&self) -> &ScoreStore {
        &self.scores
    }

    pub(crate) fn scores_mut(&mut self) -> &mut ScoreStore {
        &mut self.scores
    }

    /// The player who made the last move, if any.
    #[must_use]
    pub fn active_player(&self) -> Option<PlayerId> {
        self.active_player
    }

    pub(crate) fn set_active_player(&mut self, player: Option<PlayerId>) {
        self.active_player = player;
    }

    /// The player whose move comes next.
    #[must_use]
    pub fn next_player(&self) -> PlayerId {
        match self.active_player {
            Some(player) => player.next(self.num_players),
            None => PlayerId::new(0),
        }
    }

    /// The winner, once a threshold has been exceeded.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub(crate) fn set_winner(&mut self, winner: Option<PlayerId>) {
        self.winner = winner;
    }

    /// Whether the game has ended.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }

    /// Number of players.
    #[must_use]
    pub fn num_players(&self) -> usize {
        self.num_players
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> GameState {
        GameState::new(Board::new(&[19, 19]), vec!["a.b".to_string()], 2)
    }

    #[test]
    fn test_new_state() {
        let state = fresh();
        assert_eq!(state.active_player(), None);
        assert_eq!(state.winner(), None);
        assert!(!state.is_terminal());
        assert_eq!(state.num_players(), 2);
        assert_eq!(state.board().stone_count(), 0);
    }

    #[test]
    fn test_first_mover_is_player_zero() {
        let state = fresh();
        assert_eq!(state.next_player(), PlayerId::new(0));
    }

    #[test]
    fn test_turn_order_alternates() {
        let mut state = fresh();
        state.set_active_player(Some(PlayerId::new(0)));
        assert_eq!(state.next_player(), PlayerId::new(1));
        state.set_active_player(Some(PlayerId::new(1)));
        assert_eq!(state.next_player(), PlayerId::new(0));
    }

    #[test]
    fn test_structural_equality() {
        let a = fresh();
        let b = fresh();
        assert_eq!(a, b);

        let mut c = fresh();
        c.scores_mut().set("a.b", PlayerId::new(0), 1);
        assert_ne!(a, c);
    }
}
