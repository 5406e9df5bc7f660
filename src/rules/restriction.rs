//! Move restrictions.
//!
//! Restrictions decide legality. A move is legal iff every top-level
//! restriction *holds*. A pattern restriction holds iff some match of its
//! pattern satisfies all its conditions (inverted by `negate`); a
//! disjunction restriction is a DNF over nested restrictions and holds iff
//! any conjunction holds entirely.
//!
//! Restrictions are evaluated against the post-placement hypothetical:
//! the engine places the candidate stone on a scratch board first, so
//! patterns can see the stone being considered.

use crate::core::{ApplyError, Coord, PlayerId};
use crate::pattern::Pattern;
use crate::state::GameState;

use super::{Condition, MultimatchMode, Rule};

/// A restriction: either a pattern check or a disjunction of conjunctions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Restriction {
    Pattern(PatternRestriction),
    Disjunction(DisjunctionRestriction),
}

impl Restriction {
    /// Whether this restriction holds for the (hypothetically placed) move.
    pub fn holds(
        &self,
        name: &str,
        state: &GameState,
        mv: &Coord,
        active: PlayerId,
    ) -> Result<bool, ApplyError> {
        match self {
            Restriction::Pattern(pattern) => pattern.holds(name, state, mv, active),
            Restriction::Disjunction(disjunction) => disjunction.holds(name, state, mv, active),
        }
    }
}

/// A rule-shaped check that cannot apply actions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternRestriction {
    /// The pattern to look for around the move.
    pub pattern: Pattern,

    /// Conditions a match must satisfy to count.
    pub conditions: Vec<Condition>,

    /// If set and not the active player, the restriction trivially holds.
    pub active_player: Option<PlayerId>,

    /// Invert the result: holds iff *no* satisfying match exists.
    pub negate: bool,
}

impl PatternRestriction {
    fn holds(
        &self,
        name: &str,
        state: &GameState,
        mv: &Coord,
        active: PlayerId,
    ) -> Result<bool, ApplyError> {
        if self.active_player.is_some_and(|p| p != active) {
            return Ok(true);
        }

        // One satisfying match is all that matters.
        let probe = Rule {
            pattern: self.pattern.clone(),
            multimatch: MultimatchMode::One,
            conditions: self.conditions.clone(),
            score_actions: Vec::new(),
            board_actions: Vec::new(),
            active_player: None,
        };
        let matched = !probe.retained_matches(name, state, mv, active)?.is_empty();
        Ok(matched != self.negate)
    }
}

/// Disjunctive normal form over nested restrictions.
///
/// Nested restrictions are anonymous and may themselves be disjunctions;
/// the truth value is computed recursively and lazily.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisjunctionRestriction {
    pub conjunctions: Vec<Vec<Restriction>>,
}

impl DisjunctionRestriction {
    fn holds(
        &self,
        name: &str,
        state: &GameState,
        mv: &Coord,
        active: PlayerId,
    ) -> Result<bool, ApplyError> {
        for conjunction in &self.conjunctions {
            let mut all = true;
            for restriction in conjunction {
                if !restriction.holds(name, state, mv, active)? {
                    all = false;
                    break;
                }
            }
            if all {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn pattern_restriction(pattern: &str, negate: bool) -> Restriction {
        Restriction::Pattern(PatternRestriction {
            pattern: Pattern::compile(pattern).unwrap(),
            conditions: Vec::new(),
            active_player: None,
            negate,
        })
    }

    fn state_with_run(len: usize) -> GameState {
        let mut board = Board::new(&[19, 19]);
        for offset in 0..len {
            board.set(&Coord::from([9, 5 + offset]), Some(PlayerId::new(0)));
        }
        GameState::new(board, Vec::new(), 2)
    }

    #[test]
    fn test_pattern_restriction_holds_when_matched() {
        let state = state_with_run(3);
        let restriction = pattern_restriction("AAA", false);

        assert!(restriction
            .holds("t", &state, &Coord::from([9, 6]), PlayerId::new(0))
            .unwrap());

        // No match: restriction does not hold.
        let short = state_with_run(2);
        assert!(!restriction
            .holds("t", &short, &Coord::from([9, 6]), PlayerId::new(0))
            .unwrap());
    }

    #[test]
    fn test_negated_restriction() {
        let state = state_with_run(6);
        let no_overline = pattern_restriction("AAAAAA", true);

        // Six in a row through the move: negated restriction fails.
        assert!(!no_overline
            .holds("t", &state, &Coord::from([9, 7]), PlayerId::new(0))
            .unwrap());

        // Five only: holds.
        let five = state_with_run(5);
        assert!(no_overline
            .holds("t", &five, &Coord::from([9, 7]), PlayerId::new(0))
            .unwrap());
    }

    #[test]
    fn test_active_player_gate_trivially_holds() {
        let state = state_with_run(6);
        let restriction = Restriction::Pattern(PatternRestriction {
            pattern: Pattern::compile("AAAAAA").unwrap(),
            conditions: Vec::new(),
            active_player: Some(PlayerId::new(0)),
            negate: true,
        });

        // Blocks player 0...
        assert!(!restriction
            .holds("t", &state, &Coord::from([9, 7]), PlayerId::new(0))
            .unwrap());
        // ...but not player 1.
        assert!(restriction
            .holds("t", &state, &Coord::from([9, 7]), PlayerId::new(1))
            .unwrap());
    }

    #[test]
    fn test_disjunction_truth_table() {
        let state = state_with_run(3);
        let mv = Coord::from([9, 6]);
        let active = PlayerId::new(0);

        let holds = || pattern_restriction("AAA", false); // true here
        let fails = || pattern_restriction("AAAAAA", false); // false here

        // (T and T) or (F) => T
        let d = Restriction::Disjunction(DisjunctionRestriction {
            conjunctions: vec![vec![holds(), holds()], vec![fails()]],
        });
        assert!(d.holds("t", &state, &mv, active).unwrap());

        // (T and F) or (F) => F
        let d = Restriction::Disjunction(DisjunctionRestriction {
            conjunctions: vec![vec![holds(), fails()], vec![fails()]],
        });
        assert!(!d.holds("t", &state, &mv, active).unwrap());

        // (T and F) or (T) => T
        let d = Restriction::Disjunction(DisjunctionRestriction {
            conjunctions: vec![vec![holds(), fails()], vec![holds()]],
        });
        assert!(d.holds("t", &state, &mv, active).unwrap());

        // Empty disjunction is false.
        let d = Restriction::Disjunction(DisjunctionRestriction {
            conjunctions: Vec::new(),
        });
        assert!(!d.holds("t", &state, &mv, active).unwrap());
    }

    #[test]
    fn test_nested_disjunction() {
        let state = state_with_run(3);
        let mv = Coord::from([9, 6]);

        let inner = Restriction::Disjunction(DisjunctionRestriction {
            conjunctions: vec![vec![pattern_restriction("AAA", false)]],
        });
        let outer = Restriction::Disjunction(DisjunctionRestriction {
            conjunctions: vec![vec![inner]],
        });
        assert!(outer.holds("t", &state, &mv, PlayerId::new(0)).unwrap());
    }
}
