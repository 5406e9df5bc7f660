//! Restriction and legality integration tests.
//!
//! Covers the overline prohibition pack, disjunction restrictions, the
//! always-illegal occupied cell, and the transactional guarantees of
//! `apply`.

use pente_engine::{
    builtin, load, ApplyError, Coord, DatapackDoc, GameState, PlayerId, Ruleset,
};
use serde_json::json;

fn doc(value: serde_json::Value) -> DatapackDoc {
    serde_json::from_value(value).unwrap()
}

fn play(ruleset: &Ruleset, moves: &[[usize; 2]]) -> GameState {
    let mut state = ruleset.new_game(2);
    for mv in moves {
        state = ruleset.apply(&state, &Coord::from(*mv)).unwrap();
    }
    state
}

/// The overline pack forbids player 0 from making six in a row.
#[test]
fn test_overline_prohibition() {
    let ruleset = load(vec![builtin::pente(), builtin::renju_overline()]).unwrap();

    // Player 0 builds . A A A _ A A: filling the gap would make six.
    let state = play(
        &ruleset,
        &[
            [9, 4],
            [0, 0],
            [9, 5],
            [0, 2],
            [9, 6],
            [0, 4],
            [9, 8],
            [0, 6],
            [9, 9],
            [0, 8],
        ],
    );

    let overline_move = Coord::from([9, 7]);
    assert!(!ruleset.is_legal(&state, &overline_move));
    assert_eq!(
        ruleset.apply(&state, &overline_move),
        Err(ApplyError::Restricted(overline_move.clone()))
    );

    // A move that merely extends to four is fine.
    assert!(ruleset.is_legal(&state, &Coord::from([9, 3])));
}

/// The restriction is gated on player 0; player 1 may overline freely.
#[test]
fn test_overline_allowed_for_second_player() {
    let ruleset = load(vec![builtin::pente(), builtin::renju_overline()]).unwrap();

    // Player 1 builds B B B _ B B down a column while player 0 wanders.
    let state = play(
        &ruleset,
        &[
            [0, 0],
            [4, 9],
            [0, 2],
            [5, 9],
            [0, 4],
            [6, 9],
            [0, 6],
            [8, 9],
            [0, 8],
            [9, 9],
            [0, 10],
        ],
    );

    // Player 1 completes six in a column; no restriction applies, and the
    // win rule sees five-in-a-row within it.
    let state = ruleset.apply(&state, &Coord::from([7, 9])).unwrap();
    assert_eq!(ruleset.winner(&state), Some(PlayerId::new(1)));
}

/// Placement on an occupied cell is always illegal, restrictions aside.
#[test]
fn test_occupied_cell_always_illegal() {
    let ruleset = load(vec![builtin::pente()]).unwrap();
    let state = play(&ruleset, &[[9, 9]]);

    assert!(!ruleset.is_legal(&state, &Coord::from([9, 9])));
    assert_eq!(
        ruleset.apply(&state, &Coord::from([9, 9])),
        Err(ApplyError::Occupied(Coord::from([9, 9])))
    );
}

/// A disjunction restriction legalizes a move iff some conjunction holds
/// entirely: here (west AND north) OR far-east.
#[test]
fn test_disjunction_restriction() {
    let ruleset = load(vec![doc(json!({
        "name": "zones",
        "board": {"dimensions": [19, 19]},
        "restrictions": [{
            "type": "disjunction",
            "name": "zones.allowed",
            "conjunctions": [
                [
                    {"type": "pattern", "pattern": "[#]",
                     "conditions": [{"type": "coords", "axes": [1], "maximum": 9}]},
                    {"type": "pattern", "pattern": "[#]",
                     "conditions": [{"type": "coords", "axes": [0], "maximum": 9}]}
                ],
                [
                    {"type": "pattern", "pattern": "[#]",
                     "conditions": [{"type": "coords", "axes": [1], "minimum": 15}]}
                ]
            ]
        }]
    }))])
    .unwrap();

    let state = ruleset.new_game(2);

    // Both halves of the first conjunction hold.
    assert!(ruleset.is_legal(&state, &Coord::from([5, 5])));
    // West but not north, and not far-east: no conjunction holds.
    assert!(!ruleset.is_legal(&state, &Coord::from([15, 5])));
    // The second conjunction alone.
    assert!(ruleset.is_legal(&state, &Coord::from([15, 16])));
    // Nothing holds.
    assert!(!ruleset.is_legal(&state, &Coord::from([15, 12])));
    // North-east inside neither column band: first conjunction fails on
    // its west leg, second fails; still illegal.
    assert!(!ruleset.is_legal(&state, &Coord::from([5, 12])));
}

/// `is_legal` never mutates and always agrees with itself.
#[test]
fn test_is_legal_pure_and_consistent() {
    let ruleset = load(vec![builtin::pente(), builtin::renju_overline()]).unwrap();
    let state = play(&ruleset, &[[9, 9], [9, 10]]);
    let before = state.clone();

    for coord in [[9, 9], [9, 11], [18, 18], [0, 0]] {
        let mv = Coord::from(coord);
        assert_eq!(ruleset.is_legal(&state, &mv), ruleset.is_legal(&state, &mv));
    }
    assert_eq!(state, before);
}

/// A datapack bug surfacing mid-turn rolls the whole turn back.
#[test]
fn test_datapack_error_is_transactional() {
    // The rule's score action reads the owner of pattern cell 1, but the
    // pattern guarantees that cell is *empty*: a broken datapack.
    let ruleset = load(vec![doc(json!({
        "name": "broken",
        "board": {"dimensions": [9, 9]},
        "scores": [{"name": "broken.points"}],
        "rules": [{
            "name": "broken.rule",
            "pattern": "[#]-",
            "multimatch_mode": "one",
            "score_actions": [
                {"player_index": 1, "memo": "broken.points", "operation": "add", "value": 1}
            ]
        }]
    }))])
    .unwrap();

    let state = ruleset.new_game(2);
    let before = state.clone();

    // Legality checking does not run rules, so the move looks fine.
    assert!(ruleset.is_legal(&state, &Coord::from([4, 4])));

    let err = ruleset.apply(&state, &Coord::from([4, 4])).unwrap_err();
    assert!(matches!(err, ApplyError::EmptyCellReference { index: 1, .. }));
    assert_eq!(state, before, "failed apply must leave the state untouched");
}

/// Restrictions see the candidate stone: a "must touch your own stone"
/// restriction can bind a letter to the placed stone itself.
#[test]
fn test_restriction_sees_hypothetical_placement() {
    let ruleset = load(vec![doc(json!({
        "name": "contact",
        "board": {"dimensions": [9, 9]},
        "restrictions": [{
            "type": "pattern",
            "name": "contact.adjacent",
            "pattern": "[A]A"
        }]
    }))])
    .unwrap();

    let state = ruleset.new_game(2);

    // First move: no own stone to touch anywhere, so nothing is legal for
    // the pattern - except nothing, which shows the stone itself does not
    // satisfy the adjacency.
    assert!(!ruleset.is_legal(&state, &Coord::from([4, 4])));
}
