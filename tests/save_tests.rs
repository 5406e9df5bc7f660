//! Save/restore integration tests: round-trips through JSON text and
//! resuming play from a restored state.

use pente_engine::{builtin, load, Coord, PlayerId, Ruleset, SaveDoc};

fn pente_keryo() -> Ruleset {
    load(vec![builtin::pente(), builtin::keryo()]).unwrap()
}

/// Round-trip through JSON text at several points of a real game.
#[test]
fn test_round_trip_during_play() {
    let ruleset = pente_keryo();
    let mut state = ruleset.new_game(2);

    let moves = [[9, 9], [9, 10], [0, 0], [9, 11], [9, 12], [5, 5]];
    for mv in moves {
        state = ruleset.apply(&state, &Coord::from(mv)).unwrap();

        let text = serde_json::to_string(&SaveDoc::capture(&ruleset, &state)).unwrap();
        let parsed: SaveDoc = serde_json::from_str(&text).unwrap();
        let restored = parsed.restore(&ruleset).unwrap();
        assert_eq!(restored, state);
    }
}

/// A restored game continues exactly like the original.
#[test]
fn test_restored_game_continues_identically() {
    let ruleset = pente_keryo();

    let prefix = [[9, 9], [9, 10], [0, 0], [9, 11]];
    let suffix = [[9, 12], [10, 10]];

    let mut original = ruleset.new_game(2);
    for mv in prefix {
        original = ruleset.apply(&original, &Coord::from(mv)).unwrap();
    }

    let save = SaveDoc::capture(&ruleset, &original);
    let mut restored = save.restore(&ruleset).unwrap();

    for mv in suffix {
        original = ruleset.apply(&original, &Coord::from(mv)).unwrap();
        restored = ruleset.apply(&restored, &Coord::from(mv)).unwrap();
    }
    assert_eq!(original, restored);
    // The capture at [9,12] carried across the save boundary.
    assert_eq!(original.scores().get("pente.captures", PlayerId::new(0)), 2);
}

/// Serialization is byte-stable: the same state always yields the same
/// document text.
#[test]
fn test_serialization_is_deterministic() {
    let ruleset = pente_keryo();
    let mut state = ruleset.new_game(2);
    for mv in [[9, 9], [9, 10], [3, 3]] {
        state = ruleset.apply(&state, &Coord::from(mv)).unwrap();
    }

    let first = serde_json::to_string(&SaveDoc::capture(&ruleset, &state)).unwrap();
    let second = serde_json::to_string(&SaveDoc::capture(&ruleset, &state)).unwrap();
    assert_eq!(first, second);
}

/// A terminal save restores as terminal and refuses further moves.
#[test]
fn test_terminal_save_round_trip() {
    let ruleset = load(vec![builtin::pente()]).unwrap();
    let mut state = ruleset.new_game(2);
    for mv in [[9, 5], [0, 0], [9, 6], [0, 2], [9, 7], [0, 4], [9, 8], [0, 6], [9, 9]] {
        state = ruleset.apply(&state, &Coord::from(mv)).unwrap();
    }
    assert!(state.is_terminal());

    let save = SaveDoc::capture(&ruleset, &state);
    let restored = save.restore(&ruleset).unwrap();

    assert_eq!(restored.winner(), Some(PlayerId::new(0)));
    assert!(ruleset.apply(&restored, &Coord::from([0, 8])).is_err());
}

/// A fresh save records "no active player" and restores the same way.
#[test]
fn test_fresh_save_has_no_active_player() {
    let ruleset = load(vec![builtin::pente()]).unwrap();
    let state = ruleset.new_game(2);

    let save = SaveDoc::capture(&ruleset, &state);
    assert_eq!(save.active_player, -1);

    let restored = save.restore(&ruleset).unwrap();
    assert_eq!(restored.active_player(), None);
    assert_eq!(restored.next_player(), PlayerId::new(0));
}

/// Saves are tied to their datapack set: restoring into a different
/// ruleset fails.
#[test]
fn test_save_rejects_foreign_ruleset() {
    let full = pente_keryo();
    let plain = load(vec![builtin::pente()]).unwrap();

    let save = SaveDoc::capture(&full, &full.new_game(2));
    assert!(save.restore(&plain).is_err());
}
