//! Built-in datapacks.
//!
//! The engine ships the baseline Pente pack plus two small variant packs.
//! They are ordinary documents, built through the same JSON wire format
//! external packs use; nothing here is special-cased.

use serde_json::json;

use super::document::DatapackDoc;

fn pack(value: serde_json::Value) -> DatapackDoc {
    serde_json::from_value(value).expect("built-in datapack is well-formed")
}

/// Baseline Pente: 19x19 board, five-in-a-row wins, pair captures, ten
/// captured stones win.
#[must_use]
pub fn pente() -> DatapackDoc {
    pack(json!({
        "name": "pente",
        "display_name": "Pente",
        "board": {"dimensions": [19, 19], "topology": "stop"},
        "scores": [
            {"name": "pente.wins", "display_name": "Wins", "threshold": 0},
            {"name": "pente.captures", "display_name": "Captures", "threshold": 9}
        ],
        "rules": [
            {
                "name": "pente.win",
                "pattern": "AAAAA",
                "multimatch_mode": "half",
                "score_actions": [
                    {"player_index": -1, "memo": "pente.wins", "operation": "add", "value": 1}
                ]
            },
            {
                "name": "pente.capture",
                "pattern": "[A]aaA",
                "multimatch_mode": "all",
                "score_actions": [
                    {"player_index": -1, "memo": "pente.captures", "operation": "add", "value": 2}
                ],
                "board_actions": [
                    {"location_index": 1, "player_index": -3},
                    {"location_index": 2, "player_index": -3}
                ]
            }
        ]
    }))
}

/// Keryo-Pente: pairs *and* triples are captured; fifteen captured stones
/// win, raised by overriding the base pack's threshold.
#[must_use]
pub fn keryo() -> DatapackDoc {
    pack(json!({
        "name": "keryo",
        "display_name": "Keryo-Pente",
        "dependencies": ["pente"],
        "scores": [
            {"name": "pente.captures", "display_name": "Captures", "threshold": 14}
        ],
        "rules": [
            {
                "name": "keryo.capture_three",
                "pattern": "[A]aaaA",
                "multimatch_mode": "all",
                "score_actions": [
                    {"player_index": -1, "memo": "pente.captures", "operation": "add", "value": 3}
                ],
                "board_actions": [
                    {"location_index": 1, "player_index": -3},
                    {"location_index": 2, "player_index": -3},
                    {"location_index": 3, "player_index": -3}
                ]
            }
        ]
    }))
}

/// Overline prohibition: the first player may not make six or more in a
/// row.
#[must_use]
pub fn renju_overline() -> DatapackDoc {
    pack(json!({
        "name": "renju_overline",
        "display_name": "Overline Prohibition",
        "dependencies": ["pente"],
        "restrictions": [
            {
                "type": "pattern",
                "name": "renju_overline.no_overline",
                "pattern": "AAAAAA",
                "active_player": 0,
                "negate": true
            }
        ]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::load;

    #[test]
    fn test_builtin_packs_load() {
        let ruleset = load(vec![pente()]).unwrap();
        assert_eq!(ruleset.dimensions(), &[19, 19]);
        assert_eq!(ruleset.scores().len(), 2);
        assert_eq!(ruleset.rules().len(), 2);
        assert_eq!(ruleset.display_name(), "Pente");
    }

    #[test]
    fn test_keryo_overrides_capture_threshold() {
        let ruleset = load(vec![pente(), keryo()]).unwrap();
        assert_eq!(ruleset.pack_order(), &["pente", "keryo"]);

        let captures = ruleset
            .scores()
            .iter()
            .find(|spec| spec.name == "pente.captures")
            .unwrap();
        assert_eq!(captures.threshold, Some(14));
        assert_eq!(ruleset.rules().len(), 3);
    }

    #[test]
    fn test_renju_overline_requires_pente() {
        assert!(load(vec![renju_overline()]).is_err());
        let ruleset = load(vec![pente(), renju_overline()]).unwrap();
        assert_eq!(ruleset.restrictions().len(), 1);
    }
}
