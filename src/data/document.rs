//! Parsed datapack documents.
//!
//! These are the wire types: a direct serde mapping of the datapack JSON.
//! Documents know nothing about each other; the loader is what merges a
//! set of them into a [`Ruleset`], compiling pattern strings and
//! validating references on the way.
//!
//! [`Ruleset`]: crate::engine::Ruleset

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::rules::{BoardAction, Condition, MultimatchMode, RulePriority, ScoreAction};
use crate::score::ScoreSpec;

/// One datapack, as parsed from its JSON document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatapackDoc {
    /// The pack's name; the prefix of every feature it owns.
    pub name: String,

    /// Shown in the merged ruleset's title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Packs this one needs. Loaded first; missing ones fail the load.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    /// Packs this one wants loaded first *if present*. Absent ones are
    /// ignored.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub load_after: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scores: Vec<ScoreSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionDoc>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleDoc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<BoardDoc>,
}

/// Board declaration. The last pack in load order to declare one wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDoc {
    /// Axis lengths, outermost first.
    pub dimensions: Vec<usize>,

    /// Edge behavior. Only `stop` is implemented; anything else is
    /// accepted but behaves as `stop`.
    #[serde(default)]
    pub topology: Topology,
}

/// Board edge behavior. Reserved values deserialize but are inert.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topology {
    #[default]
    Stop,
    Loop,
    Return,
    LoopReverse,
    LoopReturn,
}

/// A rule declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleDoc {
    /// Qualified name: `owner.rule`.
    pub name: String,

    /// The pattern string, compiled at load.
    pub pattern: String,

    #[serde(default)]
    pub priority: RulePriority,

    #[serde(default)]
    pub multimatch_mode: MultimatchMode,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub score_actions: Vec<ScoreAction>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub board_actions: Vec<BoardAction>,

    /// Restrict the rule to one player's turns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_player: Option<PlayerId>,
}

/// A restriction declaration.
///
/// Top-level restrictions carry a qualified name so they can be
/// overridden; nested restrictions inside a disjunction are anonymous.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RestrictionDoc {
    Pattern {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        pattern: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        conditions: Vec<Condition>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        active_player: Option<PlayerId>,
        #[serde(default)]
        negate: bool,
    },
    Disjunction {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        conjunctions: Vec<Vec<RestrictionDoc>>,
    },
}

impl RestrictionDoc {
    /// The qualified name, if declared.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            RestrictionDoc::Pattern { name, .. } | RestrictionDoc::Disjunction { name, .. } => {
                name.as_deref()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_pack() {
        let doc: DatapackDoc = serde_json::from_value(json!({"name": "empty"})).unwrap();
        assert_eq!(doc.name, "empty");
        assert!(doc.dependencies.is_empty());
        assert!(doc.scores.is_empty());
        assert!(doc.board.is_none());
    }

    #[test]
    fn test_full_rule_doc() {
        let doc: RuleDoc = serde_json::from_value(json!({
            "name": "pente.capture",
            "pattern": "[A]aaA",
            "priority": "late",
            "multimatch_mode": "all",
            "conditions": [
                {"type": "coords", "axes": [0], "minimum": 1}
            ],
            "score_actions": [
                {"player_index": -1, "memo": "pente.captures", "operation": "add", "value": 2}
            ],
            "board_actions": [
                {"location_index": 1, "player_index": -3}
            ],
            "active_player": 0
        }))
        .unwrap();

        assert_eq!(doc.priority, RulePriority::Late);
        assert_eq!(doc.multimatch_mode, MultimatchMode::All);
        assert_eq!(doc.active_player, Some(PlayerId::new(0)));
        assert_eq!(doc.conditions.len(), 1);
    }

    #[test]
    fn test_rule_doc_defaults() {
        let doc: RuleDoc =
            serde_json::from_value(json!({"name": "a.b", "pattern": "[#]"})).unwrap();
        assert_eq!(doc.priority, RulePriority::Default);
        assert_eq!(doc.multimatch_mode, MultimatchMode::Half);
        assert_eq!(doc.active_player, None);
    }

    #[test]
    fn test_restriction_doc_variants() {
        let pattern: RestrictionDoc = serde_json::from_value(json!({
            "type": "pattern",
            "name": "renju.no_overline",
            "pattern": "AAAAAA",
            "negate": true
        }))
        .unwrap();
        assert_eq!(pattern.name(), Some("renju.no_overline"));

        let disjunction: RestrictionDoc = serde_json::from_value(json!({
            "type": "disjunction",
            "name": "x.either",
            "conjunctions": [
                [{"type": "pattern", "pattern": "AA"}],
                [{"type": "pattern", "pattern": "-"}, {"type": "pattern", "pattern": "#"}]
            ]
        }))
        .unwrap();
        match &disjunction {
            RestrictionDoc::Disjunction { conjunctions, .. } => {
                assert_eq!(conjunctions.len(), 2);
                assert_eq!(conjunctions[1].len(), 2);
                assert_eq!(conjunctions[1][0].name(), None);
            }
            RestrictionDoc::Pattern { .. } => panic!("expected disjunction"),
        }
    }

    #[test]
    fn test_topology_values() {
        let board: BoardDoc = serde_json::from_value(json!({
            "dimensions": [19, 19],
            "topology": "loop-reverse"
        }))
        .unwrap();
        assert_eq!(board.topology, Topology::LoopReverse);

        let board: BoardDoc = serde_json::from_value(json!({"dimensions": [19, 19]})).unwrap();
        assert_eq!(board.topology, Topology::Stop);
    }

    #[test]
    fn test_doc_round_trip() {
        let doc: DatapackDoc = serde_json::from_value(json!({
            "name": "pente",
            "display_name": "Pente",
            "board": {"dimensions": [19, 19]},
            "scores": [{"name": "pente.wins", "threshold": 0}],
            "rules": [{"name": "pente.win", "pattern": "AAAAA"}]
        }))
        .unwrap();

        let json = serde_json::to_value(&doc).unwrap();
        let back: DatapackDoc = serde_json::from_value(json).unwrap();
        assert_eq!(doc, back);
    }
}
