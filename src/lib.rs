//! # pente-engine
//!
//! A rule engine for Pente and its N-in-a-row relatives. Games are not
//! hard-coded: they are declared in JSON *datapacks* that compose rules,
//! restrictions, and per-player score counters, and the engine merges a
//! set of packs into one coherent ruleset.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: No hardcoded patterns, captures, or win
//!    conditions. Datapacks declare everything; the built-in Pente pack
//!    is just another document.
//!
//! 2. **Deterministic**: The same datapack set and move sequence always
//!    produce bit-identical board and score states. Orientation order,
//!    datapack load order, and match enumeration order are all fixed.
//!
//! 3. **Transactional Turns**: `apply` either returns the complete
//!    post-turn state or an error with the input state untouched.
//!
//! ## Architecture
//!
//! A turn flows: restrictions accept or reject the candidate move on a
//! post-placement view of the board; the stone is placed; rules run in
//! priority order, matching their patterns around the move and applying
//! score and board actions; win thresholds are checked.
//!
//! The engine is single-threaded and synchronous. The loaded [`Ruleset`]
//! is immutable and freely shareable; each [`GameState`] is an
//! independent value.
//!
//! ## Modules
//!
//! - `core`: player ids, coordinates, error types
//! - `board`: the N-dimensional grid and orientation tables
//! - `pattern`: pattern compiler and matcher
//! - `rules`: conditions, actions, rules, restrictions
//! - `score`: score specs and the per-player score store
//! - `state`: mutable game state
//! - `engine`: the merged ruleset and turn pipeline
//! - `data`: datapack documents, loader/resolver, saves, built-in packs
//!
//! ## Example
//!
//! ```
//! use pente_engine::{builtin, load, Coord};
//!
//! let ruleset = load(vec![builtin::pente()]).unwrap();
//! let state = ruleset.new_game(2);
//!
//! let mv = Coord::from([9, 9]);
//! assert!(ruleset.is_legal(&state, &mv));
//! let state = ruleset.apply(&state, &mv).unwrap();
//! assert_eq!(ruleset.winner(&state), None);
//! ```

pub mod board;
pub mod core;
pub mod data;
pub mod engine;
pub mod pattern;
pub mod rules;
pub mod score;
pub mod state;

// Re-export commonly used types
pub use crate::core::{ApplyError, Coord, LoadError, PlayerId, PlayerMap, SaveError};

pub use crate::board::{orientations, Board, Step};

pub use crate::pattern::{find_matches, AliasBindings, Match, Pattern, PatternError};

pub use crate::rules::{
    BoardAction, Condition, DisjunctionRestriction, MultimatchMode, PatternRestriction,
    Restriction, Rule, RulePriority, ScoreAction, ScoreOp,
};

pub use crate::score::{ScoreSpec, ScoreStore};

pub use crate::state::GameState;

pub use crate::engine::{RegisteredRestriction, RegisteredRule, Ruleset};

pub use crate::data::{
    builtin, load, BoardDoc, DatapackDoc, RestrictionDoc, RuleDoc, SaveDoc, Topology,
    DEFAULT_DIMENSIONS,
};
