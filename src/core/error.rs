//! Engine error types.
//!
//! Errors fall into two classes:
//!
//! - [`LoadError`]: datapack bugs detected while merging a set of packs.
//!   Fatal to that load; nothing is partially registered.
//! - [`ApplyError`]: raised by `apply` for an individual move. The turn is
//!   transactional, so the caller's state is unchanged on error.
//!
//! Save documents get their own [`SaveError`] since a corrupt save is
//! neither a datapack bug nor a move error.

use thiserror::Error;

use crate::core::coord::Coord;
use crate::pattern::PatternError;

/// A datapack bug detected at load time.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Two documents in the input set share a name.
    #[error("duplicate datapack '{0}'")]
    DuplicatePack(String),

    /// A declared dependency is not in the available document set.
    #[error("datapack '{pack}' depends on '{dependency}', which is not available")]
    MissingDependency { pack: String, dependency: String },

    /// The dependency / load_after graph contains a cycle.
    #[error("circular dependency involving datapack '{0}'")]
    DependencyCycle(String),

    /// A top-level feature name has no `owner.` prefix.
    #[error("datapack '{pack}' declares unqualified name '{name}'")]
    UnqualifiedName { pack: String, name: String },

    /// A top-level restriction has no name at all.
    #[error("datapack '{pack}' declares an anonymous top-level restriction")]
    AnonymousRestriction { pack: String },

    /// The owning pack registered the same qualified name twice.
    #[error("datapack '{pack}' registers '{name}' more than once")]
    DuplicateRegistration { pack: String, name: String },

    /// A condition or action references a memo with no registered score.
    #[error("datapack '{pack}' references unregistered score '{memo}'")]
    UnknownMemo { pack: String, memo: String },

    /// A pattern string failed to compile.
    #[error("datapack '{pack}' contains invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pack: String,
        pattern: String,
        source: PatternError,
    },

    /// An action or condition indexes a cell beyond its rule's pattern.
    #[error("datapack '{pack}': index {index} is outside pattern of length {len} in '{name}'")]
    IndexOutOfPattern {
        pack: String,
        name: String,
        index: i32,
        len: usize,
    },

    /// A player index below the smallest rogue value for its context.
    #[error("datapack '{pack}': invalid player index {index} in '{name}'")]
    InvalidPlayerIndex {
        pack: String,
        name: String,
        index: i32,
    },

    /// A score condition with neither bound can never filter anything.
    #[error("datapack '{pack}': score condition in '{name}' has neither minimum nor maximum")]
    MissingBounds { pack: String, name: String },

    /// A pack declares a board with a different axis count than a dependency.
    #[error(
        "datapack '{pack}' declares a {found}-dimensional board, but its dependency \
         '{dependency}' assumes {expected} dimensions"
    )]
    DimensionMismatch {
        pack: String,
        dependency: String,
        expected: usize,
        found: usize,
    },

    /// A board axis of length zero.
    #[error("datapack '{pack}' declares a board with an empty axis")]
    EmptyBoardAxis { pack: String },
}

/// A rejected or failed move.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ApplyError {
    /// The game already has a winner.
    #[error("the game is over")]
    GameOver,

    /// The move coordinate has the wrong number of axes.
    #[error("move {coord} has {found} ordinates, the board has {expected} axes")]
    WrongDimensions {
        coord: Coord,
        expected: usize,
        found: usize,
    },

    /// The move coordinate lies outside the board.
    #[error("move {0} is outside the board")]
    OutOfBounds(Coord),

    /// The target cell already holds a stone.
    #[error("cell {0} is already occupied")]
    Occupied(Coord),

    /// A restriction blocked the move.
    #[error("move {0} is forbidden by a restriction")]
    Restricted(Coord),

    /// A datapack authoring error surfaced at runtime: a rule resolved a
    /// player from a match cell that holds no stone. The pattern does not
    /// actually guarantee a stone at that index.
    #[error("'{name}' resolved player index {index} to empty cell {coord}")]
    EmptyCellReference {
        name: String,
        index: i32,
        coord: Coord,
    },
}

/// A malformed or inconsistent save document.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SaveError {
    /// The board field is not a rectangular nested integer array.
    #[error("save board is not a rectangular integer array")]
    MalformedBoard,

    /// The board's shape differs from the ruleset's dimensions.
    #[error("save board has dimensions {found:?}, ruleset expects {expected:?}")]
    BoardShape {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// A cell value outside the player range with no empty sentinel.
    #[error("save board contains invalid cell value {0}")]
    InvalidCell(i64),

    /// A player count the engine cannot represent.
    #[error("save declares invalid player count {0}")]
    InvalidPlayerCount(usize),

    /// A score entry is not sized to the player count.
    #[error("score '{memo}' has {found} entries, expected {expected}")]
    ScoreArity {
        memo: String,
        expected: usize,
        found: usize,
    },

    /// A negative score value.
    #[error("score '{memo}' holds negative value {value}")]
    NegativeScore { memo: String, value: i64 },

    /// The save references a score the ruleset does not define.
    #[error("save references unregistered score '{0}'")]
    UnknownMemo(String),

    /// `active_player` below -1 or not a valid player.
    #[error("save has invalid active player {0}")]
    InvalidActivePlayer(i64),

    /// The save's datapack list does not match the loaded ruleset.
    #[error("save was created with datapacks {found:?}, ruleset loaded {expected:?}")]
    DatapackMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
}
