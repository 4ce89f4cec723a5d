//! Error types for the blocks-world planner.

use thiserror::Error;

use crate::solver::{SearchStats, Strategy};

/// Contract violations on a single pile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PileError {
    /// Reading the top of a pile that holds no blocks.
    #[error("cannot read the top of an empty pile")]
    EmptyAccess,
}

/// Rejections raised while assembling a [`Problem`](crate::problem::Problem).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    /// The goal relations contradict each other.
    #[error("malformed goal: {0}")]
    MalformedGoal(String),

    /// The initial relations contradict each other or leave a block unsupported.
    #[error("malformed initial state: {0}")]
    MalformedInitial(String),

    /// Initial and goal configurations do not hold the same blocks.
    #[error("initial and goal configurations hold different blocks: {0}")]
    BlockMismatch(String),
}

/// Failures while reading a PDDL problem file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected token `{found}` at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },

    #[error("missing section `{0}`")]
    MissingSection(&'static str),

    #[error("unknown block `{0}`")]
    UnknownBlock(String),

    #[error("object `{0}` declared twice")]
    DuplicateObject(String),

    #[error("unknown predicate `{0}`")]
    UnknownPredicate(String),

    #[error("predicate `{name}` expects {expected} argument(s), found {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },
}

/// An unrecognised strategy or heuristic name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChoiceError {
    #[error("unknown strategy `{0}` (expected depth, breadth, astar or best)")]
    UnknownStrategy(String),

    #[error("unknown heuristic `{0}` (expected penalized or misplaced)")]
    UnknownHeuristic(String),
}

/// Search failures.
///
/// For a well-formed problem either variant signals a defect in successor
/// generation or state equality rather than an unsolvable instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// A strategy exhausted its frontier without reaching the goal.
    #[error("{strategy} search exhausted after expanding {} states", .stats.expanded)]
    Exhausted {
        strategy: Strategy,
        stats: SearchStats,
    },

    /// Two consecutive path configurations are not one move apart.
    #[error("path step {step} is not a single move")]
    BrokenPath { step: usize },
}

/// Top-level error for the planner pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Problem(#[from] ProblemError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
