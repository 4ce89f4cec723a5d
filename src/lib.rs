//! Blocks World Planner Library
//!
//! Finds a sequence of single-block moves that turns one arrangement of
//! named blocks into another, using depth-first, breadth-first, A*, or
//! greedy best-first search over normalized configurations.

pub mod blocks;
pub mod configuration;
pub mod error;
pub mod heuristic;
pub mod moves;
pub mod parser;
pub mod problem;
pub mod solver;

pub use blocks::{Block, Pile};
pub use configuration::{format_configuration, Configuration, Support};
pub use error::{ChoiceError, Error, ParseError, PileError, ProblemError, Result, SearchError};
pub use heuristic::{estimate, GoalIndex, Heuristic};
pub use moves::Move;
pub use problem::{Problem, Relations};
pub use solver::{solve, solve_with, SearchStats, Solution, Strategy};
