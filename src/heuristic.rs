//! Cost estimates from a configuration to the goal.
//!
//! A block is *well placed* when it sits at its goal height and everything
//! beneath it is well placed too, so it will never have to move again. Every
//! other block is misplaced and has to be moved at least once.
//!
//! The default [`Heuristic::Penalized`] estimate adds, for each misplaced
//! block, the number of blocks stacked on top of it and the number of those
//! blocks that belong *below* it in the goal pile. It favours configurations
//! whose misplaced blocks are easy to free, which makes A* and best-first
//! fast on this domain but is not admissible. [`Heuristic::Misplaced`]
//! counts misplaced blocks only and never overestimates.

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;

use crate::blocks::Block;
use crate::configuration::Configuration;
use crate::error::ChoiceError;

/// Selects how [`GoalIndex::estimate`] scores a configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Heuristic {
    /// Misplaced count plus burial and inversion penalties.
    #[default]
    Penalized,
    /// Plain count of misplaced blocks.
    Misplaced,
}

impl Heuristic {
    pub const ALL: [Heuristic; 2] = [Heuristic::Penalized, Heuristic::Misplaced];

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::Penalized => "penalized",
            Heuristic::Misplaced => "misplaced",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Heuristic {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "penalized" | "default" => Ok(Heuristic::Penalized),
            "misplaced" | "admissible" => Ok(Heuristic::Misplaced),
            _ => Err(ChoiceError::UnknownHeuristic(s.to_string())),
        }
    }
}

/// Where a block must end up: which goal pile, and how high in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GoalPosition {
    pile: usize,
    height: usize,
}

/// Goal positions of every block, built once per search.
#[derive(Debug, Clone)]
pub struct GoalIndex {
    positions: FxHashMap<Block, GoalPosition>,
}

impl GoalIndex {
    pub fn new(goal: &Configuration) -> Self {
        let mut positions = FxHashMap::default();
        for (pile_index, pile) in goal.normalized_piles().into_iter().enumerate() {
            for (height, block) in pile.iter().enumerate() {
                positions.insert(
                    block.clone(),
                    GoalPosition {
                        pile: pile_index,
                        height,
                    },
                );
            }
        }
        Self { positions }
    }

    /// Scores `current` against the indexed goal. Zero exactly when every
    /// indexed block is well placed and no block is missing from the index.
    pub fn estimate(&self, heuristic: Heuristic, current: &Configuration) -> u32 {
        let mut cost = 0u32;

        for pile in current.piles() {
            let mut previous: Option<GoalPosition> = None;
            let mut grounded = true;

            for (height, block) in pile.iter().enumerate() {
                let position = self.positions.get(block).copied();
                let well_placed = grounded
                    && position.is_some_and(|goal| {
                        goal.height == height
                            && previous.map_or(true, |below| below.pile == goal.pile)
                    });
                grounded = well_placed;
                previous = position;

                if well_placed {
                    continue;
                }

                cost += 1;
                if heuristic == Heuristic::Misplaced {
                    continue;
                }

                let above = &pile.blocks()[height + 1..];
                cost += above.len() as u32;
                if let Some(goal) = position {
                    let inversions = above
                        .iter()
                        .filter_map(|block| self.positions.get(block))
                        .filter(|other| other.pile == goal.pile && other.height < goal.height)
                        .count();
                    cost += inversions as u32;
                }
            }
        }

        cost
    }
}

/// Penalized estimate of the moves needed to turn `current` into `goal`.
pub fn estimate(current: &Configuration, goal: &Configuration) -> u32 {
    GoalIndex::new(goal).estimate(Heuristic::Penalized, current)
}
