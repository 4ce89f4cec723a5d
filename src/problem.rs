//! Problems: an initial and a goal configuration over one set of blocks.
//!
//! Problems are usually assembled from predicate facts (`ON`, `ONTABLE`,
//! `CLEAR`). Contradictory facts are rejected here, before any search runs.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::blocks::{Block, Pile};
use crate::configuration::{Configuration, Support};
use crate::error::ProblemError;

/// Predicate facts describing one arrangement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relations {
    /// `(ON upper lower)` facts.
    pub on: Vec<(Block, Block)>,
    /// `(ONTABLE block)` facts.
    pub on_table: Vec<Block>,
    /// `(CLEAR block)` facts.
    pub clear: Vec<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Initial,
    Goal,
}

impl Role {
    fn error(self, message: String) -> ProblemError {
        match self {
            Role::Initial => ProblemError::MalformedInitial(message),
            Role::Goal => ProblemError::MalformedGoal(message),
        }
    }
}

impl Relations {
    /// Stacks `blocks` according to the facts.
    ///
    /// In the initial state every block needs a stated support. In the goal,
    /// blocks the facts leave unsupported rest on the table.
    fn assemble(&self, blocks: &[Block], role: Role) -> Result<Configuration, ProblemError> {
        let known: FxHashSet<&Block> = blocks.iter().collect();
        let check_known = |block: &Block| {
            if known.contains(block) {
                Ok(())
            } else {
                Err(role.error(format!("unknown block {block}")))
            }
        };

        let mut supports: FxHashMap<Block, Support> = FxHashMap::default();
        let mut above: FxHashMap<Block, Block> = FxHashMap::default();

        let facts = self
            .on
            .iter()
            .map(|(upper, lower)| (upper, Support::Block(lower.clone())))
            .chain(self.on_table.iter().map(|block| (block, Support::Table)));

        for (block, support) in facts {
            check_known(block)?;
            if let Support::Block(lower) = &support {
                check_known(lower)?;
                if lower == block {
                    return Err(role.error(format!("{block} cannot rest on itself")));
                }
                if let Some(existing) = above.insert(lower.clone(), block.clone()) {
                    if &existing != block {
                        return Err(role.error(format!(
                            "{existing} and {block} both rest on {lower}"
                        )));
                    }
                }
            }
            if let Some(existing) = supports.insert(block.clone(), support.clone()) {
                if existing != support {
                    return Err(role.error(format!(
                        "{block} rests on both {existing} and {support}"
                    )));
                }
            }
        }

        for block in &self.clear {
            check_known(block)?;
            if let Some(upper) = above.get(block) {
                return Err(role.error(format!("{block} is clear but {upper} rests on it")));
            }
        }

        let mut piles = Vec::new();
        let mut placed = 0;
        for block in blocks {
            match supports.get(block) {
                Some(Support::Table) => {}
                Some(Support::Block(_)) => continue,
                None if role == Role::Goal => {}
                None => return Err(role.error(format!("{block} has no support"))),
            }
            let mut pile = Pile::new();
            let mut current = Some(block);
            while let Some(block) = current {
                pile.push(block.clone());
                placed += 1;
                current = above.get(block);
            }
            piles.push(pile);
        }

        if placed != blocks.len() {
            return Err(role.error("blocks rest on each other in a cycle".to_string()));
        }

        let mut configuration = Configuration::new(piles);
        configuration.compact();
        Ok(configuration)
    }
}

/// An immutable pairing of start and goal configurations.
#[derive(Debug, Clone)]
pub struct Problem {
    initial: Configuration,
    goal: Configuration,
}

impl Problem {
    /// Pairs two configurations after checking that each holds every block
    /// exactly once and that both hold the same blocks.
    ///
    /// The stored start is compacted to end with exactly one empty slot, so
    /// a block can always be put on the table.
    pub fn new(mut initial: Configuration, goal: Configuration) -> Result<Self, ProblemError> {
        let initial_blocks = distinct_blocks(&initial, Role::Initial)?;
        let goal_blocks = distinct_blocks(&goal, Role::Goal)?;

        if initial_blocks != goal_blocks {
            let mut missing: Vec<String> = initial_blocks
                .symmetric_difference(&goal_blocks)
                .map(|block| block.to_string())
                .collect();
            missing.sort();
            return Err(ProblemError::BlockMismatch(missing.join(", ")));
        }

        initial.compact();
        Ok(Self { initial, goal })
    }

    /// Builds both configurations from predicate facts over `blocks`.
    pub fn from_relations(
        blocks: &[Block],
        initial: &Relations,
        goal: &Relations,
    ) -> Result<Self, ProblemError> {
        let initial = initial.assemble(blocks, Role::Initial)?;
        let goal = goal.assemble(blocks, Role::Goal)?;
        Self::new(initial, goal)
    }

    pub fn initial(&self) -> &Configuration {
        &self.initial
    }

    pub fn goal(&self) -> &Configuration {
        &self.goal
    }

    pub fn block_count(&self) -> usize {
        self.initial.block_count()
    }
}

fn distinct_blocks(
    configuration: &Configuration,
    role: Role,
) -> Result<FxHashSet<Block>, ProblemError> {
    let mut seen = FxHashSet::default();
    for block in configuration.blocks() {
        if !seen.insert(block.clone()) {
            return Err(role.error(format!("{block} appears more than once")));
        }
    }
    Ok(seen)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(names: &[&str]) -> Vec<Block> {
        names.iter().map(|name| Block::new(name)).collect()
    }

    fn on(upper: &str, lower: &str) -> (Block, Block) {
        (Block::new(upper), Block::new(lower))
    }

    #[test]
    fn test_new_rejects_different_blocks() {
        let initial = Configuration::from_names(&[&["A", "B"]]);
        let goal = Configuration::from_names(&[&["A", "C"]]);
        assert_eq!(
            Problem::new(initial, goal).unwrap_err(),
            ProblemError::BlockMismatch("B, C".to_string())
        );
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let initial = Configuration::from_names(&[&["A"], &["B"]]);
        let goal = Configuration::from_names(&[&["A", "B"], &["A"]]);
        assert!(matches!(
            Problem::new(initial, goal),
            Err(ProblemError::MalformedGoal(_))
        ));
    }

    #[test]
    fn test_new_gives_start_one_spare_slot() {
        let tower = Problem::new(
            Configuration::from_names(&[&["C", "B", "A"]]),
            Configuration::from_names(&[&["A", "B", "C"]]),
        )
        .unwrap();
        let piles = tower.initial().piles();
        assert_eq!(piles.len(), 2);
        assert!(piles[1].is_empty());
        assert!(!tower.initial().successors().is_empty());

        let padded = Problem::new(
            Configuration::from_names(&[&[], &["A"], &[], &["B"], &[]]),
            Configuration::from_names(&[&["A", "B"]]),
        )
        .unwrap();
        assert_eq!(padded.initial().piles().len(), 3);
        assert_eq!(padded.initial().piles().iter().filter(|p| p.is_empty()).count(), 1);
    }

    #[test]
    fn test_from_relations() {
        let all = blocks(&["A", "B", "C", "D"]);
        let initial = Relations {
            on: vec![on("A", "B")],
            on_table: blocks(&["B", "C", "D"]),
            clear: blocks(&["A", "C", "D"]),
        };
        let goal = Relations {
            on: vec![on("D", "C"), on("C", "B"), on("B", "A")],
            ..Relations::default()
        };

        let problem = Problem::from_relations(&all, &initial, &goal).unwrap();
        assert_eq!(
            *problem.initial(),
            Configuration::from_names(&[&["B", "A"], &["C"], &["D"]])
        );
        assert_eq!(
            *problem.goal(),
            Configuration::from_names(&[&["A", "B", "C", "D"]])
        );
        assert_eq!(problem.initial().piles().last().map(Pile::is_empty), Some(true));
        assert_eq!(problem.block_count(), 4);
    }

    #[test]
    fn test_goal_leaves_unmentioned_blocks_on_table() {
        let all = blocks(&["A", "B", "C"]);
        let initial = Relations {
            on_table: all.clone(),
            ..Relations::default()
        };
        let goal = Relations {
            on: vec![on("A", "B")],
            ..Relations::default()
        };
        let problem = Problem::from_relations(&all, &initial, &goal).unwrap();
        assert_eq!(
            *problem.goal(),
            Configuration::from_names(&[&["B", "A"], &["C"]])
        );
    }

    #[test]
    fn test_goal_with_two_supports_is_malformed() {
        let all = blocks(&["A", "B", "C"]);
        let initial = Relations {
            on_table: all.clone(),
            ..Relations::default()
        };
        let goal = Relations {
            on: vec![on("A", "B"), on("A", "C")],
            ..Relations::default()
        };
        assert!(matches!(
            Problem::from_relations(&all, &initial, &goal),
            Err(ProblemError::MalformedGoal(_))
        ));
    }

    #[test]
    fn test_goal_rejects_shared_support_cycle_and_clear_conflict() {
        let all = blocks(&["A", "B", "C"]);
        let initial = Relations {
            on_table: all.clone(),
            ..Relations::default()
        };

        let shared = Relations {
            on: vec![on("A", "C"), on("B", "C")],
            ..Relations::default()
        };
        let cycle = Relations {
            on: vec![on("A", "B"), on("B", "A")],
            ..Relations::default()
        };
        let clear = Relations {
            on: vec![on("A", "B")],
            clear: blocks(&["B"]),
            ..Relations::default()
        };
        let itself = Relations {
            on: vec![on("A", "A")],
            ..Relations::default()
        };

        for goal in [shared, cycle, clear, itself] {
            assert!(
                matches!(
                    Problem::from_relations(&all, &initial, &goal),
                    Err(ProblemError::MalformedGoal(_))
                ),
                "{goal:?}"
            );
        }
    }

    #[test]
    fn test_initial_requires_every_support() {
        let all = blocks(&["A", "B"]);
        let initial = Relations {
            on_table: blocks(&["A"]),
            ..Relations::default()
        };
        assert!(matches!(
            Problem::from_relations(&all, &initial, &Relations::default()),
            Err(ProblemError::MalformedInitial(_))
        ));
    }
}
